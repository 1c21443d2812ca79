use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::response_types::HealthResponse;
use crate::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let report = state.health_service.check().await;
    if report.is_ok() {
        (StatusCode::OK, Json(HealthResponse { status: "ok", errors: Vec::new() }))
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthResponse { status: "error", errors: report.errors }),
        )
    }
}
