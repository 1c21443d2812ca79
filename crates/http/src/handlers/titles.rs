use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::api_error::{ApiError, TITLE_NOT_FOUND};
use crate::response_types::{OfficialCopyResponse, TitleResponse};
use crate::AppState;

pub async fn get_title(
    State(state): State<Arc<AppState>>,
    Path(title_ref): Path<String>,
) -> Result<Json<TitleResponse>, ApiError> {
    let title = state.title_service.get_title(&title_ref).await?;
    title.map(|t| Json(t.into())).ok_or(ApiError::NotFound(TITLE_NOT_FOUND))
}

pub async fn get_official_copy(
    State(state): State<Arc<AppState>>,
    Path(title_ref): Path<String>,
) -> Result<Json<OfficialCopyResponse>, ApiError> {
    let title = state.title_service.get_official_copy(&title_ref).await?;
    title.map(|t| Json(t.into())).ok_or(ApiError::NotFound(TITLE_NOT_FOUND))
}
