use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use digital_register_core::PaginatedTitles;

use crate::api_error::ApiError;
use crate::query_types::PageQuery;
use crate::AppState;

pub async fn search_postcode(
    State(state): State<Arc<AppState>>,
    Path(postcode): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedTitles>, ApiError> {
    let page = query.page()?;
    Ok(Json(state.search_service.search_postcode(&postcode, page).await?))
}

pub async fn search_address(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedTitles>, ApiError> {
    let page = query.page()?;
    Ok(Json(state.search_service.search_address(&address, page).await?))
}
