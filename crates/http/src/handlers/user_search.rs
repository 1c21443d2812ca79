use std::sync::Arc;

use axum::extract::{Path, State};
use axum::{Form, Json};
use digital_register_service::{SavedSearch, SearchRequestForm};

use crate::api_error::{ApiError, PRODUCT_NOT_FOUND};
use crate::response_types::PriceResponse;
use crate::AppState;

pub async fn save_search_request(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchRequestForm>,
) -> Result<Json<SavedSearch>, ApiError> {
    Ok(Json(state.user_search_service.save_search_request(&form).await?))
}

pub async fn user_can_view(
    State(state): State<Arc<AppState>>,
    Path((user_id, title_number)): Path<(String, String)>,
) -> Result<Json<bool>, ApiError> {
    Ok(Json(state.user_search_service.user_can_view(&user_id, &title_number).await?))
}

pub async fn get_price(
    State(state): State<Arc<AppState>>,
    Path(product): Path<String>,
) -> Result<Json<PriceResponse>, ApiError> {
    let price = state.user_search_service.get_price(&product).await?;
    price
        .map(|price| Json(PriceResponse { product, price }))
        .ok_or(ApiError::NotFound(PRODUCT_NOT_FOUND))
}
