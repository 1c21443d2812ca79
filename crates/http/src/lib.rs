//! HTTP API server for the digital register.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]

pub mod api_error;
mod handlers;
mod query_types;
mod response_types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use digital_register_core::Settings;
use digital_register_queue::LegacyTransmitter;
use digital_register_search::PropertySearch;
use digital_register_service::{HealthService, SearchService, TitleService, UserSearchService};
use digital_register_storage::StorageBackend;
use tower_http::trace::TraceLayer;

pub use response_types::{HealthResponse, OfficialCopyResponse, PriceResponse, TitleResponse};

/// Shared application state for all HTTP handlers.
pub struct AppState {
    pub title_service: Arc<TitleService>,
    pub search_service: Arc<SearchService>,
    pub user_search_service: Arc<UserSearchService>,
    pub health_service: Arc<HealthService>,
}

impl AppState {
    /// Wire every service from the shared backends.
    #[must_use]
    pub fn new(
        settings: &Settings,
        storage: Arc<StorageBackend>,
        search: Arc<dyn PropertySearch>,
        transmitter: Option<Arc<dyn LegacyTransmitter>>,
    ) -> Self {
        Self {
            title_service: Arc::new(TitleService::new(Arc::clone(&storage))),
            search_service: Arc::new(SearchService::new(
                Arc::clone(&storage),
                Arc::clone(&search),
                settings.search,
            )),
            user_search_service: Arc::new(UserSearchService::new(
                Arc::clone(&storage),
                transmitter,
                settings.view_window_minutes,
            )),
            health_service: Arc::new(HealthService::new(storage, search)),
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/titles/{title_ref}", get(handlers::titles::get_title))
        .route("/titles/{title_ref}/official-copy", get(handlers::titles::get_official_copy))
        .route("/title_search_postcode/{postcode}", get(handlers::search::search_postcode))
        .route("/title_search_address/{address}", get(handlers::search::search_address))
        .route("/save_search_request", post(handlers::user_search::save_search_request))
        .route(
            "/user_can_view/{user_id}/{title_number}",
            get(handlers::user_search::user_can_view),
        )
        .route("/get_price/{product}", get(handlers::user_search::get_price))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
