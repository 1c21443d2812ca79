//! Typed API error for HTTP handlers.
//!
//! Converts domain errors into JSON responses with the status codes the
//! front end expects. Handlers return `Result<Json<T>, ApiError>`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use digital_register_service::ServiceError;

pub const TITLE_NOT_FOUND: &str = "Title not found";
pub const PRODUCT_NOT_FOUND: &str = "Product not found";
const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// API error with HTTP status code and human-readable message.
///
/// Converts to `{"error": "message"}`. `Internal` logs the real error
/// server-side and returns a static message to the client.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request: invalid input from caller.
    BadRequest(String),
    /// 404 Not Found: requested resource doesn't exist.
    NotFound(&'static str),
    /// 422 Unprocessable Entity: the same search was already recorded.
    UnprocessableEntity(String),
    /// 500 Internal Server Error: unexpected failure. Details logged, not exposed.
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_owned()),
            Self::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            Self::Internal(err) => {
                tracing::error!(error = ?err, "An error occurred when processing a request");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR.to_owned())
            },
        };
        let body = serde_json::json!({"error": message});
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Storage(ref e) if e.is_duplicate() => {
                Self::UnprocessableEntity(err.to_string())
            },
            ServiceError::InvalidInput(msg) => Self::BadRequest(msg),
            _ => Self::Internal(err.into()),
        }
    }
}
