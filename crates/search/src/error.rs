//! Typed error enum for the search crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    Status { code: u16, body: String },
    #[error("{0}")]
    InvalidResponse(String),
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl SearchError {
    /// Whether the search backend could not be reached at all.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}
