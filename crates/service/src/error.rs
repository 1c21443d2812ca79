//! Typed error enum for the service layer.
//!
//! Storage, search and import failures in one type for the HTTP layer to map.

use digital_register_search::SearchError;
use digital_register_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Elasticsearch or address API call failed.
    #[error("search: {0}")]
    Search(#[from] SearchError),

    /// Caller provided invalid input (unparsable timestamp, empty key).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Import source could not be read.
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    /// The blocking import parser panicked or was cancelled.
    #[error("import task: {0}")]
    ImportTask(#[from] tokio::task::JoinError),
}

impl ServiceError {
    /// Whether this error represents a duplicate/conflict.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_duplicate())
    }
}
