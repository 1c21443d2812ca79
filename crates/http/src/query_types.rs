//! Request/query types (Deserialize)

use serde::Deserialize;

use crate::api_error::ApiError;

/// `?page=N` on the search routes. 1-based; absent means the first page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> Result<Option<u64>, ApiError> {
        self.page
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                raw.parse::<u64>().map_err(|_| {
                    ApiError::BadRequest(format!("page must be a positive integer, got {raw:?}"))
                })
            })
            .transpose()
    }
}
