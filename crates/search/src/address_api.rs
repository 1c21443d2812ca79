//! Address search API client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use digital_register_core::PageRequest;
use serde::Deserialize;
use serde_json::Value;

use crate::error::SearchError;
use crate::types::{AddressHit, PropertySearch, SearchPage};

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    data: Vec<AddressHit>,
}

/// Sends postcode searches to the address search API and delegates address
/// searches and cluster info to `fallback`.
pub struct AddressApiClient {
    client: reqwest::Client,
    base_url: String,
    fallback: Arc<dyn PropertySearch>,
}

impl std::fmt::Debug for AddressApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressApiClient").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

impl AddressApiClient {
    /// # Errors
    /// Returns `SearchError::ClientInit` if the HTTP client cannot be built.
    pub fn new(base_url: &str, fallback: Arc<dyn PropertySearch>) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SearchError::ClientInit(e.to_string()))?;
        let base_url =
            if base_url.ends_with('/') { base_url.to_owned() } else { format!("{base_url}/") };
        Ok(Self { client, base_url, fallback })
    }
}

#[async_trait]
impl PropertySearch for AddressApiClient {
    async fn search_by_postcode(
        &self,
        postcode: &str,
        page: PageRequest,
    ) -> Result<SearchPage, SearchError> {
        let response = self
            .client
            .get(format!("{}search", self.base_url))
            .query(&[
                ("page_number", page.page_number.to_string()),
                ("postcode", postcode.to_owned()),
                ("page_size", page.page_size.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SearchError::Status { code: status.as_u16(), body });
        }
        let value: Value = serde_json::from_str(&body)
            .map_err(|_| SearchError::InvalidResponse("API response body is not JSON".into()))?;
        let parsed: ApiResponse = serde_json::from_value(value)
            .map_err(|e| SearchError::InvalidResponse(format!("unexpected API response: {e}")))?;
        tracing::debug!(postcode, total = parsed.total, returned = parsed.data.len(), "address API search");
        Ok(SearchPage { hits: parsed.data, total: parsed.total })
    }

    async fn search_by_address(
        &self,
        address: &str,
        page: PageRequest,
    ) -> Result<SearchPage, SearchError> {
        self.fallback.search_by_address(address, page).await
    }

    async fn info(&self) -> Result<Value, SearchError> {
        self.fallback.info().await
    }
}
