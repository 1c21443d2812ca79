//! Elasticsearch client for the `landregistry` index.

use std::time::Duration;

use async_trait::async_trait;
use digital_register_core::{search_window, ElasticsearchSettings, PageRequest};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::SearchError;
use crate::types::{AddressHit, PropertySearch, SearchPage};

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    total: Option<Total>,
    #[serde(default)]
    hits: Vec<HitDocument>,
}

/// 1.x/2.x report a bare number, 7.x an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Total {
    Count(u64),
    Tracked { value: u64 },
}

impl Total {
    const fn value(&self) -> u64 {
        match self {
            Self::Count(n) | Self::Tracked { value: n } => *n,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HitDocument {
    #[serde(rename = "_source", default)]
    source: AddressHit,
}

#[derive(Debug, Clone)]
pub struct ElasticsearchClient {
    client: reqwest::Client,
    settings: ElasticsearchSettings,
    max_results: u64,
}

impl ElasticsearchClient {
    /// # Errors
    /// Returns `SearchError::ClientInit` if the HTTP client cannot be built.
    pub fn new(settings: ElasticsearchSettings, max_results: u64) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SearchError::ClientInit(e.to_string()))?;
        Ok(Self { client, settings, max_results })
    }

    fn search_url(&self, doc_type: &str) -> String {
        format!(
            "{}/{}/{}/_search",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.index,
            doc_type
        )
    }

    /// Run `query` for `page`, clipped to the configured result cap.
    async fn execute(
        &self,
        doc_type: &str,
        mut query: Value,
        page: PageRequest,
    ) -> Result<SearchPage, SearchError> {
        let (from, size) = search_window(page, self.max_results).map_or((0, 0), |w| (w.from, w.size));
        if let Some(body) = query.as_object_mut() {
            body.insert("from".into(), from.into());
            body.insert("size".into(), size.into());
        }

        let response = self.client.post(self.search_url(doc_type)).json(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status { code: status.as_u16(), body });
        }

        let parsed: SearchResponse = response.json().await?;
        let total = parsed.hits.total.as_ref().map_or(0, Total::value);
        let hits: Vec<AddressHit> = parsed.hits.hits.into_iter().map(|h| h.source).collect();
        tracing::debug!(doc_type, from, size, total, returned = hits.len(), "elasticsearch query");
        Ok(SearchPage { hits, total })
    }
}

#[async_trait]
impl PropertySearch for ElasticsearchClient {
    async fn search_by_postcode(
        &self,
        postcode: &str,
        page: PageRequest,
    ) -> Result<SearchPage, SearchError> {
        let query = json!({
            "query": {"bool": {"filter": [{"term": {"postcode": postcode}}]}},
            "sort": [
                {"house_number_or_first_number": {"missing": "_last"}},
                {"address_string": {"missing": "_last"}}
            ]
        });
        self.execute(&self.settings.postcode_doc_type, query, page).await
    }

    async fn search_by_address(
        &self,
        address: &str,
        page: PageRequest,
    ) -> Result<SearchPage, SearchError> {
        let query = json!({
            "query": {"match": {"address_string": address.to_lowercase()}}
        });
        self.execute(&self.settings.address_doc_type, query, page).await
    }

    async fn info(&self) -> Result<Value, SearchError> {
        let url = format!("{}/", self.settings.endpoint.trim_end_matches('/'));
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status { code: status.as_u16(), body });
        }
        Ok(response.json().await?)
    }
}
