use async_trait::async_trait;
use digital_register_core::PageRequest;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::SearchError;

/// One address document returned by a search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressHit {
    #[serde(default)]
    pub title_number: Option<String>,
    #[serde(default)]
    pub address_string: String,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub house_number_or_first_number: Option<Value>,
    #[serde(default)]
    pub entry_datetime: Option<String>,
    #[serde(default, alias = "uprn", deserialize_with = "string_or_list")]
    pub uprns: Vec<String>,
}

impl AddressHit {
    #[must_use]
    pub fn for_title(title_number: impl Into<String>) -> Self {
        Self { title_number: Some(title_number.into()), ..Self::default() }
    }
}

/// Indexes store UPRNs as a number, a string, or a list of either.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    fn scalar(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.trim().to_owned()).filter(|s| !s.is_empty()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.iter().filter_map(scalar).collect(),
        other => scalar(&other).into_iter().collect(),
    })
}

/// Hits for one page plus the total number of matches in the index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub hits: Vec<AddressHit>,
    pub total: u64,
}

impl SearchPage {
    #[must_use]
    pub const fn empty() -> Self {
        Self { hits: Vec::new(), total: 0 }
    }
}

#[async_trait]
pub trait PropertySearch: Send + Sync {
    /// Exact postcode match, ordered by house number then address.
    async fn search_by_postcode(
        &self,
        postcode: &str,
        page: PageRequest,
    ) -> Result<SearchPage, SearchError>;

    /// Free-text address match in relevance order.
    async fn search_by_address(
        &self,
        address: &str,
        page: PageRequest,
    ) -> Result<SearchPage, SearchError>;

    /// Cluster information document.
    async fn info(&self) -> Result<Value, SearchError>;
}
