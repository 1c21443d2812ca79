//! Property search clients
//!
//! [`ElasticsearchClient`] answers postcode and address searches from the
//! `landregistry` index. [`AddressApiClient`] routes postcode searches to the
//! address search API instead, delegating everything else.

mod address_api;
mod elasticsearch;
mod error;
mod types;

pub use address_api::AddressApiClient;
pub use elasticsearch::ElasticsearchClient;
pub use error::SearchError;
pub use types::{AddressHit, PropertySearch, SearchPage};

#[cfg(test)]
mod tests;
