//! Service layer for the digital register API
//!
//! Centralizes business logic between the HTTP handlers and the storage,
//! search and queue crates.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]

mod error;
mod health_service;
mod search_service;
mod title_service;
mod uprn_importer;
mod user_search_service;

pub use error::ServiceError;
pub use health_service::{HealthReport, HealthService};
pub use search_service::SearchService;
pub use title_service::TitleService;
pub use uprn_importer::{ImportOptions, ImportSummary, UprnImporter};
pub use user_search_service::{SavedSearch, SearchRequestForm, UserSearchService};

#[cfg(test)]
mod test_support;
