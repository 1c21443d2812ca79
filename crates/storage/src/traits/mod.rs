//! Storage backend trait abstraction
//!
//! Async domain traits for storage operations, implemented by the PostgreSQL
//! and in-memory backends and dispatched through `StorageBackend`.

pub mod misc;
pub mod title;
pub mod uprn;
pub mod user_search;

pub use misc::PriceStore;
pub use title::TitleStore;
pub use uprn::UprnStore;
pub use user_search::UserSearchStore;
