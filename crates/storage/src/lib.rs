//! Storage layer for the digital register API
//!
//! PostgreSQL access through sqlx, with an in-memory backend behind the same
//! traits for tests and local runs.

mod backend;
mod error;
mod memory;
mod pg_migrations;
mod pg_storage;
#[cfg(test)]
mod tests;
pub mod traits;

pub use backend::StorageBackend;
pub use error::StorageError;
pub use memory::MemoryStorage;
pub use pg_storage::PgStorage;
