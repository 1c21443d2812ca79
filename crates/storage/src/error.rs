//! Error type shared by every storage backend.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// A user search with the same (`search_datetime`, `user_id`) already exists.
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// Input the store refuses before touching the database.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(String),

    /// Set on the in-memory backend to simulate an outage.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }
}

/// SQLSTATE 23505 (`unique_violation`) becomes `Duplicate`, the rest `Database`.
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.code().is_some_and(|code| code == "23505")
        {
            return Self::Duplicate(db_err.message().to_owned());
        }
        Self::Database(err)
    }
}
