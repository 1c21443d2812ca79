use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use digital_register_core::UserSearchAndResults;

use crate::error::StorageError;

/// Paid search audit records.
#[async_trait]
pub trait UserSearchStore: Send + Sync {
    /// Insert a new record. Same (`search_datetime`, `user_id`) twice is `Duplicate`.
    async fn save_user_search(&self, record: &UserSearchAndResults) -> Result<(), StorageError>;

    /// Record by primary key.
    async fn get_user_search(
        &self,
        search_datetime: DateTime<Utc>,
        user_id: &str,
    ) -> Result<Option<UserSearchAndResults>, StorageError>;

    /// Claim a view of `title_number` for `user_id` at `now`.
    ///
    /// Picks a record still inside its viewing window, preferring one whose
    /// window is already open over an unviewed one, newest first. An unviewed
    /// record gets `viewed_datetime = now`. Returns the claimed record, or
    /// `None` when the user has nothing left to view.
    async fn claim_view(
        &self,
        user_id: &str,
        title_number: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<Option<UserSearchAndResults>, StorageError>;
}
