use async_trait::async_trait;
use digital_register_core::TitleRegisterData;

use crate::error::StorageError;

/// Read access to title registers. Soft-deleted rows are never returned.
#[async_trait]
pub trait TitleStore: Send + Sync {
    /// First live title with this number.
    ///
    /// An empty title number is rejected with `InvalidArgument`.
    async fn get_title_register(
        &self,
        title_number: &str,
    ) -> Result<Option<TitleRegisterData>, StorageError>;

    /// All live titles among `title_numbers`, in no particular order.
    async fn get_title_registers(
        &self,
        title_numbers: &[String],
    ) -> Result<Vec<TitleRegisterData>, StorageError>;

    /// Live title that has official copy data.
    async fn get_official_copy_data(
        &self,
        title_number: &str,
    ) -> Result<Option<TitleRegisterData>, StorageError>;

    /// `(uprn, title_number)` pairs for live titles reachable through the UPRN mapping.
    async fn get_title_numbers_for_uprns(
        &self,
        uprns: &[String],
    ) -> Result<Vec<(String, String)>, StorageError>;
}
