use async_trait::async_trait;
use digital_register_core::UprnMapping;

use crate::error::StorageError;

/// UPRN -> LR UPRN mapping table.
#[async_trait]
pub trait UprnStore: Send + Sync {
    /// LR UPRN mapped to an external UPRN.
    async fn get_mapped_lr_uprn(&self, uprn: &str) -> Result<Option<String>, StorageError>;

    /// Write a batch of mappings in one transaction.
    ///
    /// With `overwrite`, an existing mapping for a UPRN is replaced; without it
    /// the existing mapping is kept. Within a batch the last row for a UPRN wins.
    /// Returns the number of rows written.
    async fn insert_uprn_mappings(
        &self,
        rows: &[UprnMapping],
        overwrite: bool,
    ) -> Result<usize, StorageError>;

    /// Delete every mapping. Returns the number of rows removed.
    async fn clear_uprn_mappings(&self) -> Result<usize, StorageError>;
}
