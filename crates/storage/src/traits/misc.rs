use async_trait::async_trait;

use crate::error::StorageError;

/// Static product price table.
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Price of `product`, if it is on sale.
    async fn get_price(&self, product: &str) -> Result<Option<i32>, StorageError>;
}
