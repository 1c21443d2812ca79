//! PriceStore implementation for PgStorage.

use super::*;

use crate::traits::PriceStore;
use async_trait::async_trait;

#[async_trait]
impl PriceStore for PgStorage {
    async fn get_price(&self, product: &str) -> Result<Option<i32>, StorageError> {
        let row = sqlx::query("SELECT price FROM validation WHERE product = $1")
            .bind(product)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.try_get("price")).transpose()?)
    }
}
