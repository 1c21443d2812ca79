//! TitleStore implementation for PgStorage.

use super::*;

use crate::traits::TitleStore;
use async_trait::async_trait;

fn require_title_number(title_number: &str) -> Result<(), StorageError> {
    if title_number.trim().is_empty() {
        return Err(StorageError::InvalidArgument("title number must not be empty".into()));
    }
    Ok(())
}

#[async_trait]
impl TitleStore for PgStorage {
    async fn get_title_register(
        &self,
        title_number: &str,
    ) -> Result<Option<TitleRegisterData>, StorageError> {
        require_title_number(title_number)?;
        let row = sqlx::query(&format!(
            "SELECT {TITLE_COLUMNS} FROM title_register_data
             WHERE title_number = $1 AND NOT is_deleted
             LIMIT 1"
        ))
        .bind(title_number)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_title(&r)).transpose()
    }

    async fn get_title_registers(
        &self,
        title_numbers: &[String],
    ) -> Result<Vec<TitleRegisterData>, StorageError> {
        if title_numbers.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(&format!(
            "SELECT {TITLE_COLUMNS} FROM title_register_data
             WHERE title_number = ANY($1) AND NOT is_deleted"
        ))
        .bind(title_numbers)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_title).collect()
    }

    async fn get_official_copy_data(
        &self,
        title_number: &str,
    ) -> Result<Option<TitleRegisterData>, StorageError> {
        require_title_number(title_number)?;
        let row = sqlx::query(&format!(
            "SELECT {TITLE_COLUMNS} FROM title_register_data
             WHERE title_number = $1 AND NOT is_deleted AND official_copy_data IS NOT NULL
             LIMIT 1"
        ))
        .bind(title_number)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_title(&r)).transpose()
    }

    async fn get_title_numbers_for_uprns(
        &self,
        uprns: &[String],
    ) -> Result<Vec<(String, String)>, StorageError> {
        if uprns.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            "SELECT m.uprn, t.title_number
             FROM uprn_mapping m
             JOIN title_register_data t ON m.lr_uprn = ANY(t.lr_uprns)
             WHERE m.uprn = ANY($1) AND NOT t.is_deleted
             ORDER BY t.title_number",
        )
        .bind(uprns)
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|r| -> Result<(String, String), StorageError> {
                Ok((r.try_get("uprn")?, r.try_get("title_number")?))
            })
            .collect()
    }
}
