//! UprnStore implementation for PgStorage.

use std::collections::HashMap;

use super::*;

use crate::traits::UprnStore;
use async_trait::async_trait;
use digital_register_core::UprnMapping;

/// Last row per UPRN wins; `ON CONFLICT` cannot touch the same row twice in one statement.
fn dedupe_last_wins(rows: &[UprnMapping]) -> (Vec<String>, Vec<String>) {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(rows.len());
    let mut uprns: Vec<String> = Vec::with_capacity(rows.len());
    let mut lr_uprns: Vec<String> = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(&i) = index.get(row.uprn.as_str()) {
            if let Some(slot) = lr_uprns.get_mut(i) {
                slot.clone_from(&row.lr_uprn);
            }
        } else {
            index.insert(&row.uprn, uprns.len());
            uprns.push(row.uprn.clone());
            lr_uprns.push(row.lr_uprn.clone());
        }
    }
    (uprns, lr_uprns)
}

#[async_trait]
impl UprnStore for PgStorage {
    async fn get_mapped_lr_uprn(&self, uprn: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT lr_uprn FROM uprn_mapping WHERE uprn = $1")
            .bind(uprn)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| r.try_get("lr_uprn")).transpose().map_err(StorageError::from)
    }

    async fn insert_uprn_mappings(
        &self,
        rows: &[UprnMapping],
        overwrite: bool,
    ) -> Result<usize, StorageError> {
        if rows.is_empty() {
            return Ok(0);
        }
        let (uprns, lr_uprns) = dedupe_last_wins(rows);
        let conflict = if overwrite {
            "ON CONFLICT (uprn) DO UPDATE SET lr_uprn = EXCLUDED.lr_uprn"
        } else {
            "ON CONFLICT (uprn) DO NOTHING"
        };

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(&format!(
            "INSERT INTO uprn_mapping (uprn, lr_uprn)
             SELECT * FROM UNNEST($1::text[], $2::text[])
             {conflict}"
        ))
        .bind(&uprns)
        .bind(&lr_uprns)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(usize::try_from(result.rows_affected()).unwrap_or(usize::MAX))
    }

    async fn clear_uprn_mappings(&self) -> Result<usize, StorageError> {
        let result = sqlx::query("DELETE FROM uprn_mapping").execute(&self.pool).await?;
        Ok(usize::try_from(result.rows_affected()).unwrap_or(usize::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_keeps_first_position_and_last_value() {
        let rows = vec![
            UprnMapping::new("1", "a"),
            UprnMapping::new("2", "b"),
            UprnMapping::new("1", "c"),
        ];
        let (uprns, lr_uprns) = dedupe_last_wins(&rows);
        assert_eq!(uprns, ["1", "2"]);
        assert_eq!(lr_uprns, ["c", "b"]);
    }
}
