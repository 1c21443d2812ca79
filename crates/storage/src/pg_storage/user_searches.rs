//! UserSearchStore implementation for PgStorage.

use super::*;

use crate::traits::UserSearchStore;
use async_trait::async_trait;
use chrono::Duration;

#[async_trait]
impl UserSearchStore for PgStorage {
    async fn save_user_search(&self, record: &UserSearchAndResults) -> Result<(), StorageError> {
        sqlx::query(&format!(
            "INSERT INTO user_search_and_results ({USER_SEARCH_COLUMNS})
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)"
        ))
        .bind(record.search_datetime)
        .bind(&record.user_id)
        .bind(&record.title_number)
        .bind(&record.search_type)
        .bind(&record.purchase_type)
        .bind(&record.amount)
        .bind(&record.cart_id)
        .bind(&record.lro_trans_ref)
        .bind(record.viewed_datetime)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_user_search(
        &self,
        search_datetime: DateTime<Utc>,
        user_id: &str,
    ) -> Result<Option<UserSearchAndResults>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_SEARCH_COLUMNS} FROM user_search_and_results
             WHERE search_datetime = $1 AND user_id = $2"
        ))
        .bind(search_datetime)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_user_search(&r)).transpose()
    }

    async fn claim_view(
        &self,
        user_id: &str,
        title_number: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<Option<UserSearchAndResults>, StorageError> {
        let cutoff = now - window;
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            "SELECT {USER_SEARCH_COLUMNS} FROM user_search_and_results
             WHERE user_id = $1 AND title_number = $2
               AND (viewed_datetime IS NULL OR viewed_datetime > $3)
             ORDER BY viewed_datetime IS NULL ASC, search_datetime DESC
             LIMIT 1
             FOR UPDATE"
        ))
        .bind(user_id)
        .bind(title_number)
        .bind(cutoff)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.commit().await?;
            return Ok(None);
        };
        let mut record = row_to_user_search(&row)?;

        if record.viewed_datetime.is_none() {
            sqlx::query(
                "UPDATE user_search_and_results SET viewed_datetime = $1
                 WHERE search_datetime = $2 AND user_id = $3",
            )
            .bind(now)
            .bind(record.search_datetime)
            .bind(&record.user_id)
            .execute(&mut *tx)
            .await?;
            record.viewed_datetime = Some(now);
            tracing::debug!(user_id, title_number, "view window opened");
        }

        tx.commit().await?;
        Ok(Some(record))
    }
}
