//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by domain concern.

#![allow(clippy::absolute_paths, reason = "std paths in error handling are clear")]

mod prices;
mod titles;
mod uprn;
mod user_searches;

use chrono::{DateTime, Utc};
use digital_register_core::{
    TitleRegisterData, UserSearchAndResults, PG_POOL_ACQUIRE_TIMEOUT_SECS,
    PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::error::StorageError;

use super::pg_migrations::run_pg_migrations;

pub(crate) const TITLE_COLUMNS: &str =
    "title_number, register_data, geometry_data, official_copy_data, lr_uprns, is_deleted, last_modified";

pub(crate) const USER_SEARCH_COLUMNS: &str = "search_datetime, user_id, title_number, search_type, \
     purchase_type, amount, cart_id, lro_trans_ref, viewed_datetime";

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(std::time::Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(std::time::Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        run_pg_migrations(&pool).await.map_err(|e| StorageError::Migration(e.to_string()))?;
        tracing::info!("PgStorage initialized");
        Ok(Self { pool })
    }

    /// Wrap an existing pool without running migrations.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

pub(crate) fn row_to_title(row: &sqlx::postgres::PgRow) -> Result<TitleRegisterData, StorageError> {
    let register_data: Option<serde_json::Value> = row.try_get("register_data")?;
    let geometry_data: Option<serde_json::Value> = row.try_get("geometry_data")?;
    let lr_uprns: Option<Vec<String>> = row.try_get("lr_uprns")?;
    let last_modified: DateTime<Utc> = row.try_get("last_modified")?;
    Ok(TitleRegisterData {
        title_number: row.try_get("title_number")?,
        register_data: register_data.unwrap_or_default(),
        geometry_data: geometry_data.unwrap_or_default(),
        official_copy_data: row.try_get("official_copy_data")?,
        lr_uprns: lr_uprns.unwrap_or_default(),
        is_deleted: row.try_get("is_deleted")?,
        last_modified,
    })
}

pub(crate) fn row_to_user_search(
    row: &sqlx::postgres::PgRow,
) -> Result<UserSearchAndResults, StorageError> {
    Ok(UserSearchAndResults {
        search_datetime: row.try_get("search_datetime")?,
        user_id: row.try_get("user_id")?,
        title_number: row.try_get("title_number")?,
        search_type: row.try_get("search_type")?,
        purchase_type: row.try_get("purchase_type")?,
        amount: row.try_get("amount")?,
        cart_id: row.try_get("cart_id")?,
        lro_trans_ref: row.try_get("lro_trans_ref")?,
        viewed_datetime: row.try_get("viewed_datetime")?,
    })
}
