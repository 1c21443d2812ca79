//! PostgreSQL schema for the register database.

use anyhow::Result;
use sqlx::PgPool;

/// Run all PostgreSQL migrations.
pub async fn run_pg_migrations(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS title_register_data (
            title_number VARCHAR(10) PRIMARY KEY,
            register_data JSON,
            geometry_data JSON,
            official_copy_data JSON,
            lr_uprns TEXT[] NOT NULL DEFAULT '{}',
            is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
            last_modified TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_title_lr_uprns ON title_register_data USING GIN (lr_uprns)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS uprn_mapping (
            uprn VARCHAR(20) PRIMARY KEY,
            lr_uprn VARCHAR(20) NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_search_and_results (
            search_datetime TIMESTAMPTZ NOT NULL,
            user_id VARCHAR(20) NOT NULL,
            title_number VARCHAR(20) NOT NULL,
            search_type VARCHAR(20) NOT NULL,
            purchase_type VARCHAR(20) NOT NULL,
            amount VARCHAR(10) NOT NULL,
            cart_id VARCHAR(30),
            lro_trans_ref VARCHAR(30),
            viewed_datetime TIMESTAMPTZ,
            PRIMARY KEY (search_datetime, user_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_user_search_viewer
         ON user_search_and_results (user_id, title_number)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS validation (
            product VARCHAR(20) PRIMARY KEY,
            price INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("PostgreSQL migrations complete");
    Ok(())
}
