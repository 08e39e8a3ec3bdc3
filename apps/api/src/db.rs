use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::models::user::{BOARD_GROUP, MEMBER_GROUP};

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .context("could not connect to PostgreSQL")?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Makes sure both authorization groups exist. The schema itself is applied
/// out of band from `schema.sql`.
pub async fn ensure_groups(pool: &PgPool) -> Result<()> {
    for group in [MEMBER_GROUP, BOARD_GROUP] {
        sqlx::query("INSERT INTO groups (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(group)
            .execute(pool)
            .await
            .with_context(|| {
                format!("could not ensure group '{group}'; was schema.sql applied?")
            })?;
    }
    info!("Groups '{MEMBER_GROUP}' and '{BOARD_GROUP}' present");
    Ok(())
}
