use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use tracing::info;

use crate::config::DbConfig;

pub type DbPool = Pool<Postgres>;

/// Establish a Postgres connection pool using sensible defaults for one
/// sequential pipeline run, then verify connectivity with a round-trip.
pub async fn connect(config: &DbConfig) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&config.connection_url())
        .await
        .with_context(|| format!("failed to connect to Postgres at {}", config.host))?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("database connectivity check failed")?;

    info!(host = %config.host, database = %config.database, "database connection established");
    Ok(pool)
}
