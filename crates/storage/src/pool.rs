//! PostgreSQL connection pool construction.

use discovery_tags_core::PoolConfig;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::error::StorageError;

pub async fn connect(database_url: &str, config: &PoolConfig) -> Result<PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .test_before_acquire(true)
        .connect(database_url)
        .await?;
    tracing::info!(max_connections = config.max_connections, "PostgreSQL pool ready");
    Ok(pool)
}
