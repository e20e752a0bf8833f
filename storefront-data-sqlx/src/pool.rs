use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use storefront_core::health::{HealthIndicator, HealthStatus};
use storefront_data::DataError;

use crate::error::SqlxErrorExt;

/// Open a SQLite pool for `url`, creating the database file if needed.
///
/// An in-memory database lives only as long as its connection, so it gets a
/// single connection that never idles out.
pub async fn connect_sqlite(url: &str, max_connections: u32) -> Result<SqlitePool, DataError> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(SqlxErrorExt::into_data_error)?
        .create_if_missing(true)
        .foreign_keys(true);
    let in_memory = url.contains(":memory:") || url.contains("mode=memory");
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections)
    };
    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(SqlxErrorExt::into_data_error)?;
    tracing::info!(url, in_memory, "database pool ready");
    Ok(pool)
}

/// Readiness check that round-trips `SELECT 1` through the pool.
#[derive(Clone)]
pub struct PoolHealth {
    pool: SqlitePool,
}

impl PoolHealth {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl HealthIndicator for PoolHealth {
    fn name(&self) -> &str {
        "db"
    }

    async fn check(&self) -> HealthStatus {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => HealthStatus::Up,
            Err(e) => HealthStatus::Down(e.to_string()),
        }
    }
}
