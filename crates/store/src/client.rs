//! PostgreSQL client wrapper.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use mediarate_core::Result;

use crate::config::PgConfig;
use crate::db_err;

/// Connection pool wrapper shared by all store types.
#[derive(Clone)]
pub struct PgClient {
    pool: PgPool,
}

impl PgClient {
    /// Connects the pool and verifies the database is reachable.
    pub async fn connect(config: &PgConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| db_err("connect", e))?;

        info!(max_connections = config.max_connections, "connected to PostgreSQL");

        Ok(Self { pool })
    }

    /// Wrap an existing pool (tests hand in their own).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Cheap liveness probe for the health endpoint.
    pub async fn test_connection(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("ping", e))?;
        Ok(())
    }
}
