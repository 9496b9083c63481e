//! PostgreSQL pool for the deck and share link tables.
//!
//! Every acquire is bounded by `connect_timeout_seconds`, so a saturated or
//! unreachable database surfaces as an error instead of a hung request.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::{info, warn};

use deckshare_core::config::DatabaseConfig;
use deckshare_core::error::{AppError, ErrorKind};

/// Connection pool shared by the repositories.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
    acquire_timeout: Duration,
}

impl DatabasePool {
    /// Open the pool described by `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let target: PgConnectOptions = config.url.parse().map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                "database.url is not a valid PostgreSQL URL",
                e,
            )
        })?;
        let acquire_timeout = Duration::from_secs(config.connect_timeout_seconds);

        info!(
            host = target.get_host(),
            port = target.get_port(),
            database = target.get_database().unwrap_or("<default>"),
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            acquire_timeout_secs = acquire_timeout.as_secs(),
            "Opening PostgreSQL pool"
        );

        let pool = pool_options(config)
            .connect_with(target)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Database unreachable within {}s: {e}", acquire_timeout.as_secs()),
                    e,
                )
            })?;

        info!(open = pool.size(), "PostgreSQL pool ready");
        Ok(Self {
            pool,
            acquire_timeout,
        })
    }

    /// The underlying sqlx pool, for repositories and migrations.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip a trivial query. A check that outlives the acquire
    /// timeout reports the database as unavailable.
    pub async fn health_check(&self) -> Result<bool, AppError> {
        let query = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&self.pool);
        match tokio::time::timeout(self.acquire_timeout, query).await {
            Ok(result) => result.map(|v| v == 1).map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Health check failed", e)
            }),
            Err(_) => {
                warn!(
                    timeout_secs = self.acquire_timeout.as_secs(),
                    "Database health check timed out"
                );
                Ok(false)
            }
        }
    }

    /// Drain and close every connection.
    pub async fn close(&self) {
        let (open, idle) = (self.pool.size(), self.pool.num_idle());
        self.pool.close().await;
        info!(open, idle, "PostgreSQL pool closed");
    }
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
}
