//! Redis connection management.

use std::future::Future;
use std::time::Duration;

use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use deckshare_core::config::RedisCacheConfig;
use deckshare_core::error::{AppError, ErrorKind};
use deckshare_core::result::AppResult;

/// Redis client wrapper with connection management.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis connection manager (multiplexed, reconnecting).
    conn: ConnectionManager,
    /// Key prefix for all keys.
    key_prefix: String,
    /// Upper bound for a single round trip.
    operation_timeout: Duration,
}

impl std::fmt::Debug for RedisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisClient")
            .field("key_prefix", &self.key_prefix)
            .field("operation_timeout", &self.operation_timeout)
            .finish()
    }
}

impl RedisClient {
    /// Create a new Redis client from configuration.
    pub async fn connect(config: &RedisCacheConfig) -> AppResult<Self> {
        info!(url = %mask_redis_url(&config.url), "Connecting to Redis");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            AppError::with_source(ErrorKind::Cache, "Failed to create Redis client", e)
        })?;

        let operation_timeout = Duration::from_millis(config.operation_timeout_ms);
        let conn = tokio::time::timeout(operation_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| AppError::cache("Timed out connecting to Redis"))?
            .map_err(|e| {
                AppError::with_source(ErrorKind::Cache, "Failed to connect to Redis", e)
            })?;

        info!("Successfully connected to Redis");
        Ok(Self {
            conn,
            key_prefix: config.key_prefix.clone(),
            operation_timeout,
        })
    }

    /// Get a mutable clone of the connection manager.
    pub fn conn_mut(&self) -> ConnectionManager {
        self.conn.clone()
    }

    /// Build a full key with the configured prefix.
    pub fn prefixed_key(&self, key: &str) -> String {
        format!("{}{key}", self.key_prefix)
    }

    /// Await a Redis round trip, failing with a cache error on timeout.
    pub async fn bounded<T, F>(&self, op: &'static str, fut: F) -> AppResult<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(result) => result.map_err(|e| {
                AppError::with_source(ErrorKind::Cache, format!("Redis {op} failed: {e}"), e)
            }),
            Err(_) => Err(AppError::cache(format!(
                "Redis {op} timed out after {} ms",
                self.operation_timeout.as_millis()
            ))),
        }
    }
}

/// Mask password in Redis URL for safe logging.
fn mask_redis_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
            if colon_pos > scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}
