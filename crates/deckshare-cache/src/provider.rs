//! Cache manager that dispatches to the configured provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use deckshare_core::config::CacheConfig;
use deckshare_core::error::AppError;
use deckshare_core::result::AppResult;
use deckshare_core::traits::otp::{
    GenerateParams, GenerateScriptOutcome, OtpKeys, OtpScripts, VerifyParams, VerifyScriptOutcome,
};
use deckshare_core::traits::CacheProvider;

/// A backend offering both plain key/value operations and the atomic OTP
/// transactions.
pub trait CacheBackend: CacheProvider + OtpScripts {}

impl<T: CacheProvider + OtpScripts> CacheBackend for T {}

/// Cache manager that wraps the configured cache backend.
///
/// The backend is selected at construction time based on configuration.
/// Construction fails if the provider name is unknown or its backend was
/// not compiled into this binary.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// The inner backend.
    inner: Arc<dyn CacheBackend>,
    /// Provider name, for logs and health output.
    provider: &'static str,
}

impl CacheManager {
    /// Create a new cache manager from configuration and verify it is reachable.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let manager = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis cache provider");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                let provider = crate::redis::RedisCacheProvider::new(client);
                Self {
                    inner: Arc::new(provider),
                    provider: "redis",
                }
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory cache provider");
                Self {
                    inner: Arc::new(crate::memory::MemoryCacheProvider::new()),
                    provider: "memory",
                }
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown or unavailable cache provider: '{other}'"
                )));
            }
        };

        if !manager.inner.health_check().await? {
            return Err(AppError::service_unavailable(format!(
                "Cache provider '{}' failed its health check",
                manager.provider
            )));
        }

        Ok(manager)
    }

    /// Create a cache manager from an existing backend (for testing).
    pub fn from_backend(backend: Arc<dyn CacheBackend>, provider: &'static str) -> Self {
        Self {
            inner: backend,
            provider,
        }
    }

    /// Name of the active provider.
    pub fn provider_name(&self) -> &'static str {
        self.provider
    }

    /// Release the backend. Connections close once the last clone drops.
    pub async fn close(self) {
        drop(self.inner);
        info!(provider = self.provider, "Cache provider closed");
    }
}

#[async_trait]
impl CacheProvider for CacheManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, keys: &[String]) -> AppResult<u64> {
        self.inner.delete(keys).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        self.inner.ttl(key).await
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        self.inner.set_nx(key, value, ttl).await
    }

    async fn incr(&self, key: &str, window: Duration) -> AppResult<u64> {
        self.inner.incr(key, window).await
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> AppResult<bool> {
        self.inner.delete_if_equals(key, expected).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}

#[async_trait]
impl OtpScripts for CacheManager {
    async fn generate_code(
        &self,
        keys: &OtpKeys,
        params: &GenerateParams,
    ) -> AppResult<GenerateScriptOutcome> {
        self.inner.generate_code(keys, params).await
    }

    async fn verify_code(
        &self,
        keys: &OtpKeys,
        params: &VerifyParams,
    ) -> AppResult<VerifyScriptOutcome> {
        self.inner.verify_code(keys, params).await
    }
}
