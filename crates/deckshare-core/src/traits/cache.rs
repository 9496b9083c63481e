//! Cache provider trait for pluggable caching backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for key/value cache backends.
///
/// The cache provider is responsible for key prefixing and TTL enforcement.
/// Every method fails with a cache error on transport problems; callers on
/// the verification path must treat that as a failure, never as a miss.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with a TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Delete one or more keys. Returns the number of keys removed.
    async fn delete(&self, keys: &[String]) -> AppResult<u64>;

    /// Check whether a key exists in the cache.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Remaining TTL of a key, or `None` if the key is absent or has no TTL.
    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>>;

    /// Set a value only if the key does not already exist (NX).
    /// Returns `true` if the value was set, `false` if the key already existed.
    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool>;

    /// Increment a counter, creating it at 1 with a `window` TTL when absent.
    /// Returns the new value.
    async fn incr(&self, key: &str, window: Duration) -> AppResult<u64>;

    /// Delete a key only if it currently holds `expected`.
    /// Returns `true` if the key was deleted.
    async fn delete_if_equals(&self, key: &str, expected: &str) -> AppResult<bool>;

    /// Check that the cache backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
