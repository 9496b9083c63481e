//! Blob store trait for time-limited document URLs.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Opaque object store holding deck files.
///
/// DeckShare never streams document bytes itself; viewers receive a
/// signed URL that stays valid for a bounded time.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Create a URL granting read access to `path` for `ttl`.
    async fn create_signed_url(&self, path: &str, ttl: Duration) -> AppResult<String>;

    /// Check whether the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
