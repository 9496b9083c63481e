//! Shared application state passed to all handlers via Axum's `State` extractor.

use std::sync::Arc;
use std::time::Instant;

use deckshare_auth::jwt::OwnerTokenDecoder;
use deckshare_cache::CacheManager;
use deckshare_core::traits::BlobStore;
use deckshare_database::DatabasePool;
use deckshare_service::{ShareLinkService, VerificationService};

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database pool, checked by the detailed health check. Absent when the
    /// router is built over in-memory stores.
    pub db: Option<DatabasePool>,
    /// Cache manager backing the code store.
    pub cache: CacheManager,
    /// Blob store for signed deck URLs.
    pub blobs: Arc<dyn BlobStore>,
    /// Share-link lifecycle service.
    pub share_links: Arc<ShareLinkService>,
    /// Viewer verification service.
    pub verification: Arc<VerificationService>,
    /// Owner token decoder.
    pub owner_decoder: Arc<OwnerTokenDecoder>,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}
