//! Deck repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use deckshare_core::error::{AppError, ErrorKind};
use deckshare_core::result::AppResult;
use deckshare_entity::deck::Deck;

/// Read access to decks.
#[async_trait]
pub trait DeckStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a deck by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Deck>>;
}

/// PostgreSQL implementation of [`DeckStore`].
#[derive(Debug, Clone)]
pub struct DeckRepository {
    pool: PgPool,
}

impl DeckRepository {
    /// Create a new deck repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeckStore for DeckRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Deck>> {
        sqlx::query_as::<_, Deck>("SELECT * FROM decks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find deck", e))
    }
}
