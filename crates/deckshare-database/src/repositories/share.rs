//! Share link repository implementation.
//!
//! Every mutating query is scoped by `user_id` so an owner can only touch
//! their own links.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use deckshare_core::error::{AppError, ErrorKind};
use deckshare_core::result::AppResult;
use deckshare_entity::share::{CreateShareLink, ShareLink};

/// Name of the per-owner identifier uniqueness constraint.
const OWNER_LINK_ID_CONSTRAINT: &str = "share_links_user_id_link_id_key";

/// Persistence operations for share links.
#[async_trait]
pub trait ShareLinkStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a link by its token.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareLink>>;

    /// Find a link by owner and identifier.
    async fn find_by_identifier(
        &self,
        user_id: Uuid,
        link_id: &str,
    ) -> AppResult<Option<ShareLink>>;

    /// List an owner's links for one deck, newest first.
    async fn list_for_deck(&self, user_id: Uuid, deck_id: Uuid) -> AppResult<Vec<ShareLink>>;

    /// Insert a new link. A duplicate identifier for the owner is a `Conflict`.
    async fn insert(&self, data: &CreateShareLink) -> AppResult<ShareLink>;

    /// Set the identifier of an owned link. Returns `None` when no owned
    /// link has that token; a duplicate identifier is a `Conflict`.
    async fn set_identifier(
        &self,
        user_id: Uuid,
        token: &str,
        link_id: &str,
    ) -> AppResult<Option<ShareLink>>;

    /// Delete an owned link. Returns whether a row was removed.
    async fn delete_owned(&self, user_id: Uuid, token: &str) -> AppResult<bool>;

    /// Set the audit flag recording that some viewer verified.
    async fn mark_verified(&self, token: &str) -> AppResult<()>;

    /// Store a legacy single-shot code on an owned link.
    async fn set_legacy_code(
        &self,
        user_id: Uuid,
        token: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Remove the legacy code after a successful check.
    async fn clear_legacy_code(&self, token: &str) -> AppResult<()>;
}

/// PostgreSQL implementation of [`ShareLinkStore`].
#[derive(Debug, Clone)]
pub struct ShareLinkRepository {
    pool: PgPool,
}

impl ShareLinkRepository {
    /// Create a new share link repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map an insert/update failure, turning the per-owner identifier
/// constraint into a `Conflict`.
fn map_write_error(e: sqlx::Error, context: &str) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() && db.constraint() == Some(OWNER_LINK_ID_CONSTRAINT) {
            return AppError::conflict("Link identifier is already in use");
        }
    }
    AppError::with_source(ErrorKind::Database, context.to_string(), e)
}

#[async_trait]
impl ShareLinkStore for ShareLinkRepository {
    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareLink>> {
        sqlx::query_as::<_, ShareLink>("SELECT * FROM share_links WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find share link by token", e)
            })
    }

    async fn find_by_identifier(
        &self,
        user_id: Uuid,
        link_id: &str,
    ) -> AppResult<Option<ShareLink>> {
        sqlx::query_as::<_, ShareLink>(
            "SELECT * FROM share_links WHERE user_id = $1 AND link_id = $2",
        )
        .bind(user_id)
        .bind(link_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to find share link by identifier",
                e,
            )
        })
    }

    async fn list_for_deck(&self, user_id: Uuid, deck_id: Uuid) -> AppResult<Vec<ShareLink>> {
        sqlx::query_as::<_, ShareLink>(
            "SELECT * FROM share_links WHERE user_id = $1 AND deck_id = $2 \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .bind(deck_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list share links", e))
    }

    async fn insert(&self, data: &CreateShareLink) -> AppResult<ShareLink> {
        sqlx::query_as::<_, ShareLink>(
            "INSERT INTO share_links (id, token, link_id, user_id, deck_id, access_level, \
             recipient_email, allowed_emails, allowed_domains, is_downloadable, created_at, \
             expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&data.token)
        .bind(&data.link_id)
        .bind(data.user_id)
        .bind(data.deck_id)
        .bind(data.access_level)
        .bind(&data.recipient_email)
        .bind(&data.allowed_emails)
        .bind(&data.allowed_domains)
        .bind(data.is_downloadable)
        .bind(data.created_at)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create share link"))
    }

    async fn set_identifier(
        &self,
        user_id: Uuid,
        token: &str,
        link_id: &str,
    ) -> AppResult<Option<ShareLink>> {
        sqlx::query_as::<_, ShareLink>(
            "UPDATE share_links SET link_id = $3 WHERE user_id = $1 AND token = $2 RETURNING *",
        )
        .bind(user_id)
        .bind(token)
        .bind(link_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to set link identifier"))
    }

    async fn delete_owned(&self, user_id: Uuid, token: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM share_links WHERE user_id = $1 AND token = $2")
            .bind(user_id)
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete share link", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_verified(&self, token: &str) -> AppResult<()> {
        sqlx::query("UPDATE share_links SET is_verified = TRUE WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to mark link verified", e)
            })?;
        Ok(())
    }

    async fn set_legacy_code(
        &self,
        user_id: Uuid,
        token: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE share_links SET verification_code = $3, verification_code_expires_at = $4 \
             WHERE user_id = $1 AND token = $2",
        )
        .bind(user_id)
        .bind(token)
        .bind(code)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to store link code", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear_legacy_code(&self, token: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE share_links SET verification_code = NULL, \
             verification_code_expires_at = NULL WHERE token = $1",
        )
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to clear link code", e))?;
        Ok(())
    }
}
