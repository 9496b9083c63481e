//! Share-link lifecycle service.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

use deckshare_auth::otp::generate_code;
use deckshare_auth::policy::AccessPolicyEvaluator;
use deckshare_core::config::AccessConfig;
use deckshare_core::error::AppError;
use deckshare_database::repositories::{DeckStore, ShareLinkStore};
use deckshare_entity::share::{
    AccessLevel, CreateLimits, CreateShareLink, Liveness, ShareLink, ShareLinkOptions,
    sanitize_identifier,
};

use super::link::generate_link_token;
use crate::context::OwnerContext;

/// Manages share-link creation, naming, listing, and revocation.
///
/// Every mutation is scoped to the owner in the [`OwnerContext`]; a link
/// belonging to someone else is reported as not found.
#[derive(Debug, Clone)]
pub struct ShareLinkService {
    /// Share link repository.
    links: Arc<dyn ShareLinkStore>,
    /// Deck repository.
    decks: Arc<dyn DeckStore>,
    /// Liveness rules.
    evaluator: AccessPolicyEvaluator,
    /// Expiry and legacy code settings.
    config: AccessConfig,
}

/// A legacy single-shot code handed to the owner for out-of-band delivery.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LegacyLinkCode {
    /// The code.
    pub code: String,
    /// When it stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl ShareLinkService {
    /// Creates a new share link service.
    pub fn new(
        links: Arc<dyn ShareLinkStore>,
        decks: Arc<dyn DeckStore>,
        config: AccessConfig,
    ) -> Self {
        Self {
            links,
            decks,
            evaluator: AccessPolicyEvaluator::new(config.max_link_age_days),
            config,
        }
    }

    /// Creates a share link for one of the owner's decks.
    pub async fn create(
        &self,
        ctx: &OwnerContext,
        deck_id: Uuid,
        access_level: AccessLevel,
        options: ShareLinkOptions,
    ) -> Result<ShareLink, AppError> {
        let deck = self
            .decks
            .find_by_id(deck_id)
            .await?
            .filter(|deck| deck.is_owned_by(ctx.user_id))
            .ok_or_else(|| AppError::not_found("Deck not found"))?;

        let limits = CreateLimits {
            allowed_expiry_days: &self.config.allowed_expiry_days,
            default_expiry_days: self.config.default_expiry_days,
        };
        let data = CreateShareLink::new(
            ctx.user_id,
            deck.id,
            access_level,
            generate_link_token()?,
            options,
            &limits,
            ctx.request_time,
        )?;

        let link = self.links.insert(&data).await?;
        info!(
            user_id = %ctx.user_id,
            deck_id = %deck.id,
            access_level = %link.access_level,
            "Share link created"
        );
        Ok(link)
    }

    /// Assigns a human-readable identifier to an owned link.
    pub async fn set_identifier(
        &self,
        ctx: &OwnerContext,
        token: &str,
        raw: &str,
    ) -> Result<ShareLink, AppError> {
        let link_id = sanitize_identifier(raw)?;
        let link = self
            .links
            .set_identifier(ctx.user_id, token, &link_id)
            .await?
            .ok_or_else(|| AppError::not_found("Share link not found"))?;
        info!(user_id = %ctx.user_id, link_id = %link_id, "Share link identifier set");
        Ok(link)
    }

    /// Deletes an owned link. Revoking an unknown link is not an error.
    pub async fn revoke(&self, ctx: &OwnerContext, token: &str) -> Result<(), AppError> {
        let removed = self.links.delete_owned(ctx.user_id, token).await?;
        info!(user_id = %ctx.user_id, removed, "Share link revoked");
        Ok(())
    }

    /// Lists the owner's links for one deck.
    pub async fn list(&self, ctx: &OwnerContext, deck_id: Uuid) -> Result<Vec<ShareLink>, AppError> {
        self.links.list_for_deck(ctx.user_id, deck_id).await
    }

    /// Resolves an owner's identifier to the link token.
    pub async fn resolve_identifier(&self, owner_id: Uuid, raw: &str) -> Result<String, AppError> {
        let link_id = sanitize_identifier(raw)?;
        self.links
            .find_by_identifier(owner_id, &link_id)
            .await?
            .map(|link| link.token)
            .ok_or_else(|| AppError::not_found("Share link not found"))
    }

    /// Liveness of a link right now.
    pub fn check_liveness(&self, link: &ShareLink) -> Liveness {
        self.evaluator.liveness_at(link, Utc::now())
    }

    /// Stores a fresh legacy single-shot code on an owned link.
    pub async fn issue_link_code(
        &self,
        ctx: &OwnerContext,
        token: &str,
    ) -> Result<LegacyLinkCode, AppError> {
        let code = generate_code();
        let expires_at = ctx.request_time + Duration::seconds(self.config.legacy_code_ttl_seconds);
        if !self
            .links
            .set_legacy_code(ctx.user_id, token, &code, expires_at)
            .await?
        {
            return Err(AppError::not_found("Share link not found"));
        }
        info!(user_id = %ctx.user_id, "Legacy link code issued");
        Ok(LegacyLinkCode { code, expires_at })
    }
}
