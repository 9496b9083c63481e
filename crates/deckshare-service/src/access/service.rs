//! Verification orchestrator.
//!
//! Every entry point loads the link by token, checks liveness, and runs the
//! access policy before touching the code store. Business outcomes from the
//! code store are mapped to [`AppError`] kinds here.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use deckshare_auth::jwt::{SessionTokenIssuer, SessionTokenVerifier};
use deckshare_auth::otp::{CodeGeneration, CodeVerification, LinkCodeCheck, RateLimitedCodeStore};
use deckshare_auth::policy::{AccessPolicyEvaluator, DenyReason, Verdict};
use deckshare_core::config::{AccessConfig, MailConfig};
use deckshare_core::error::AppError;
use deckshare_core::traits::{BlobStore, NotificationSink};
use deckshare_core::types::{mask_email, normalize_email};
use deckshare_database::repositories::{DeckStore, ShareLinkStore};
use deckshare_entity::share::{Liveness, ShareLink};

use super::types::{CodeRequestReceipt, LinkRequirements, VerifiedSession, ViewGrant};
use crate::notification::template::code_email;

/// Message for a wrong or missing code; the two cases are not distinguished.
const INVALID_CODE: &str = "Invalid or expired OTP";

/// Collaborators of the verification service.
#[derive(Debug, Clone)]
pub struct VerificationDeps {
    /// Share link repository.
    pub links: Arc<dyn ShareLinkStore>,
    /// Deck repository.
    pub decks: Arc<dyn DeckStore>,
    /// Object store for signed document URLs.
    pub blobs: Arc<dyn BlobStore>,
    /// Mail delivery.
    pub notifier: Arc<dyn NotificationSink>,
    /// Rate-limited code store.
    pub codes: RateLimitedCodeStore,
    /// Session token issuer.
    pub issuer: SessionTokenIssuer,
    /// Session token verifier.
    pub verifier: SessionTokenVerifier,
}

/// Orchestrates viewer verification and content access.
#[derive(Debug, Clone)]
pub struct VerificationService {
    deps: VerificationDeps,
    evaluator: AccessPolicyEvaluator,
    access: AccessConfig,
    product_name: String,
}

impl VerificationService {
    /// Creates a new verification service.
    pub fn new(deps: VerificationDeps, access: AccessConfig, mail: &MailConfig) -> Self {
        Self {
            deps,
            evaluator: AccessPolicyEvaluator::new(access.max_link_age_days),
            access,
            product_name: mail.product_name.clone(),
        }
    }

    /// Sends a fresh code to `email` for the link `token`.
    pub async fn request_code(
        &self,
        token: &str,
        email: &str,
    ) -> Result<CodeRequestReceipt, AppError> {
        let email = normalize_email(email);
        let link = self.load_live(token).await?;
        self.require_otp(&link, &email)?;

        let code = match self.deps.codes.generate(&email, token).await? {
            CodeGeneration::Issued { code } => code,
            CodeGeneration::RateLimited => {
                return Err(AppError::rate_limited(
                    "Too many failed attempts. Please try again later.",
                ));
            }
            CodeGeneration::Throttled { retry_after } => {
                return Err(AppError::rate_limited(
                    "A code was sent recently. Please wait before requesting another.",
                )
                .with_details(json!({ "retryAfterSeconds": retry_after.as_secs() })));
            }
            CodeGeneration::Busy => {
                return Err(AppError::rate_limited(
                    "A code request is already in progress. Please retry shortly.",
                ));
            }
        };

        let message = code_email(&self.product_name, &code, self.access.code_ttl());
        if let Err(e) = self
            .deps
            .notifier
            .send(&email, &message.subject, &message.body)
            .await
        {
            warn!(email = %mask_email(&email), error = %e, "Code delivery failed; clearing code");
            if let Err(clear_err) = self.deps.codes.clear(&email, token).await {
                warn!(error = %clear_err, "Failed to clear undelivered code");
            }
            return Err(AppError::external_service(
                "Could not deliver the verification email",
            ));
        }

        info!(email = %mask_email(&email), "Verification code sent");
        Ok(CodeRequestReceipt {
            message: "Verification code sent".to_string(),
            sent_to: mask_email(&email),
        })
    }

    /// Checks a code and, on success, mints a session token.
    pub async fn verify_code(
        &self,
        token: &str,
        email: &str,
        code: &str,
    ) -> Result<VerifiedSession, AppError> {
        let email = normalize_email(email);
        let link = self.load_live(token).await?;
        self.require_otp(&link, &email)?;

        match self.deps.codes.verify(&email, token, code).await? {
            CodeVerification::Verified => {}
            CodeVerification::Locked => {
                return Err(AppError::rate_limited(
                    "Too many failed attempts. Please try again later.",
                ));
            }
            CodeVerification::NoCode { remaining } | CodeVerification::Invalid { remaining } => {
                return Err(AppError::validation(INVALID_CODE)
                    .with_details(json!({ "remainingAttempts": remaining })));
            }
        }

        if let Err(e) = self.deps.links.mark_verified(token).await {
            warn!(error = %e, "Failed to record link verification");
        }

        let issued = self.deps.issuer.issue(token, &email, link.access_level)?;
        info!(email = %mask_email(&email), "Viewer verified");
        Ok(VerifiedSession {
            access_token: issued.access_token,
            expires_at: issued.expires_at,
        })
    }

    /// Describes what a viewer needs to open the link.
    pub async fn requirements(&self, token: &str) -> Result<LinkRequirements, AppError> {
        let link = self.load_live(token).await?;
        let needs_identity = link.access_level.requires_identity();
        Ok(LinkRequirements {
            access_level: link.access_level,
            require_verification: needs_identity,
            allow_anonymous: !needs_identity,
            is_downloadable: link.is_downloadable,
            expires_at: link.expires_at,
        })
    }

    /// Email-match check without a code. Never mints a session, so it
    /// cannot by itself unlock content.
    pub async fn evaluate_email(&self, token: &str, email: &str) -> Result<bool, AppError> {
        let link = self.load_live(token).await?;
        match self.evaluator.evaluate(&link, Some(email)) {
            Verdict::Granted | Verdict::RequiresOtp => Ok(true),
            Verdict::Denied(reason) => Err(deny_error(reason)),
        }
    }

    /// Checks the legacy single-shot code stored on the link row.
    ///
    /// Checks per token are bounded like the emailed codes; once the budget
    /// is spent the stored code is discarded.
    pub async fn verify_link_code(&self, token: &str, code: &str) -> Result<bool, AppError> {
        let link = self.load_live(token).await?;
        let now = Utc::now();

        let stored = match (&link.verification_code, link.verification_code_expires_at) {
            (Some(stored), Some(expires_at)) if expires_at > now => Some(stored.as_str()),
            _ => None,
        };

        match self.deps.codes.check_link_code(token, stored, code).await? {
            LinkCodeCheck::Verified => {}
            LinkCodeCheck::Locked => {
                self.discard_link_code(token, stored.is_some()).await?;
                return Err(AppError::rate_limited(
                    "Too many failed attempts. Please try again later.",
                ));
            }
            LinkCodeCheck::Invalid { remaining } => {
                if remaining == 0 {
                    self.discard_link_code(token, stored.is_some()).await?;
                }
                return Err(AppError::validation("Invalid or expired code")
                    .with_details(json!({ "remainingAttempts": remaining })));
            }
        }

        self.deps.links.clear_legacy_code(token).await?;
        if let Err(e) = self.deps.links.mark_verified(token).await {
            warn!(error = %e, "Failed to record link verification");
        }
        Ok(true)
    }

    async fn discard_link_code(&self, token: &str, present: bool) -> Result<(), AppError> {
        if present {
            warn!("Discarding link code after too many failed checks");
            self.deps.links.clear_legacy_code(token).await?;
        }
        Ok(())
    }

    /// Grants time-limited access to the deck document.
    ///
    /// Public links need no session; every other level needs a session
    /// token minted for this exact link whose email still passes the policy.
    pub async fn view(&self, token: &str, session: Option<&str>) -> Result<ViewGrant, AppError> {
        let link = self.load_live(token).await?;

        if link.access_level.requires_identity() {
            let claims = session
                .and_then(|s| self.deps.verifier.verify_for(s, token))
                .ok_or_else(|| AppError::authentication("A verified session is required"))?;
            if let Verdict::Denied(reason) = self.evaluator.evaluate(&link, Some(&claims.email)) {
                return Err(deny_error(reason));
            }
        }

        let deck = self
            .deps
            .decks
            .find_by_id(link.deck_id)
            .await?
            .ok_or_else(|| AppError::not_found("Deck not found"))?;

        let ttl = Duration::from_secs(self.access.signed_url_ttl_seconds);
        let url = self.deps.blobs.create_signed_url(&deck.file_path, ttl).await?;
        Ok(ViewGrant {
            url,
            expires_in: ttl.as_secs(),
            is_downloadable: link.is_downloadable,
        })
    }

    async fn load_live(&self, token: &str) -> Result<ShareLink, AppError> {
        if token.trim().is_empty() {
            return Err(AppError::validation("Token is required"));
        }
        let link = self
            .deps
            .links
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::not_found("Share link not found"))?;

        match self.evaluator.liveness_at(&link, Utc::now()) {
            Liveness::Alive => Ok(link),
            Liveness::Expired => Err(deny_error(DenyReason::Expired)),
            Liveness::TooOld => Err(deny_error(DenyReason::TooOld)),
        }
    }

    fn require_otp(&self, link: &ShareLink, email: &str) -> Result<(), AppError> {
        match self.evaluator.evaluate(link, Some(email)) {
            Verdict::RequiresOtp => Ok(()),
            Verdict::Granted => Err(AppError::validation(
                "This link does not require verification",
            )),
            Verdict::Denied(reason) => Err(deny_error(reason)),
        }
    }
}

fn deny_error(reason: DenyReason) -> AppError {
    match reason {
        DenyReason::Expired | DenyReason::TooOld => AppError::expired(reason.message()),
        DenyReason::InvalidEmail => AppError::validation(reason.message()),
        DenyReason::NotAuthorized => AppError::policy_denied(reason.message()),
    }
}
