//! Share link entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use deckshare_core::error::AppError;
use deckshare_core::types::{is_valid_email, normalize_email};

use super::access_level::AccessLevel;
use super::identifier::sanitize_identifier;
use super::liveness::Liveness;

/// A shareable, policy-guarded grant to view one deck.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareLink {
    /// Row identifier.
    pub id: Uuid,
    /// Opaque URL-safe token; primary lookup key, immutable.
    pub token: String,
    /// Owner-chosen identifier, unique per owner.
    pub link_id: Option<String>,
    /// Owner of the link and the deck.
    pub user_id: Uuid,
    /// Deck being shared.
    pub deck_id: Uuid,
    /// How viewers are checked.
    pub access_level: AccessLevel,
    /// Intended recipient.
    pub recipient_email: Option<String>,
    /// Exact addresses allowed to view (lowercase).
    pub allowed_emails: Vec<String>,
    /// Domains whose addresses (and subdomains) may view (lowercase).
    pub allowed_domains: Vec<String>,
    /// Whether viewers may download the document.
    pub is_downloadable: bool,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
    /// Absolute expiry, if any.
    pub expires_at: Option<DateTime<Utc>>,
    /// Legacy single-shot code.
    #[serde(skip_serializing)]
    pub verification_code: Option<String>,
    /// Expiry of the legacy code.
    #[serde(skip_serializing)]
    pub verification_code_expires_at: Option<DateTime<Utc>>,
    /// Audit flag: some viewer has verified at least once.
    pub is_verified: bool,
}

impl ShareLink {
    /// Liveness of the link at `now`.
    pub fn liveness_at(&self, now: DateTime<Utc>, max_age_days: i64) -> Liveness {
        Liveness::evaluate(
            self.created_at,
            self.expires_at,
            Duration::days(max_age_days),
            now,
        )
    }

    /// Whether the link belongs to `user_id`.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Whether any allow-list entry is configured.
    pub fn has_allow_list(&self) -> bool {
        !self.allowed_emails.is_empty() || !self.allowed_domains.is_empty()
    }
}

/// Owner-supplied options for a new share link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareLinkOptions {
    /// Intended recipient.
    pub recipient_email: Option<String>,
    /// Exact addresses allowed to view.
    #[serde(default)]
    pub allowed_emails: Vec<String>,
    /// Domains allowed to view.
    #[serde(default)]
    pub allowed_domains: Vec<String>,
    /// Whether viewers may download.
    #[serde(default)]
    pub is_downloadable: bool,
    /// Expiry in days; must be one of the configured durations.
    pub expires_in_days: Option<i64>,
    /// Raw identifier, sanitized before storage.
    pub link_id: Option<String>,
}

/// Validated data for inserting a share link.
#[derive(Debug, Clone)]
pub struct CreateShareLink {
    /// Generated token.
    pub token: String,
    /// Sanitized identifier.
    pub link_id: Option<String>,
    /// Owner.
    pub user_id: Uuid,
    /// Deck being shared.
    pub deck_id: Uuid,
    /// Access level.
    pub access_level: AccessLevel,
    /// Normalized recipient.
    pub recipient_email: Option<String>,
    /// Normalized allowed addresses.
    pub allowed_emails: Vec<String>,
    /// Normalized allowed domains.
    pub allowed_domains: Vec<String>,
    /// Download flag.
    pub is_downloadable: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

/// Limits applied when validating a new link.
#[derive(Debug, Clone)]
pub struct CreateLimits<'a> {
    /// Durations an owner may pick.
    pub allowed_expiry_days: &'a [i64],
    /// Duration used when none is given.
    pub default_expiry_days: i64,
}

impl CreateShareLink {
    /// Validate and normalize owner input into an insertable row.
    pub fn new(
        user_id: Uuid,
        deck_id: Uuid,
        access_level: AccessLevel,
        token: String,
        options: ShareLinkOptions,
        limits: &CreateLimits<'_>,
        now: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let recipient_email = match options.recipient_email.as_deref().map(normalize_email) {
            Some(email) if email.is_empty() => None,
            Some(email) if !is_valid_email(&email) => {
                return Err(AppError::validation("Recipient email is not a valid address"));
            }
            other => other,
        };

        let allowed_emails = normalize_list(&options.allowed_emails);
        let allowed_domains: Vec<String> = normalize_list(&options.allowed_domains)
            .into_iter()
            .map(|d| d.trim_start_matches('@').to_string())
            .filter(|d| !d.is_empty())
            .collect();

        if let Some(bad) = allowed_emails.iter().find(|e| !is_valid_email(e)) {
            return Err(AppError::validation(format!(
                "Allowed email '{bad}' is not a valid address"
            )));
        }

        if access_level == AccessLevel::Whitelisted
            && recipient_email.is_none()
            && allowed_emails.is_empty()
            && allowed_domains.is_empty()
        {
            return Err(AppError::validation(
                "Whitelisted links require a recipient email or an allow-list",
            ));
        }

        let days = options.expires_in_days.unwrap_or(limits.default_expiry_days);
        if !limits.allowed_expiry_days.contains(&days) {
            return Err(AppError::validation(format!(
                "Expiry of {days} days is not allowed; choose one of {:?}",
                limits.allowed_expiry_days
            )));
        }

        let link_id = match options.link_id.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(sanitize_identifier(raw)?),
            _ => None,
        };

        Ok(Self {
            token,
            link_id,
            user_id,
            deck_id,
            access_level,
            recipient_email,
            allowed_emails,
            allowed_domains,
            is_downloadable: options.is_downloadable,
            created_at: now,
            expires_at: now + Duration::days(days),
        })
    }
}

/// Trim, lowercase, drop empties and de-duplicate preserving first occurrence.
fn normalize_list(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for entry in raw {
        let entry = normalize_email(entry);
        if !entry.is_empty() && !out.contains(&entry) {
            out.push(entry);
        }
    }
    out
}
