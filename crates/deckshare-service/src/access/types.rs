//! Results returned by the verification service.

use chrono::{DateTime, Utc};
use serde::Serialize;

use deckshare_entity::share::AccessLevel;

/// Acknowledgement of a delivered code. Never contains the code.
#[derive(Debug, Clone, Serialize)]
pub struct CodeRequestReceipt {
    /// Human-readable message.
    pub message: String,
    /// Masked delivery address.
    pub sent_to: String,
}

/// Session granted after a successful code check.
#[derive(Debug, Clone, Serialize)]
pub struct VerifiedSession {
    /// Signed session token.
    pub access_token: String,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}

/// What a viewer needs in order to open a link. Recipients and allow-lists
/// are never included.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRequirements {
    /// Link access level.
    pub access_level: AccessLevel,
    /// Whether an email code is required.
    pub require_verification: bool,
    /// Whether the deck opens without any identity.
    pub allow_anonymous: bool,
    /// Whether downloading is permitted.
    pub is_downloadable: bool,
    /// Absolute expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Time-limited access to the deck document.
#[derive(Debug, Clone, Serialize)]
pub struct ViewGrant {
    /// Signed document URL.
    pub url: String,
    /// Seconds until the URL stops working.
    pub expires_in: u64,
    /// Whether downloading is permitted.
    pub is_downloadable: bool,
}
