//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use deckshare_entity::share::{AccessLevel, ShareLink};

/// Acknowledgement without data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// Always `true`.
    pub success: bool,
    /// Optional human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SuccessResponse {
    /// Bare success.
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Success with a message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }
}

/// Response of `POST /access/request-code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSentResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable message.
    pub message: String,
    /// Masked delivery address.
    pub sent_to: String,
}

/// Response of `POST /access/verify-code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeResponse {
    /// Always `true`.
    pub success: bool,
    /// Viewer session token.
    pub access_token: String,
    /// Session expiry.
    pub expires_at: DateTime<Utc>,
}

/// Response of `GET /access/resolve/{owner_id}/{identifier}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    /// Share token the identifier points to.
    pub token: String,
}

/// Response of `GET /view/{token}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResponse {
    /// Signed document URL.
    pub url: String,
    /// Seconds until the URL expires.
    pub expires_in: u64,
    /// Whether downloading is permitted.
    pub is_downloadable: bool,
}

/// Share link as shown to its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    /// Share token.
    pub token: String,
    /// Human-readable identifier.
    pub link_id: Option<String>,
    /// Shared deck.
    pub deck_id: Uuid,
    /// Access level.
    pub access_level: AccessLevel,
    /// Single recipient.
    pub recipient_email: Option<String>,
    /// Allowed emails.
    pub allowed_emails: Vec<String>,
    /// Allowed domains.
    pub allowed_domains: Vec<String>,
    /// Whether downloading is permitted.
    pub is_downloadable: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Absolute expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether any viewer has verified.
    pub is_verified: bool,
}

impl From<ShareLink> for LinkResponse {
    fn from(link: ShareLink) -> Self {
        Self {
            token: link.token,
            link_id: link.link_id,
            deck_id: link.deck_id,
            access_level: link.access_level,
            recipient_email: link.recipient_email,
            allowed_emails: link.allowed_emails,
            allowed_domains: link.allowed_domains,
            is_downloadable: link.is_downloadable,
            created_at: link.created_at,
            expires_at: link.expires_at,
            is_verified: link.is_verified,
        }
    }
}

/// Response of `POST /links/{token}/code`. The only place the legacy code
/// is ever returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkCodeResponse {
    /// Single-shot code.
    pub code: String,
    /// When the code stops working.
    pub expires_at: DateTime<Utc>,
}

/// Basic health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Status string.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}

/// Detailed health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Overall status: `ok` or `degraded`.
    pub status: String,
    /// Database status.
    pub database: String,
    /// Cache status.
    pub cache: String,
    /// Cache provider name.
    pub cache_provider: String,
    /// Blob store status.
    pub storage: String,
}
