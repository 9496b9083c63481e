//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use deckshare_entity::share::AccessLevel;

/// Body of `POST /access/request-code` and `POST /access/evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmailAccessRequest {
    /// Share token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// Viewer email.
    #[validate(length(min = 1, max = 320, message = "Email is required"))]
    pub email: String,
}

/// Body of `POST /access/verify-code`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    /// Share token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// Viewer email.
    #[validate(length(min = 1, max = 320, message = "Email is required"))]
    pub email: String,
    /// Code received by email.
    #[validate(length(min = 1, max = 16, message = "Code is required"))]
    pub code: String,
}

/// Body of `POST /access/verify-link-code`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyLinkCodeRequest {
    /// Share token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// Code issued by the owner.
    #[validate(length(min = 1, max = 16, message = "Code is required"))]
    pub code: String,
}

/// Query of `GET /access/requirements`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenQuery {
    /// Share token.
    #[serde(default)]
    pub token: String,
}

/// Body of `POST /links`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    /// Deck to share.
    pub deck_id: Uuid,
    /// Access level of the new link.
    pub access_level: AccessLevel,
    /// Single recipient for restricted and whitelisted links.
    #[validate(length(max = 320))]
    pub recipient_email: Option<String>,
    /// Individually allowed emails.
    #[serde(default)]
    #[validate(length(max = 500))]
    pub allowed_emails: Vec<String>,
    /// Allowed email domains (subdomains included).
    #[serde(default)]
    #[validate(length(max = 100))]
    pub allowed_domains: Vec<String>,
    /// Whether viewers may download the PDF.
    #[serde(default)]
    pub is_downloadable: bool,
    /// Lifetime in days.
    pub expires_in_days: Option<i64>,
    /// Human-readable identifier.
    pub link_id: Option<String>,
}

/// Query of `GET /links`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLinksQuery {
    /// Deck whose links to list.
    pub deck_id: Uuid,
}

/// Body of `PUT /links/{token}/identifier`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetIdentifierRequest {
    /// Raw identifier; sanitized by the service.
    #[validate(length(min = 1, max = 200, message = "Identifier is required"))]
    pub link_id: String,
}
