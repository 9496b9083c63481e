//! JWT claims carried by viewer session tokens and owner tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use deckshare_entity::share::AccessLevel;

/// Claims of a viewer session token, minted after OTP verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Share token the session was granted for.
    pub token: String,
    /// Verified (case-folded) viewer email.
    pub email: String,
    /// Access level of the link at issuance.
    pub access_level: AccessLevel,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Unique token ID.
    pub jti: Uuid,
}

impl SessionClaims {
    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Whether the token is expired at `now`. No leeway.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Claims of an owner access token issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerClaims {
    /// Subject, the owner's user ID.
    pub sub: Uuid,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Owner email, when the provider includes it.
    #[serde(default)]
    pub email: Option<String>,
}

impl OwnerClaims {
    /// Returns the owner's user ID.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }
}
