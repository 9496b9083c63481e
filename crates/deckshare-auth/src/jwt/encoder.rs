//! Viewer session token creation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use deckshare_core::config::AuthConfig;
use deckshare_core::error::AppError;
use deckshare_entity::share::AccessLevel;

use super::claims::SessionClaims;

/// Lifetime of a viewer session token.
pub const SESSION_TTL_HOURS: i64 = 2;

/// Creates signed HS256 session tokens with a fixed lifetime.
#[derive(Clone)]
pub struct SessionTokenIssuer {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Session lifetime.
    ttl: Duration,
}

impl std::fmt::Debug for SessionTokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenIssuer")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// A freshly minted session token.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct IssuedSession {
    /// Signed token string.
    pub access_token: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl SessionTokenIssuer {
    /// Creates a new issuer from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.session_secret.as_bytes()),
            ttl: Duration::hours(SESSION_TTL_HOURS),
        }
    }

    /// Issue a session token for `email` on the link `token`.
    pub fn issue(
        &self,
        token: &str,
        email: &str,
        access_level: AccessLevel,
    ) -> Result<IssuedSession, AppError> {
        self.issue_at(token, email, access_level, Utc::now())
    }

    /// Issue a session token as if the current time were `now`.
    pub fn issue_at(
        &self,
        token: &str,
        email: &str,
        access_level: AccessLevel,
        now: DateTime<Utc>,
    ) -> Result<IssuedSession, AppError> {
        let expires_at = now + self.ttl;
        let claims = SessionClaims {
            token: token.to_string(),
            email: email.to_string(),
            access_level,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
        };

        let access_token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))?;

        Ok(IssuedSession {
            access_token,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lasts_two_hours() {
        let config = AuthConfig {
            session_secret: "s".repeat(40),
            owner_jwt_secret: "o".repeat(40),
            owner_jwt_audience: None,
        };
        let now = Utc::now();
        let issued = SessionTokenIssuer::new(&config)
            .issue_at("tok", "a@x.com", AccessLevel::Whitelisted, now)
            .unwrap();
        assert_eq!(issued.expires_at - now, Duration::hours(2));
    }
}
