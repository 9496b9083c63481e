//! JWT validation for viewer session tokens and owner tokens.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use deckshare_core::config::AuthConfig;
use deckshare_core::error::AppError;

use super::claims::{OwnerClaims, SessionClaims};

/// Validates viewer session tokens.
///
/// Every failure (bad signature, malformed token, expiry) yields `None`;
/// callers treat the request as carrying no session at all.
#[derive(Clone)]
pub struct SessionTokenVerifier {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Signature and structure checks; expiry is checked against the
    /// caller-supplied clock instead.
    validation: Validation,
}

impl std::fmt::Debug for SessionTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl SessionTokenVerifier {
    /// Creates a new verifier from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(config.session_secret.as_bytes()),
            validation,
        }
    }

    /// Verify a session token against the current time.
    pub fn verify(&self, signed: &str) -> Option<SessionClaims> {
        self.verify_at(signed, Utc::now())
    }

    /// Verify a session token as if the current time were `now`.
    pub fn verify_at(&self, signed: &str, now: DateTime<Utc>) -> Option<SessionClaims> {
        let claims = match decode::<SessionClaims>(signed, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!(error = %e, "Rejected session token");
                return None;
            }
        };

        if claims.is_expired_at(now) {
            debug!(jti = %claims.jti, "Rejected expired session token");
            return None;
        }
        Some(claims)
    }

    /// Verify a session token and require it to belong to the share `token`.
    pub fn verify_for(&self, signed: &str, token: &str) -> Option<SessionClaims> {
        self.verify_for_at(signed, token, Utc::now())
    }

    /// [`Self::verify_for`] with an injected clock.
    pub fn verify_for_at(
        &self,
        signed: &str,
        token: &str,
        now: DateTime<Utc>,
    ) -> Option<SessionClaims> {
        self.verify_at(signed, now).filter(|claims| claims.token == token)
    }
}

/// Validates owner access tokens issued by the identity provider.
#[derive(Clone)]
pub struct OwnerTokenDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for OwnerTokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnerTokenDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl OwnerTokenDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew
        match &config.owner_jwt_audience {
            Some(aud) => validation.set_audience(&[aud.as_str()]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.owner_jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decode and validate an owner token.
    pub fn decode(&self, signed: &str) -> Result<OwnerClaims, AppError> {
        decode::<OwnerClaims>(signed, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::authentication("Invalid token signature")
                }
                _ => AppError::authentication(format!("Token validation failed: {e}")),
            })
    }
}
