//! Token signing configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Minimum accepted length of an HMAC signing secret, in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

/// Signing secrets for viewer session tokens and owner access tokens.
///
/// Neither secret has a default: a missing secret is a fatal startup error.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret for viewer session tokens.
    #[serde(default)]
    pub session_secret: String,
    /// HMAC-SHA256 secret used by the identity provider to sign owner tokens.
    #[serde(default)]
    pub owner_jwt_secret: String,
    /// Expected `aud` claim on owner tokens, if the provider sets one.
    #[serde(default)]
    pub owner_jwt_audience: Option<String>,
}

impl AuthConfig {
    /// Reject missing or short secrets.
    pub fn validate(&self) -> Result<(), AppError> {
        check_secret("auth.session_secret", &self.session_secret)?;
        check_secret("auth.owner_jwt_secret", &self.owner_jwt_secret)?;
        Ok(())
    }
}

fn check_secret(name: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::configuration(format!(
            "{name} is not set; refusing to start without a signing secret"
        )));
    }
    if value.len() < MIN_SECRET_BYTES {
        return Err(AppError::configuration(format!(
            "{name} must be at least {MIN_SECRET_BYTES} bytes"
        )));
    }
    Ok(())
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("session_secret", &"****")
            .field("owner_jwt_secret", &"****")
            .field("owner_jwt_audience", &self.owner_jwt_audience)
            .finish()
    }
}
