//! Share-link access and one-time passcode policy.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Limits governing share-link liveness and OTP issuance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Lifetime of an issued passcode, in seconds.
    #[serde(default = "default_code_ttl")]
    pub code_ttl_seconds: u64,
    /// Issued codes plus failed checks allowed per window before the
    /// (email, token) pair is locked.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Rolling window of the failed-attempt counter, in seconds.
    #[serde(default = "default_attempts_window")]
    pub attempts_window_seconds: u64,
    /// Minimum spacing between two code requests for the same pair, in seconds.
    #[serde(default = "default_cooldown")]
    pub cooldown_seconds: u64,
    /// TTL of the generation lock, in seconds.
    #[serde(default = "default_lock_ttl")]
    pub lock_ttl_seconds: u64,
    /// Maximum age of a share link measured from creation, in days.
    #[serde(default = "default_max_link_age")]
    pub max_link_age_days: i64,
    /// Expiry applied when a link is created without an explicit duration.
    #[serde(default = "default_expiry_days")]
    pub default_expiry_days: i64,
    /// Durations an owner may pick when creating a link.
    #[serde(default = "default_allowed_expiry_days")]
    pub allowed_expiry_days: Vec<i64>,
    /// Lifetime of the legacy single-shot link code, in seconds.
    #[serde(default = "default_legacy_code_ttl")]
    pub legacy_code_ttl_seconds: i64,
    /// Lifetime of signed document URLs handed to viewers, in seconds.
    #[serde(default = "default_signed_url_ttl")]
    pub signed_url_ttl_seconds: u64,
}

impl AccessConfig {
    /// Passcode lifetime.
    pub fn code_ttl(&self) -> Duration {
        Duration::from_secs(self.code_ttl_seconds)
    }

    /// Failed-attempt counter window.
    pub fn attempts_window(&self) -> Duration {
        Duration::from_secs(self.attempts_window_seconds)
    }

    /// Cooldown between code requests.
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_seconds)
    }

    /// Generation lock TTL.
    pub fn lock_ttl(&self) -> Duration {
        Duration::from_secs(self.lock_ttl_seconds)
    }

    /// Reject limits that would disable rate limiting or expiry.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_attempts == 0 {
            return Err(AppError::configuration("access.max_attempts must be > 0"));
        }
        if self.code_ttl_seconds == 0 || self.attempts_window_seconds == 0 {
            return Err(AppError::configuration(
                "access.code_ttl_seconds and access.attempts_window_seconds must be > 0",
            ));
        }
        if self.max_link_age_days <= 0 {
            return Err(AppError::configuration(
                "access.max_link_age_days must be > 0",
            ));
        }
        if !self.allowed_expiry_days.contains(&self.default_expiry_days) {
            return Err(AppError::configuration(format!(
                "access.default_expiry_days ({}) must be one of {:?}",
                self.default_expiry_days, self.allowed_expiry_days
            )));
        }
        Ok(())
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            code_ttl_seconds: default_code_ttl(),
            max_attempts: default_max_attempts(),
            attempts_window_seconds: default_attempts_window(),
            cooldown_seconds: default_cooldown(),
            lock_ttl_seconds: default_lock_ttl(),
            max_link_age_days: default_max_link_age(),
            default_expiry_days: default_expiry_days(),
            allowed_expiry_days: default_allowed_expiry_days(),
            legacy_code_ttl_seconds: default_legacy_code_ttl(),
            signed_url_ttl_seconds: default_signed_url_ttl(),
        }
    }
}

fn default_code_ttl() -> u64 {
    15 * 60
}

fn default_max_attempts() -> u32 {
    5
}

fn default_attempts_window() -> u64 {
    60 * 60
}

fn default_cooldown() -> u64 {
    30
}

fn default_lock_ttl() -> u64 {
    10
}

fn default_max_link_age() -> i64 {
    30
}

fn default_expiry_days() -> i64 {
    30
}

fn default_allowed_expiry_days() -> Vec<i64> {
    vec![7, 30, 90, 180, 365]
}

fn default_legacy_code_ttl() -> i64 {
    15 * 60
}

fn default_signed_url_ttl() -> u64 {
    60 * 60
}
