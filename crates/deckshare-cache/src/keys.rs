//! Cache key builders for every DeckShare cache entry.
//!
//! Keys are relative; the Redis provider prepends the configured prefix.
//! Emails are case-folded so `Alice@X.com` and `alice@x.com` share state.

use deckshare_core::traits::OtpKeys;
use deckshare_core::types::normalize_email;

fn pair(email: &str, token: &str) -> String {
    format!("{}:{token}", normalize_email(email))
}

/// Current passcode for an (email, token) pair.
pub fn otp_code(email: &str, token: &str) -> String {
    format!("otp:code:{}", pair(email, token))
}

/// Failed-attempt counter for an (email, token) pair.
pub fn otp_attempts(email: &str, token: &str) -> String {
    format!("otp:attempts:{}", pair(email, token))
}

/// Re-issuance cooldown marker for an (email, token) pair.
pub fn otp_cooldown(email: &str, token: &str) -> String {
    format!("otp:cooldown:{}", pair(email, token))
}

/// Generation lock for an (email, token) pair.
pub fn otp_lock(email: &str, token: &str) -> String {
    format!("otp:lock:{}", pair(email, token))
}

/// Check counter for the owner-issued code stored on a share link.
pub fn link_code_attempts(token: &str) -> String {
    format!("otp:link_attempts:{token}")
}

/// All transactional keys for an (email, token) pair.
pub fn otp_keys(email: &str, token: &str) -> OtpKeys {
    OtpKeys {
        code: otp_code(email, token),
        attempts: otp_attempts(email, token),
        cooldown: otp_cooldown(email, token),
    }
}
