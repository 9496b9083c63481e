//! Rate-limited passcode store.
//!
//! Issuance is serialized per (email, token) pair by a short-lived lock and
//! guarded by a cooldown; the check-and-mutate steps themselves run as the
//! atomic [`OtpScripts`] transactions. Any cache failure is returned as an
//! error so callers fail closed.

use std::time::Duration;

use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};
use uuid::Uuid;

use deckshare_cache::CacheManager;
use deckshare_cache::keys;
use deckshare_core::config::AccessConfig;
use deckshare_core::error::AppError;
use deckshare_core::result::AppResult;
use deckshare_core::traits::CacheProvider;
use deckshare_core::traits::otp::{
    GenerateParams, GenerateScriptOutcome, OtpScripts, VerifyParams, VerifyScriptOutcome,
};
use deckshare_core::types::{mask_email, normalize_email};

use super::code::{generate_code, is_well_formed};

/// Result of a code request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeGeneration {
    /// A new code was stored and must be delivered to the email.
    Issued {
        /// The plaintext code.
        code: String,
    },
    /// The pair has exhausted its attempt budget.
    RateLimited,
    /// A code was issued too recently.
    Throttled {
        /// Time until a new code may be requested.
        retry_after: Duration,
    },
    /// Another request for the same pair is in flight.
    Busy,
}

/// Result of a code check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeVerification {
    /// The code matched and was consumed.
    Verified,
    /// Too many failed attempts; no check was made.
    Locked,
    /// No code is outstanding (never issued, expired, or already used).
    NoCode {
        /// Attempts left before the pair locks.
        remaining: u32,
    },
    /// The code did not match.
    Invalid {
        /// Attempts left before the pair locks.
        remaining: u32,
    },
}

/// Result of a check against the owner-issued code stored on a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkCodeCheck {
    /// The code matched.
    Verified,
    /// The token has used up its checks; no comparison was made.
    Locked,
    /// The code did not match or no live code exists.
    Invalid {
        /// Checks left before the token locks.
        remaining: u32,
    },
}

impl From<VerifyScriptOutcome> for CodeVerification {
    fn from(outcome: VerifyScriptOutcome) -> Self {
        match outcome {
            VerifyScriptOutcome::Verified => Self::Verified,
            VerifyScriptOutcome::Locked => Self::Locked,
            VerifyScriptOutcome::NoCode { remaining } => Self::NoCode { remaining },
            VerifyScriptOutcome::Invalid { remaining } => Self::Invalid { remaining },
        }
    }
}

/// Passcode store keyed by (case-folded email, share token).
#[derive(Debug, Clone)]
pub struct RateLimitedCodeStore {
    cache: CacheManager,
    code_ttl: Duration,
    attempts_window: Duration,
    cooldown: Duration,
    lock_ttl: Duration,
    max_attempts: u32,
}

impl RateLimitedCodeStore {
    /// Create a store over `cache` with the limits from `config`.
    pub fn new(cache: CacheManager, config: &AccessConfig) -> Self {
        Self {
            cache,
            code_ttl: config.code_ttl(),
            attempts_window: config.attempts_window(),
            cooldown: config.cooldown(),
            lock_ttl: config.lock_ttl(),
            max_attempts: config.max_attempts,
        }
    }

    /// Issue a new code for the pair.
    pub async fn generate(&self, email: &str, token: &str) -> AppResult<CodeGeneration> {
        let email = require_pair(email, token)?;

        let lock_key = keys::otp_lock(&email, token);
        let owner = Uuid::new_v4().to_string();
        if !self.cache.set_nx(&lock_key, &owner, self.lock_ttl).await? {
            debug!(email = %mask_email(&email), "Code generation already in progress");
            return Ok(CodeGeneration::Busy);
        }

        let result = self.generate_locked(&email, token).await;

        if let Err(e) = self.cache.delete_if_equals(&lock_key, &owner).await {
            warn!(error = %e, "Failed to release code generation lock; it will expire");
        }

        result
    }

    async fn generate_locked(&self, email: &str, token: &str) -> AppResult<CodeGeneration> {
        let cooldown_key = keys::otp_cooldown(email, token);
        if let Some(remaining) = self.cache.ttl(&cooldown_key).await? {
            let retry_after = Duration::from_secs(remaining.as_secs_f64().ceil() as u64);
            return Ok(CodeGeneration::Throttled { retry_after });
        }

        let code = generate_code();
        let params = GenerateParams {
            code: code.clone(),
            code_ttl: self.code_ttl,
            attempts_window: self.attempts_window,
            cooldown: self.cooldown,
            max_attempts: self.max_attempts,
        };

        match self
            .cache
            .generate_code(&keys::otp_keys(email, token), &params)
            .await?
        {
            GenerateScriptOutcome::Stored => {
                info!(email = %mask_email(email), "Issued access code");
                Ok(CodeGeneration::Issued { code })
            }
            GenerateScriptOutcome::RateLimited { attempts } => {
                warn!(email = %mask_email(email), attempts, "Code issuance refused: attempt budget exhausted");
                Ok(CodeGeneration::RateLimited)
            }
        }
    }

    /// Check a submitted code for the pair.
    pub async fn verify(&self, email: &str, token: &str, code: &str) -> AppResult<CodeVerification> {
        let email = require_pair(email, token)?;
        if code.trim().is_empty() {
            return Err(AppError::validation("Code is required"));
        }
        if !is_well_formed(code.trim()) {
            return Err(AppError::validation("Code must be 6 digits"));
        }

        let params = VerifyParams {
            code: code.trim().to_string(),
            max_attempts: self.max_attempts,
            attempts_window: self.attempts_window,
        };
        let outcome: CodeVerification = self
            .cache
            .verify_code(&keys::otp_keys(&email, token), &params)
            .await?
            .into();

        match outcome {
            CodeVerification::Verified => {
                info!(email = %mask_email(&email), "Access code verified")
            }
            CodeVerification::Locked => {
                warn!(email = %mask_email(&email), "Access code check refused: pair locked")
            }
            CodeVerification::NoCode { remaining } | CodeVerification::Invalid { remaining } => {
                debug!(email = %mask_email(&email), remaining, "Access code rejected")
            }
        }
        Ok(outcome)
    }

    /// Check `submitted` against the owner-issued code `stored` on a link.
    ///
    /// `stored` is `None` when the link has no live code. Every check counts
    /// against the token's budget, and a success resets it.
    pub async fn check_link_code(
        &self,
        token: &str,
        stored: Option<&str>,
        submitted: &str,
    ) -> AppResult<LinkCodeCheck> {
        if token.trim().is_empty() {
            return Err(AppError::validation("Token is required"));
        }

        let counter = keys::link_code_attempts(token);
        let checks = self.cache.incr(&counter, self.attempts_window).await?;
        let max = u64::from(self.max_attempts);
        if checks > max {
            warn!(checks, "Link code check refused: attempt budget exhausted");
            return Ok(LinkCodeCheck::Locked);
        }

        let submitted = submitted.trim();
        let matches = match stored {
            Some(stored) if is_well_formed(submitted) => {
                bool::from(stored.as_bytes().ct_eq(submitted.as_bytes()))
            }
            _ => false,
        };
        if !matches {
            let remaining = max.saturating_sub(checks) as u32;
            debug!(remaining, "Link code rejected");
            return Ok(LinkCodeCheck::Invalid { remaining });
        }

        self.cache.delete(&[counter]).await?;
        Ok(LinkCodeCheck::Verified)
    }

    /// Remove every trace of the pair (code, counter, cooldown).
    pub async fn clear(&self, email: &str, token: &str) -> AppResult<()> {
        let email = require_pair(email, token)?;
        self.cache
            .delete(&keys::otp_keys(&email, token).all())
            .await?;
        Ok(())
    }
}

fn require_pair(email: &str, token: &str) -> AppResult<String> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(AppError::validation("Email is required"));
    }
    if token.trim().is_empty() {
        return Err(AppError::validation("Token is required"));
    }
    Ok(email)
}
