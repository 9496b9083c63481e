//! Atomic one-time passcode transactions.
//!
//! The two operations below are the only places where the passcode,
//! failed-attempt counter, and cooldown marker are mutated together. Each
//! must execute as one indivisible step as observed by every other client
//! of the cache: Redis implements them as Lua scripts, the development
//! backend under a single mutex. Application code never reads the counter
//! and writes it back itself.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Cache keys holding the state of one (email, token) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpKeys {
    /// Current passcode.
    pub code: String,
    /// Failed-attempt counter.
    pub attempts: String,
    /// Marker preventing rapid re-issuance.
    pub cooldown: String,
}

impl OtpKeys {
    /// All keys, in script order.
    pub fn all(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.attempts.clone(),
            self.cooldown.clone(),
        ]
    }
}

/// Inputs of the generate transaction.
#[derive(Debug, Clone)]
pub struct GenerateParams {
    /// Freshly generated passcode.
    pub code: String,
    /// Passcode lifetime.
    pub code_ttl: Duration,
    /// Window of the failed-attempt counter.
    pub attempts_window: Duration,
    /// Cooldown marker lifetime.
    pub cooldown: Duration,
    /// Attempt count at which issuance is refused.
    pub max_attempts: u32,
}

/// Result of the generate transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateScriptOutcome {
    /// The code was stored and the cooldown set.
    Stored,
    /// Nothing was written because the attempt budget is exhausted.
    RateLimited {
        /// Current failed-attempt count.
        attempts: u32,
    },
}

/// Inputs of the verify transaction.
#[derive(Debug, Clone)]
pub struct VerifyParams {
    /// Code submitted by the caller.
    pub code: String,
    /// Attempt count at which verification is refused.
    pub max_attempts: u32,
    /// Window applied when the failed-attempt counter is created.
    pub attempts_window: Duration,
}

/// Result of the verify transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyScriptOutcome {
    /// The code matched and all state for the pair was deleted.
    Verified,
    /// The attempt budget was already exhausted; nothing was changed.
    Locked,
    /// No code was stored; the attempt counter was incremented.
    NoCode {
        /// Attempts left before the pair locks.
        remaining: u32,
    },
    /// The stored code differs; the attempt counter was incremented.
    Invalid {
        /// Attempts left before the pair locks.
        remaining: u32,
    },
}

/// Contract for the two atomic passcode transactions.
///
/// `generate_code`
/// - pre: none (the caller holds the generation lock and has checked the cooldown).
/// - post, when `attempts >= max_attempts`: nothing written, returns `RateLimited`.
/// - post, otherwise: `code` stored with `code_ttl`; the attempt counter
///   incremented (set to 1 if it was absent) and its TTL reset to
///   `attempts_window`; the cooldown marker exists with `cooldown` TTL;
///   returns `Stored`.
///
/// `verify_code`
/// - post, when `attempts >= max_attempts`: nothing written, returns `Locked`.
/// - post, when no code is stored: counter incremented (created with
///   `attempts_window` TTL if absent), returns `NoCode`.
/// - post, when the stored code differs (compared in constant time):
///   counter incremented as above, returns `Invalid`.
/// - post, on match: code, counter and cooldown deleted, returns `Verified`.
///
/// Two concurrent `verify_code` calls with the correct code observe a total
/// order: exactly one returns `Verified`.
#[async_trait]
pub trait OtpScripts: Send + Sync + std::fmt::Debug + 'static {
    /// Run the generate transaction.
    async fn generate_code(
        &self,
        keys: &OtpKeys,
        params: &GenerateParams,
    ) -> AppResult<GenerateScriptOutcome>;

    /// Run the verify transaction.
    async fn verify_code(
        &self,
        keys: &OtpKeys,
        params: &VerifyParams,
    ) -> AppResult<VerifyScriptOutcome>;
}
