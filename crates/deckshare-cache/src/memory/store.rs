//! In-memory cache implementation guarded by a single Tokio mutex.
//!
//! Every operation, including the two OTP transactions, runs under the same
//! lock, which gives the transactions the same all-or-nothing visibility as
//! the Redis scripts. Expiry uses the Tokio clock so tests can pause and
//! advance time.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;
use tokio::time::Instant;

use deckshare_core::result::AppResult;
use deckshare_core::traits::CacheProvider;
use deckshare_core::traits::otp::{
    GenerateParams, GenerateScriptOutcome, OtpKeys, OtpScripts, VerifyParams, VerifyScriptOutcome,
};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct InnerState {
    entries: HashMap<String, Entry>,
}

impl InnerState {
    /// Return a live entry, evicting it if it has expired.
    fn live(&mut self, key: &str, now: Instant) -> Option<&mut Entry> {
        if self.entries.get(key).is_some_and(|e| e.expires_at <= now) {
            self.entries.remove(key);
        }
        self.entries.get_mut(key)
    }

    fn put(&mut self, key: &str, value: impl Into<String>, ttl: Duration, now: Instant) {
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.into(),
                expires_at: now + ttl,
            },
        );
    }

    fn attempts(&mut self, key: &str, now: Instant) -> u32 {
        self.live(key, now)
            .and_then(|e| e.value.parse().ok())
            .unwrap_or(0)
    }

    /// Increment the attempt counter, creating it with `window` if absent.
    fn record_failure(&mut self, key: &str, window: Duration, now: Instant) -> u32 {
        match self.live(key, now) {
            Some(entry) => {
                let next = entry.value.parse::<u32>().unwrap_or(0).saturating_add(1);
                entry.value = next.to_string();
                next
            }
            None => {
                self.put(key, "1", window, now);
                1
            }
        }
    }
}

/// In-memory cache provider.
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheProvider {
    state: Arc<Mutex<InnerState>>,
}

impl MemoryCacheProvider {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut state = self.state.lock().await;
        Ok(state.live(key, Instant::now()).map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.put(key, value, ttl, Instant::now());
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let now = Instant::now();
        let mut removed = 0;
        for key in keys {
            if state.live(key, now).is_some() {
                state.entries.remove(key);
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        Ok(state.live(key, Instant::now()).is_some())
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        let mut state = self.state.lock().await;
        let now = Instant::now();
        Ok(state.live(key, now).map(|e| e.expires_at - now))
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let now = Instant::now();
        if state.live(key, now).is_some() {
            return Ok(false);
        }
        state.put(key, value, ttl, now);
        Ok(true)
    }

    async fn incr(&self, key: &str, window: Duration) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        Ok(u64::from(state.record_failure(key, window, Instant::now())))
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let matches = state
            .live(key, Instant::now())
            .is_some_and(|e| e.value == expected);
        if matches {
            state.entries.remove(key);
        }
        Ok(matches)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl OtpScripts for MemoryCacheProvider {
    async fn generate_code(
        &self,
        keys: &OtpKeys,
        params: &GenerateParams,
    ) -> AppResult<GenerateScriptOutcome> {
        let mut state = self.state.lock().await;
        let now = Instant::now();

        let attempts = state.attempts(&keys.attempts, now);
        if attempts >= params.max_attempts {
            return Ok(GenerateScriptOutcome::RateLimited { attempts });
        }

        state.put(&keys.code, params.code.as_str(), params.code_ttl, now);
        state.record_failure(&keys.attempts, params.attempts_window, now);
        if let Some(entry) = state.live(&keys.attempts, now) {
            entry.expires_at = now + params.attempts_window;
        }
        state.put(&keys.cooldown, "1", params.cooldown, now);

        Ok(GenerateScriptOutcome::Stored)
    }

    async fn verify_code(
        &self,
        keys: &OtpKeys,
        params: &VerifyParams,
    ) -> AppResult<VerifyScriptOutcome> {
        let mut state = self.state.lock().await;
        let now = Instant::now();

        if state.attempts(&keys.attempts, now) >= params.max_attempts {
            return Ok(VerifyScriptOutcome::Locked);
        }

        let stored = state.live(&keys.code, now).map(|e| e.value.clone());
        let Some(stored) = stored else {
            let n = state.record_failure(&keys.attempts, params.attempts_window, now);
            return Ok(VerifyScriptOutcome::NoCode {
                remaining: params.max_attempts.saturating_sub(n),
            });
        };

        let matches: bool = stored.as_bytes().ct_eq(params.code.as_bytes()).into();
        if !matches {
            let n = state.record_failure(&keys.attempts, params.attempts_window, now);
            return Ok(VerifyScriptOutcome::Invalid {
                remaining: params.max_attempts.saturating_sub(n),
            });
        }

        for key in keys.all() {
            state.entries.remove(&key);
        }
        Ok(VerifyScriptOutcome::Verified)
    }
}
