//! Redis cache provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use deckshare_core::error::AppError;
use deckshare_core::result::AppResult;
use deckshare_core::traits::CacheProvider;
use deckshare_core::traits::otp::{
    GenerateParams, GenerateScriptOutcome, OtpKeys, OtpScripts, VerifyParams, VerifyScriptOutcome,
};

use super::client::RedisClient;
use super::scripts::{OtpScriptSet, status};

/// Redis-backed cache provider.
#[derive(Debug, Clone)]
pub struct RedisCacheProvider {
    /// Redis client.
    client: RedisClient,
    /// Pre-hashed Lua scripts.
    scripts: OtpScriptSet,
}

impl RedisCacheProvider {
    /// Create a new Redis cache provider.
    pub fn new(client: RedisClient) -> Self {
        Self {
            client,
            scripts: OtpScriptSet::new(),
        }
    }

    fn prefixed(&self, keys: &OtpKeys) -> [String; 3] {
        [
            self.client.prefixed_key(&keys.code),
            self.client.prefixed_key(&keys.attempts),
            self.client.prefixed_key(&keys.cooldown),
        ]
    }
}

fn millis(d: Duration) -> u64 {
    d.as_millis().max(1) as u64
}

fn clamp_u32(v: i64) -> u32 {
    v.clamp(0, i64::from(u32::MAX)) as u32
}

fn unexpected_reply(script: &str, reply: &[i64]) -> AppError {
    error!(script, ?reply, "Unexpected Lua script reply");
    AppError::cache(format!("Unexpected reply from {script} script"))
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        self.client
            .bounded("GET", redis::cmd("GET").arg(&full_key).query_async(&mut conn))
            .await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        self.client
            .bounded(
                "SET",
                redis::cmd("SET")
                    .arg(&full_key)
                    .arg(value)
                    .arg("PX")
                    .arg(millis(ttl))
                    .query_async::<()>(&mut conn),
            )
            .await
    }

    async fn delete(&self, keys: &[String]) -> AppResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let full_keys: Vec<String> = keys.iter().map(|k| self.client.prefixed_key(k)).collect();
        let mut conn = self.client.conn_mut();
        let removed: u64 = self
            .client
            .bounded("DEL", redis::cmd("DEL").arg(&full_keys).query_async(&mut conn))
            .await?;
        debug!(requested = keys.len(), removed, "Deleted cache keys");
        Ok(removed)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let count: i64 = self
            .client
            .bounded("EXISTS", redis::cmd("EXISTS").arg(&full_key).query_async(&mut conn))
            .await?;
        Ok(count > 0)
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        // -2: absent, -1: no expiry
        let ms: i64 = self
            .client
            .bounded("PTTL", redis::cmd("PTTL").arg(&full_key).query_async(&mut conn))
            .await?;
        Ok((ms >= 0).then(|| Duration::from_millis(ms as u64)))
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();

        // SET key value PX ttl NX
        let result: Option<String> = self
            .client
            .bounded(
                "SET NX",
                redis::cmd("SET")
                    .arg(&full_key)
                    .arg(value)
                    .arg("PX")
                    .arg(millis(ttl))
                    .arg("NX")
                    .query_async(&mut conn),
            )
            .await?;

        Ok(result.is_some())
    }

    async fn incr(&self, key: &str, window: Duration) -> AppResult<u64> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let n: i64 = self
            .client
            .bounded(
                "incr script",
                self.scripts
                    .incr
                    .key(&full_key)
                    .arg(millis(window))
                    .invoke_async(&mut conn),
            )
            .await?;
        Ok(n.max(0) as u64)
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let removed: i64 = self
            .client
            .bounded(
                "compare-and-delete",
                self.scripts
                    .compare_and_delete
                    .key(&full_key)
                    .arg(expected)
                    .invoke_async(&mut conn),
            )
            .await?;
        Ok(removed > 0)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = self
            .client
            .bounded("PING", redis::cmd("PING").query_async(&mut conn))
            .await?;
        Ok(pong == "PONG")
    }
}

#[async_trait]
impl OtpScripts for RedisCacheProvider {
    async fn generate_code(
        &self,
        keys: &OtpKeys,
        params: &GenerateParams,
    ) -> AppResult<GenerateScriptOutcome> {
        let [code_key, attempts_key, cooldown_key] = self.prefixed(keys);
        let mut conn = self.client.conn_mut();

        let reply: Vec<i64> = self
            .client
            .bounded(
                "generate script",
                self.scripts
                    .generate
                    .key(&code_key)
                    .key(&attempts_key)
                    .key(&cooldown_key)
                    .arg(&params.code)
                    .arg(millis(params.code_ttl))
                    .arg(millis(params.attempts_window))
                    .arg(millis(params.cooldown))
                    .arg(params.max_attempts)
                    .invoke_async(&mut conn),
            )
            .await?;

        match reply.as_slice() {
            [status::OK, _] => Ok(GenerateScriptOutcome::Stored),
            [status::LIMITED, attempts] => Ok(GenerateScriptOutcome::RateLimited {
                attempts: clamp_u32(*attempts),
            }),
            other => Err(unexpected_reply("generate", other)),
        }
    }

    async fn verify_code(
        &self,
        keys: &OtpKeys,
        params: &VerifyParams,
    ) -> AppResult<VerifyScriptOutcome> {
        let [code_key, attempts_key, cooldown_key] = self.prefixed(keys);
        let mut conn = self.client.conn_mut();

        let reply: Vec<i64> = self
            .client
            .bounded(
                "verify script",
                self.scripts
                    .verify
                    .key(&code_key)
                    .key(&attempts_key)
                    .key(&cooldown_key)
                    .arg(&params.code)
                    .arg(params.max_attempts)
                    .arg(millis(params.attempts_window))
                    .invoke_async(&mut conn),
            )
            .await?;

        match reply.as_slice() {
            [status::OK, _] => Ok(VerifyScriptOutcome::Verified),
            [status::LIMITED, _] => Ok(VerifyScriptOutcome::Locked),
            [status::NO_CODE, remaining] => Ok(VerifyScriptOutcome::NoCode {
                remaining: clamp_u32(*remaining),
            }),
            [status::INVALID, remaining] => Ok(VerifyScriptOutcome::Invalid {
                remaining: clamp_u32(*remaining),
            }),
            other => Err(unexpected_reply("verify", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_never_zero() {
        assert_eq!(millis(Duration::from_micros(10)), 1);
        assert_eq!(millis(Duration::from_secs(900)), 900_000);
    }

    #[test]
    fn test_clamp_u32() {
        assert_eq!(clamp_u32(-3), 0);
        assert_eq!(clamp_u32(4), 4);
    }
}
