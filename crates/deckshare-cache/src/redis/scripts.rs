//! Lua scripts executed atomically by Redis.
//!
//! Keys are passed already prefixed. Scripts reply with a two-element
//! integer array `{status, value}`.

use redis::Script;

/// Status codes shared by the scripts and their Rust decoders.
pub mod status {
    /// Generate: code stored. Verify: code matched.
    pub const OK: i64 = 1;
    /// Generate: attempt budget exhausted. Verify: pair locked.
    pub const LIMITED: i64 = 0;
    /// Verify: no stored code.
    pub const NO_CODE: i64 = 2;
    /// Verify: stored code differs.
    pub const INVALID: i64 = 3;
}

/// Store a fresh passcode unless the attempt budget is exhausted. Each
/// issuance counts against the same budget as a failed check.
///
/// KEYS[1] = code, KEYS[2] = attempts, KEYS[3] = cooldown
/// ARGV[1] = code, ARGV[2] = code TTL (ms), ARGV[3] = attempts window (ms),
/// ARGV[4] = cooldown (ms), ARGV[5] = max attempts
///
/// Replies `{1, attempts}` with the new count when stored, `{0, attempts}`
/// when rate limited.
const GENERATE_SCRIPT: &str = r#"
    local attempts = tonumber(redis.call('GET', KEYS[2]) or '0')
    if attempts >= tonumber(ARGV[5]) then
        return {0, attempts}
    end

    redis.call('SET', KEYS[1], ARGV[1], 'PX', ARGV[2])

    if redis.call('EXISTS', KEYS[2]) == 1 then
        attempts = redis.call('INCR', KEYS[2])
        redis.call('PEXPIRE', KEYS[2], ARGV[3])
    else
        redis.call('SET', KEYS[2], 1, 'PX', ARGV[3])
        attempts = 1
    end

    redis.call('SET', KEYS[3], '1', 'PX', ARGV[4])
    return {1, attempts}
"#;

/// Check a submitted passcode, consuming it on match.
///
/// KEYS[1] = code, KEYS[2] = attempts, KEYS[3] = cooldown
/// ARGV[1] = submitted code, ARGV[2] = max attempts, ARGV[3] = attempts window (ms)
///
/// Replies `{1, 0}` verified, `{0, attempts}` locked, `{2, remaining}` no
/// code, `{3, remaining}` mismatch.
const VERIFY_SCRIPT: &str = r#"
    local max = tonumber(ARGV[2])
    local attempts = tonumber(redis.call('GET', KEYS[2]) or '0')
    if attempts >= max then
        return {0, attempts}
    end

    local function fail(status)
        local n = redis.call('INCR', KEYS[2])
        if n == 1 or redis.call('PTTL', KEYS[2]) < 0 then
            redis.call('PEXPIRE', KEYS[2], ARGV[3])
        end
        local remaining = max - n
        if remaining < 0 then
            remaining = 0
        end
        return {status, remaining}
    end

    local stored = redis.call('GET', KEYS[1])
    if not stored then
        return fail(2)
    end

    local submitted = ARGV[1]
    local diff = 0
    if #stored ~= #submitted then
        diff = 1
    end
    for i = 1, #stored do
        local a = string.byte(stored, i)
        local b = string.byte(submitted, i) or 0
        diff = bit.bor(diff, bit.bxor(a, b))
    end
    if diff ~= 0 then
        return fail(3)
    end

    redis.call('DEL', KEYS[1], KEYS[2], KEYS[3])
    return {1, 0}
"#;

/// Increment a counter, starting its window on first use.
///
/// KEYS[1] = counter, ARGV[1] = window (ms). Replies with the new value.
const INCR_SCRIPT: &str = r#"
    local n = redis.call('INCR', KEYS[1])
    if n == 1 or redis.call('PTTL', KEYS[1]) < 0 then
        redis.call('PEXPIRE', KEYS[1], ARGV[1])
    end
    return n
"#;

/// Delete a key only while it holds the expected value.
///
/// KEYS[1] = key, ARGV[1] = expected value. Replies 1 when deleted.
const COMPARE_AND_DELETE_SCRIPT: &str = r#"
    if redis.call('GET', KEYS[1]) == ARGV[1] then
        return redis.call('DEL', KEYS[1])
    end
    return 0
"#;

/// Compiled scripts, hashed once per provider.
#[derive(Debug, Clone)]
pub struct OtpScriptSet {
    /// Passcode issuance.
    pub generate: Script,
    /// Passcode verification.
    pub verify: Script,
    /// Windowed counter.
    pub incr: Script,
    /// Lock release.
    pub compare_and_delete: Script,
}

impl OtpScriptSet {
    /// Hash all scripts.
    pub fn new() -> Self {
        Self {
            generate: Script::new(GENERATE_SCRIPT),
            verify: Script::new(VERIFY_SCRIPT),
            incr: Script::new(INCR_SCRIPT),
            compare_and_delete: Script::new(COMPARE_AND_DELETE_SCRIPT),
        }
    }
}

impl Default for OtpScriptSet {
    fn default() -> Self {
        Self::new()
    }
}
