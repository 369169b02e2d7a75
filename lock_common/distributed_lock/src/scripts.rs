//! Define Lua scripts for distributed lock operations

use std::sync::OnceLock;
use redis::Script;

/// Lua script for acquiring the lock
/// Refreshes the expiry when the caller already owns the key, otherwise sets it only if absent.
/// ARGV[1] is the owner token, ARGV[2] the expiry in milliseconds.
pub const ACQUIRE_LOCK: &str = r#"
    if redis.call('get', KEYS[1]) == ARGV[1] then
        redis.call('set', KEYS[1], ARGV[1], 'PX', ARGV[2])
        return 'OK'
    end
    return redis.call('set', KEYS[1], ARGV[1], 'NX', 'PX', ARGV[2])
"#;

/// Lua script for releasing lock
/// Can only release the lock when it exists and the value matches
pub const RELEASE_LOCK: &str = r#"
    if redis.call('get', KEYS[1]) == ARGV[1] then
        return redis.call('del', KEYS[1])
    end
    return 0
"#;

static ACQUIRE_SCRIPT: OnceLock<Script> = OnceLock::new();
static RELEASE_SCRIPT: OnceLock<Script> = OnceLock::new();

/// The two atomic operations a [`crate::LockStore`] must be able to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockScript {
    /// `ARGV = [token, expiry_ms]`; replies `OK` when the key now holds the token, nil otherwise
    Acquire,
    /// `ARGV = [token]`; replies the number of keys deleted
    Release,
}

impl LockScript {
    pub fn source(self) -> &'static str {
        match self {
            LockScript::Acquire => ACQUIRE_LOCK,
            LockScript::Release => RELEASE_LOCK,
        }
    }

    /// Prepared script, hashed once per process for EVALSHA.
    pub fn redis_script(self) -> &'static Script {
        match self {
            LockScript::Acquire => ACQUIRE_SCRIPT.get_or_init(|| Script::new(ACQUIRE_LOCK)),
            LockScript::Release => RELEASE_SCRIPT.get_or_init(|| Script::new(RELEASE_LOCK)),
        }
    }
}
