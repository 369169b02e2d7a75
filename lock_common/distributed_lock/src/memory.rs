//! In-process store with the same script semantics as Redis.
//!
//! Every operation runs under one mutex, which gives each script the same
//! all-or-nothing behaviour Redis gets from single-threaded execution. Expired
//! entries are dropped lazily when touched.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use cache::CacheError;
use parking_lot::Mutex;
use crate::scripts::LockScript;
use crate::store::{LimitStore, LockStore, ScriptReply};

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `key`, ignoring expired entries.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock();
        live_entry(&mut entries, key).map(|e| e.value.clone())
    }

    fn put(entries: &mut HashMap<String, Entry>, key: &str, value: &str, ttl: Duration) {
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
    }
}

/// Drops `key` if its deadline has passed and returns what is left.
fn live_entry<'a>(entries: &'a mut HashMap<String, Entry>, key: &str) -> Option<&'a mut Entry> {
    let now = Instant::now();
    if entries.get(key).is_some_and(|e| e.expires_at <= now) {
        entries.remove(key);
    }
    entries.get_mut(key)
}

fn arg<'a>(args: &'a [String], index: usize, script: LockScript) -> Result<&'a str, CacheError> {
    args.get(index).map(String::as_str).ok_or_else(|| {
        CacheError::UnexpectedReply(format!("ERR missing ARGV[{}] for {:?}", index + 1, script))
    })
}

impl LockStore for MemoryStore {
    fn eval(&self, script: LockScript, key: &str, args: &[String]) -> Result<ScriptReply, CacheError> {
        let token = arg(args, 0, script)?;
        let mut entries = self.entries.lock();
        let current = live_entry(&mut entries, key).map(|e| e.value == token);

        match script {
            LockScript::Acquire => {
                let millis: u64 = arg(args, 1, script)?.parse().map_err(|_| {
                    CacheError::UnexpectedReply("ERR value is not an integer or out of range".to_string())
                })?;
                if millis == 0 {
                    return Err(CacheError::UnexpectedReply("ERR invalid expire time in 'set' command".to_string()));
                }
                match current {
                    // Owned by this token, or absent: write and report OK
                    Some(true) | None => {
                        Self::put(&mut entries, key, token, Duration::from_millis(millis));
                        Ok(ScriptReply::Status("OK".to_string()))
                    }
                    Some(false) => Ok(ScriptReply::Nil),
                }
            }
            LockScript::Release => match current {
                Some(true) => {
                    entries.remove(key);
                    Ok(ScriptReply::Int(1))
                }
                _ => Ok(ScriptReply::Int(0)),
            },
        }
    }

    fn pttl(&self, key: &str) -> Result<Option<Duration>, CacheError> {
        let mut entries = self.entries.lock();
        let now = Instant::now();
        Ok(live_entry(&mut entries, key).map(|e| e.expires_at.saturating_duration_since(now)))
    }
}

impl LimitStore for MemoryStore {
    fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, CacheError> {
        let mut entries = self.entries.lock();
        if live_entry(&mut entries, key).is_some() {
            return Ok(false);
        }
        Self::put(&mut entries, key, value, ttl);
        Ok(true)
    }

    fn delete_if_equal(&self, key: &str, expected: &str) -> Result<bool, CacheError> {
        let mut entries = self.entries.lock();
        let owned = live_entry(&mut entries, key).is_some_and(|e| e.value == expected);
        if owned {
            entries.remove(key);
        }
        Ok(owned)
    }

    fn expire_if_equal(&self, key: &str, expected: &str, ttl: Duration) -> Result<bool, CacheError> {
        let mut entries = self.entries.lock();
        match live_entry(&mut entries, key) {
            Some(entry) if entry.value == expected => {
                entry.expires_at = Instant::now() + ttl;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn acquire_args(token: &str, millis: u64) -> Vec<String> {
        vec![token.to_string(), millis.to_string()]
    }

    #[test]
    fn test_acquire_script_sets_absent_key() {
        let store = MemoryStore::new();
        let reply = store.eval(LockScript::Acquire, "job:1", &acquire_args("aaa", 1000)).unwrap();
        assert!(reply.is_ok_status());
        assert_eq!(store.get("job:1").as_deref(), Some("aaa"));
    }

    #[test]
    fn test_acquire_script_refuses_other_owner() {
        let store = MemoryStore::new();
        store.eval(LockScript::Acquire, "job:1", &acquire_args("aaa", 1000)).unwrap();
        let reply = store.eval(LockScript::Acquire, "job:1", &acquire_args("bbb", 1000)).unwrap();
        assert_eq!(reply, ScriptReply::Nil);
        assert_eq!(store.get("job:1").as_deref(), Some("aaa"));
    }

    #[test]
    fn test_acquire_script_refreshes_own_expiry() {
        let store = MemoryStore::new();
        store.eval(LockScript::Acquire, "job:1", &acquire_args("aaa", 50)).unwrap();
        store.eval(LockScript::Acquire, "job:1", &acquire_args("aaa", 5000)).unwrap();
        let ttl = store.pttl("job:1").unwrap().unwrap();
        assert!(ttl > Duration::from_secs(4));
    }

    #[test]
    fn test_acquire_script_rejects_bad_expiry() {
        let store = MemoryStore::new();
        assert!(store.eval(LockScript::Acquire, "job:1", &acquire_args("aaa", 0)).is_err());
        let bad = vec!["aaa".to_string(), "soon".to_string()];
        assert!(store.eval(LockScript::Acquire, "job:1", &bad).is_err());
        assert!(store.eval(LockScript::Acquire, "job:1", &["aaa".to_string()]).is_err());
        assert!(store.get("job:1").is_none());
    }

    #[test]
    fn test_release_script_only_deletes_own_token() {
        let store = MemoryStore::new();
        store.eval(LockScript::Acquire, "job:1", &acquire_args("aaa", 1000)).unwrap();

        let reply = store.eval(LockScript::Release, "job:1", &["bbb".to_string()]).unwrap();
        assert_eq!(reply, ScriptReply::Int(0));
        assert_eq!(store.get("job:1").as_deref(), Some("aaa"));

        let reply = store.eval(LockScript::Release, "job:1", &["aaa".to_string()]).unwrap();
        assert_eq!(reply, ScriptReply::Int(1));
        assert!(store.get("job:1").is_none());
    }

    #[test]
    fn test_entries_expire() {
        let store = MemoryStore::new();
        store.eval(LockScript::Acquire, "job:1", &acquire_args("aaa", 30)).unwrap();
        thread::sleep(Duration::from_millis(60));
        assert!(store.get("job:1").is_none());
        assert!(store.pttl("job:1").unwrap().is_none());
        let reply = store.eval(LockScript::Acquire, "job:1", &acquire_args("bbb", 1000)).unwrap();
        assert!(reply.is_ok_status());
    }

    #[test]
    fn test_limit_operations_compare_values() {
        let store = MemoryStore::new();
        let ttl = Duration::from_secs(1);
        assert!(store.set_if_absent("limit:1", "v1", ttl).unwrap());
        assert!(!store.set_if_absent("limit:1", "v2", ttl).unwrap());
        assert!(!store.expire_if_equal("limit:1", "v2", ttl).unwrap());
        assert!(store.expire_if_equal("limit:1", "v1", ttl).unwrap());
        assert!(!store.delete_if_equal("limit:1", "v2").unwrap());
        assert!(store.delete_if_equal("limit:1", "v1").unwrap());
        assert!(!store.delete_if_equal("limit:1", "v1").unwrap());
    }
}
