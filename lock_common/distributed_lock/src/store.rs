/*
 * Copyright (c) Huawei Technologies Co., Ltd. 2025. All rights reserved.
 * Global Trust Authority is licensed under the Mulan PSL v2.
 * You can use this software according to the terms and conditions of the Mulan PSL v2.
 * You may obtain a copy of Mulan PSL v2 at:
 *     http://license.coscl.org.cn/MulanPSL2
 * THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR
 * PURPOSE.
 * See the Mulan PSL v2 for more details.
 */

//! Store seams used by the lock and the limiter, and their Redis implementation

use std::time::Duration;
use cache::{CacheError, RedisClient};
#[cfg(test)]
use mockall::automock;
use redis::Value;
use crate::scripts::LockScript;

/// Reply of a lock script, reduced to the shapes the scripts can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptReply {
    Nil,
    Status(String),
    Int(i64),
}

impl ScriptReply {
    pub fn is_ok_status(&self) -> bool {
        matches!(self, ScriptReply::Status(s) if s == "OK")
    }
}

impl TryFrom<Value> for ScriptReply {
    type Error = CacheError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Nil => Ok(ScriptReply::Nil),
            Value::Okay => Ok(ScriptReply::Status("OK".to_string())),
            Value::Status(s) => Ok(ScriptReply::Status(s)),
            Value::Data(bytes) => Ok(ScriptReply::Status(String::from_utf8_lossy(&bytes).into_owned())),
            Value::Int(n) => Ok(ScriptReply::Int(n)),
            other => Err(CacheError::UnexpectedReply(format!("{:?}", other))),
        }
    }
}

/// Key-value store able to run the lock scripts atomically.
///
/// Implementations must execute each script as one indivisible step relative to
/// every other operation on the same key.
#[cfg_attr(test, automock)]
pub trait LockStore: Send + Sync {
    /// Run `script` with `key` as `KEYS[1]` and `args` as `ARGV`.
    fn eval(&self, script: LockScript, key: &str, args: &[String]) -> Result<ScriptReply, CacheError>;

    /// Remaining expiry of `key`; `None` when absent or persistent.
    fn pttl(&self, key: &str) -> Result<Option<Duration>, CacheError>;
}

/// Key-value store offering the compare-then-write operations of [`crate::UniqueLimiter`].
pub trait LimitStore: Send + Sync {
    fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, CacheError>;

    fn delete_if_equal(&self, key: &str, expected: &str) -> Result<bool, CacheError>;

    fn expire_if_equal(&self, key: &str, expected: &str, ttl: Duration) -> Result<bool, CacheError>;
}

impl LockStore for RedisClient {
    fn eval(&self, script: LockScript, key: &str, args: &[String]) -> Result<ScriptReply, CacheError> {
        let reply = self.invoke_script(script.redis_script(), key, args)?;
        ScriptReply::try_from(reply)
    }

    fn pttl(&self, key: &str) -> Result<Option<Duration>, CacheError> {
        let millis = RedisClient::pttl(self, key)?;
        Ok(u64::try_from(millis).ok().map(Duration::from_millis))
    }
}

impl LimitStore for RedisClient {
    fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, CacheError> {
        self.set_px(key, value, ttl, true)
    }

    fn delete_if_equal(&self, key: &str, expected: &str) -> Result<bool, CacheError> {
        self.compare_and_delete(key, expected)
    }

    fn expire_if_equal(&self, key: &str, expected: &str, ttl: Duration) -> Result<bool, CacheError> {
        self.compare_and_pexpire(key, expected, ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_from_redis_value() {
        assert_eq!(ScriptReply::try_from(Value::Nil).unwrap(), ScriptReply::Nil);
        assert!(ScriptReply::try_from(Value::Okay).unwrap().is_ok_status());
        assert!(ScriptReply::try_from(Value::Status("OK".to_string())).unwrap().is_ok_status());
        assert!(ScriptReply::try_from(Value::Data(b"OK".to_vec())).unwrap().is_ok_status());
        assert_eq!(ScriptReply::try_from(Value::Int(1)).unwrap(), ScriptReply::Int(1));
    }

    #[test]
    fn test_reply_rejects_arrays() {
        let result = ScriptReply::try_from(Value::Bulk(vec![Value::Int(1)]));
        assert!(matches!(result, Err(CacheError::UnexpectedReply(_))));
    }

    #[test]
    fn test_non_ok_status_is_not_ok() {
        assert!(!ScriptReply::Status("QUEUED".to_string()).is_ok_status());
        assert!(!ScriptReply::Int(1).is_ok_status());
        assert!(!ScriptReply::Nil.is_ok_status());
    }
}
