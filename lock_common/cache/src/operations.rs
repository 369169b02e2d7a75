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

use std::time::Duration;
use redis::{Commands, Script, Value};
use crate::client::{map_timeout, RedisClient};
use crate::error::CacheError;

impl RedisClient {
    /// Sends a single PING, bounding connect, read and write by `timeout`.
    ///
    /// # Errors
    /// * `CacheError::Timeout` - If Redis does not answer in time.
    /// * `CacheError::UnexpectedReply` - If the reply is not `PONG`.
    pub fn ping(&self, timeout: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection_with_timeout(timeout)?;
        conn.set_read_timeout(Some(timeout)).map_err(CacheError::ConnectionError)?;
        conn.set_write_timeout(Some(timeout)).map_err(CacheError::ConnectionError)?;
        let reply: String = redis::cmd("PING")
            .query(&mut conn)
            .map_err(|e| map_timeout(e, timeout))?;
        if reply != "PONG" {
            return Err(CacheError::UnexpectedReply(reply));
        }
        Ok(())
    }

    /// Runs a Lua script atomically against one key.
    ///
    /// Uses EVALSHA and falls back to EVAL when the script is not cached yet.
    ///
    /// # Arguments
    ///
    /// * `script` - The prepared script.
    /// * `key` - Passed as `KEYS[1]`.
    /// * `args` - Passed as `ARGV[1..]`.
    ///
    /// # Returns
    ///
    /// The raw reply, left for the caller to interpret.
    pub fn invoke_script(&self, script: &Script, key: &str, args: &[String]) -> Result<Value, CacheError> {
        let mut conn = self.connection()?;
        script
            .key(key)
            .arg(args)
            .invoke(&mut conn)
            .map_err(CacheError::ConnectionError)
    }

    /// Remaining time to live of a key in milliseconds.
    ///
    /// Follows the PTTL convention: `-2` when the key does not exist, `-1` when it
    /// has no expiry.
    pub fn pttl(&self, key: &str) -> Result<i64, CacheError> {
        let mut conn = self.connection()?;
        redis::cmd("PTTL")
            .arg(key)
            .query(&mut conn)
            .map_err(CacheError::ConnectionError)
    }

    /// `SET key value PX ttl`, with `NX` when `only_if_absent` is set.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the value was written, `Ok(false)` if `NX` prevented it.
    pub fn set_px(&self, key: &str, value: &str, ttl: Duration, only_if_absent: bool) -> Result<bool, CacheError> {
        let mut conn = self.connection()?;
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if only_if_absent {
            cmd.arg("NX");
        }
        cmd.arg("PX").arg(duration_millis(ttl));
        let reply: Option<String> = cmd.query(&mut conn).map_err(CacheError::ConnectionError)?;
        Ok(reply.is_some())
    }

    /// Deletes `key` only while it still holds `expected`, inside a WATCH/MULTI
    /// transaction that is retried if the key changes concurrently.
    ///
    /// # Returns
    ///
    /// `Ok(false)` if the stored value differs or the key is absent.
    pub fn compare_and_delete(&self, key: &str, expected: &str) -> Result<bool, CacheError> {
        let mut conn = self.connection()?;
        redis::transaction(&mut conn, &[key], |con, pipe| {
            let current: Option<String> = con.get(key)?;
            if current.as_deref() != Some(expected) {
                return Ok(Some(false));
            }
            let reply: Option<(i64,)> = pipe.del(key).query(con)?;
            Ok(reply.map(|(removed,)| removed == 1))
        })
        .map_err(CacheError::ConnectionError)
    }

    /// Resets the expiry of `key` to `ttl` only while it still holds `expected`,
    /// inside a WATCH/MULTI transaction.
    pub fn compare_and_pexpire(&self, key: &str, expected: &str, ttl: Duration) -> Result<bool, CacheError> {
        let mut conn = self.connection()?;
        let millis = duration_millis(ttl) as usize;
        redis::transaction(&mut conn, &[key], |con, pipe| {
            let current: Option<String> = con.get(key)?;
            if current.as_deref() != Some(expected) {
                return Ok(Some(false));
            }
            let reply: Option<(i64,)> = pipe.pexpire(key, millis).query(con)?;
            Ok(reply.map(|(updated,)| updated == 1))
        })
        .map_err(CacheError::ConnectionError)
    }
}

/// Whole milliseconds, at least one, since Redis rejects a zero PX.
pub fn duration_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}
