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

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use cache::operations::duration_millis;
use log::{debug, info, warn};
use rand::distributions::Alphanumeric;
use rand::Rng;
use super::error::{DistributedLockError, Result};
use super::guard::LockGuard;
use super::options::LockOptions;
use super::scripts::LockScript;
use super::store::{LockStore, ScriptReply};

/// Length of the per-handle ownership token
pub const TOKEN_LEN: usize = 16;

/// Random alphanumeric token identifying one lock handle.
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Distributed Lock Structure
///
/// One handle owns one resource key and one token for its whole life. The
/// handle is meant to be driven by a single caller at a time; several handles
/// (in any number of processes) compete for the key through the store.
pub struct Lock {
    /// Lock key name
    key: String,
    /// Lock value, used to identify the lock owner
    token: String,
    options: LockOptions,
    store: Arc<dyn LockStore>,
}

impl fmt::Debug for Lock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lock")
            .field("key", &self.key)
            .field("token", &self.token)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Lock {
    /// Create a new distributed lock instance
    ///
    /// # Arguments
    ///
    /// * `store` - Store the lock scripts run against
    /// * `key` - Lock key name
    /// * `options` - Lease and wait policy; zero lease and retry values are replaced by defaults
    ///
    /// # Errors
    ///
    /// * `DistributedLockError::InvalidArgument` - If `key` is empty.
    pub fn new(store: Arc<dyn LockStore>, key: impl Into<String>, options: LockOptions) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(DistributedLockError::InvalidArgument("lock key must not be empty".to_string()));
        }
        Ok(Self {
            key,
            token: generate_token(),
            options: options.normalized(),
            store,
        })
    }

    /// Make one acquisition attempt.
    ///
    /// Succeeds when the key was absent or already held by this handle; in the
    /// latter case the expiry is pushed out again.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if this handle holds the lock, `Ok(false)` if another owner does.
    ///
    /// # Errors
    ///
    /// * `DistributedLockError::Transport` - If the store call failed.
    pub fn acquire(&self) -> Result<bool> {
        let expiry_ms = duration_millis(self.options.expiry());
        let args = [self.token.clone(), expiry_ms.to_string()];
        let reply = self.store.eval(LockScript::Acquire, &self.key, &args)?;
        let acquired = reply.is_ok_status();
        debug!("acquire {} -> {:?}", self.key, reply);
        Ok(acquired)
    }

    /// Acquire the lock, polling every `retry_interval` until `wait_timeout` runs out.
    ///
    /// With a zero `wait_timeout` exactly one attempt is made. A failed store
    /// call counts as a failed attempt. No sleep is started once the time left
    /// before the deadline is shorter than one retry interval.
    ///
    /// # Errors
    ///
    /// * `DistributedLockError::LockUnavailable` - If the lock was not obtained in time.
    pub fn acquire_with_wait(&self) -> Result<()> {
        let start = Instant::now();
        let deadline = start.checked_add(self.options.wait_timeout);
        let mut attempts: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);
            match self.acquire() {
                Ok(true) => {
                    info!("Acquired lock {} after {} attempt(s)", self.key, attempts);
                    return Ok(());
                }
                Ok(false) => debug!("Lock {} is held by another owner (attempt {})", self.key, attempts),
                Err(e) => warn!("Failed to acquire lock {} (attempt {}): {}", self.key, attempts, e),
            }

            if self.options.wait_timeout.is_zero() {
                break;
            }
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => Duration::MAX,
            };
            if remaining < self.options.retry_interval {
                break;
            }
            thread::sleep(self.options.retry_interval);
        }

        Err(DistributedLockError::LockUnavailable {
            key: self.key.clone(),
            attempts,
            waited: start.elapsed(),
        })
    }

    /// Wait for the lock like [`Lock::acquire_with_wait`] and return a guard that
    /// releases it when dropped.
    pub fn acquire_guard(&self) -> Result<LockGuard<'_>> {
        self.acquire_with_wait()?;
        Ok(LockGuard::new(self))
    }

    /// Release the lock
    ///
    /// Deletes the key only while it still holds this handle's token.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the key was deleted, `Ok(false)` if this handle no longer
    /// owned it (never acquired, already released, or expired and taken over).
    pub fn release(&self) -> Result<bool> {
        let args = [self.token.clone()];
        let reply = self.store.eval(LockScript::Release, &self.key, &args)?;
        let released = reply == ScriptReply::Int(1);
        if released {
            info!("Released lock {}", self.key);
        } else {
            warn!("Lock {} was not held by this owner at release", self.key);
        }
        Ok(released)
    }

    /// Release the lock, reporting a lost lock as an error.
    ///
    /// # Errors
    ///
    /// * `DistributedLockError::LockNotHeld` - If the token no longer matched.
    pub fn release_strict(&self) -> Result<()> {
        if self.release()? {
            Ok(())
        } else {
            Err(DistributedLockError::LockNotHeld { key: self.key.clone() })
        }
    }

    /// Remaining expiry of the key, whoever holds it; `None` when the key is absent.
    pub fn remaining_lease(&self) -> Result<Option<Duration>> {
        Ok(self.store.pttl(&self.key)?)
    }

    /// Get lock key name
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get lock owner token
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn options(&self) -> &LockOptions {
        &self.options
    }
}
