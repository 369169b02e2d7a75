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

//! De-duplication keys with a fixed expiry.
//!
//! A limit marks "this unit of work is already being handled" for a short
//! while. Unlike [`crate::Lock`] there is no waiting and no lease tolerance;
//! delete and refresh run as watched transactions on Redis.

use std::sync::Arc;
use std::time::Duration;
use log::{debug, warn};
use super::error::{DistributedLockError, Result};
use super::store::LimitStore;

pub const DEFAULT_LIMIT_EXPIRY: Duration = Duration::from_secs(15);

pub struct UniqueLimiter {
    store: Arc<dyn LimitStore>,
    expiry: Duration,
}

impl UniqueLimiter {
    pub fn new(store: Arc<dyn LimitStore>) -> Self {
        Self::with_expiry(store, DEFAULT_LIMIT_EXPIRY)
    }

    pub fn with_expiry(store: Arc<dyn LimitStore>, expiry: Duration) -> Self {
        let expiry = if expiry.is_zero() { DEFAULT_LIMIT_EXPIRY } else { expiry };
        Self { store, expiry }
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Claim `key` with `value` if nobody holds it.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the limit was created, `Ok(false)` if it already existed.
    pub fn set_limit(&self, key: &str, value: &str) -> Result<bool> {
        let created = self.store.set_if_absent(key, value, self.expiry)?;
        debug!("set limit {} -> {}", key, created);
        Ok(created)
    }

    /// Remove the limit if it still holds `value`.
    ///
    /// # Errors
    ///
    /// * `DistributedLockError::LimitMismatch` - If the stored value differs or the limit expired.
    pub fn delete_limit(&self, key: &str, value: &str) -> Result<()> {
        if self.store.delete_if_equal(key, value)? {
            Ok(())
        } else {
            warn!("Limit {} is not held with the expected value, not deleted", key);
            Err(DistributedLockError::LimitMismatch { key: key.to_string() })
        }
    }

    /// Push the limit's expiry back to the full duration if it still holds `value`.
    ///
    /// # Errors
    ///
    /// * `DistributedLockError::LimitMismatch` - If the stored value differs or the limit expired.
    pub fn refresh_limit(&self, key: &str, value: &str) -> Result<()> {
        if self.store.expire_if_equal(key, value, self.expiry)? {
            Ok(())
        } else {
            warn!("Limit {} is not held with the expected value, not refreshed", key);
            Err(DistributedLockError::LimitMismatch { key: key.to_string() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use std::thread;

    #[test]
    fn test_zero_expiry_uses_default() {
        let limiter = UniqueLimiter::with_expiry(Arc::new(MemoryStore::new()), Duration::ZERO);
        assert_eq!(limiter.expiry(), DEFAULT_LIMIT_EXPIRY);
    }

    #[test]
    fn test_set_limit_is_exclusive() {
        let limiter = UniqueLimiter::new(Arc::new(MemoryStore::new()));
        assert!(limiter.set_limit("order:7", "worker-a").unwrap());
        assert!(!limiter.set_limit("order:7", "worker-b").unwrap());
    }

    #[test]
    fn test_delete_limit_requires_matching_value() {
        let store = Arc::new(MemoryStore::new());
        let limiter = UniqueLimiter::new(store.clone());
        limiter.set_limit("order:7", "worker-a").unwrap();

        let err = limiter.delete_limit("order:7", "worker-b").unwrap_err();
        assert!(matches!(err, DistributedLockError::LimitMismatch { .. }));
        assert_eq!(store.get("order:7").as_deref(), Some("worker-a"));

        limiter.delete_limit("order:7", "worker-a").unwrap();
        assert!(store.get("order:7").is_none());
    }

    #[test]
    fn test_refresh_limit_extends_expiry() {
        let store = Arc::new(MemoryStore::new());
        let limiter = UniqueLimiter::with_expiry(store.clone(), Duration::from_millis(120));
        limiter.set_limit("order:7", "worker-a").unwrap();

        thread::sleep(Duration::from_millis(80));
        limiter.refresh_limit("order:7", "worker-a").unwrap();
        thread::sleep(Duration::from_millis(80));
        assert_eq!(store.get("order:7").as_deref(), Some("worker-a"));

        assert!(limiter.refresh_limit("order:7", "worker-b").is_err());
    }

    #[test]
    fn test_expired_limit_cannot_be_deleted() {
        let limiter = UniqueLimiter::with_expiry(Arc::new(MemoryStore::new()), Duration::from_millis(20));
        limiter.set_limit("order:7", "worker-a").unwrap();
        thread::sleep(Duration::from_millis(50));
        assert!(limiter.delete_limit("order:7", "worker-a").is_err());
        assert!(limiter.set_limit("order:7", "worker-b").unwrap());
    }
}
