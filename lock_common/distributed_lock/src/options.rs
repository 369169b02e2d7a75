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
use env_config_parse::{yaml_get, YamlValue};

/// Lease applied when none (or zero) is configured
pub const DEFAULT_LEASE_DURATION: Duration = Duration::from_secs(10);
/// Pause between two acquisition attempts when none (or zero) is configured
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(100);
/// Added on top of the lease when writing the key's expiry, to absorb clock and network skew
pub const LEASE_TOLERANCE: Duration = Duration::from_millis(500);

/// Lease and wait policy of a [`crate::Lock`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOptions {
    /// How long the key survives if its owner never releases it
    pub lease_duration: Duration,
    /// Total time `acquire_with_wait` may poll; zero means a single attempt
    pub wait_timeout: Duration,
    /// Sleep between two polling attempts
    pub retry_interval: Duration,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            lease_duration: DEFAULT_LEASE_DURATION,
            wait_timeout: Duration::ZERO,
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }
}

impl LockOptions {
    pub fn with_lease_duration(mut self, lease_duration: Duration) -> Self {
        self.lease_duration = lease_duration;
        self
    }

    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    pub fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    /// Replace zero lease and retry interval with their defaults.
    pub fn normalized(mut self) -> Self {
        if self.lease_duration.is_zero() {
            self.lease_duration = DEFAULT_LEASE_DURATION;
        }
        if self.retry_interval.is_zero() {
            self.retry_interval = DEFAULT_RETRY_INTERVAL;
        }
        self
    }

    /// Expiry written with the token: lease plus [`LEASE_TOLERANCE`].
    pub fn expiry(&self) -> Duration {
        self.lease_duration.saturating_add(LEASE_TOLERANCE)
    }

    /// Reads `lock.lease_ms`, `lock.wait_timeout_ms` and `lock.retry_interval_ms`.
    ///
    /// Missing values keep their defaults; the result is normalized.
    pub fn from_yaml(yaml: &YamlValue) -> Self {
        let defaults = Self::default();
        let millis = |d: Duration| u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
        Self {
            lease_duration: Duration::from_millis(
                yaml_get!(yaml, "lock.lease_ms" => u64, or millis(defaults.lease_duration)),
            ),
            wait_timeout: Duration::from_millis(
                yaml_get!(yaml, "lock.wait_timeout_ms" => u64, or millis(defaults.wait_timeout)),
            ),
            retry_interval: Duration::from_millis(
                yaml_get!(yaml, "lock.retry_interval_ms" => u64, or millis(defaults.retry_interval)),
            ),
        }
        .normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = LockOptions::default();
        assert_eq!(options.lease_duration, Duration::from_secs(10));
        assert_eq!(options.retry_interval, Duration::from_millis(100));
        assert!(options.wait_timeout.is_zero());
        assert_eq!(options.expiry(), Duration::from_millis(10_500));
    }

    #[test]
    fn test_normalized_replaces_zero_values() {
        let options = LockOptions::default()
            .with_lease_duration(Duration::ZERO)
            .with_retry_interval(Duration::ZERO)
            .with_wait_timeout(Duration::from_secs(2))
            .normalized();
        assert_eq!(options.lease_duration, DEFAULT_LEASE_DURATION);
        assert_eq!(options.retry_interval, DEFAULT_RETRY_INTERVAL);
        assert_eq!(options.wait_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_expiry_saturates() {
        let options = LockOptions::default().with_lease_duration(Duration::MAX);
        assert_eq!(options.expiry(), Duration::MAX);
    }

    #[test]
    fn test_from_yaml() {
        let yaml = YamlValue::from_str(
            "lock:\n  lease_ms: 1000\n  wait_timeout_ms: 3000\n  retry_interval_ms: 0\n",
        )
        .unwrap();
        let options = LockOptions::from_yaml(&yaml);
        assert_eq!(options.lease_duration, Duration::from_secs(1));
        assert_eq!(options.wait_timeout, Duration::from_secs(3));
        assert_eq!(options.retry_interval, DEFAULT_RETRY_INTERVAL);
    }

    #[test]
    fn test_from_yaml_without_section() {
        let yaml = YamlValue::from_str("redis:\n  url: redis://localhost\n").unwrap();
        assert_eq!(LockOptions::from_yaml(&yaml), LockOptions::default());
    }
}
