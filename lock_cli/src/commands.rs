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
use clap::{Args, Subcommand};
use distributed_lock::LockOptions;

#[derive(Subcommand)]
pub enum LockCommands {
    /// Check that Redis answers PING
    Ping,

    /// Acquire a lock, hold it for a while, then release it
    Run {
        /// Resource key to lock
        #[clap(short, long)]
        key: String,

        #[clap(flatten)]
        policy: PolicyArgs,

        /// How long to hold the lock before releasing it (milliseconds)
        #[clap(long, default_value_t = 1000)]
        hold_ms: u64,
    },

    /// Show the remaining lease of a resource key
    Ttl {
        /// Resource key to inspect
        #[clap(short, long)]
        key: String,
    },
}

/// Overrides for the `lock` section of the config file
#[derive(Args, Debug, Default)]
pub struct PolicyArgs {
    /// Lease duration (milliseconds)
    #[clap(long)]
    pub lease_ms: Option<u64>,

    /// Maximum time to wait for the lock (milliseconds), 0 tries once
    #[clap(long)]
    pub wait_ms: Option<u64>,

    /// Pause between attempts while waiting (milliseconds)
    #[clap(long)]
    pub retry_ms: Option<u64>,
}

impl PolicyArgs {
    pub fn apply(&self, mut options: LockOptions) -> LockOptions {
        if let Some(ms) = self.lease_ms {
            options = options.with_lease_duration(Duration::from_millis(ms));
        }
        if let Some(ms) = self.wait_ms {
            options = options.with_wait_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.retry_ms {
            options = options.with_retry_interval(Duration::from_millis(ms));
        }
        options.normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_args_override_only_given_values() {
        let base = LockOptions::default().with_wait_timeout(Duration::from_secs(3));
        let args = PolicyArgs {
            lease_ms: Some(2000),
            wait_ms: None,
            retry_ms: Some(0),
        };
        let options = args.apply(base);
        assert_eq!(options.lease_duration, Duration::from_secs(2));
        assert_eq!(options.wait_timeout, Duration::from_secs(3));
        assert_eq!(options.retry_interval, Duration::from_millis(100));
    }
}
