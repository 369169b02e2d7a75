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

use log::{error, warn};

use super::error::Result;
use super::Lock;

/// Held lock that is released when the guard goes out of scope.
///
/// Obtained from [`Lock::acquire_guard`]. Dropping the guard cannot report a
/// lost lock to the caller, so prefer [`LockGuard::release`] where that matters.
#[derive(Debug)]
pub struct LockGuard<'a> {
    lock: &'a Lock,
    released: bool,
}

impl<'a> LockGuard<'a> {
    pub(crate) fn new(lock: &'a Lock) -> Self {
        Self { lock, released: false }
    }

    pub fn lock(&self) -> &Lock {
        self.lock
    }

    /// Release now and report whether the lock was still held.
    ///
    /// # Errors
    ///
    /// * `DistributedLockError::LockNotHeld` - If the lease expired and the key moved on.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.lock.release_strict()
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match self.lock.release() {
            Ok(true) => {}
            Ok(false) => warn!("Lock {} was lost before its guard was dropped", self.lock.key()),
            Err(e) => error!("Failed to release lock {}: {}", self.lock.key(), e),
        }
    }
}
