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
use cache::CacheError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DistributedLockError {
    /// The store could not be reached or answered with a protocol failure
    #[error("Redis operation failed: {0}")]
    Transport(#[from] CacheError),

    #[error("Lock {key} unavailable after {attempts} attempt(s) in {waited:?}")]
    LockUnavailable {
        key: String,
        attempts: u32,
        waited: Duration,
    },

    /// The stored token no longer matches; the critical section may have overlapped another owner
    #[error("Lock {key} is not held by this owner")]
    LockNotHeld { key: String },

    #[error("Limit {key} does not hold the expected value")]
    LimitMismatch { key: String },

    #[error("Parameter error: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, DistributedLockError>;
