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
use log::{error, info};
use redis::Client;
use crate::config::RedisConfig;
use crate::error::CacheError;

/// Handle to one Redis deployment.
///
/// The client is created by the caller and handed to whatever needs it; there is
/// no process-wide registry. Cloning is cheap and every operation opens its own
/// connection from the underlying `redis::Client`.
#[derive(Clone, Debug)]
pub struct RedisClient {
    pub(crate) client: Client,
    pub(crate) config: RedisConfig,
}

impl RedisClient {
    /// Open a client without touching the network.
    ///
    /// # Errors
    /// * `CacheError::ConnectionError` - If the URL cannot be parsed.
    pub fn open(config: RedisConfig) -> Result<Self, CacheError> {
        let client = Client::open(config.url.as_str()).map_err(|e| {
            // The URL may carry credentials, so it is never logged
            error!("Failed to open Redis client: {}", e);
            CacheError::ConnectionError(e)
        })?;
        Ok(Self { client, config })
    }

    /// Open a client and verify connectivity with a single PING bounded by
    /// `config.connect_timeout`.
    ///
    /// # Errors
    /// * `CacheError::Timeout` - If Redis does not answer in time.
    /// * `CacheError::ConnectionError` - On any other connection failure.
    pub fn connect(config: RedisConfig) -> Result<Self, CacheError> {
        let timeout = config.connect_timeout;
        let client = Self::open(config)?;
        client.ping(timeout)?;
        info!("Redis connection established");
        Ok(client)
    }

    pub fn config(&self) -> &RedisConfig {
        &self.config
    }

    pub(crate) fn connection(&self) -> Result<redis::Connection, CacheError> {
        self.client.get_connection().map_err(CacheError::ConnectionError)
    }

    pub(crate) fn connection_with_timeout(&self, timeout: Duration) -> Result<redis::Connection, CacheError> {
        self.client
            .get_connection_with_timeout(timeout)
            .map_err(|e| map_timeout(e, timeout))
    }
}

pub(crate) fn map_timeout(e: redis::RedisError, timeout: Duration) -> CacheError {
    if e.is_timeout() {
        CacheError::Timeout(timeout)
    } else {
        CacheError::ConnectionError(e)
    }
}
