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

//! Redis connection settings, loaded from the environment or a YAML document

use std::time::Duration;
use env_config_parse::env_parse::{get_env_or, get_env_value};
use env_config_parse::{yaml_get, YamlValue};
use log::{error, info};
use crate::error::CacheError;

pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    /// Redis connection URL, e.g. `redis://127.0.0.1:6379/0`
    pub url: String,
    /// Upper bound for opening the connection and the initial PING
    pub connect_timeout: Duration,
}

impl RedisConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
        }
    }

    /// Loads Redis configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first when present.
    /// `REDIS_URL` is required; `REDIS_CONNECT_TIMEOUT_MS` defaults to 5000.
    ///
    /// # Errors
    ///
    /// * `CacheError::ConfigError` - If `REDIS_URL` is missing or blank.
    pub fn from_env() -> Result<Self, CacheError> {
        if let Ok(path) = dotenv::dotenv() {
            info!("load .env file: {}", path.display());
        }
        let url = get_env_value("REDIS_URL").ok_or_else(|| {
            error!("REDIS_URL environment variable not set");
            CacheError::ConfigError("REDIS_URL environment variable not set".to_string())
        })?;
        let timeout_ms = get_env_or("REDIS_CONNECT_TIMEOUT_MS", DEFAULT_CONNECT_TIMEOUT_MS);
        Ok(Self {
            url,
            connect_timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// Loads Redis configuration from the `redis` section of a YAML document.
    ///
    /// # Errors
    ///
    /// * `CacheError::ConfigError` - If `redis.url` is missing.
    pub fn from_yaml(yaml: &YamlValue) -> Result<Self, CacheError> {
        let url = yaml_get!(yaml, "redis.url" => str)
            .ok_or_else(|| CacheError::ConfigError("redis.url is not configured".to_string()))?;
        let timeout_ms = yaml_get!(yaml, "redis.connect_timeout_ms" => u64, or DEFAULT_CONNECT_TIMEOUT_MS);
        Ok(Self {
            url,
            connect_timeout: Duration::from_millis(timeout_ms),
        })
    }
}
