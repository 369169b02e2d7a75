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

use serde::Deserialize;
use std::path::PathBuf;

pub const ROOT_PREFIX: &str = "root";

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Base directory for every logger's `log_directory`; falls back to `LOG_OUTPUT_DIR`, then `.`
    #[serde(default)]
    pub output_dir: Option<String>,
    pub loggers: Vec<LoggerConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggerConfig {
    pub path_prefix: String,
    pub log_directory: String,
    pub log_file_name: String,
    pub max_file_size: u64,
    pub max_zip_count: u32,
    pub level: String,
    /// Only honoured on the root entry
    #[serde(default)]
    pub console: bool,
}

impl LogConfig {
    pub fn from_yaml(path: impl Into<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let config_str = std::fs::read_to_string(path.into())?;
        Self::from_yaml_str(&config_str)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: LogConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn get_logger_config(&self, path_prefix: &str) -> Option<&LoggerConfig> {
        self.loggers.iter().find(|l| path_prefix.starts_with(&l.path_prefix))
    }

    pub fn get_root_config(&self) -> Option<&LoggerConfig> {
        self.loggers.iter().find(|l| l.path_prefix == ROOT_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_config() {
        let yaml = r#"
loggers:
  - path_prefix: root
    log_directory: logs
    log_file_name: lock.log
    max_file_size: 10485760
    max_zip_count: 6
    level: info
    console: true
  - path_prefix: distributed_lock
    log_directory: logs
    log_file_name: distributed_lock.log
    max_file_size: 10485760
    max_zip_count: 6
    level: debug
"#;
        let config = LogConfig::from_yaml_str(yaml).unwrap();
        assert!(config.output_dir.is_none());
        assert_eq!(config.loggers.len(), 2);

        let root = config.get_root_config().unwrap();
        assert!(root.console);
        assert_eq!(root.log_file_name, "lock.log");

        let lock = config.get_logger_config("distributed_lock::lock").unwrap();
        assert_eq!(lock.level, "debug");
        assert!(!lock.console);
    }
}
