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
use std::path::Path;
use log::warn;
use serde_yaml::Value;

#[derive(Debug, Clone)]
pub struct YamlValue(pub Value);

impl YamlValue {
    /// Parse YAML from a file
    pub fn from_file(file_path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(file_path)?;
        let value: Value = serde_yaml::from_str(&contents)?;
        Ok(YamlValue(value))
    }

    /// Parsing YAML from strings
    pub fn from_str(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let value: Value = serde_yaml::from_str(content)?;
        Ok(YamlValue(value))
    }

    /// Get field value
    pub fn get(&self, key: &str) -> Option<YamlValue> {
        let value = self.0.get(key).map(|v| YamlValue(v.clone()));
        if value.is_none() {
            warn!("Yaml parse Missing key: {}", key);
        }
        value
    }

    /// Walk a dotted path such as `lock.lease_ms`, warning on the first missing segment.
    pub fn get_nested(&self, key: &str) -> Option<YamlValue> {
        let value = self.lookup(key);
        if value.is_none() {
            warn!("Yaml parse Missing key: {}", key);
        }
        value
    }

    /// Same as [`YamlValue::get_nested`] but silent; used where a default applies.
    pub fn lookup(&self, key: &str) -> Option<YamlValue> {
        let mut current = &self.0;
        for k in key.split('.') {
            current = current.get(k)?;
        }
        Some(YamlValue(current.clone()))
    }

    /// Convert to string
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// Convert to ownership string
    pub fn as_string(&self) -> Option<String> {
        self.0.as_str().map(|s| s.to_string())
    }

    /// Convert to Boolean
    pub fn as_bool(&self) -> Option<bool> {
        self.0.as_bool()
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.0.as_u64()
    }
}

impl fmt::Display for YamlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        serde_yaml::to_string(&self.0)
            .map_err(|_| fmt::Error)
            .and_then(|s| write!(f, "{}", s))
    }
}

// macro definition
#[macro_export]
macro_rules! yaml_get {
    ($value:expr, $path:expr => str) => {{
        ($value).lookup($path).and_then(|v| v.as_string())
    }};
    ($value:expr, $path:expr => bool) => {{
        ($value).lookup($path).and_then(|v| v.as_bool())
    }};
    ($value:expr, $path:expr => u64) => {{
        ($value).lookup($path).and_then(|v| v.as_u64())
    }};
    ($value:expr, $path:expr => str, or $default:expr) => {{
        ($value)
            .lookup($path)
            .and_then(|v| v.as_string())
            .unwrap_or_else(|| $default.to_string())
    }};
    ($value:expr, $path:expr => bool, or $default:expr) => {{
        ($value).lookup($path).and_then(|v| v.as_bool()).unwrap_or($default)
    }};
    ($value:expr, $path:expr => u64, or $default:expr) => {{
        ($value).lookup($path).and_then(|v| v.as_u64()).unwrap_or($default)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
redis:
  url: "redis://127.0.0.1:6379/0"
lock:
  lease_ms: 3000
  enabled: true
"#;

    #[test]
    fn test_lookup_nested_values() {
        let yaml = YamlValue::from_str(SAMPLE).unwrap();
        assert_eq!(
            yaml.get_nested("redis.url").and_then(|v| v.as_string()),
            Some("redis://127.0.0.1:6379/0".to_string())
        );
        assert_eq!(yaml.lookup("lock.lease_ms").and_then(|v| v.as_u64()), Some(3000));
        assert!(yaml.lookup("lock.missing").is_none());
        assert!(yaml.lookup("nothing.here").is_none());
    }

    #[test]
    fn test_yaml_get_macro_with_defaults() {
        let yaml = YamlValue::from_str(SAMPLE).unwrap();
        assert_eq!(yaml_get!(&yaml, "lock.lease_ms" => u64, or 10), 3000);
        assert_eq!(yaml_get!(&yaml, "lock.retry_interval_ms" => u64, or 100), 100);
        assert!(yaml_get!(&yaml, "lock.enabled" => bool, or false));
        assert_eq!(yaml_get!(&yaml, "redis.url" => str), Some("redis://127.0.0.1:6379/0".to_string()));
        assert_eq!(yaml_get!(&yaml, "redis.name" => str, or "default"), "default");
    }

    #[test]
    fn test_from_file_reports_missing_file() {
        assert!(YamlValue::from_file("/definitely/not/here.yaml").is_err());
    }
}
