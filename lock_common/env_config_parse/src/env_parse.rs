use std::env;
use std::str::FromStr;
use log::{debug, warn};

/// Read an environment variable, treating unset and blank values the same.
pub fn get_env_value(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        Ok(_) => {
            debug!("environment variable {} is blank", key);
            None
        }
        Err(_) => {
            debug!("environment variable {} is not set", key);
            None
        }
    }
}

/// Read and parse an environment variable, falling back to `default` when it is
/// unset or cannot be parsed.
pub fn get_env_or<T: FromStr>(key: &str, default: T) -> T {
    match get_env_value(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("environment variable {} has invalid value '{}', using default", key, raw);
            default
        }),
        None => default,
    }
}
