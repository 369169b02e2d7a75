//! Redis access used by the distributed lock: explicit client construction,
//! connectivity check, script evaluation and watched transactions.

pub mod client;
pub mod config;
pub mod error;
pub mod operations;

pub use client::RedisClient;
pub use config::RedisConfig;
pub use error::CacheError;
