use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis connect error: {0}")]
    ConnectionError(#[from] redis::RedisError),

    #[error("Redis did not answer within {0:?}")]
    Timeout(std::time::Duration),

    #[error("Redis returned an unexpected reply: {0}")]
    UnexpectedReply(String),

    #[error("Redis configuration error: {0}")]
    ConfigError(String),
}
