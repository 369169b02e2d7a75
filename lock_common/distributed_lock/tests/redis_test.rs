//! Runs against a live Redis: `REDIS_URL=redis://127.0.0.1:6379 cargo test -- --ignored`

use std::sync::Arc;
use std::time::Duration;

use cache::{RedisClient, RedisConfig};
use distributed_lock::{Lock, LockOptions, UniqueLimiter};

fn connect() -> RedisClient {
    let config = RedisConfig::from_env().expect("REDIS_URL must be set for redis tests");
    RedisClient::connect(config).expect("redis must be reachable")
}

#[test]
#[ignore]
fn test_redis_lock_lifecycle() {
    let client = Arc::new(connect());
    let key = format!("test:lock:{}", distributed_lock::lock::generate_token());
    let a = Lock::new(client.clone(), key.clone(), LockOptions::default().with_lease_duration(Duration::from_secs(1))).unwrap();
    let b = Lock::new(client, key, LockOptions::default()).unwrap();

    assert!(a.acquire().unwrap());
    assert!(a.acquire().unwrap());
    assert!(!b.acquire().unwrap());

    let remaining = a.remaining_lease().unwrap().unwrap();
    assert!(remaining <= Duration::from_millis(1500));

    assert!(a.release().unwrap());
    assert!(b.acquire().unwrap());
    assert!(b.release().unwrap());
    assert!(!a.release().unwrap());
    assert!(a.remaining_lease().unwrap().is_none());
}

#[test]
#[ignore]
fn test_redis_limiter_transactions() {
    let client = Arc::new(connect());
    let limiter = UniqueLimiter::with_expiry(client, Duration::from_secs(5));
    let key = format!("test:limit:{}", distributed_lock::lock::generate_token());

    assert!(limiter.set_limit(&key, "a").unwrap());
    assert!(!limiter.set_limit(&key, "b").unwrap());
    assert!(limiter.refresh_limit(&key, "b").is_err());
    limiter.refresh_limit(&key, "a").unwrap();
    assert!(limiter.delete_limit(&key, "b").is_err());
    limiter.delete_limit(&key, "a").unwrap();
}
