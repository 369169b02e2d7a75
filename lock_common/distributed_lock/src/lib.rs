//! Distributed lock module, providing a single-owner lease lock on top of Redis
//!
//! Ownership of a resource key is decided entirely by two server-side scripts
//! (see [`scripts`]): acquire sets the key to the handle's token when the key
//! is absent or already holds that token, release deletes it only while it
//! still holds that token. Waiting is cooperative polling on the client.

pub mod error;
pub mod guard;
pub mod limiter;
pub mod lock;
pub mod memory;
pub mod options;
pub mod scripts;
pub mod store;

pub use error::{DistributedLockError, Result};
pub use guard::LockGuard;
pub use limiter::UniqueLimiter;
pub use lock::Lock;
pub use memory::MemoryStore;
pub use options::LockOptions;
pub use scripts::LockScript;
pub use store::{LimitStore, LockStore, ScriptReply};
