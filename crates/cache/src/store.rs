//! TTL key-value store abstraction.

use std::time::Duration;

use thiserror::Error;

/// Error surfaced by TTL store implementations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The backing store could not be reached or answered with a transport
    /// error. Callers decide whether this degrades or aborts the operation.
    #[error("shared store unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be encoded/decoded.
    #[error("encoding error: {0}")]
    Encoding(String),
}

/// A TTL-capable key-value store.
///
/// Implementations must expire entries on their own; callers never sweep.
/// All methods are cheap request/response round trips — no long-running calls.
pub trait TtlStore: Send + Sync {
    /// Store `value` under `key`, expiring after `ttl`.
    fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Fetch the value under `key`, or `None` if absent or expired.
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn del(&self, key: &str) -> Result<(), CacheError>;

    /// Check whether a live entry exists under `key`.
    fn exists(&self, key: &str) -> Result<bool, CacheError>;
}
