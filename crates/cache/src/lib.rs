//! `sentra-cache` — shared TTL key-value store and the token cache/denylist pair.
//!
//! The backing store is a plain TTL key-value abstraction; the token-specific
//! namespacing (positive claims cache vs. jti denylist) lives in
//! [`TokenCache`]. An outage of the backing store must degrade the service,
//! never crash it.

pub mod in_memory;
#[cfg(feature = "redis")]
pub mod redis_store;
pub mod store;
pub mod token_cache;

pub use in_memory::InMemoryTtlStore;
#[cfg(feature = "redis")]
pub use redis_store::RedisTtlStore;
pub use store::{CacheError, TtlStore};
pub use token_cache::TokenCache;
