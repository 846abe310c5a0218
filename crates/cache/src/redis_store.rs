//! Redis-backed TTL store (optional).
//!
//! Note: connections are opened per call; for the request rates this service
//! sees, connection setup is dwarfed by the round trip itself. A pooled
//! connection manager can be swapped in behind the same trait later.

use std::time::Duration;

use redis::Commands;

use crate::store::{CacheError, TtlStore};

/// Redis-backed [`TtlStore`] speaking a Redis-compatible wire protocol.
#[derive(Debug, Clone)]
pub struct RedisTtlStore {
    client: redis::Client,
}

impl RedisTtlStore {
    pub fn new(redis_url: impl AsRef<str>) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url.as_ref())
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;
        Ok(Self { client })
    }

    fn conn(&self) -> Result<redis::Connection, CacheError> {
        self.client
            .get_connection()
            .map_err(|e| CacheError::Unavailable(e.to_string()))
    }
}

impl TtlStore for RedisTtlStore {
    fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        // Redis rejects a zero expiry; such entries are dead on arrival anyway.
        let secs = ttl.as_secs().max(1);
        let mut conn = self.conn()?;
        conn.set_ex(key, value, secs)
            .map_err(|e| CacheError::Unavailable(e.to_string()))
    }

    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn()?;
        conn.get(key)
            .map_err(|e| CacheError::Unavailable(e.to_string()))
    }

    fn del(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn()?;
        let _: i64 = conn
            .del(key)
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.conn()?;
        conn.exists(key)
            .map_err(|e| CacheError::Unavailable(e.to_string()))
    }
}
