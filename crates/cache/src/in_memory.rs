//! In-memory TTL store for tests/dev.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::store::{CacheError, TtlStore};

#[derive(Debug)]
struct Entry {
    value: String,
    deadline: Instant,
    ttl: Duration,
}

/// In-memory [`TtlStore`] with lazy expiry (entries are evicted on access).
#[derive(Debug, Default)]
pub struct InMemoryTtlStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryTtlStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The TTL an entry was stored with, if the entry is still live.
    ///
    /// Exposed so tests can assert TTL-bounding behavior without sleeping.
    pub fn ttl_of(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(key)?;
        if entry.deadline <= Instant::now() {
            return None;
        }
        Some(entry.ttl)
    }

    /// Number of live entries (expired-but-unevicted entries excluded).
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .map(|e| e.values().filter(|v| v.deadline > now).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_err() -> CacheError {
        CacheError::Unavailable("in-memory store lock poisoned".to_string())
    }
}

impl TtlStore for InMemoryTtlStore {
    fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| Self::lock_err())?;
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                deadline: Instant::now() + ttl,
                ttl,
            },
        );
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.write().map_err(|_| Self::lock_err())?;
        match entries.get(key) {
            Some(entry) if entry.deadline > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn del(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| Self::lock_err())?;
        entries.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_roundtrip() {
        let store = InMemoryTtlStore::new();
        store
            .set_ex("k", "v", Duration::from_secs(60))
            .unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        assert!(store.exists("k").unwrap());
    }

    #[test]
    fn expired_entry_is_gone() {
        let store = InMemoryTtlStore::new();
        store.set_ex("k", "v", Duration::from_secs(0)).unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        assert!(!store.exists("k").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn del_is_idempotent() {
        let store = InMemoryTtlStore::new();
        store.set_ex("k", "v", Duration::from_secs(60)).unwrap();
        store.del("k").unwrap();
        store.del("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn ttl_of_reports_stored_ttl() {
        let store = InMemoryTtlStore::new();
        store
            .set_ex("k", "v", Duration::from_secs(1800))
            .unwrap();
        assert_eq!(store.ttl_of("k"), Some(Duration::from_secs(1800)));
        assert_eq!(store.ttl_of("missing"), None);
    }
}
