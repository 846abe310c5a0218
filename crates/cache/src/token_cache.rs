//! Token-specific view over the shared TTL store.
//!
//! One backing store, two logically independent namespaces:
//!
//! - positive cache: `tok:<raw token>` → serialized claims, so repeat requests
//!   skip signature verification;
//! - denylist: `deny:<jti>` → sentinel, so logged-out tokens are rejected
//!   until their natural expiry.
//!
//! Keys differ by prefix, not by separate stores, so an outage degrades both
//! paths together and gracefully.

use std::sync::Arc;
use std::time::Duration;

use crate::store::{CacheError, TtlStore};

const CLAIMS_PREFIX: &str = "tok:";
const DENY_PREFIX: &str = "deny:";
const DENY_SENTINEL: &str = "revoked";

/// Positive claims cache + jti denylist over one shared [`TtlStore`].
#[derive(Clone)]
pub struct TokenCache {
    store: Arc<dyn TtlStore>,
}

impl TokenCache {
    pub fn new(store: Arc<dyn TtlStore>) -> Self {
        Self { store }
    }

    /// Cache serialized claims under the raw token string.
    ///
    /// The caller is responsible for bounding `ttl` by the token's own
    /// remaining lifetime — an entry must never outlive its token.
    pub fn put_claims(&self, raw_token: &str, claims_json: &str, ttl: Duration) -> Result<(), CacheError> {
        self.store
            .set_ex(&format!("{CLAIMS_PREFIX}{raw_token}"), claims_json, ttl)
    }

    /// Previously verified claims for this exact raw token, if still cached.
    pub fn get_claims(&self, raw_token: &str) -> Result<Option<String>, CacheError> {
        self.store.get(&format!("{CLAIMS_PREFIX}{raw_token}"))
    }

    /// Drop the positive cache entry for a raw token (idempotent).
    pub fn purge(&self, raw_token: &str) -> Result<(), CacheError> {
        self.store.del(&format!("{CLAIMS_PREFIX}{raw_token}"))
    }

    /// Record a jti as revoked for `ttl` (the token's remaining lifetime).
    ///
    /// The entry lapses together with the token's natural expiry, keeping the
    /// shared store bounded without a sweep job.
    pub fn deny(&self, jti: &str, ttl: Duration) -> Result<(), CacheError> {
        self.store
            .set_ex(&format!("{DENY_PREFIX}{jti}"), DENY_SENTINEL, ttl)
    }

    /// Whether a jti is currently revoked.
    pub fn is_denied(&self, jti: &str) -> Result<bool, CacheError> {
        self.store.exists(&format!("{DENY_PREFIX}{jti}"))
    }
}
