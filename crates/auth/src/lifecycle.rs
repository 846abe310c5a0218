//! Token lifecycle manager.
//!
//! Orchestrates the codec and the shared cache/denylist: issues access/refresh
//! pairs, validates presented tokens (cache fast path, signature, expiry,
//! revocation), and revokes on logout.
//!
//! The positive cache is keyed by raw token (cheap exact match, skips a
//! second signature check); the denylist is keyed by jti so revocation works
//! from decoded identity alone. Two access patterns, two keys, one store.
//!
//! All cross-request state lives in the shared store — this type is stateless
//! and safe to clone across workers and process instances.

use std::time::Duration;

use chrono::{DateTime, Utc};

use sentra_cache::{CacheError, TokenCache};
use sentra_core::{Role, Subject};

use crate::claims::{Claims, TokenPair};
use crate::codec::TokenCodec;
use crate::error::AuthError;

/// Token lifetimes and cache bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenConfig {
    /// Access token lifetime.
    pub access_ttl: Duration,
    /// Refresh token lifetime.
    pub refresh_ttl: Duration,
    /// Ceiling for positive-cache entries. An entry's TTL is
    /// `min(ceiling, remaining token lifetime)`.
    pub cache_ttl_ceiling: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_ttl: Duration::from_secs(24 * 60 * 60),
            refresh_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            cache_ttl_ceiling: Duration::from_secs(30 * 60),
        }
    }
}

/// What to do when the denylist store cannot answer during validation.
///
/// `FailClosed` surfaces [`AuthError::StoreUnavailable`]; `FailOpen` treats
/// the store error as "not yet proven revoked" and continues. Fail-open is
/// only acceptable for read-tier endpoints, never for credential-mutating
/// ones — the choice is per call site, not a global default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutagePolicy {
    #[default]
    FailClosed,
    FailOpen,
}

/// Issues, validates, and revokes token pairs.
#[derive(Clone)]
pub struct TokenLifecycle {
    codec: TokenCodec,
    cache: TokenCache,
    config: TokenConfig,
}

impl TokenLifecycle {
    pub fn new(codec: TokenCodec, cache: TokenCache, config: TokenConfig) -> Self {
        Self { codec, cache, config }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Issue an access/refresh pair for `subject`.
    ///
    /// Both tokens get distinct jtis; the refresh token carries the same
    /// subject and role so a refresh can mint a fresh pair without
    /// re-authenticating.
    pub fn issue_pair(&self, subject: &Subject, role: Role) -> Result<TokenPair, AuthError> {
        self.issue_pair_at(subject, role, Utc::now())
    }

    pub fn issue_pair_at(
        &self,
        subject: &Subject,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, AuthError> {
        let access_ttl = self.config.access_ttl.as_secs() as i64;
        let refresh_ttl = self.config.refresh_ttl.as_secs() as i64;

        let access = Claims::issue(subject, role.clone(), now, access_ttl);
        let refresh = Claims::issue(subject, role, now, refresh_ttl);

        let access_token = self.codec.sign(&access)?;
        let refresh_token = self.codec.sign(&refresh)?;

        Ok(TokenPair::bearer(access_token, refresh_token, access_ttl))
    }

    /// Validate a presented token with the default fail-closed denylist
    /// policy.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_at(token, Utc::now(), OutagePolicy::FailClosed)
    }

    /// Validate with an explicit denylist outage policy.
    pub fn validate_with_policy(
        &self,
        token: &str,
        policy: OutagePolicy,
    ) -> Result<Claims, AuthError> {
        self.validate_at(token, Utc::now(), policy)
    }

    /// Validation at an explicit instant (deterministic for tests).
    ///
    /// Fast path: a live positive-cache entry for this exact raw token is
    /// returned immediately. On a miss (or any cache trouble) the token is
    /// verified cryptographically, checked for expiry and revocation, and the
    /// cache is repopulated with a TTL bounded by the token's remaining life.
    /// The cache is pure optimization — never a correctness dependency.
    pub fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
        policy: OutagePolicy,
    ) -> Result<Claims, AuthError> {
        match self.cache.get_claims(token) {
            Ok(Some(cached)) => match serde_json::from_str::<Claims>(&cached) {
                Ok(claims) if !claims.is_expired(now) => return Ok(claims),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "undecodable positive-cache entry; re-verifying");
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "positive cache unavailable; falling back to verification");
            }
        }

        let claims = self.codec.verify(token)?;

        if claims.is_expired(now) {
            return Err(AuthError::Expired);
        }

        match self.cache.is_denied(&claims.jti) {
            Ok(true) => return Err(AuthError::Revoked),
            Ok(false) => {}
            Err(e) => match policy {
                OutagePolicy::FailClosed => return Err(store_unavailable(e)),
                OutagePolicy::FailOpen => {
                    tracing::warn!(error = %e, "denylist unavailable; proceeding fail-open");
                }
            },
        }

        let remaining = claims.remaining_secs(now);
        if remaining > 0 {
            let ttl = Duration::from_secs(remaining as u64).min(self.config.cache_ttl_ceiling);
            if let Err(e) = self.cache.put_claims(token, &serialize(&claims)?, ttl) {
                tracing::warn!(error = %e, "failed to repopulate positive cache");
            }
        }

        Ok(claims)
    }

    /// Revoke a token: denylist its jti for the remaining lifetime and purge
    /// the positive cache entry so the fast path cannot serve it.
    ///
    /// Revoking an already-expired or already-revoked token is a no-op
    /// success — there is nothing left to revoke, and two concurrent logouts
    /// must both succeed.
    pub fn invalidate(&self, token: &str) -> Result<(), AuthError> {
        self.invalidate_at(token, Utc::now())
    }

    pub fn invalidate_at(&self, token: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        // Validate first so only trustworthy claims reach the denylist.
        // Revocation mutates credentials, so denylist outages fail closed.
        let claims = match self.validate_at(token, now, OutagePolicy::FailClosed) {
            Ok(claims) => claims,
            Err(AuthError::Expired) | Err(AuthError::Revoked) => return Ok(()),
            Err(e) => return Err(e),
        };

        let remaining = claims.remaining_secs(now);
        if remaining <= 0 {
            return Ok(());
        }

        self.cache
            .deny(&claims.jti, Duration::from_secs(remaining as u64))
            .map_err(store_unavailable)?;
        self.cache.purge(token).map_err(store_unavailable)?;

        Ok(())
    }

    /// Existence check against the denylist.
    pub fn is_invalidated(&self, jti: &str) -> Result<bool, AuthError> {
        self.cache.is_denied(jti).map_err(store_unavailable)
    }
}

fn serialize(claims: &Claims) -> Result<String, AuthError> {
    serde_json::to_string(claims).map_err(|e| AuthError::Signing(e.to_string()))
}

fn store_unavailable(e: CacheError) -> AuthError {
    AuthError::StoreUnavailable(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use sentra_cache::{InMemoryTtlStore, TtlStore};

    use crate::secret::SigningSecret;

    fn subject() -> Subject {
        Subject::new(1, "u-1", "a@b.com", "Alice").unwrap()
    }

    fn lifecycle() -> (Arc<InMemoryTtlStore>, TokenLifecycle) {
        let store = Arc::new(InMemoryTtlStore::new());
        let codec = TokenCodec::new(SigningSecret::new("unit-test-signing-secret-0123456789"));
        let cache = TokenCache::new(store.clone());
        (store, TokenLifecycle::new(codec, cache, TokenConfig::default()))
    }

    #[test]
    fn issued_pair_has_expected_shape() {
        let (_, lifecycle) = lifecycle();
        let pair = lifecycle.issue_pair(&subject(), Role::new("user")).unwrap();

        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 86_400);
        assert_ne!(pair.access_token, pair.refresh_token);
    }

    #[test]
    fn pair_tokens_have_distinct_jtis_same_subject() {
        let (_, lifecycle) = lifecycle();
        let pair = lifecycle.issue_pair(&subject(), Role::new("user")).unwrap();

        let access = lifecycle.validate(&pair.access_token).unwrap();
        let refresh = lifecycle.validate(&pair.refresh_token).unwrap();

        assert_ne!(access.jti, refresh.jti);
        assert_eq!(access.subject(), refresh.subject());
        assert_eq!(access.role, refresh.role);
        assert_eq!(refresh.exp - refresh.iat, 7 * 24 * 3600);
    }

    #[test]
    fn validate_rejects_expired_with_valid_signature() {
        let (_, lifecycle) = lifecycle();
        let issued = Utc::now() - chrono::Duration::hours(25);
        let pair = lifecycle
            .issue_pair_at(&subject(), Role::new("user"), issued)
            .unwrap();

        assert_eq!(
            lifecycle.validate(&pair.access_token).unwrap_err(),
            AuthError::Expired
        );
    }

    #[test]
    fn validate_populates_cache_fast_path() {
        let (store, lifecycle) = lifecycle();
        let pair = lifecycle.issue_pair(&subject(), Role::new("user")).unwrap();

        assert!(store.is_empty());
        let first = lifecycle.validate(&pair.access_token).unwrap();
        assert_eq!(store.len(), 1);

        // Second validation is served from the cache.
        let second = lifecycle.validate(&pair.access_token).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn cache_ttl_is_bounded_by_ceiling() {
        let (store, lifecycle) = lifecycle();
        let pair = lifecycle.issue_pair(&subject(), Role::new("user")).unwrap();

        // Remaining lifetime is ~24h; the cache entry must get exactly the
        // 30-minute ceiling.
        lifecycle.validate(&pair.access_token).unwrap();
        let key = format!("tok:{}", pair.access_token);
        assert_eq!(store.ttl_of(&key), Some(Duration::from_secs(1800)));
    }

    #[test]
    fn cache_ttl_is_remaining_lifetime_when_shorter() {
        let store = Arc::new(InMemoryTtlStore::new());
        let codec = TokenCodec::new(SigningSecret::new("unit-test-signing-secret-0123456789"));
        let cache = TokenCache::new(store.clone());
        let config = TokenConfig {
            access_ttl: Duration::from_secs(120),
            ..TokenConfig::default()
        };
        let lifecycle = TokenLifecycle::new(codec, cache, config);

        let pair = lifecycle.issue_pair(&subject(), Role::new("user")).unwrap();
        lifecycle.validate(&pair.access_token).unwrap();

        let key = format!("tok:{}", pair.access_token);
        assert_eq!(store.ttl_of(&key), Some(Duration::from_secs(120)));
    }

    #[test]
    fn revocation_wins_over_cache() {
        let (store, lifecycle) = lifecycle();
        let pair = lifecycle.issue_pair(&subject(), Role::new("user")).unwrap();

        // Prime the positive cache, then revoke.
        lifecycle.validate(&pair.access_token).unwrap();
        lifecycle.invalidate(&pair.access_token).unwrap();

        // The cached entry must be purged and validation must reflect the
        // revocation, not the stale cache.
        let key = format!("tok:{}", pair.access_token);
        assert_eq!(store.ttl_of(&key), None);
        assert_eq!(
            lifecycle.validate(&pair.access_token).unwrap_err(),
            AuthError::Revoked
        );
    }

    #[test]
    fn invalidate_is_idempotent() {
        let (_, lifecycle) = lifecycle();
        let pair = lifecycle.issue_pair(&subject(), Role::new("user")).unwrap();

        lifecycle.invalidate(&pair.access_token).unwrap();
        // A concurrent/second logout must also succeed.
        lifecycle.invalidate(&pair.access_token).unwrap();
        assert_eq!(
            lifecycle.validate(&pair.access_token).unwrap_err(),
            AuthError::Revoked
        );
    }

    #[test]
    fn invalidate_expired_token_is_noop_success() {
        let (store, lifecycle) = lifecycle();
        let issued = Utc::now() - chrono::Duration::days(2);
        let pair = lifecycle
            .issue_pair_at(&subject(), Role::new("user"), issued)
            .unwrap();

        lifecycle.invalidate(&pair.access_token).unwrap();
        // Nothing to revoke: no denylist entry was written.
        assert!(store.is_empty());
    }

    #[test]
    fn is_invalidated_reflects_denylist() {
        let (_, lifecycle) = lifecycle();
        let pair = lifecycle.issue_pair(&subject(), Role::new("user")).unwrap();
        let claims = lifecycle.validate(&pair.access_token).unwrap();

        assert!(!lifecycle.is_invalidated(&claims.jti).unwrap());
        lifecycle.invalidate(&pair.access_token).unwrap();
        assert!(lifecycle.is_invalidated(&claims.jti).unwrap());
    }

    #[test]
    fn refresh_token_outlives_access_revocation() {
        let (_, lifecycle) = lifecycle();
        let pair = lifecycle.issue_pair(&subject(), Role::new("user")).unwrap();

        lifecycle.invalidate(&pair.access_token).unwrap();
        // Distinct jti: the refresh token stays valid.
        assert!(lifecycle.validate(&pair.refresh_token).is_ok());
    }

    #[test]
    fn concrete_login_logout_scenario() {
        let (_, lifecycle) = lifecycle();
        let subject = Subject::new(1, "u-1", "a@b.com", "Alice").unwrap();

        let pair = lifecycle.issue_pair(&subject, Role::new("user")).unwrap();
        assert_eq!(pair.expires_in, 86_400);

        let claims = lifecycle.validate(&pair.access_token).unwrap();
        assert_eq!(claims.role.as_str(), "user");
        assert_eq!(claims.user_id, 1);
        assert_eq!(claims.user_uuid, "u-1");
        assert_eq!(claims.email, "a@b.com");

        lifecycle.invalidate(&pair.access_token).unwrap();
        assert_eq!(
            lifecycle.validate(&pair.access_token).unwrap_err(),
            AuthError::Revoked
        );
    }

    // ─────────────────────────────────────────────────────────────────────
    // Store outage behavior
    // ─────────────────────────────────────────────────────────────────────

    /// Test double: a store that is down.
    struct DownStore;

    impl TtlStore for DownStore {
        fn set_ex(&self, _: &str, _: &str, _: Duration) -> Result<(), sentra_cache::CacheError> {
            Err(sentra_cache::CacheError::Unavailable("down".into()))
        }
        fn get(&self, _: &str) -> Result<Option<String>, sentra_cache::CacheError> {
            Err(sentra_cache::CacheError::Unavailable("down".into()))
        }
        fn del(&self, _: &str) -> Result<(), sentra_cache::CacheError> {
            Err(sentra_cache::CacheError::Unavailable("down".into()))
        }
        fn exists(&self, _: &str) -> Result<bool, sentra_cache::CacheError> {
            Err(sentra_cache::CacheError::Unavailable("down".into()))
        }
    }

    fn down_lifecycle() -> TokenLifecycle {
        let codec = TokenCodec::new(SigningSecret::new("unit-test-signing-secret-0123456789"));
        let cache = TokenCache::new(Arc::new(DownStore));
        TokenLifecycle::new(codec, cache, TokenConfig::default())
    }

    #[test]
    fn outage_fail_closed_surfaces_store_error() {
        let lifecycle = down_lifecycle();
        let pair = lifecycle.issue_pair(&subject(), Role::new("user")).unwrap();

        let err = lifecycle
            .validate_with_policy(&pair.access_token, OutagePolicy::FailClosed)
            .unwrap_err();
        assert!(matches!(err, AuthError::StoreUnavailable(_)));
    }

    #[test]
    fn outage_fail_open_degrades_to_pure_verification() {
        let lifecycle = down_lifecycle();
        let pair = lifecycle.issue_pair(&subject(), Role::new("user")).unwrap();

        // Signature and expiry still enforced; cache and denylist skipped.
        let claims = lifecycle
            .validate_with_policy(&pair.access_token, OutagePolicy::FailOpen)
            .unwrap();
        assert_eq!(claims.role.as_str(), "user");

        assert_eq!(
            lifecycle
                .validate_with_policy("not.a.token", OutagePolicy::FailOpen)
                .unwrap_err(),
            AuthError::BadSignature
        );
    }

    #[test]
    fn outage_invalidate_fails_closed() {
        let lifecycle = down_lifecycle();
        let pair = lifecycle.issue_pair(&subject(), Role::new("user")).unwrap();

        let err = lifecycle.invalidate(&pair.access_token).unwrap_err();
        assert!(matches!(err, AuthError::StoreUnavailable(_)));
    }
}
