//! Application state and router assembly.

use std::sync::Arc;

use axum::extract::Extension;
use axum::routing::get;
use axum::Router;

use sentra_auth::TokenLifecycle;
use sentra_policy::{PolicyRepository, PolicyTuple, RuleStore};

use crate::config::ApiConfig;
use crate::directory::UserDirectory;
use crate::routes;

/// Shared per-process services handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: TokenLifecycle,
    pub policy: PolicyRepository,
    pub directory: Arc<dyn UserDirectory>,
    pub config: ApiConfig,
}

/// Assemble the full router over `state`.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/auth", routes::auth::router())
        .nest("/roles", routes::roles::router())
        .layer(Extension(Arc::new(state)))
}

/// Seed the application-wide scope with its baseline rules when empty.
///
/// The app scope is read-only at runtime, so this runs once at startup,
/// before the store is wrapped into its scope handle.
pub fn seed_app_scope(store: &dyn RuleStore) -> Result<(), sentra_policy::PolicyError> {
    if !store.rules()?.is_empty() {
        return Ok(());
    }

    store.add(PolicyTuple::new("admin", "*", "*"))?;
    store.add(PolicyTuple::new("user", "profile", "read"))?;
    store.add(PolicyTuple::new("user", "profile", "write"))?;
    store.persist()
}

#[cfg(test)]
mod tests {
    use super::*;

    use sentra_policy::InMemoryRuleStore;

    #[test]
    fn seed_only_when_empty() {
        let store = InMemoryRuleStore::new();
        seed_app_scope(&store).unwrap();
        let seeded = store.rules().unwrap().len();
        assert!(seeded > 0);

        // Idempotent: a second seeding changes nothing.
        seed_app_scope(&store).unwrap();
        assert_eq!(store.rules().unwrap().len(), seeded);
    }
}
