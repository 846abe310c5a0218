use std::sync::Arc;

use anyhow::Context as _;

use sentra_api::app::{build_app, seed_app_scope, AppState};
use sentra_api::config::ApiConfig;
use sentra_api::directory::InMemoryUserDirectory;
use sentra_auth::{validate_secret_strength, SigningSecret, TokenCodec, TokenConfig, TokenLifecycle};
use sentra_cache::{InMemoryTtlStore, TokenCache, TtlStore};
use sentra_policy::{CsvRuleStore, PolicyRepository, RuleStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sentra_observability::init();

    let config = ApiConfig::from_env();

    let secret = SigningSecret::resolve(config.jwt_secret.as_deref(), None);
    if let Err(e) = validate_secret_strength(secret.as_str()) {
        if config.allow_weak_secret {
            tracing::warn!(error = %e, "running with a weak signing secret (explicitly allowed)");
        } else {
            anyhow::bail!("refusing to start: {e} (set SENTRA_ALLOW_WEAK_SECRET=1 for local dev)");
        }
    }

    let store: Arc<dyn TtlStore> = match config.redis_url.as_deref() {
        #[cfg(feature = "redis")]
        Some(url) => {
            tracing::info!("using redis-backed token store");
            Arc::new(sentra_cache::RedisTtlStore::new(url).map_err(|e| anyhow::anyhow!("{e}"))?)
        }
        #[cfg(not(feature = "redis"))]
        Some(_) => {
            tracing::warn!("SENTRA_REDIS_URL set but the redis feature is not compiled in; using in-memory store");
            Arc::new(InMemoryTtlStore::new())
        }
        None => {
            tracing::info!("using in-memory token store");
            Arc::new(InMemoryTtlStore::new())
        }
    };

    let lifecycle = TokenLifecycle::new(
        TokenCodec::new(secret),
        TokenCache::new(store),
        TokenConfig::default(),
    );

    std::fs::create_dir_all(&config.policy_dir)
        .with_context(|| format!("creating {}", config.policy_dir.display()))?;
    let app_store: Arc<dyn RuleStore> =
        Arc::new(CsvRuleStore::open(config.policy_dir.join("app_policy.csv")).map_err(|e| anyhow::anyhow!("{e}"))?);
    let resource_store: Arc<dyn RuleStore> =
        Arc::new(CsvRuleStore::open(config.policy_dir.join("resource_policy.csv")).map_err(|e| anyhow::anyhow!("{e}"))?);
    seed_app_scope(app_store.as_ref()).map_err(|e| anyhow::anyhow!("{e}"))?;

    let state = AppState {
        lifecycle,
        policy: PolicyRepository::new(app_store, resource_store),
        // Relational user storage is wired in by the deployment; the
        // in-memory directory keeps local runs self-contained.
        directory: Arc::new(InMemoryUserDirectory::new()),
        config: config.clone(),
    };

    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
