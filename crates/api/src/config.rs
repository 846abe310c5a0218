//! Runtime configuration from the environment.
//!
//! Everything is resolved once at startup and passed into constructors —
//! no process-global mutable state.

use std::path::PathBuf;

/// API process configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    /// Explicit signing-secret override (`SENTRA_JWT_SECRET`).
    pub jwt_secret: Option<String>,
    /// Redis-compatible store URL (`SENTRA_REDIS_URL`); in-memory when unset.
    pub redis_url: Option<String>,
    /// Emails granted the admin role at token issuance
    /// (`SENTRA_ADMIN_EMAILS`, comma-separated).
    pub admin_emails: Vec<String>,
    /// Directory holding the per-scope policy rule files
    /// (`SENTRA_POLICY_DIR`).
    pub policy_dir: PathBuf,
    /// Skip the signing-secret strength gate (`SENTRA_ALLOW_WEAK_SECRET=1`,
    /// local development only).
    pub allow_weak_secret: bool,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            bind_addr: var("SENTRA_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            jwt_secret: var("SENTRA_JWT_SECRET"),
            redis_url: var("SENTRA_REDIS_URL"),
            admin_emails: var("SENTRA_ADMIN_EMAILS")
                .map(|v| {
                    v.split(',')
                        .map(|e| e.trim().to_ascii_lowercase())
                        .filter(|e| !e.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            policy_dir: var("SENTRA_POLICY_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("policy")),
            allow_weak_secret: var("SENTRA_ALLOW_WEAK_SECRET").as_deref() == Some("1"),
        }
    }

    /// Whether `email` is on the admin allow-list.
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.to_ascii_lowercase();
        self.admin_emails.iter().any(|e| *e == email)
    }
}
