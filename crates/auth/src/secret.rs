//! Signing-secret resolution.
//!
//! Resolution order: explicit runtime override → configured value → fixed
//! development fallback. The fallback is on the known-weak denylist in
//! [`crate::password::validate_secret_strength`], so a deployment that gates
//! startup on secret strength can never run it in production by accident.

/// Development fallback secret. Never accepted as strong.
pub const DEV_FALLBACK_SECRET: &str = "sentra-dev-secret";

/// The HMAC signing secret for this deployment.
///
/// Deliberately not `Debug`-derived so the raw secret cannot leak through
/// log formatting.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(String);

impl SigningSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Resolve the effective secret from an explicit override and a
    /// configured value, in that order, falling back to the dev secret.
    pub fn resolve(override_value: Option<&str>, configured: Option<&str>) -> Self {
        fn pick(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|v| !v.is_empty())
        }

        if let Some(secret) = pick(override_value) {
            return Self::new(secret);
        }
        if let Some(secret) = pick(configured) {
            return Self::new(secret);
        }

        tracing::warn!("no signing secret configured; using insecure dev fallback");
        Self::new(DEV_FALLBACK_SECRET)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SigningSecret(***)")
    }
}
