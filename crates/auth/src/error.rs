//! Token error model.
//!
//! Every failure mode a caller can branch on is its own variant; the handler
//! layer maps these to transport status codes. `BadSignature` is always
//! distinct from `Expired` so callers can tell "forged/corrupted" from
//! "stale".

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The token does not have exactly three dot-separated segments.
    #[error("malformed token")]
    MalformedToken,

    /// The payload segment could not be decoded into claims.
    #[error("malformed token payload")]
    MalformedPayload,

    /// The signature does not match the signing secret.
    #[error("bad token signature")]
    BadSignature,

    /// Valid signature, but `exp` is in the past.
    #[error("token expired")]
    Expired,

    /// Valid signature and not expired, but the jti is denylisted.
    #[error("token revoked")]
    Revoked,

    /// Signing or claim serialization failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// The shared cache/denylist backend could not be reached.
    #[error("shared store unavailable: {0}")]
    StoreUnavailable(String),
}
