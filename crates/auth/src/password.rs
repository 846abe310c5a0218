//! Password hashing and strength policy.
//!
//! Hashing is bcrypt at the library's default cost. Verification failures
//! collapse into one generic error so nothing about *why* a login failed
//! leaks to the caller.

use thiserror::Error;

use crate::secret::DEV_FALLBACK_SECRET;

/// Minimum user-password length.
const MIN_PASSWORD_LEN: usize = 8;

/// Minimum signing-secret length.
const MIN_SECRET_LEN: usize = 32;

/// Known-weak signing secrets, rejected by exact match. The dev fallback is
/// on this list so it can never pass the startup strength gate.
const WEAK_SECRETS: &[&str] = &[
    DEV_FALLBACK_SECRET,
    "secret",
    "changeme",
    "dev-secret",
    "your-256-bit-secret",
    "supersecretkey",
    "00000000000000000000000000000000",
    "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
];

/// Hashing/verification failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// Generic mismatch — deliberately detail-free.
    #[error("invalid credentials")]
    Mismatch,

    /// The hashing library failed (malformed hash, cost out of range).
    #[error("hashing failed: {0}")]
    Hash(String),
}

/// A user password violated the strength policy.
///
/// Checks run in a fixed order (length, uppercase, lowercase, digit, symbol)
/// and the first failing rule is reported; each variant carries its own
/// user-facing message.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("password must be at least 8 characters long")]
    TooShort,

    #[error("password must contain at least one uppercase letter")]
    MissingUppercase,

    #[error("password must contain at least one lowercase letter")]
    MissingLowercase,

    #[error("password must contain at least one digit")]
    MissingDigit,

    #[error("password must contain at least one symbol character")]
    MissingSymbol,
}

/// A signing secret violated the strength policy.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SecretPolicyError {
    #[error("signing secret must be at least 32 characters long")]
    TooShort,

    #[error("signing secret is a known weak value")]
    KnownWeak,
}

/// One-way adaptive hash at the library default cost.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Constant-time verification; any mismatch is the same generic error.
pub fn verify_password(hash: &str, password: &str) -> Result<(), PasswordError> {
    match bcrypt::verify(password, hash) {
        Ok(true) => Ok(()),
        Ok(false) | Err(_) => Err(PasswordError::Mismatch),
    }
}

/// Validate a user password against the strength policy.
pub fn validate_strength(password: &str) -> Result<(), PasswordPolicyError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordPolicyError::TooShort);
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err(PasswordPolicyError::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err(PasswordPolicyError::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordPolicyError::MissingDigit);
    }
    if !password.chars().any(|c| c.is_ascii_punctuation()) {
        return Err(PasswordPolicyError::MissingSymbol);
    }
    Ok(())
}

/// Validate the deployment signing secret (not user passwords).
pub fn validate_secret_strength(secret: &str) -> Result<(), SecretPolicyError> {
    if secret.chars().count() < MIN_SECRET_LEN {
        return Err(SecretPolicyError::TooShort);
    }
    if WEAK_SECRETS.contains(&secret) {
        return Err(SecretPolicyError::KnownWeak);
    }
    Ok(())
}
