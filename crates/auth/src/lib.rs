//! `sentra-auth` — token issuance, validation, and revocation.
//!
//! This crate owns the signed-token wire format (codec), the claims payload,
//! the signing-secret resolution rules, password hashing/policy, and the
//! token lifecycle manager that ties them to the shared cache/denylist.
//! It is intentionally decoupled from HTTP and relational storage.

pub mod claims;
pub mod codec;
pub mod error;
pub mod lifecycle;
pub mod password;
pub mod secret;

pub use claims::{Claims, TokenPair};
pub use codec::TokenCodec;
pub use error::AuthError;
pub use lifecycle::{OutagePolicy, TokenConfig, TokenLifecycle};
pub use password::{
    hash_password, validate_secret_strength, validate_strength, verify_password,
    PasswordError, PasswordPolicyError, SecretPolicyError,
};
pub use secret::SigningSecret;
