//! Token payload (claims) and the issued access/refresh pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sentra_core::{Role, Subject};

/// The payload carried by one signed token.
///
/// Created once at issuance, never mutated. A token is logically dead the
/// moment `exp` passes or its `jti` lands in the denylist — whichever comes
/// first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Unique token identifier; the sole revocation key. Distinct per issued
    /// token, even within an access/refresh pair.
    pub jti: String,

    #[serde(rename = "uid")]
    pub user_id: i64,

    /// Stable external identifier of the subject.
    #[serde(rename = "uuid")]
    pub user_uuid: String,

    pub email: String,

    #[serde(rename = "name")]
    pub display_name: String,

    /// Role resolved at issuance time; immutable for the token's lifetime.
    pub role: Role,

    /// Issued-at, Unix seconds.
    pub iat: i64,

    /// Expiry, Unix seconds. Invariant: `exp > iat`.
    pub exp: i64,
}

impl Claims {
    /// Build claims for `subject` with a fresh jti.
    pub fn issue(subject: &Subject, role: Role, issued_at: DateTime<Utc>, ttl_secs: i64) -> Self {
        let iat = issued_at.timestamp();
        Self {
            jti: Uuid::now_v7().to_string(),
            user_id: subject.user_id,
            user_uuid: subject.user_uuid.clone(),
            email: subject.email.clone(),
            display_name: subject.display_name.clone(),
            role,
            iat,
            exp: iat + ttl_secs,
        }
    }

    pub fn subject(&self) -> Subject {
        Subject {
            user_id: self.user_id,
            user_uuid: self.user_uuid.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }

    /// Seconds until natural expiry (negative once past).
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        self.exp - now.timestamp()
    }
}

/// An access/refresh token pair as handed to clients.
///
/// Both tokens are independently valid with their own jti and expiry; the
/// refresh token carries the same subject and role so a refresh can mint a
/// fresh pair without re-authenticating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Seconds until the access token expires.
    pub expires_in: i64,
}

impl TokenPair {
    pub fn bearer(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> Subject {
        Subject::new(1, "u-1", "a@b.com", "Alice").unwrap()
    }

    #[test]
    fn issue_sets_time_window() {
        let now = Utc::now();
        let claims = Claims::issue(&subject(), Role::new("user"), now, 86_400);
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp, now.timestamp() + 86_400);
        assert!(claims.exp > claims.iat);
        assert!(!claims.is_expired(now));
    }

    #[test]
    fn issue_generates_distinct_jtis() {
        let now = Utc::now();
        let a = Claims::issue(&subject(), Role::new("user"), now, 60);
        let b = Claims::issue(&subject(), Role::new("user"), now, 60);
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn expired_exactly_at_exp() {
        let now = Utc::now();
        let claims = Claims::issue(&subject(), Role::new("user"), now, 0);
        assert!(claims.is_expired(now));
        assert_eq!(claims.remaining_secs(now), 0);
    }

    #[test]
    fn serde_uses_compact_field_names() {
        let now = Utc::now();
        let claims = Claims::issue(&subject(), Role::new("user"), now, 60);
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("uid").is_some());
        assert!(json.get("uuid").is_some());
        assert!(json.get("name").is_some());
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn subject_roundtrip() {
        let now = Utc::now();
        let claims = Claims::issue(&subject(), Role::new("user"), now, 60);
        assert_eq!(claims.subject(), subject());
    }
}
