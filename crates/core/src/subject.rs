//! Authenticated subject identity.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The identity a token speaks for.
///
/// `user_uuid` is the stable external identifier (survives database moves);
/// `user_id` is the relational primary key. Both travel in token claims so
/// downstream consumers can join against either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub user_id: i64,
    pub user_uuid: String,
    pub email: String,
    pub display_name: String,
}

impl Subject {
    pub fn new(
        user_id: i64,
        user_uuid: impl Into<String>,
        email: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let user_uuid = user_uuid.into();
        let email = email.into();

        if user_uuid.trim().is_empty() {
            return Err(DomainError::validation("user_uuid must not be blank"));
        }
        if email.trim().is_empty() || !email.contains('@') {
            return Err(DomainError::validation("email must be a valid address"));
        }

        Ok(Self {
            user_id,
            user_uuid,
            email,
            display_name: display_name.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_new_success() {
        let s = Subject::new(1, "u-1", "a@b.com", "Alice").unwrap();
        assert_eq!(s.user_id, 1);
        assert_eq!(s.user_uuid, "u-1");
    }

    #[test]
    fn subject_rejects_blank_uuid() {
        let err = Subject::new(1, "  ", "a@b.com", "Alice").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn subject_rejects_invalid_email() {
        let err = Subject::new(1, "u-1", "not-an-email", "Alice").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
