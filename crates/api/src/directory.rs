//! User directory contract.
//!
//! Relational persistence of users/groups is an external collaborator; the
//! API only needs credential lookup by email. The in-memory implementation
//! serves tests and local development.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

/// A stored user as the directory hands it to the login handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: i64,
    pub user_uuid: String,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("user directory unavailable: {0}")]
    Unavailable(String),
}

/// Credential lookup boundary.
pub trait UserDirectory: Send + Sync {
    fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError>;
}

/// In-memory [`UserDirectory`] keyed by lowercased email.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: UserRecord) {
        if let Ok(mut users) = self.users.write() {
            users.insert(record.email.to_ascii_lowercase(), record);
        }
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError> {
        let users = self
            .users
            .read()
            .map_err(|_| DirectoryError::Unavailable("directory lock poisoned".to_string()))?;
        Ok(users.get(&email.to_ascii_lowercase()).cloned())
    }
}
