//! Rule-store abstraction and the in-memory implementation.

use std::sync::RwLock;

use thiserror::Error;

use crate::tuple::PolicyTuple;

/// Policy-layer error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The caller supplied a blank required field.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Role creation collided with an existing role.
    #[error("role already exists: {0}")]
    AlreadyExists(String),

    /// The durable rule set could not be read or written.
    #[error("policy storage error: {0}")]
    Storage(String),
}

/// One enforcement scope's rule set.
///
/// Implementations hold the working set in memory and flush it durably on
/// [`persist`](RuleStore::persist); every mutating repository operation ends
/// with a persist call. Replace-on-update is not atomic for external readers
/// of the durable form — an accepted trade-off for a low-write-rate
/// administrative resource.
pub trait RuleStore: Send + Sync {
    /// Snapshot of all tuples in this scope.
    fn rules(&self) -> Result<Vec<PolicyTuple>, PolicyError>;

    /// Add one tuple.
    fn add(&self, tuple: PolicyTuple) -> Result<(), PolicyError>;

    /// Remove all tuples for `role`; returns how many were removed.
    /// Removing for an absent role removes nothing and is not an error.
    fn remove_role(&self, role: &str) -> Result<usize, PolicyError>;

    /// Flush the working set to durable storage.
    fn persist(&self) -> Result<(), PolicyError>;
}

/// In-memory rule store for tests/dev; `persist` is a no-op.
#[derive(Debug, Default)]
pub struct InMemoryRuleStore {
    rules: RwLock<Vec<PolicyTuple>>,
}

impl InMemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<PolicyTuple>) -> Self {
        Self {
            rules: RwLock::new(rules),
        }
    }

    fn lock_err() -> PolicyError {
        PolicyError::Storage("rule store lock poisoned".to_string())
    }
}

impl RuleStore for InMemoryRuleStore {
    fn rules(&self) -> Result<Vec<PolicyTuple>, PolicyError> {
        Ok(self.rules.read().map_err(|_| Self::lock_err())?.clone())
    }

    fn add(&self, tuple: PolicyTuple) -> Result<(), PolicyError> {
        self.rules.write().map_err(|_| Self::lock_err())?.push(tuple);
        Ok(())
    }

    fn remove_role(&self, role: &str) -> Result<usize, PolicyError> {
        let mut rules = self.rules.write().map_err(|_| Self::lock_err())?;
        let before = rules.len();
        rules.retain(|t| t.role != role);
        Ok(before - rules.len())
    }

    fn persist(&self) -> Result<(), PolicyError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_snapshot() {
        let store = InMemoryRuleStore::new();
        store.add(PolicyTuple::new("viewer", "reports", "read")).unwrap();
        store.add(PolicyTuple::new("editor", "reports", "write")).unwrap();
        assert_eq!(store.rules().unwrap().len(), 2);
    }

    #[test]
    fn remove_role_counts_removed() {
        let store = InMemoryRuleStore::with_rules(vec![
            PolicyTuple::new("viewer", "reports", "read"),
            PolicyTuple::new("viewer", "exports", "read"),
            PolicyTuple::new("editor", "reports", "write"),
        ]);
        assert_eq!(store.remove_role("viewer").unwrap(), 2);
        assert_eq!(store.remove_role("viewer").unwrap(), 0);
        assert_eq!(store.rules().unwrap().len(), 1);
    }
}
