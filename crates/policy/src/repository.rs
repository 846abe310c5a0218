//! Dual-scope policy repository.
//!
//! The application-wide scope answers coarse enforcement questions and is
//! never mutated at runtime; the resource scope is the one exposed for CRUD.
//! Each scope is a named handle over its own [`RuleStore`], so the compiler
//! enforces which one a caller can change.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::store::{PolicyError, RuleStore};
use crate::tuple::{Permission, PolicyTuple};

fn require_role(role: &str) -> Result<&str, PolicyError> {
    let role = role.trim();
    if role.is_empty() {
        return Err(PolicyError::Validation("role name must not be blank".to_string()));
    }
    Ok(role)
}

// ─────────────────────────────────────────────────────────────────────────────
// Application scope (read/enforce only)
// ─────────────────────────────────────────────────────────────────────────────

/// Read-only handle over the application-wide rule set.
#[derive(Clone)]
pub struct AppScope {
    store: Arc<dyn RuleStore>,
}

impl AppScope {
    pub fn new(store: Arc<dyn RuleStore>) -> Self {
        Self { store }
    }

    /// Whether `role` may perform `action` on `resource` in the
    /// application-wide scope. A `*` rule field matches anything.
    pub fn allows(&self, role: &str, resource: &str, action: &str) -> Result<bool, PolicyError> {
        let role = require_role(role)?;
        let matches = |rule: &str, value: &str| rule == "*" || rule == value;

        Ok(self.store.rules()?.iter().any(|t| {
            t.role == role && matches(&t.resource, resource) && matches(&t.action, action)
        }))
    }

    /// All application-scope tuples for `role`.
    pub fn permissions_for(&self, role: &str) -> Result<Vec<PolicyTuple>, PolicyError> {
        let role = require_role(role)?;
        Ok(self
            .store
            .rules()?
            .into_iter()
            .filter(|t| t.role == role)
            .collect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resource scope (full CRUD)
// ─────────────────────────────────────────────────────────────────────────────

/// Mutable handle over the resource/group rule set.
///
/// Every mutating operation ends with a persist of this scope's rule file.
#[derive(Clone)]
pub struct ResourceScope {
    store: Arc<dyn RuleStore>,
}

impl ResourceScope {
    pub fn new(store: Arc<dyn RuleStore>) -> Self {
        Self { store }
    }

    /// Distinct non-blank role labels, sorted lexicographically.
    pub fn list_roles(&self) -> Result<Vec<String>, PolicyError> {
        let roles: BTreeSet<String> = self
            .store
            .rules()?
            .into_iter()
            .filter(|t| t.is_well_formed())
            .map(|t| t.role)
            .collect();
        Ok(roles.into_iter().collect())
    }

    /// All tuples whose role matches exactly.
    pub fn get_permissions(&self, role: &str) -> Result<Vec<PolicyTuple>, PolicyError> {
        let role = require_role(role)?;
        Ok(self
            .store
            .rules()?
            .into_iter()
            .filter(|t| t.role == role)
            .collect())
    }

    /// Whether `role` exists, i.e. has at least one non-empty tuple.
    pub fn role_exists(&self, role: &str) -> Result<bool, PolicyError> {
        Ok(self
            .get_permissions(role)?
            .iter()
            .any(PolicyTuple::is_well_formed))
    }

    /// Create a role from a permission list.
    ///
    /// An empty (or all-blank) list is substituted with the minimal default
    /// permission rather than creating a role with no rules.
    pub fn create_role(&self, role: &str, perms: Vec<Permission>) -> Result<(), PolicyError> {
        let role = require_role(role)?;
        if self.role_exists(role)? {
            return Err(PolicyError::AlreadyExists(role.to_string()));
        }
        self.write_role(role, perms)
    }

    /// Replace a role's entire permission set (callers resend the full set).
    ///
    /// No existence check: updating an absent role silently creates it.
    pub fn update_role(&self, role: &str, perms: Vec<Permission>) -> Result<(), PolicyError> {
        let role = require_role(role)?;
        self.store.remove_role(role)?;
        self.write_role(role, perms)
    }

    /// Remove all tuples for `role`. Idempotent.
    pub fn delete_role(&self, role: &str) -> Result<(), PolicyError> {
        let role = require_role(role)?;
        self.store.remove_role(role)?;
        self.store.persist()
    }

    fn write_role(&self, role: &str, perms: Vec<Permission>) -> Result<(), PolicyError> {
        let mut tuples: Vec<PolicyTuple> = perms
            .into_iter()
            .filter(Permission::is_well_formed)
            .map(|p| p.into_tuple(role))
            .collect();
        if tuples.is_empty() {
            tuples.push(PolicyTuple::default_for(role));
        }

        for tuple in tuples {
            self.store.add(tuple)?;
        }
        self.store.persist()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository
// ─────────────────────────────────────────────────────────────────────────────

/// Both policy scopes, wired to their own backing stores.
#[derive(Clone)]
pub struct PolicyRepository {
    pub app: AppScope,
    pub resource: ResourceScope,
}

impl PolicyRepository {
    pub fn new(app_store: Arc<dyn RuleStore>, resource_store: Arc<dyn RuleStore>) -> Self {
        Self {
            app: AppScope::new(app_store),
            resource: ResourceScope::new(resource_store),
        }
    }
}
