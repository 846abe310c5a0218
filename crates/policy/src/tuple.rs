//! Policy tuples and permission inputs.

use serde::{Deserialize, Serialize};

/// Baseline resource every role can at least read.
pub const DEFAULT_RESOURCE: &str = "dashboard";

/// Action granted on the baseline resource.
pub const DEFAULT_ACTION: &str = "read";

/// One stored rule: `role` may perform `action` on `resource`.
///
/// A role *exists* iff at least one non-empty tuple exists for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyTuple {
    pub role: String,
    pub resource: String,
    pub action: String,
}

impl PolicyTuple {
    pub fn new(
        role: impl Into<String>,
        resource: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            resource: resource.into(),
            action: action.into(),
        }
    }

    /// The minimal default tuple assigned when a role is created with an
    /// empty permission list, preserving the "role exists ⇔ has tuples"
    /// invariant.
    pub fn default_for(role: impl Into<String>) -> Self {
        Self::new(role, DEFAULT_RESOURCE, DEFAULT_ACTION)
    }

    /// A tuple counts toward role existence only if no field is blank.
    pub fn is_well_formed(&self) -> bool {
        !self.role.trim().is_empty()
            && !self.resource.trim().is_empty()
            && !self.action.trim().is_empty()
    }
}

/// A (resource, action) grant supplied by callers of the CRUD API.
///
/// Structured end to end — no untyped detail payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub resource: String,
    pub action: String,
}

impl Permission {
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    pub fn into_tuple(self, role: &str) -> PolicyTuple {
        PolicyTuple::new(role, self.resource, self.action)
    }

    pub fn is_well_formed(&self) -> bool {
        !self.resource.trim().is_empty() && !self.action.trim().is_empty()
    }
}

impl From<PolicyTuple> for Permission {
    fn from(t: PolicyTuple) -> Self {
        Self {
            resource: t.resource,
            action: t.action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tuple_is_well_formed() {
        let t = PolicyTuple::default_for("viewer");
        assert_eq!(t.resource, DEFAULT_RESOURCE);
        assert_eq!(t.action, DEFAULT_ACTION);
        assert!(t.is_well_formed());
    }

    #[test]
    fn blank_fields_are_not_well_formed() {
        assert!(!PolicyTuple::new("", "r", "a").is_well_formed());
        assert!(!PolicyTuple::new("x", " ", "a").is_well_formed());
        assert!(!Permission::new("r", "").is_well_formed());
    }

    #[test]
    fn permission_into_tuple_carries_role() {
        let t = Permission::new("reports", "write").into_tuple("editor");
        assert_eq!(t, PolicyTuple::new("editor", "reports", "write"));
    }
}
