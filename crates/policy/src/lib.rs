//! `sentra-policy` — role→(resource, action) policy storage and CRUD.
//!
//! Two independent enforcement scopes share one rule-store abstraction: the
//! application-wide scope (coarse, read-only at runtime) and the resource
//! scope (exposed for CRUD). The split is encoded in the types — see
//! [`AppScope`] and [`ResourceScope`] — so "mutations target only the
//! resource scope" is a compile-time fact, not a runtime convention.

pub mod file_store;
pub mod repository;
pub mod store;
pub mod tuple;

pub use file_store::CsvRuleStore;
pub use repository::{AppScope, PolicyRepository, ResourceScope};
pub use store::{InMemoryRuleStore, PolicyError, RuleStore};
pub use tuple::{Permission, PolicyTuple};
