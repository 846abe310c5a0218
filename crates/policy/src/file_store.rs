//! File-backed rule store.
//!
//! One rule file per enforcement scope, one `p, role, resource, action` line
//! per tuple (the classic policy-file shape, so existing rule files keep
//! working). Lines starting with `#` and blank lines are ignored on load.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::store::{PolicyError, RuleStore};
use crate::tuple::PolicyTuple;

/// Durable [`RuleStore`] persisting to a single policy file.
#[derive(Debug)]
pub struct CsvRuleStore {
    path: PathBuf,
    rules: RwLock<Vec<PolicyTuple>>,
}

impl CsvRuleStore {
    /// Open a rule file, creating an empty store if the file is absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PolicyError> {
        let path = path.into();
        let rules = if path.exists() {
            load_rules(&path)?
        } else {
            Vec::new()
        };
        Ok(Self {
            path,
            rules: RwLock::new(rules),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_err() -> PolicyError {
        PolicyError::Storage("rule store lock poisoned".to_string())
    }
}

fn load_rules(path: &Path) -> Result<Vec<PolicyTuple>, PolicyError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| PolicyError::Storage(format!("{}: {e}", path.display())))?;

    let mut rules = Vec::new();
    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let ["p", role, resource, action] = fields.as_slice() else {
            return Err(PolicyError::Storage(format!(
                "{}:{}: malformed rule line",
                path.display(),
                line_no + 1
            )));
        };
        rules.push(PolicyTuple::new(*role, *resource, *action));
    }
    Ok(rules)
}

impl RuleStore for CsvRuleStore {
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
        let rules = self.rules.read().map_err(|_| Self::lock_err())?;

        let mut out = String::new();
        for t in rules.iter() {
            out.push_str(&format!("p, {}, {}, {}\n", t.role, t.resource, t.action));
        }

        // Write-then-rename so a crash mid-flush cannot truncate the rule set.
        let tmp = self.path.with_extension("tmp");
        let mut file = fs::File::create(&tmp)
            .map_err(|e| PolicyError::Storage(format!("{}: {e}", tmp.display())))?;
        file.write_all(out.as_bytes())
            .map_err(|e| PolicyError::Storage(format!("{}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| PolicyError::Storage(format!("{}: {e}", self.path.display())))?;

        tracing::debug!(path = %self.path.display(), rules = rules.len(), "persisted policy rules");
        Ok(())
    }
}
