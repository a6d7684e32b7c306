//! The workspace variable table.
//!
//! Maps variable names to stable ids and declared groups. The table is
//! append-only: ids are assigned monotonically and never reused, so an
//! id captured by a nested parse stays valid in the enclosing one.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::group::Group;
use crate::ids::WsvId;

/// Declaration of one workspace variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WsvRecord {
    name: String,
    group: Group,
    description: String,
    automatic: bool,
}

impl WsvRecord {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// True for parser-created slots backing literal arguments and
    /// lowered defaults.
    pub fn is_automatic(&self) -> bool {
        self.automatic
    }
}

/// Append-only registry of variable declarations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariableTable {
    records: Vec<WsvRecord>,
    by_name: IndexMap<String, WsvId>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<WsvId> {
        self.by_name.get(name).copied()
    }

    /// The record behind `id`. Ids are only minted by this table.
    pub fn record(&self, id: WsvId) -> &WsvRecord {
        &self.records[id.0]
    }

    /// The declared name behind `id`.
    pub fn name(&self, id: WsvId) -> &str {
        self.record(id).name()
    }

    /// Adds a variable, memoizing by name: adding an existing name with
    /// the same group returns the existing id unchanged, while a
    /// different group is an error. Wildcard variables are rejected.
    pub fn add(&mut self, name: &str, group: Group, description: &str) -> Result<WsvId> {
        self.insert(name, group, description, false)
    }

    /// Adds a parser-created slot (see [`WsvRecord::is_automatic`]).
    pub fn add_automatic(&mut self, name: &str, group: Group) -> Result<WsvId> {
        self.insert(name, group, "automatically created variable", true)
    }

    fn insert(&mut self, name: &str, group: Group, description: &str, automatic: bool) -> Result<WsvId> {
        if group.is_any() {
            return Err(Error::WildcardVariable(name.to_string()));
        }
        if let Some(id) = self.lookup(name) {
            let existing = self.record(id).group();
            if existing != group {
                return Err(Error::GroupConflict {
                    name: name.to_string(),
                    existing,
                    requested: group,
                });
            }
            return Ok(id);
        }
        let id = WsvId(self.records.len());
        self.records.push(WsvRecord {
            name: name.to_string(),
            group,
            description: description.to_string(),
            automatic,
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (WsvId, &WsvRecord)> {
        self.records.iter().enumerate().map(|(i, r)| (WsvId(i), r))
    }
}
