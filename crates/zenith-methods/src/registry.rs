//! The method table and the combined resolution registry.
//!
//! Both tables are append-only and grow monotonically during parsing;
//! no entry is ever mutated or removed, so ids captured by nested
//! parses stay valid.

use indexmap::IndexMap;
use zenith_workspace::{Group, MethodId, VariableTable};

use crate::builtin;
use crate::error::{Error, Result};
use crate::record::{GroupSpec, MethodRecord};

/// Append-only catalog of method signatures.
///
/// Supergeneric templates are keyed by their bare name; concrete
/// specializations are additionally keyed `"<name>_for_<Group>"`.
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    records: Vec<MethodRecord>,
    by_name: IndexMap<String, MethodId>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<MethodId> {
        self.by_name.get(name).copied()
    }

    /// The record behind `id`. Ids are only minted by this table.
    pub fn record(&self, id: MethodId) -> &MethodRecord {
        &self.records[id.0]
    }

    /// The registered name behind `id`.
    pub fn name(&self, id: MethodId) -> &str {
        &self.record(id).name
    }

    /// Registers a signature after validating its invariants.
    pub fn register(&mut self, record: MethodRecord) -> Result<MethodId> {
        record.validate()?;
        if self.by_name.contains_key(&record.name) {
            return Err(Error::DuplicateMethod(record.name));
        }
        let id = MethodId(self.records.len());
        self.by_name.insert(record.name.clone(), id);
        self.records.push(record);
        Ok(id)
    }

    /// Registers (or returns the already-registered) concrete
    /// specialization of a template for one group, binding every
    /// wildcard slot to that group. A hand-registered record under the
    /// specialization name wins over lazy expansion.
    pub fn specialize(&mut self, template: MethodId, group: Group) -> Result<MethodId> {
        let record = self.record(template).clone();
        if !record.is_template() {
            return Err(Error::NotTemplate(record.name));
        }
        let name = format!("{}_for_{}", record.name, group.name());
        if let Some(id) = self.lookup(&name) {
            return Ok(id);
        }
        for spec in record.gout_types.iter().chain(record.gin_types.iter()) {
            if let GroupSpec::Any { allowed } = spec {
                if !allowed.is_empty() && !allowed.contains(&group) {
                    return Err(Error::GroupNotAllowed {
                        method: record.name,
                        group,
                        allowed: allowed.clone(),
                    });
                }
            }
        }
        let mut concrete = record;
        concrete.name = name;
        concrete.template_of = Some(template);
        for spec in concrete
            .gout_types
            .iter_mut()
            .chain(concrete.gin_types.iter_mut())
        {
            if spec.is_any() {
                *spec = GroupSpec::Exact(group);
            }
        }
        self.register(concrete)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MethodId, &MethodRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (MethodId(i), r))
    }
}

/// Everything the parser and executor resolve names against: the
/// variable table and the method table, as one explicit context object.
/// Constructed once and passed by reference; tests build isolated
/// registries of their own.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub variables: VariableTable,
    pub methods: MethodTable,
}

impl Registry {
    /// An empty registry with no variables or methods.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry loaded with the standard method library.
    pub fn standard() -> Result<Self> {
        let mut registry = Self::new();
        builtin::install(&mut registry)?;
        Ok(registry)
    }
}
