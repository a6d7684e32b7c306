//! Method signature records.

use serde::{Deserialize, Serialize};
use zenith_workspace::{Group, MethodId, VariableTable, WsvId};

use crate::error::{Error, Result};

/// Group requirement of one generic argument slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GroupSpec {
    /// The slot takes exactly this group.
    Exact(Group),
    /// Wildcard slot. An empty `allowed` list admits every storable
    /// group.
    Any { allowed: Vec<Group> },
}

impl GroupSpec {
    /// An unrestricted wildcard slot.
    pub fn any() -> Self {
        GroupSpec::Any {
            allowed: Vec::new(),
        }
    }

    /// A wildcard slot restricted to the given groups.
    pub fn any_of(allowed: &[Group]) -> Self {
        GroupSpec::Any {
            allowed: allowed.to_vec(),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, GroupSpec::Any { .. })
    }

    /// Whether a variable of `group` satisfies this slot (for wildcard
    /// slots, before the implicit type parameter is bound).
    pub fn admits(&self, group: Group) -> bool {
        match self {
            GroupSpec::Exact(g) => *g == group,
            GroupSpec::Any { allowed } => allowed.is_empty() || allowed.contains(&group),
        }
    }
}

/// One callable method signature.
///
/// `outputs`/`inputs` are the specific slots, fixed references into the
/// variable table; `gouts`/`gins` are the named generic slots resolved
/// per call site. The generic input arrays (`gins`, `gin_types`,
/// `gin_defaults`) are parallel and must have equal length; defaults
/// are stored as literal source text and parsed when a call omits the
/// argument.
///
/// A record with a wildcard slot and no `template_of` is a supergeneric
/// template. Concrete specializations keep `template_of` pointing at
/// their template; a hand-registered specialization may retain wildcard
/// slots, which are then bound per call against their allowed set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MethodRecord {
    pub name: String,
    pub description: String,
    pub outputs: Vec<WsvId>,
    pub inputs: Vec<WsvId>,
    pub gouts: Vec<String>,
    pub gout_types: Vec<GroupSpec>,
    pub gins: Vec<String>,
    pub gin_types: Vec<GroupSpec>,
    pub gin_defaults: Vec<Option<String>>,
    /// The method takes a brace-delimited program body.
    pub program_valued: bool,
    /// The method assigns the literal carried on its invocation.
    pub assign: bool,
    pub template_of: Option<MethodId>,
}

impl MethodRecord {
    pub fn is_template(&self) -> bool {
        self.template_of.is_none()
            && self
                .gout_types
                .iter()
                .chain(self.gin_types.iter())
                .any(GroupSpec::is_any)
    }

    /// Whether this method follows the variable-creation naming
    /// convention.
    pub fn is_create(&self) -> bool {
        self.name.len() > "Create".len() && self.name.ends_with("Create")
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.gouts.len() != self.gout_types.len() {
            return Err(Error::MismatchedGouts(self.name.clone()));
        }
        if self.gins.len() != self.gin_types.len() || self.gins.len() != self.gin_defaults.len() {
            return Err(Error::MismatchedGins(self.name.clone()));
        }
        if self.assign && (self.gouts.len() != 1 || self.gins.len() != 1) {
            return Err(Error::BadAssignRecord(self.name.clone()));
        }
        Ok(())
    }

    /// Renders the signature the way `--describe` prints it, e.g.
    /// `VectorSet( out : Vector, length : Index, value : Numeric )`.
    pub fn signature(&self, variables: &VariableTable) -> String {
        fn spec_name(spec: &GroupSpec) -> String {
            match spec {
                GroupSpec::Exact(g) => g.name().to_string(),
                GroupSpec::Any { allowed } if allowed.is_empty() => "Any".to_string(),
                GroupSpec::Any { allowed } => format!("Any<{}>", crate::error::join_groups(allowed)),
            }
        }

        let mut parts = Vec::new();
        for &id in &self.outputs {
            parts.push(format!(
                "{} : {}",
                variables.name(id),
                variables.record(id).group()
            ));
        }
        for (name, spec) in self.gouts.iter().zip(&self.gout_types) {
            parts.push(format!("{} : {}", name, spec_name(spec)));
        }
        for &id in &self.inputs {
            parts.push(format!(
                "{} : {}",
                variables.name(id),
                variables.record(id).group()
            ));
        }
        for ((name, spec), default) in self.gins.iter().zip(&self.gin_types).zip(&self.gin_defaults)
        {
            match default {
                Some(text) => parts.push(format!("{} : {} = {:?}", name, spec_name(spec), text)),
                None => parts.push(format!("{} : {}", name, spec_name(spec))),
            }
        }
        if parts.is_empty() {
            self.name.clone()
        } else {
            format!("{}( {} )", self.name, parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_detection() {
        let copy = MethodRecord {
            name: "Copy".into(),
            gouts: vec!["out".into()],
            gout_types: vec![GroupSpec::any()],
            gins: vec!["in".into()],
            gin_types: vec![GroupSpec::any()],
            gin_defaults: vec![None],
            ..MethodRecord::default()
        };
        assert!(copy.is_template());

        let mut concrete = copy.clone();
        concrete.template_of = Some(MethodId(0));
        assert!(!concrete.is_template());
    }

    #[test]
    fn create_convention_is_name_based() {
        let mut record = MethodRecord {
            name: "VectorCreate".into(),
            ..MethodRecord::default()
        };
        assert!(record.is_create());
        record.name = "Create".into();
        assert!(!record.is_create());
        record.name = "VectorSet".into();
        assert!(!record.is_create());
    }

    #[test]
    fn validate_rejects_mismatched_arrays() {
        let record = MethodRecord {
            name: "Broken".into(),
            gins: vec!["a".into(), "b".into()],
            gin_types: vec![GroupSpec::Exact(Group::Index)],
            gin_defaults: vec![None, None],
            ..MethodRecord::default()
        };
        assert_eq!(record.validate(), Err(Error::MismatchedGins("Broken".into())));
    }

    #[test]
    fn wildcard_allowed_sets() {
        let spec = GroupSpec::any_of(&[Group::Vector, Group::Matrix]);
        assert!(spec.admits(Group::Vector));
        assert!(!spec.admits(Group::Index));
        assert!(GroupSpec::any().admits(Group::Agenda));
    }
}
