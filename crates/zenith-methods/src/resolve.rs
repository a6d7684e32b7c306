//! Per-call overload resolution for supergeneric methods.
//!
//! The parser drives a [`CallResolver`] one argument at a time, in the
//! fixed slot order: specific outputs, generic outputs, specific
//! inputs, generic inputs. While the method is still a template, each
//! wildcard slot reads its argument's declared group, appends the group
//! name to a growing suffix and probes the registry for
//! `"<name>_for_<suffix>"`; a miss with a single-group suffix registers
//! the specialization lazily. Once concrete, the first remaining
//! wildcard slot binds the call's implicit type parameter and every
//! later wildcard slot must match it.
//!
//! Resolver errors carry no source position; the parser wraps them
//! with file, line and column.

use thiserror::Error;
use zenith_workspace::{Group, MethodId, VariableTable, WsvId};

use crate::error::join_groups;
use crate::record::{GroupSpec, MethodRecord};
use crate::registry::{MethodTable, Registry};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("unknown workspace variable: {name}{}", creation_hint(.expected, .name))]
    UnknownVariable {
        name: String,
        /// The slot's group when it is known, which makes the
        /// `<Group>Create` hint possible. Wildcard slots leave it
        /// unset.
        expected: Option<Group>,
    },

    #[error("a variable can only be created once: {0}")]
    VariableExists(String),

    #[error("{variable} is not {expected}, it is {actual}")]
    WrongGroup {
        variable: String,
        expected: Group,
        actual: Group,
    },

    #[error("{variable} is not {bound} (the group bound by the call's first generic argument), it is {actual}")]
    BoundMismatch {
        variable: String,
        bound: Group,
        actual: Group,
    },

    #[error("{method} is not defined for group {group} (allowed: {})", join_groups(.allowed))]
    NotDefinedFor {
        method: String,
        group: Group,
        allowed: Vec<Group>,
    },

    #[error("no registered specialization {0}")]
    NoSpecialization(String),

    #[error("{0} was not resolved to a concrete method")]
    Unresolved(String),

    #[error(transparent)]
    Registry(#[from] crate::error::Error),

    #[error(transparent)]
    Table(#[from] zenith_workspace::Error),
}

fn creation_hint(expected: &Option<Group>, name: &str) -> String {
    match expected {
        Some(group) => format!(" (create it first with {}Create({}))", group.name(), name),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Side {
    Output,
    Input,
}

/// Resolution state for one call site.
///
/// Holds no borrows; every step takes the registry explicitly so the
/// parser can keep a single `&mut Registry` across nested parses.
#[derive(Debug)]
pub struct CallResolver {
    /// The method name as written at the call site.
    base: String,
    /// Whether the base name follows the `<Group>Create` convention.
    create: bool,
    /// The record currently resolved to; switches as specialization
    /// proceeds.
    method: MethodId,
    /// Group names accumulated by template slots, `_`-joined.
    suffix: String,
    /// The implicit type parameter once a concrete wildcard slot has
    /// bound it.
    bound: Option<Group>,
}

impl CallResolver {
    pub fn new(methods: &MethodTable, method: MethodId) -> Self {
        let record = methods.record(method);
        Self {
            base: record.name.clone(),
            create: record.is_create(),
            method,
            suffix: String::new(),
            bound: None,
        }
    }

    /// The method name as written at the call site.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The record currently resolved to. Only final after [`finish`].
    ///
    /// [`finish`]: CallResolver::finish
    pub fn method(&self) -> MethodId {
        self.method
    }

    pub fn record<'a>(&self, methods: &'a MethodTable) -> &'a MethodRecord {
        methods.record(self.method)
    }

    /// The concrete group a literal or default for generic input
    /// `index` must parse as; `None` while the slot is a wildcard.
    pub fn gin_group(&self, methods: &MethodTable, index: usize) -> Option<Group> {
        match methods.record(self.method).gin_types.get(index) {
            Some(GroupSpec::Exact(group)) => Some(*group),
            _ => None,
        }
    }

    /// The declared group of specific input `index`, directing literal
    /// parsing at that position.
    pub fn specific_input_group(&self, registry: &Registry, index: usize) -> Group {
        let declared = registry.methods.record(self.method).inputs[index];
        registry.variables.record(declared).group()
    }

    /// Resolves the name supplied for specific output `index`. The
    /// record declares a default variable for the slot; a call may
    /// substitute any variable of the same group. Unknown names are
    /// created only by `<Group>Create` methods, which in turn reject
    /// names that already exist.
    pub fn specific_output(
        &mut self,
        registry: &mut Registry,
        index: usize,
        name: &str,
    ) -> Result<WsvId, ResolveError> {
        let Registry { variables, methods } = registry;
        let declared = methods.record(self.method).outputs[index];
        let expected = variables.record(declared).group();
        match variables.lookup(name) {
            Some(id) => {
                if self.create {
                    return Err(ResolveError::VariableExists(name.to_string()));
                }
                let actual = variables.record(id).group();
                if actual != expected {
                    return Err(ResolveError::WrongGroup {
                        variable: name.to_string(),
                        expected,
                        actual,
                    });
                }
                Ok(id)
            }
            None if self.create => {
                let description = format!("created by {}", self.base);
                Ok(variables.add(name, expected, &description)?)
            }
            None => Err(ResolveError::UnknownVariable {
                name: name.to_string(),
                expected: Some(expected),
            }),
        }
    }

    /// Resolves the name supplied for specific input `index`. Inputs
    /// never create variables.
    pub fn specific_input(
        &mut self,
        registry: &mut Registry,
        index: usize,
        name: &str,
    ) -> Result<WsvId, ResolveError> {
        let Registry { variables, methods } = registry;
        let declared = methods.record(self.method).inputs[index];
        let expected = variables.record(declared).group();
        match variables.lookup(name) {
            Some(id) => {
                let actual = variables.record(id).group();
                if actual != expected {
                    return Err(ResolveError::WrongGroup {
                        variable: name.to_string(),
                        expected,
                        actual,
                    });
                }
                Ok(id)
            }
            None => Err(ResolveError::UnknownVariable {
                name: name.to_string(),
                expected: Some(expected),
            }),
        }
    }

    /// Resolves the name supplied for generic output `index`,
    /// specializing the method first when the slot is still a template
    /// wildcard. Unknown names at a concrete slot are created with the
    /// slot's group; at a template slot the group is unknowable, so
    /// they fail.
    pub fn generic_output(
        &mut self,
        registry: &mut Registry,
        index: usize,
        name: &str,
    ) -> Result<WsvId, ResolveError> {
        self.resolve_generic(registry, Side::Output, index, name)
    }

    /// Resolves the name supplied for generic input `index`. Inputs
    /// never create variables; an unknown name at a concrete slot
    /// carries the `<Group>Create` hint.
    pub fn generic_input(
        &mut self,
        registry: &mut Registry,
        index: usize,
        name: &str,
    ) -> Result<WsvId, ResolveError> {
        self.resolve_generic(registry, Side::Input, index, name)
    }

    /// Final check: the call must have ended on a concrete record.
    pub fn finish(self, methods: &MethodTable) -> Result<MethodId, ResolveError> {
        if self.record(methods).is_template() {
            return Err(ResolveError::Unresolved(self.base));
        }
        Ok(self.method)
    }

    fn resolve_generic(
        &mut self,
        registry: &mut Registry,
        side: Side,
        index: usize,
        name: &str,
    ) -> Result<WsvId, ResolveError> {
        let Registry { variables, methods } = registry;
        let template = methods.record(self.method).is_template();
        let spec = self.slot_spec(methods, side, index).clone();

        if template && spec.is_any() {
            // Template step: one suffix segment per slot, then the
            // slot is re-resolved against the switched-to record.
            let id = variables
                .lookup(name)
                .ok_or_else(|| ResolveError::UnknownVariable {
                    name: name.to_string(),
                    expected: None,
                })?;
            let group = variables.record(id).group();
            if !self.suffix.is_empty() {
                self.suffix.push('_');
            }
            self.suffix.push_str(group.name());
            let probe = format!("{}_for_{}", self.base, self.suffix);
            self.method = match methods.lookup(&probe) {
                Some(hit) => hit,
                None if self.suffix == group.name() => methods.specialize(self.method, group)?,
                None => return Err(ResolveError::NoSpecialization(probe)),
            };
            let spec = self.slot_spec(methods, side, index).clone();
            return self.concrete_slot(variables, side, &spec, name);
        }

        self.concrete_slot(variables, side, &spec, name)
    }

    fn slot_spec<'a>(&self, methods: &'a MethodTable, side: Side, index: usize) -> &'a GroupSpec {
        let record = methods.record(self.method);
        match side {
            Side::Output => &record.gout_types[index],
            Side::Input => &record.gin_types[index],
        }
    }

    fn concrete_slot(
        &mut self,
        variables: &mut VariableTable,
        side: Side,
        spec: &GroupSpec,
        name: &str,
    ) -> Result<WsvId, ResolveError> {
        match spec {
            GroupSpec::Exact(expected) => self.exact_slot(variables, side, *expected, name),
            GroupSpec::Any { allowed } => self.bind_slot(variables, side, allowed, name),
        }
    }

    fn exact_slot(
        &mut self,
        variables: &mut VariableTable,
        side: Side,
        expected: Group,
        name: &str,
    ) -> Result<WsvId, ResolveError> {
        match variables.lookup(name) {
            Some(id) => {
                if side == Side::Output && self.create {
                    return Err(ResolveError::VariableExists(name.to_string()));
                }
                let actual = variables.record(id).group();
                if actual != expected {
                    return Err(ResolveError::WrongGroup {
                        variable: name.to_string(),
                        expected,
                        actual,
                    });
                }
                Ok(id)
            }
            None if side == Side::Output => {
                let description = format!("created by {}", self.base);
                Ok(variables.add(name, expected, &description)?)
            }
            None => Err(ResolveError::UnknownVariable {
                name: name.to_string(),
                expected: Some(expected),
            }),
        }
    }

    fn bind_slot(
        &mut self,
        variables: &mut VariableTable,
        side: Side,
        allowed: &[Group],
        name: &str,
    ) -> Result<WsvId, ResolveError> {
        let id = variables
            .lookup(name)
            .ok_or_else(|| ResolveError::UnknownVariable {
                name: name.to_string(),
                expected: None,
            })?;
        if side == Side::Output && self.create {
            return Err(ResolveError::VariableExists(name.to_string()));
        }
        let actual = variables.record(id).group();
        match self.bound {
            Some(bound) => {
                if actual != bound {
                    return Err(ResolveError::BoundMismatch {
                        variable: name.to_string(),
                        bound,
                        actual,
                    });
                }
            }
            None => {
                if !allowed.is_empty() && !allowed.contains(&actual) {
                    return Err(ResolveError::NotDefinedFor {
                        method: self.base.clone(),
                        group: actual,
                        allowed: allowed.to_vec(),
                    });
                }
                self.bound = Some(actual);
            }
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn copy_template() -> MethodRecord {
        MethodRecord {
            name: "Copy".into(),
            gouts: vec!["out".into()],
            gout_types: vec![GroupSpec::any()],
            gins: vec!["in".into()],
            gin_types: vec![GroupSpec::any()],
            gin_defaults: vec![None],
            ..MethodRecord::default()
        }
    }

    fn registry() -> (Registry, MethodId) {
        let mut registry = Registry::new();
        registry.variables.add("v", Group::Vector, "a vector").unwrap();
        registry.variables.add("w", Group::Vector, "a vector").unwrap();
        registry.variables.add("m", Group::Matrix, "a matrix").unwrap();
        let copy = registry.methods.register(copy_template()).unwrap();
        (registry, copy)
    }

    #[test]
    fn copy_specializes_on_the_first_argument() {
        let (mut registry, copy) = registry();
        let mut resolver = CallResolver::new(&registry.methods, copy);

        resolver.generic_output(&mut registry, 0, "w").unwrap();
        assert_eq!(registry.methods.name(resolver.method()), "Copy_for_Vector");

        resolver.generic_input(&mut registry, 0, "v").unwrap();
        let concrete = resolver.finish(&registry.methods).unwrap();
        assert_eq!(
            registry.methods.record(concrete).gin_types,
            vec![GroupSpec::Exact(Group::Vector)]
        );
    }

    #[test]
    fn group_mismatch_names_both_groups() {
        let (mut registry, copy) = registry();
        let mut resolver = CallResolver::new(&registry.methods, copy);

        resolver.generic_output(&mut registry, 0, "w").unwrap();
        let err = resolver.generic_input(&mut registry, 0, "m").unwrap_err();
        assert_eq!(
            err,
            ResolveError::WrongGroup {
                variable: "m".into(),
                expected: Group::Vector,
                actual: Group::Matrix,
            }
        );
        assert_eq!(err.to_string(), "m is not Vector, it is Matrix");
    }

    #[test]
    fn unknown_name_at_a_template_slot_fails() {
        let (mut registry, copy) = registry();
        let mut resolver = CallResolver::new(&registry.methods, copy);

        let err = resolver.generic_output(&mut registry, 0, "fresh").unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnknownVariable {
                name: "fresh".into(),
                expected: None,
            }
        );
    }

    #[test]
    fn lazy_specialization_is_registered_once() {
        let (mut registry, copy) = registry();

        let mut first = CallResolver::new(&registry.methods, copy);
        first.generic_output(&mut registry, 0, "w").unwrap();
        first.generic_input(&mut registry, 0, "v").unwrap();
        let methods_after_first = registry.methods.len();

        let mut second = CallResolver::new(&registry.methods, copy);
        second.generic_output(&mut registry, 0, "v").unwrap();
        second.generic_input(&mut registry, 0, "w").unwrap();
        assert_eq!(registry.methods.len(), methods_after_first);
        assert_eq!(
            first.finish(&registry.methods),
            second.finish(&registry.methods)
        );
    }

    #[test]
    fn concrete_generic_output_creates_unknown_variables() {
        let (mut registry, _) = registry();
        let set = registry
            .methods
            .register(MethodRecord {
                name: "VectorSet".into(),
                gouts: vec!["out".into()],
                gout_types: vec![GroupSpec::Exact(Group::Vector)],
                gins: vec!["length".into(), "value".into()],
                gin_types: vec![
                    GroupSpec::Exact(Group::Index),
                    GroupSpec::Exact(Group::Numeric),
                ],
                gin_defaults: vec![None, None],
                ..MethodRecord::default()
            })
            .unwrap();

        let mut resolver = CallResolver::new(&registry.methods, set);
        let id = resolver.generic_output(&mut registry, 0, "fresh").unwrap();
        let record = registry.variables.record(id);
        assert_eq!(record.group(), Group::Vector);
        assert!(!record.is_automatic());
    }

    #[test]
    fn unknown_input_hints_at_the_create_method() {
        let (mut registry, _) = registry();
        let set = registry
            .methods
            .register(MethodRecord {
                name: "VectorScale".into(),
                gouts: vec!["out".into()],
                gout_types: vec![GroupSpec::Exact(Group::Vector)],
                gins: vec!["in".into()],
                gin_types: vec![GroupSpec::Exact(Group::Vector)],
                gin_defaults: vec![None],
                ..MethodRecord::default()
            })
            .unwrap();

        let mut resolver = CallResolver::new(&registry.methods, set);
        resolver.generic_output(&mut registry, 0, "v").unwrap();
        let err = resolver.generic_input(&mut registry, 0, "missing").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown workspace variable: missing (create it first with VectorCreate(missing))"
        );
    }

    #[test]
    fn create_methods_reject_existing_names() {
        let (mut registry, _) = registry();
        let create = registry
            .methods
            .register(MethodRecord {
                name: "VectorCreate".into(),
                gouts: vec!["out".into()],
                gout_types: vec![GroupSpec::Exact(Group::Vector)],
                ..MethodRecord::default()
            })
            .unwrap();

        let mut resolver = CallResolver::new(&registry.methods, create);
        let err = resolver.generic_output(&mut registry, 0, "v").unwrap_err();
        assert_eq!(err, ResolveError::VariableExists("v".into()));

        let mut resolver = CallResolver::new(&registry.methods, create);
        let id = resolver.generic_output(&mut registry, 0, "fresh").unwrap();
        assert_eq!(registry.variables.record(id).group(), Group::Vector);
    }

    #[test]
    fn hand_registered_any_slots_bind_one_group() {
        let (mut registry, _) = registry();
        let append = registry
            .methods
            .register(MethodRecord {
                name: "Append_for_Vector".into(),
                gouts: vec!["out".into()],
                gout_types: vec![GroupSpec::Exact(Group::Vector)],
                gins: vec!["a".into(), "b".into()],
                gin_types: vec![
                    GroupSpec::any_of(&[Group::Vector, Group::Matrix]),
                    GroupSpec::any(),
                ],
                gin_defaults: vec![None, None],
                template_of: Some(MethodId(0)),
                ..MethodRecord::default()
            })
            .unwrap();

        // Second wildcard must match the group bound by the first.
        let mut resolver = CallResolver::new(&registry.methods, append);
        resolver.generic_output(&mut registry, 0, "v").unwrap();
        resolver.generic_input(&mut registry, 0, "v").unwrap();
        let err = resolver.generic_input(&mut registry, 1, "m").unwrap_err();
        assert_eq!(
            err,
            ResolveError::BoundMismatch {
                variable: "m".into(),
                bound: Group::Vector,
                actual: Group::Matrix,
            }
        );

        let mut resolver = CallResolver::new(&registry.methods, append);
        resolver.generic_output(&mut registry, 0, "v").unwrap();
        resolver.generic_input(&mut registry, 0, "v").unwrap();
        resolver.generic_input(&mut registry, 1, "w").unwrap();
        assert!(resolver.finish(&registry.methods).is_ok());
    }

    #[test]
    fn binding_respects_the_allowed_set() {
        let (mut registry, _) = registry();
        registry.variables.add("s", Group::String, "text").unwrap();
        let append = registry
            .methods
            .register(MethodRecord {
                name: "Append_for_Vector".into(),
                gins: vec!["a".into()],
                gin_types: vec![GroupSpec::any_of(&[Group::Vector, Group::Matrix])],
                gin_defaults: vec![None],
                template_of: Some(MethodId(0)),
                ..MethodRecord::default()
            })
            .unwrap();

        let mut resolver = CallResolver::new(&registry.methods, append);
        let err = resolver.generic_input(&mut registry, 0, "s").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Append_for_Vector is not defined for group String (allowed: Vector, Matrix)"
        );
    }

    #[test]
    fn multi_group_suffixes_require_hand_registration() {
        let (mut registry, _) = registry();
        registry
            .methods
            .register(MethodRecord {
                name: "Join".into(),
                gouts: vec!["out".into()],
                gout_types: vec![GroupSpec::any()],
                gins: vec!["in".into()],
                gin_types: vec![GroupSpec::any()],
                gin_defaults: vec![None],
                ..MethodRecord::default()
            })
            .unwrap();
        // A partial specialization that still leaves its input generic.
        let partial = registry
            .methods
            .register(MethodRecord {
                name: "Join_for_Vector".into(),
                gouts: vec!["out".into()],
                gout_types: vec![GroupSpec::Exact(Group::Vector)],
                gins: vec!["in".into()],
                gin_types: vec![GroupSpec::any()],
                gin_defaults: vec![None],
                ..MethodRecord::default()
            })
            .unwrap();
        let join = registry.methods.lookup("Join").unwrap();

        let mut resolver = CallResolver::new(&registry.methods, join);
        resolver.generic_output(&mut registry, 0, "v").unwrap();
        assert_eq!(resolver.method(), partial);

        let err = resolver.generic_input(&mut registry, 0, "m").unwrap_err();
        assert_eq!(
            err,
            ResolveError::NoSpecialization("Join_for_Vector_Matrix".into())
        );
    }

    #[test]
    fn specific_slots_accept_same_group_substitutes() {
        let (mut registry, _) = registry();
        let sink = registry.variables.add("sink", Group::Matrix, "").unwrap();
        let absorb = registry
            .methods
            .register(MethodRecord {
                name: "Absorb".into(),
                outputs: vec![sink],
                ..MethodRecord::default()
            })
            .unwrap();

        let mut resolver = CallResolver::new(&registry.methods, absorb);
        assert_eq!(resolver.specific_output(&mut registry, 0, "m"), Ok(WsvId(2)));

        let mut resolver = CallResolver::new(&registry.methods, absorb);
        let err = resolver.specific_output(&mut registry, 0, "v").unwrap_err();
        assert_eq!(
            err,
            ResolveError::WrongGroup {
                variable: "v".into(),
                expected: Group::Matrix,
                actual: Group::Vector,
            }
        );

        let mut resolver = CallResolver::new(&registry.methods, absorb);
        let err = resolver.specific_output(&mut registry, 0, "late").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown workspace variable: late (create it first with MatrixCreate(late))"
        );
    }

    #[test]
    fn finish_rejects_unresolved_templates() {
        let (registry, copy) = registry();
        let resolver = CallResolver::new(&registry.methods, copy);
        assert_eq!(
            resolver.finish(&registry.methods),
            Err(ResolveError::Unresolved("Copy".into()))
        );
    }
}
