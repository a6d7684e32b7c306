//! The resolved program model.
//!
//! The parser emits [`Agenda`]s and the executor consumes them. An
//! agenda is itself a workspace value, which is what allows programs to
//! be stored in variables, passed to methods, and invoked recursively.

use serde::{Deserialize, Serialize};

use crate::ids::{MethodId, WsvId};
use crate::value::Value;

/// One resolved method call.
///
/// `outputs` and `inputs` are the full ordered slot lists of the
/// resolved signature, specific slots before generic ones. `value`
/// carries the literal of an assign-method call; `nested` carries the
/// brace body of a program-valued call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    pub method: MethodId,
    pub outputs: Vec<WsvId>,
    pub inputs: Vec<WsvId>,
    pub value: Option<Value>,
    pub nested: Option<Agenda>,
}

impl Invocation {
    pub fn new(method: MethodId, outputs: Vec<WsvId>, inputs: Vec<WsvId>) -> Self {
        Self {
            method,
            outputs,
            inputs,
            value: None,
            nested: None,
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_nested(mut self, nested: Agenda) -> Self {
        self.nested = Some(nested);
        self
    }
}

/// An ordered sequence of resolved invocations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Agenda {
    pub name: String,
    pub invocations: Vec<Invocation>,
}

impl Agenda {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            invocations: Vec::new(),
        }
    }

    pub fn push(&mut self, invocation: Invocation) {
        self.invocations.push(invocation);
    }

    pub fn len(&self) -> usize {
        self.invocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invocations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Invocation> {
        self.invocations.iter()
    }
}
