//! Sequential agenda executor.
//!
//! Runs one invocation at a time in program order. Before dispatch,
//! every input slot must carry the written flag; after a successful
//! call, every output slot is marked written whether or not the
//! implementation stored into it. That coarse marking is deliberate:
//! a method's declared outputs are treated as produced by the call,
//! which keeps the dependency check a plain flag test.

use tracing::{debug, instrument};
use zenith_methods::Registry;
use zenith_workspace::{Agenda, Invocation, Value, Workspace, WsvId};

use crate::dispatch::DispatchTable;
use crate::error::{Error, MethodError, Result};

/// Runs parsed agendas against a workspace.
#[derive(Debug)]
pub struct Executor {
    registry: Registry,
    dispatch: DispatchTable,
}

impl Executor {
    pub fn new(registry: Registry, dispatch: DispatchTable) -> Self {
        Self { registry, dispatch }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[instrument(skip(self, ws, agenda), fields(agenda = %agenda.name))]
    pub fn run(&self, ws: &mut Workspace, agenda: &Agenda) -> Result<()> {
        for invocation in &agenda.invocations {
            self.step(ws, invocation)?;
        }
        Ok(())
    }

    fn step(&self, ws: &mut Workspace, invocation: &Invocation) -> Result<()> {
        let name = self.registry.methods.name(invocation.method);
        for &input in &invocation.inputs {
            if !ws.is_written(input) {
                return Err(Error::MissingInput {
                    method: name.to_string(),
                    variable: self.registry.variables.name(input).to_string(),
                });
            }
        }
        let Some(implementation) = self
            .dispatch
            .entry_for(&self.registry.methods, invocation.method)
        else {
            return Err(Error::NoImplementation(name.to_string()));
        };
        debug!(method = name, "dispatch");
        let mut ctx = CallContext {
            ws: &mut *ws,
            registry: &self.registry,
            exec: self,
        };
        implementation(&mut ctx, invocation).map_err(|e| Error::MethodFailed {
            method: name.to_string(),
            message: e.to_string(),
        })?;
        for &output in &invocation.outputs {
            ws.mark_written(output);
        }
        Ok(())
    }
}

/// What a method implementation can see: the workspace it reads and
/// writes, the registry for names and signatures, and the executor
/// for running stored agendas.
#[derive(Debug)]
pub struct CallContext<'a> {
    pub ws: &'a mut Workspace,
    pub registry: &'a Registry,
    exec: &'a Executor,
}

impl CallContext<'_> {
    pub fn value(&self, id: WsvId) -> &Value {
        self.ws.value(id)
    }

    pub fn set(&mut self, id: WsvId, value: Value) {
        self.ws.set(id, value);
    }

    pub fn clear(&mut self, id: WsvId) {
        self.ws.clear(id);
    }

    pub fn variable_name(&self, id: WsvId) -> &str {
        self.registry.variables.name(id)
    }

    pub fn index(&self, id: WsvId) -> std::result::Result<i64, MethodError> {
        self.ws
            .value(id)
            .as_index()
            .ok_or_else(|| self.wrong_value(id, "an Index"))
    }

    pub fn numeric(&self, id: WsvId) -> std::result::Result<f64, MethodError> {
        self.ws
            .value(id)
            .as_numeric()
            .ok_or_else(|| self.wrong_value(id, "a Numeric"))
    }

    pub fn string(&self, id: WsvId) -> std::result::Result<&str, MethodError> {
        self.ws
            .value(id)
            .as_string()
            .ok_or_else(|| self.wrong_value(id, "a String"))
    }

    pub fn agenda(&self, id: WsvId) -> std::result::Result<&Agenda, MethodError> {
        self.ws
            .value(id)
            .as_agenda()
            .ok_or_else(|| self.wrong_value(id, "an Agenda"))
    }

    /// Runs a stored agenda against the same workspace.
    pub fn run_agenda(&mut self, agenda: &Agenda) -> std::result::Result<(), MethodError> {
        self.exec
            .run(self.ws, agenda)
            .map_err(|e| MethodError(e.to_string()))
    }

    fn wrong_value(&self, id: WsvId, expected: &str) -> MethodError {
        MethodError(format!(
            "{} does not hold {expected} value, it holds {}",
            self.variable_name(id),
            self.ws.value(id).group()
        ))
    }
}
