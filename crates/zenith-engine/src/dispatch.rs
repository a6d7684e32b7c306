//! Method implementation table.

use std::fmt;

use zenith_methods::MethodTable;
use zenith_workspace::{Invocation, MethodId};

use crate::error::{Error, MethodError, Result};
use crate::executor::CallContext;

/// Implementation of one method signature.
pub type MethodFn =
    Box<dyn Fn(&mut CallContext<'_>, &Invocation) -> std::result::Result<(), MethodError> + Send + Sync>;

/// Implementations indexed by method id.
///
/// A specialization without an entry of its own falls back to its
/// template's entry, so one implementation serves every group a
/// wildcard method binds to.
#[derive(Default)]
pub struct DispatchTable {
    entries: Vec<Option<MethodFn>>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, method: MethodId, implementation: MethodFn) {
        if self.entries.len() <= method.0 {
            self.entries.resize_with(method.0 + 1, || None);
        }
        self.entries[method.0] = Some(implementation);
    }

    /// Registers against the record named `name` in `methods`.
    pub fn register_named(
        &mut self,
        methods: &MethodTable,
        name: &str,
        implementation: MethodFn,
    ) -> Result<()> {
        let id = methods
            .lookup(name)
            .ok_or_else(|| Error::UnknownMethod(name.to_string()))?;
        self.register(id, implementation);
        Ok(())
    }

    /// The implementation dispatched for `method`: its own entry, or
    /// its template's.
    pub fn entry_for(&self, methods: &MethodTable, method: MethodId) -> Option<&MethodFn> {
        if let Some(implementation) = self.entry(method) {
            return Some(implementation);
        }
        let template = methods.record(method).template_of?;
        self.entry(template)
    }

    fn entry(&self, method: MethodId) -> Option<&MethodFn> {
        self.entries.get(method.0)?.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("registered", &self.len())
            .finish()
    }
}
