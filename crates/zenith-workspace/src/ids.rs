//! Typed identifiers for workspace entities.
//!
//! Variables and methods are addressed by their index in the owning
//! table. Both tables are append-only, so an id handed out once stays
//! valid for the lifetime of the process.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a variable in the [`VariableTable`](crate::VariableTable).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct WsvId(pub usize);

impl fmt::Display for WsvId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for WsvId {
    fn from(idx: usize) -> Self {
        WsvId(idx)
    }
}

/// Index of a method signature in the method table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct MethodId(pub usize);

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for MethodId {
    fn from(idx: usize) -> Self {
        MethodId(idx)
    }
}
