//! Zenith workspace data model.
//!
//! The shared vocabulary of the engine: variable groups and values, the
//! append-only variable table, the resolved program model
//! ([`Agenda`]/[`Invocation`]), and the runtime store with per-slot
//! written flags.

pub mod agenda;
pub mod error;
pub mod group;
pub mod ids;
pub mod store;
pub mod value;
pub mod variables;

pub use agenda::{Agenda, Invocation};
pub use error::{Error, Result};
pub use group::Group;
pub use ids::{MethodId, WsvId};
pub use store::Workspace;
pub use value::{Matrix, Value};
pub use variables::{VariableTable, WsvRecord};
