//! Sequential execution of parsed control scripts.
//!
//! The parser hands over an [`Agenda`](zenith_workspace::Agenda) of
//! resolved invocations; this crate runs it. An [`Executor`] pairs the
//! registry with a [`DispatchTable`] of implementations and steps
//! through the program, enforcing the written-flag dependency check
//! before every call. [`standard_dispatch`] covers the standard
//! method library.

mod builtins;
mod dispatch;
mod error;
mod executor;

pub use builtins::standard_dispatch;
pub use dispatch::{DispatchTable, MethodFn};
pub use error::{Error, MethodError, Result};
pub use executor::{CallContext, Executor};
