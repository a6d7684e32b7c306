//! Method signature registry and supergeneric overload resolution.
//!
//! Signatures declare fixed (specific) variable references, positional
//! generic slots, and named generic inputs with optional default
//! literals. Supergeneric templates carry wildcard slots and are
//! specialized lazily, keyed by the concrete groups seen at a call's
//! first differentiating arguments.

mod builtin;
mod error;
mod record;
mod registry;
mod resolve;

pub use builtin::ENTRY_METHOD;
pub use error::{Error, Result};
pub use record::{GroupSpec, MethodRecord};
pub use registry::{MethodTable, Registry};
pub use resolve::{CallResolver, ResolveError};
