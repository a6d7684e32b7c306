//! Execution errors.

use thiserror::Error;

/// Engine result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Execution errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The dependency check failed: an input slot was never written.
    #[error("method {method} needs input variable: {variable}")]
    MissingInput { method: String, variable: String },

    /// A method implementation returned a failure.
    #[error("error in method {method}: {message}")]
    MethodFailed { method: String, message: String },

    /// An invocation reached a method with no registered
    /// implementation.
    #[error("no implementation registered for method: {0}")]
    NoImplementation(String),

    /// An implementation was registered against a name the method
    /// table does not know.
    #[error("no method record named {0} in the registry")]
    UnknownMethod(String),
}

/// Failure inside one method implementation. The executor wraps it
/// with the failing method's name.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct MethodError(pub String);

impl From<String> for MethodError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for MethodError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

impl From<std::io::Error> for MethodError {
    fn from(error: std::io::Error) -> Self {
        Self(error.to_string())
    }
}
