//! Error types for the workspace data model.

use thiserror::Error;

use crate::group::Group;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("variable already exists with a different group: {name} is {existing}, not {requested}")]
    GroupConflict {
        name: String,
        existing: Group,
        requested: Group,
    },

    #[error("variables cannot be declared with the wildcard group: {0}")]
    WildcardVariable(String),

    #[error("matrix rows must all have length {ncols}; row {row} has {got}")]
    RaggedMatrix { ncols: usize, row: usize, got: usize },
}
