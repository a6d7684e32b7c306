//! Error types for the method registry.

use thiserror::Error;
use zenith_workspace::Group;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("method already registered: {0}")]
    DuplicateMethod(String),

    #[error("{0}: generic input names, types and defaults must have equal length")]
    MismatchedGins(String),

    #[error("{0}: generic output names and types must have equal length")]
    MismatchedGouts(String),

    #[error("{0}: assign methods take exactly one generic output and one generic input")]
    BadAssignRecord(String),

    #[error("{0} is not a supergeneric template")]
    NotTemplate(String),

    #[error("{method} is not defined for group {group} (allowed: {})", join_groups(.allowed))]
    GroupNotAllowed {
        method: String,
        group: Group,
        allowed: Vec<Group>,
    },
}

pub(crate) fn join_groups(groups: &[Group]) -> String {
    groups
        .iter()
        .map(|g| g.name())
        .collect::<Vec<_>>()
        .join(", ")
}
