//! Variable groups.
//!
//! Every workspace variable has a fixed group describing the kind of
//! data it holds. The set of groups is closed; method signatures may
//! additionally use the [`Any`](Group::Any) wildcard, which never
//! appears on a stored value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The data kind of a workspace variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    /// Scalar integer.
    Index,
    /// Scalar real.
    Numeric,
    /// Text.
    String,
    /// Numeric vector.
    Vector,
    /// Numeric matrix.
    Matrix,
    ArrayOfIndex,
    ArrayOfString,
    ArrayOfVector,
    ArrayOfMatrix,
    /// A stored sub-program.
    Agenda,
    /// Wildcard used only inside supergeneric method signatures.
    Any,
}

impl Group {
    /// Every group a variable may actually hold, in declaration order.
    pub const STORABLE: [Group; 10] = [
        Group::Index,
        Group::Numeric,
        Group::String,
        Group::Vector,
        Group::Matrix,
        Group::ArrayOfIndex,
        Group::ArrayOfString,
        Group::ArrayOfVector,
        Group::ArrayOfMatrix,
        Group::Agenda,
    ];

    /// The script-visible name of this group.
    pub fn name(self) -> &'static str {
        match self {
            Group::Index => "Index",
            Group::Numeric => "Numeric",
            Group::String => "String",
            Group::Vector => "Vector",
            Group::Matrix => "Matrix",
            Group::ArrayOfIndex => "ArrayOfIndex",
            Group::ArrayOfString => "ArrayOfString",
            Group::ArrayOfVector => "ArrayOfVector",
            Group::ArrayOfMatrix => "ArrayOfMatrix",
            Group::Agenda => "Agenda",
            Group::Any => "Any",
        }
    }

    /// Looks up a group by its script-visible name.
    pub fn from_name(name: &str) -> Option<Group> {
        Group::STORABLE
            .iter()
            .chain(std::iter::once(&Group::Any))
            .copied()
            .find(|g| g.name() == name)
    }

    pub fn is_any(self) -> bool {
        self == Group::Any
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for group in Group::STORABLE {
            assert_eq!(Group::from_name(group.name()), Some(group));
        }
        assert_eq!(Group::from_name("Any"), Some(Group::Any));
        assert_eq!(Group::from_name("Tensor7"), None);
    }

    #[test]
    fn storable_excludes_wildcard() {
        assert!(!Group::STORABLE.contains(&Group::Any));
    }
}
