//! Values held by workspace variables.
//!
//! [`Value`] has one variant per storable [`Group`]; the variant of a
//! stored value always matches its slot's declared group.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::agenda::Agenda;
use crate::error::{Error, Result};
use crate::group::Group;

/// Owned row-major numeric matrix.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Matrix {
    nrows: usize,
    ncols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// A zero-filled matrix of the given shape.
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            data: vec![0.0; nrows * ncols],
        }
    }

    /// Builds a matrix from rows, which must all have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != ncols {
                return Err(Error::RaggedMatrix {
                    ncols,
                    row: i,
                    got: row.len(),
                });
            }
        }
        Ok(Self {
            nrows,
            ncols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.ncols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.ncols + col] = value;
    }

    /// Iterates over the rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.ncols.max(1))
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            for (j, x) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{x}")?;
            }
        }
        write!(f, "]")
    }
}

/// A value matching one storable group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Index(i64),
    Numeric(f64),
    String(String),
    Vector(Vec<f64>),
    Matrix(Matrix),
    ArrayOfIndex(Vec<i64>),
    ArrayOfString(Vec<String>),
    ArrayOfVector(Vec<Vec<f64>>),
    ArrayOfMatrix(Vec<Matrix>),
    Agenda(Agenda),
}

impl Value {
    /// The group this value belongs to. Never [`Group::Any`].
    pub fn group(&self) -> Group {
        match self {
            Value::Index(_) => Group::Index,
            Value::Numeric(_) => Group::Numeric,
            Value::String(_) => Group::String,
            Value::Vector(_) => Group::Vector,
            Value::Matrix(_) => Group::Matrix,
            Value::ArrayOfIndex(_) => Group::ArrayOfIndex,
            Value::ArrayOfString(_) => Group::ArrayOfString,
            Value::ArrayOfVector(_) => Group::ArrayOfVector,
            Value::ArrayOfMatrix(_) => Group::ArrayOfMatrix,
            Value::Agenda(_) => Group::Agenda,
        }
    }

    /// The default value newly created slots of `group` start with.
    ///
    /// The table never admits wildcard variables, so `group` is one of
    /// [`Group::STORABLE`].
    pub fn default_for(group: Group) -> Value {
        match group {
            Group::Index => Value::Index(0),
            Group::Numeric => Value::Numeric(0.0),
            Group::String => Value::String(String::new()),
            Group::Vector => Value::Vector(Vec::new()),
            Group::Matrix => Value::Matrix(Matrix::default()),
            Group::ArrayOfIndex => Value::ArrayOfIndex(Vec::new()),
            Group::ArrayOfString => Value::ArrayOfString(Vec::new()),
            Group::ArrayOfVector => Value::ArrayOfVector(Vec::new()),
            Group::ArrayOfMatrix => Value::ArrayOfMatrix(Vec::new()),
            Group::Agenda => Value::Agenda(Agenda::default()),
            Group::Any => panic!("the wildcard group has no value representation"),
        }
    }

    pub fn as_index(&self) -> Option<i64> {
        match self {
            Value::Index(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Value::Numeric(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            Value::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&Matrix> {
        match self {
            Value::Matrix(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_array_of_index(&self) -> Option<&[i64]> {
        match self {
            Value::ArrayOfIndex(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array_of_string(&self) -> Option<&[String]> {
        match self {
            Value::ArrayOfString(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array_of_vector(&self) -> Option<&[Vec<f64>]> {
        match self {
            Value::ArrayOfVector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array_of_matrix(&self) -> Option<&[Matrix]> {
        match self {
            Value::ArrayOfMatrix(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_agenda(&self) -> Option<&Agenda> {
        match self {
            Value::Agenda(a) => Some(a),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
            write!(f, "[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{item}")?;
            }
            write!(f, "]")
        }

        match self {
            Value::Index(n) => write!(f, "{n}"),
            Value::Numeric(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Vector(v) => list(f, v),
            Value::Matrix(m) => write!(f, "{m}"),
            Value::ArrayOfIndex(v) => list(f, v),
            Value::ArrayOfString(v) => list(f, v),
            Value::ArrayOfVector(v) => {
                write!(f, "[")?;
                for (i, row) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    list(f, row)?;
                }
                write!(f, "]")
            }
            Value::ArrayOfMatrix(v) => list(f, v),
            Value::Agenda(a) => write!(f, "<agenda {} ({} invocations)>", a.name, a.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_from_rows_checks_shape() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.nrows(), 2);
        assert_eq!(m.ncols(), 2);
        assert_eq!(m.get(1, 0), 3.0);

        let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            Error::RaggedMatrix {
                ncols: 2,
                row: 1,
                got: 1
            }
        );
    }

    #[test]
    fn defaults_match_their_group() {
        for group in Group::STORABLE {
            assert_eq!(Value::default_for(group).group(), group);
        }
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(Value::Vector(vec![1.0, 2.5]).to_string(), "[1, 2.5]");
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(Value::Matrix(m).to_string(), "[1, 2; 3, 4]");
    }
}
