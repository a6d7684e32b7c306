//! ASCII file formats for workspace values.
//!
//! A vector file is a count line followed by one element per line. A
//! matrix file is a "rows cols" line followed by one row per line.
//! Array files prefix a count line, then repeat the element format.
//! `#` starts a comment anywhere on a line; blank lines are ignored
//! when reading.

use std::fs;
use std::path::Path;

use zenith_workspace::{Group, Matrix, Value};

use crate::error::MethodError;

pub(crate) fn write_value(path: &Path, value: &Value) -> Result<(), MethodError> {
    let mut out = String::new();
    match value {
        Value::Vector(v) => push_vector(&mut out, v),
        Value::Matrix(m) => push_matrix(&mut out, m),
        Value::ArrayOfVector(vs) => {
            out.push_str(&format!("{}\n", vs.len()));
            for v in vs {
                push_vector(&mut out, v);
            }
        }
        Value::ArrayOfMatrix(ms) => {
            out.push_str(&format!("{}\n", ms.len()));
            for m in ms {
                push_matrix(&mut out, m);
            }
        }
        other => {
            return Err(MethodError(format!(
                "{} variables cannot be written to a file",
                other.group()
            )));
        }
    }
    fs::write(path, out).map_err(|e| MethodError(format!("cannot write {}: {e}", path.display())))
}

pub(crate) fn read_value(path: &Path, group: Group) -> Result<Value, MethodError> {
    let text = fs::read_to_string(path)
        .map_err(|e| MethodError(format!("cannot read {}: {e}", path.display())))?;
    let mut toks = tokens(&text);
    let value = match group {
        Group::Vector => Value::Vector(read_vector(&mut toks, path)?),
        Group::Matrix => Value::Matrix(read_matrix(&mut toks, path)?),
        Group::ArrayOfVector => {
            Value::ArrayOfVector(read_array(&mut toks, path, read_vector)?)
        }
        Group::ArrayOfMatrix => {
            Value::ArrayOfMatrix(read_array(&mut toks, path, read_matrix)?)
        }
        other => {
            return Err(MethodError(format!(
                "{other} variables cannot be read from a file"
            )));
        }
    };
    if let Some(extra) = toks.next() {
        return Err(MethodError(format!(
            "trailing data in {}: {extra}",
            path.display()
        )));
    }
    Ok(value)
}

fn push_vector(out: &mut String, v: &[f64]) {
    out.push_str(&format!("{}\n", v.len()));
    for x in v {
        out.push_str(&format!("{x}\n"));
    }
}

fn push_matrix(out: &mut String, m: &Matrix) {
    out.push_str(&format!("{} {}\n", m.nrows(), m.ncols()));
    for row in m.rows() {
        let line = row
            .iter()
            .map(|x| x.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&line);
        out.push('\n');
    }
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .flat_map(|line| line.split('#').next().unwrap_or("").split_whitespace())
}

fn read_vector<'a>(
    toks: &mut impl Iterator<Item = &'a str>,
    path: &Path,
) -> Result<Vec<f64>, MethodError> {
    let n = read_count(toks, "element count", path)?;
    (0..n).map(|_| read_f64(toks, "vector element", path)).collect()
}

fn read_matrix<'a>(
    toks: &mut impl Iterator<Item = &'a str>,
    path: &Path,
) -> Result<Matrix, MethodError> {
    let nrows = read_count(toks, "row count", path)?;
    let ncols = read_count(toks, "column count", path)?;
    let cells = nrows.checked_mul(ncols).ok_or_else(|| {
        MethodError(format!(
            "matrix dimensions {nrows} x {ncols} in {} are too large",
            path.display()
        ))
    })?;
    // Every element is read before the matrix is sized, so a dimension
    // line claiming more cells than the file holds fails on the missing
    // element instead of allocating for the claim.
    let mut data = Vec::new();
    for _ in 0..cells {
        data.push(read_f64(toks, "matrix element", path)?);
    }
    let mut matrix = Matrix::new(nrows, ncols);
    for (i, x) in data.into_iter().enumerate() {
        matrix.set(i / ncols, i % ncols, x);
    }
    Ok(matrix)
}

fn read_array<'a, I, T>(
    toks: &mut I,
    path: &Path,
    element: fn(&mut I, &Path) -> Result<T, MethodError>,
) -> Result<Vec<T>, MethodError>
where
    I: Iterator<Item = &'a str>,
{
    let n = read_count(toks, "array element count", path)?;
    let mut elements = Vec::new();
    for _ in 0..n {
        elements.push(element(toks, path)?);
    }
    Ok(elements)
}

fn read_count<'a>(
    toks: &mut impl Iterator<Item = &'a str>,
    what: &str,
    path: &Path,
) -> Result<usize, MethodError> {
    let tok = toks
        .next()
        .ok_or_else(|| MethodError(format!("missing {what} in {}", path.display())))?;
    tok.parse()
        .map_err(|_| MethodError(format!("invalid {what} in {}: {tok}", path.display())))
}

fn read_f64<'a>(
    toks: &mut impl Iterator<Item = &'a str>,
    what: &str,
    path: &Path,
) -> Result<f64, MethodError> {
    let tok = toks
        .next()
        .ok_or_else(|| MethodError(format!("missing {what} in {}", path.display())))?;
    tok.parse()
        .map_err(|_| MethodError(format!("invalid {what} in {}: {tok}", path.display())))
}
