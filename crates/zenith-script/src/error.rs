//! Positioned parse errors.
//!
//! Every failure on the way from script text to a resolved program is
//! reported through one structured type carrying file, line, column,
//! and message. Resolution errors bubble up position-free from the
//! method registry and are wrapped here with the cursor position of
//! the offending argument.

use std::fmt;
use std::path::PathBuf;

use zenith_methods::ResolveError;
use zenith_workspace::Error as TableError;

use crate::source::SourceText;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub path: PathBuf,
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub source_line: String,
}

/// Category of parse failure, for programmatic matching; the rendered
/// message carries the detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A character that fits no construct at this point.
    UnexpectedChar,
    /// Text ended inside an unfinished construct.
    UnexpectedEot,
    /// A line break inside a quoted string or after a number's sign.
    IllegalLinebreak,
    UnknownMethod,
    UnknownVariable,
    /// A name was created twice, or re-used with a different group.
    VariableExists,
    /// Group mismatch, including failed wildcard binding.
    WrongGroup,
    IncludeNotFound,
    /// Structural misuse: bad argument shape, missing default, assign
    /// or body misuse, invalid registry state.
    Malformed,
}

impl ParseError {
    /// An error positioned at the cursor of `src`.
    pub fn new(kind: ParseErrorKind, src: &SourceText, message: impl Into<String>) -> Self {
        let (line, column) = src.position();
        Self {
            kind,
            path: src.path().to_path_buf(),
            line,
            column,
            message: message.into(),
            source_line: src.line_snippet(),
        }
    }

    /// An error pointing back at an earlier column of the line the
    /// cursor is on, typically the start of the name just read.
    pub fn at(
        kind: ParseErrorKind,
        src: &SourceText,
        position: (usize, usize),
        message: impl Into<String>,
    ) -> Self {
        let (line, column) = position;
        Self {
            kind,
            path: src.path().to_path_buf(),
            line,
            column,
            message: message.into(),
            source_line: src.line_snippet(),
        }
    }

    pub fn unexpected_char(src: &SourceText, found: char, context: &str) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedChar,
            src,
            format!("unexpected character '{found}' {context}"),
        )
    }

    pub fn unexpected_eot(src: &SourceText, context: &str) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedEot,
            src,
            format!("unexpected end of text {context}"),
        )
    }

    pub fn illegal_linebreak(src: &SourceText, context: &str) -> Self {
        Self::new(
            ParseErrorKind::IllegalLinebreak,
            src,
            format!("illegal line break {context}"),
        )
    }

    pub fn malformed(src: &SourceText, message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::Malformed, src, message)
    }

    /// Wraps a position-free resolution error at the cursor.
    pub fn from_resolve(src: &SourceText, error: ResolveError) -> Self {
        let kind = match &error {
            ResolveError::UnknownVariable { .. } => ParseErrorKind::UnknownVariable,
            ResolveError::VariableExists(_) => ParseErrorKind::VariableExists,
            ResolveError::WrongGroup { .. }
            | ResolveError::BoundMismatch { .. }
            | ResolveError::NotDefinedFor { .. }
            | ResolveError::NoSpecialization(_)
            | ResolveError::Unresolved(_) => ParseErrorKind::WrongGroup,
            ResolveError::Registry(zenith_methods::Error::GroupNotAllowed { .. }) => {
                ParseErrorKind::WrongGroup
            }
            ResolveError::Registry(_) => ParseErrorKind::Malformed,
            ResolveError::Table(TableError::GroupConflict { .. }) => ParseErrorKind::VariableExists,
            ResolveError::Table(_) => ParseErrorKind::Malformed,
        };
        Self::new(kind, src, error.to_string())
    }

    /// Multi-line rendering with the source snippet and a caret, the
    /// form the command line prints.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("error: {}\n", self.message));
        out.push_str(&format!(
            "  --> {}:{}:{}\n",
            self.path.display(),
            self.line,
            self.column
        ));
        out.push_str("   |\n");
        out.push_str(&format!("{:3} | {}\n", self.line, self.source_line));
        out.push_str(&format!(
            "   | {}^\n",
            " ".repeat(self.column.saturating_sub(1))
        ));
        out
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}:{}:{}",
            self.message,
            self.path.display(),
            self.line,
            self.column
        )
    }
}

impl std::error::Error for ParseError {}
