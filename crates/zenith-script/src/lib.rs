//! Parser for zenith control scripts.
//!
//! Turns script text into an executable [`Agenda`] while resolving
//! every call against a shared method/variable registry. Parsing is
//! single-pass: methods specialize, variables spring into existence,
//! and literals lower into bracketed automatic slots as the text is
//! read, so a script that parses is a script whose calls all resolved.
//!
//! [`Agenda`]: zenith_workspace::Agenda

mod error;
mod parser;
mod source;

pub use error::{ParseError, ParseErrorKind};
pub use parser::Parser;
pub use source::SourceText;
