//! Literal sub-parsers, directed by the expected group of the
//! argument slot.
//!
//! The same readers serve call-site literals (positioned against the
//! real source) and declared default texts (parsed out of a throwaway
//! cursor; the caller re-positions any failure at the call site).

use zenith_workspace::{Group, Matrix, Value};

use crate::error::ParseError;
use crate::source::SourceText;

pub(crate) struct LiteralReader<'s> {
    pub(crate) src: &'s mut SourceText,
}

impl LiteralReader<'_> {
    /// Reads one literal of the given group. Agendas and the vector
    /// and matrix array groups have no literal form.
    pub(crate) fn read_literal(&mut self, group: Group) -> Result<Value, ParseError> {
        match group {
            Group::Index => Ok(Value::Index(self.read_integer()?)),
            Group::Numeric => Ok(Value::Numeric(self.read_numeric()?)),
            Group::String => Ok(Value::String(self.read_string()?)),
            Group::Vector => Ok(Value::Vector(self.read_list(Self::read_numeric)?)),
            Group::Matrix => self.read_matrix(),
            Group::ArrayOfIndex => Ok(Value::ArrayOfIndex(self.read_list(Self::read_integer)?)),
            Group::ArrayOfString => Ok(Value::ArrayOfString(self.read_list(Self::read_string)?)),
            Group::ArrayOfVector | Group::ArrayOfMatrix | Group::Agenda => {
                Err(ParseError::malformed(
                    self.src,
                    format!("passing a constant of group {group} is not supported"),
                ))
            }
            Group::Any => Err(ParseError::malformed(
                self.src,
                "constants are not supported for supergeneric parameters",
            )),
        }
    }

    pub(crate) fn read_integer(&mut self) -> Result<i64, ParseError> {
        let mut text = String::new();
        self.read_sign(&mut text)?;
        if !self.read_digits(&mut text) {
            return self.expected_digit("in an integer constant");
        }
        text.parse().map_err(|_| {
            ParseError::malformed(self.src, format!("integer constant out of range: {text}"))
        })
    }

    pub(crate) fn read_numeric(&mut self) -> Result<f64, ParseError> {
        let mut text = String::new();
        self.read_sign(&mut text)?;
        let mut found_digit = self.read_digits(&mut text);
        if self.src.current() == Some('.') {
            text.push('.');
            self.src.advance();
            found_digit |= self.read_digits(&mut text);
        }
        if !found_digit {
            return self.expected_digit("in a numeric constant");
        }
        if let Some(e @ ('e' | 'E')) = self.src.current() {
            text.push(e);
            self.src.advance();
            self.read_sign(&mut text)?;
            if !self.read_digits(&mut text) {
                return self.expected_digit("in an exponent");
            }
        }
        text.parse().map_err(|_| {
            ParseError::malformed(self.src, format!("invalid numeric constant: {text}"))
        })
    }

    /// Quoted text; line breaks before the closing quote are illegal.
    pub(crate) fn read_string(&mut self) -> Result<String, ParseError> {
        match self.src.current() {
            Some('"') => self.src.advance(),
            Some(c) => return Err(ParseError::unexpected_char(self.src, c, "(expected '\"')")),
            None => return Err(ParseError::unexpected_eot(self.src, "(expected '\"')")),
        }
        let mut text = String::new();
        loop {
            match self.src.current() {
                Some('"') => {
                    self.src.advance();
                    return Ok(text);
                }
                Some('\n') | Some('\r') => {
                    return Err(ParseError::illegal_linebreak(
                        self.src,
                        "before the end of a string",
                    ))
                }
                Some(c) => {
                    text.push(c);
                    self.src.advance();
                }
                None => return Err(ParseError::unexpected_eot(self.src, "inside a string")),
            }
        }
    }

    fn read_matrix(&mut self) -> Result<Value, ParseError> {
        self.expect_open_bracket()?;
        let mut rows = Vec::new();
        self.src.eat_whitespace();
        if self.src.current() == Some(']') {
            self.src.advance();
            return Ok(Value::Matrix(Matrix::new(0, 0)));
        }
        loop {
            let mut row = vec![self.read_numeric()?];
            loop {
                self.src.eat_whitespace();
                match self.src.current() {
                    Some(',') => {
                        self.src.advance();
                        self.src.eat_whitespace();
                        row.push(self.read_numeric()?);
                    }
                    Some(';') | Some(']') => break,
                    Some(c) => {
                        return Err(ParseError::unexpected_char(
                            self.src,
                            c,
                            "in a matrix constant",
                        ))
                    }
                    None => {
                        return Err(ParseError::unexpected_eot(self.src, "inside a matrix constant"))
                    }
                }
            }
            rows.push(row);
            match self.src.current() {
                Some(';') => {
                    self.src.advance();
                    self.src.eat_whitespace();
                }
                _ => break,
            }
        }
        match self.src.current() {
            Some(']') => self.src.advance(),
            _ => return Err(ParseError::unexpected_eot(self.src, "inside a matrix constant")),
        }
        let matrix =
            Matrix::from_rows(rows).map_err(|e| ParseError::malformed(self.src, e.to_string()))?;
        Ok(Value::Matrix(matrix))
    }

    fn read_list<T>(
        &mut self,
        read_item: fn(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        self.expect_open_bracket()?;
        let mut items = Vec::new();
        self.src.eat_whitespace();
        if self.src.current() == Some(']') {
            self.src.advance();
            return Ok(items);
        }
        loop {
            items.push(read_item(self)?);
            self.src.eat_whitespace();
            match self.src.current() {
                Some(',') => {
                    self.src.advance();
                    self.src.eat_whitespace();
                }
                Some(']') => {
                    self.src.advance();
                    return Ok(items);
                }
                Some(c) => {
                    return Err(ParseError::unexpected_char(
                        self.src,
                        c,
                        "in a bracketed constant",
                    ))
                }
                None => {
                    return Err(ParseError::unexpected_eot(
                        self.src,
                        "inside a bracketed constant",
                    ))
                }
            }
        }
    }

    fn expect_open_bracket(&mut self) -> Result<(), ParseError> {
        match self.src.current() {
            Some('[') => {
                self.src.advance();
                Ok(())
            }
            Some(c) => Err(ParseError::unexpected_char(self.src, c, "(expected '[')")),
            None => Err(ParseError::unexpected_eot(self.src, "(expected '[')")),
        }
    }

    fn read_sign(&mut self, text: &mut String) -> Result<(), ParseError> {
        if let Some(sign @ ('+' | '-')) = self.src.current() {
            text.push(sign);
            self.src.advance();
            if matches!(self.src.current(), Some('\n') | Some('\r') | None) {
                return Err(ParseError::illegal_linebreak(self.src, "after a sign"));
            }
        }
        Ok(())
    }

    fn read_digits(&mut self, text: &mut String) -> bool {
        let mut found = false;
        while let Some(c) = self.src.current() {
            if !c.is_ascii_digit() {
                break;
            }
            text.push(c);
            self.src.advance();
            found = true;
        }
        found
    }

    fn expected_digit<T>(&self, context: &str) -> Result<T, ParseError> {
        match self.src.current() {
            Some(c) => Err(ParseError::unexpected_char(
                self.src,
                c,
                &format!("{context} (expected a digit)"),
            )),
            None => Err(ParseError::unexpected_eot(self.src, context)),
        }
    }
}

/// Parses a declared default literal. String defaults are taken
/// verbatim; everything else runs through the ordinary literal
/// grammar.
pub(crate) fn parse_default(group: Group, text: &str) -> Result<Value, ParseError> {
    if group == Group::String {
        return Ok(Value::String(text.to_string()));
    }
    let mut src = SourceText::new("<default>", text);
    src.eat_whitespace();
    let mut reader = LiteralReader { src: &mut src };
    let value = reader.read_literal(group)?;
    src.eat_whitespace();
    if let Some(c) = src.current() {
        return Err(ParseError::unexpected_char(&src, c, "after a default literal"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    fn read(group: Group, text: &str) -> Result<Value, ParseError> {
        let mut src = SourceText::new("test.zen", text);
        LiteralReader { src: &mut src }.read_literal(group)
    }

    #[test]
    fn numbers_cover_the_grammar() {
        assert_eq!(read(Group::Index, "42"), Ok(Value::Index(42)));
        assert_eq!(read(Group::Index, "-7"), Ok(Value::Index(-7)));
        assert_eq!(read(Group::Numeric, "2.0"), Ok(Value::Numeric(2.0)));
        assert_eq!(read(Group::Numeric, "-.5"), Ok(Value::Numeric(-0.5)));
        assert_eq!(read(Group::Numeric, "3."), Ok(Value::Numeric(3.0)));
        assert_eq!(read(Group::Numeric, "1e3"), Ok(Value::Numeric(1000.0)));
        assert_eq!(read(Group::Numeric, "2.5E-2"), Ok(Value::Numeric(0.025)));
    }

    #[test]
    fn a_sign_needs_a_number_on_the_same_line() {
        let err = read(Group::Numeric, "-\n3").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::IllegalLinebreak);
        assert_eq!(err.message, "illegal line break after a sign");
    }

    #[test]
    fn strings_stop_at_line_ends() {
        assert_eq!(
            read(Group::String, "\"hello world\""),
            Ok(Value::String("hello world".into()))
        );
        let err = read(Group::String, "\"broken\nstring\"").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::IllegalLinebreak);
    }

    #[test]
    fn bracketed_literals() {
        assert_eq!(
            read(Group::Vector, "[1, 2.5, -3]"),
            Ok(Value::Vector(vec![1.0, 2.5, -3.0]))
        );
        assert_eq!(read(Group::Vector, "[]"), Ok(Value::Vector(Vec::new())));
        assert_eq!(
            read(Group::ArrayOfIndex, "[1, 2, 3]"),
            Ok(Value::ArrayOfIndex(vec![1, 2, 3]))
        );
        assert_eq!(
            read(Group::ArrayOfString, "[\"a\", \"b\"]"),
            Ok(Value::ArrayOfString(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn matrices_are_semicolon_separated_rows() {
        let value = read(Group::Matrix, "[1, 2; 3, 4]").unwrap();
        let matrix = value.as_matrix().unwrap();
        assert_eq!((matrix.nrows(), matrix.ncols()), (2, 2));
        assert_eq!(matrix.get(1, 0), 3.0);

        let err = read(Group::Matrix, "[1, 2; 3]").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Malformed);
        assert!(err.message.contains("row 1 has 1"));
    }

    #[test]
    fn agenda_constants_are_rejected() {
        let err = read(Group::Agenda, "[1]").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Malformed);
        assert_eq!(err.message, "passing a constant of group Agenda is not supported");
    }

    #[test]
    fn defaults_parse_like_literals() {
        assert_eq!(parse_default(Group::Index, "1"), Ok(Value::Index(1)));
        assert_eq!(
            parse_default(Group::String, ""),
            Ok(Value::String(String::new()))
        );
        assert_eq!(
            parse_default(Group::Vector, "[0.5, 1.5]"),
            Ok(Value::Vector(vec![0.5, 1.5]))
        );
        assert!(parse_default(Group::Index, "1 2").is_err());
    }
}
