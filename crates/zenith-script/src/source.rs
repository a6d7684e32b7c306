//! Character cursor over one script file.
//!
//! The parser works with one-character lookahead and no backtracking.
//! Text is stored line by line with an explicit `'\n'` terminator
//! appended to every line (including the last), so tokens always end
//! on a character the cursor can see and a sign or quote left dangling
//! at a line end is detectable as an explicit line-break character.

use std::path::{Path, PathBuf};

/// Script text plus the current cursor position.
#[derive(Debug, Clone)]
pub struct SourceText {
    path: PathBuf,
    lines: Vec<Vec<char>>,
    line: usize,
    column: usize,
}

impl SourceText {
    pub fn new(path: impl Into<PathBuf>, text: &str) -> Self {
        let lines = text
            .split('\n')
            .map(|line| {
                let mut chars: Vec<char> = line.chars().collect();
                chars.push('\n');
                chars
            })
            .collect();
        Self {
            path: path.into(),
            lines,
            line: 0,
            column: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The character under the cursor, `None` past the end of text.
    pub fn current(&self) -> Option<char> {
        self.lines.get(self.line).map(|line| line[self.column])
    }

    pub fn advance(&mut self) {
        if self.line >= self.lines.len() {
            return;
        }
        if self.column + 1 < self.lines[self.line].len() {
            self.column += 1;
        } else {
            self.line += 1;
            self.column = 0;
        }
    }

    pub fn at_eot(&self) -> bool {
        self.line >= self.lines.len()
    }

    /// Skips spaces, tabs, carriage returns, line ends, and
    /// `#`-to-end-of-line comments.
    pub fn eat_whitespace(&mut self) {
        while let Some(c) = self.current() {
            match c {
                ' ' | '\t' | '\r' | '\n' => self.advance(),
                '#' => {
                    while matches!(self.current(), Some(c) if c != '\n') {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Cursor position as reported in diagnostics, 1-based. Past the
    /// end of text this points just after the last line.
    pub fn position(&self) -> (usize, usize) {
        if self.at_eot() {
            let last = self.lines.len() - 1;
            (last + 1, self.lines[last].len())
        } else {
            (self.line + 1, self.column + 1)
        }
    }

    /// The text of the line under the cursor, without its terminator.
    pub fn line_snippet(&self) -> String {
        let line = self.line.min(self.lines.len() - 1);
        self.lines[line]
            .iter()
            .filter(|&&c| c != '\n' && c != '\r')
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_walks_across_lines() {
        let mut src = SourceText::new("test.zen", "ab\ncd");
        assert_eq!(src.current(), Some('a'));
        src.advance();
        src.advance();
        assert_eq!(src.current(), Some('\n'));
        src.advance();
        assert_eq!(src.current(), Some('c'));
        assert_eq!(src.position(), (2, 1));
        src.advance();
        src.advance();
        src.advance();
        assert!(src.at_eot());
        assert_eq!(src.current(), None);
    }

    #[test]
    fn comments_are_whitespace() {
        let mut src = SourceText::new("test.zen", "  # a comment\n\t x");
        src.eat_whitespace();
        assert_eq!(src.current(), Some('x'));
        assert_eq!(src.position(), (2, 3));
    }

    #[test]
    fn eat_whitespace_stops_at_eot() {
        let mut src = SourceText::new("test.zen", "# only a comment");
        src.eat_whitespace();
        assert!(src.at_eot());
    }

    #[test]
    fn snippets_drop_the_terminator() {
        let src = SourceText::new("test.zen", "VectorSet(v, 3, 2.0)\r\nPrint(v)");
        assert_eq!(src.line_snippet(), "VectorSet(v, 3, 2.0)");
    }
}
