/*!
Errors raised while parsing term (program) text
*/

use crate::debug_from_display;
use std::fmt;

/// Ill-formed program text: the offending line and column, plus the full input for context
#[derive(Clone, PartialEq, Eq)]
pub struct ParseError {
    text: String,
    line: usize,
    column: usize,
}

impl ParseError {
    pub(crate) fn at(original: &str, remaining: &str) -> ParseError {
        let consumed = original.len() - remaining.len();
        let before = &original[..consumed];
        let line = before.matches('\n').count() + 1;
        let column = before.len() - before.rfind('\n').map_or(0, |i| i + 1) + 1;
        ParseError {
            text: original.to_string(),
            line,
            column,
        }
    }

    /// The 1-indexed line of the failure
    pub fn line(&self) -> usize {
        self.line
    }

    /// The 1-indexed column of the failure
    pub fn column(&self) -> usize {
        self.column
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "ParseError at line {}, column {}:", self.line, self.column)?;
        if let Some(offending_line) = self.text.lines().nth(self.line - 1) {
            writeln!(f, "{}", offending_line)?;
            write!(f, "{}^", " ".repeat(self.column.saturating_sub(1)))?;
        }
        Ok(())
    }
}

debug_from_display!(ParseError);

impl std::error::Error for ParseError {}
