//! Source positions
//!
//! Positions are 1-based on both axes. Columns count characters, matching the columns the
//! tokenizer stamps on every token.

use serde::Serialize;
use std::fmt;

/// Represents a position in source text (line and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The first column of a line.
    pub fn line_start(line: usize) -> Self {
        Self { line, column: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_line_then_column() {
        assert!(Position::new(1, 9) < Position::new(2, 1));
        assert!(Position::new(3, 2) < Position::new(3, 4));
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(4, 7).to_string(), "4:7");
        assert_eq!(Position::line_start(2).to_string(), "2:1");
    }
}
