//! # Source Positions
//!
//! Locations attached to parse errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in the source text.
///
/// `line` and `column` are 0-indexed; `Display` renders them 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Byte offset from the start of the source.
    pub byte: usize,
    pub line: usize,
    /// Column in characters.
    pub column: usize,
}

impl Position {
    pub const fn new(byte: usize, line: usize, column: usize) -> Self {
        Self { byte, line, column }
    }

    pub const fn zero() -> Self {
        Self::new(0, 0, 0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line + 1, self.column + 1)
    }
}
