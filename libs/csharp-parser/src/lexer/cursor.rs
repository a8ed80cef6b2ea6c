//! # Character Cursor
//!
//! Single-character cursor over C# source. The parser asks for one
//! character at a time and decides multi-character constructs from
//! `current`, `previous` and `peek`.
//!
//! ## Example
//!
//! ```rust
//! use csharp_parser::lexer::{Cursor, EOF};
//!
//! let mut cursor = Cursor::new("ab");
//! assert_eq!(cursor.peek(), 'a');
//! assert!(cursor.try_advance());
//! assert_eq!(cursor.current(), 'a');
//! assert!(cursor.try_advance());
//! assert!(!cursor.try_advance());
//! assert_eq!(cursor.peek(), EOF);
//! ```

use crate::span::Position;

/// Sentinel returned past the end of input.
pub const EOF: char = '\0';

// =============================================================================
// CURSOR
// =============================================================================

/// Character cursor with position tracking.
///
/// Holds the last two consumed characters and one character of lookahead.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    /// Source text.
    source: &'a str,
    /// Byte offset of the next unconsumed character.
    byte: usize,
    /// Current line (0-indexed).
    line: usize,
    /// Current column (0-indexed).
    column: usize,
    /// Most recently consumed character.
    current: char,
    /// Character consumed before `current`.
    previous: char,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor before the first character of `source`.
    ///
    /// `current` and `previous` start as [`EOF`] until characters are
    /// consumed.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            byte: 0,
            line: 0,
            column: 0,
            current: EOF,
            previous: EOF,
        }
    }

    /// Position of the next unconsumed character.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use csharp_parser::lexer::Cursor;
    ///
    /// let mut cursor = Cursor::new("a\nb");
    /// cursor.try_advance();
    /// cursor.try_advance();
    /// let position = cursor.position();
    /// assert_eq!((position.byte, position.line, position.column), (2, 1, 0));
    /// ```
    pub fn position(&self) -> Position {
        Position::new(self.byte, self.line, self.column)
    }

    /// True once every character has been consumed.
    pub fn is_eof(&self) -> bool {
        self.byte >= self.source.len()
    }

    /// Most recently consumed character, or [`EOF`] before the first advance.
    pub fn current(&self) -> char {
        self.current
    }

    /// Character consumed before [`current`](Self::current).
    pub fn previous(&self) -> char {
        self.previous
    }

    /// Next character without consuming it, or [`EOF`] at end of input.
    pub fn peek(&self) -> char {
        self.source[self.byte..].chars().next().unwrap_or(EOF)
    }

    /// Consumes one character and shifts `current` into `previous`.
    ///
    /// A consumed `\n` moves to column 0 of the next line; any other
    /// character moves one column right.
    ///
    /// ## Returns
    ///
    /// `true` when a character was consumed, `false` at end of input. On
    /// `false` the cursor state, `current` included, is left untouched.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use csharp_parser::lexer::Cursor;
    ///
    /// let mut cursor = Cursor::new("x;");
    /// while cursor.try_advance() {}
    /// assert_eq!(cursor.current(), ';');
    /// assert_eq!(cursor.previous(), 'x');
    /// ```
    pub fn try_advance(&mut self) -> bool {
        let Some(c) = self.source[self.byte..].chars().next() else {
            return false;
        };

        self.byte += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }

        self.previous = self.current;
        self.current = c;
        true
    }

    /// Advance while predicate holds for the next character.
    ///
    /// ## Parameters
    ///
    /// - `predicate`: Tested against [`peek`](Self::peek) before each step
    pub fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while !self.is_eof() && predicate(self.peek()) {
            self.try_advance();
        }
    }

    /// Skips whitespace, newlines included.
    pub fn skip_whitespace(&mut self) {
        self.advance_while(char::is_whitespace);
    }

    /// Consumes through the end of the line and returns its text without
    /// the terminator. A `\r` before the `\n` is dropped.
    ///
    /// ## Returns
    ///
    /// The rest of the line. At end of input this is whatever remains,
    /// possibly empty.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use csharp_parser::lexer::Cursor;
    ///
    /// let mut cursor = Cursor::new(" done\r\nint x;");
    /// assert_eq!(cursor.read_line(), " done");
    /// assert_eq!(cursor.peek(), 'i');
    /// ```
    pub fn read_line(&mut self) -> String {
        let mut text = String::new();
        while self.try_advance() {
            match self.current {
                '\n' => break,
                c => text.push(c),
            }
        }
        if text.ends_with('\r') {
            text.pop();
        }
        text
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_empty() {
        let mut cursor = Cursor::new("");
        assert!(cursor.is_eof());
        assert_eq!(cursor.peek(), EOF);
        assert!(!cursor.try_advance());
        assert_eq!(cursor.current(), EOF);
    }

    #[test]
    fn test_cursor_tracks_previous_and_current() {
        let mut cursor = Cursor::new("abc");
        cursor.try_advance();
        cursor.try_advance();
        assert_eq!(cursor.previous(), 'a');
        assert_eq!(cursor.current(), 'b');
        assert_eq!(cursor.peek(), 'c');
    }

    #[test]
    fn test_try_advance_at_eof_keeps_current() {
        let mut cursor = Cursor::new("x");
        assert!(cursor.try_advance());
        assert!(!cursor.try_advance());
        assert_eq!(cursor.current(), 'x');
    }

    #[test]
    fn test_cursor_newline_position() {
        let mut cursor = Cursor::new("a\nb");
        cursor.try_advance();
        assert_eq!(cursor.position().line, 0);
        cursor.try_advance();
        assert_eq!(cursor.position().line, 1);
        assert_eq!(cursor.position().column, 0);
    }

    #[test]
    fn test_read_line_excludes_terminator() {
        let mut cursor = Cursor::new(" first\r\nsecond");
        assert_eq!(cursor.read_line(), " first");
        assert_eq!(cursor.peek(), 's');
        assert_eq!(cursor.read_line(), "second");
        assert!(cursor.is_eof());
    }

    #[test]
    fn test_skip_whitespace() {
        let mut cursor = Cursor::new(" \t\n  x");
        cursor.skip_whitespace();
        assert_eq!(cursor.peek(), 'x');
    }

    #[test]
    fn test_cursor_utf8() {
        let mut cursor = Cursor::new("é");
        assert!(cursor.try_advance());
        assert_eq!(cursor.current(), 'é');
        assert_eq!(cursor.position().byte, 2);
    }
}
