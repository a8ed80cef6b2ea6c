//! Word and alias capture, plus the string splitting helpers the
//! sub-parsers share.

use super::Parser;
use crate::error::ParseError;
use crate::lexer::symbols::{self, keyword};
use crate::lexer::{is_word_break, LexicalScanner, EOF};

// =============================================================================
// CAPTURE
// =============================================================================

impl<'a> Parser<'a> {
    /// Reads the next identifier-like word after skipping whitespace.
    ///
    /// With `allow_generics`, balanced `<...>` is folded into the word.
    /// `global::` does not end the word.
    pub fn capture_word(&mut self, allow_generics: bool) -> Result<String, ParseError> {
        self.cursor.skip_whitespace();
        let mut word = String::new();
        loop {
            let next = self.cursor.peek();
            if next == symbols::TYPE_IMPLEMENTS && word == keyword::GLOBAL {
                self.cursor.try_advance();
                word.push(next);
                if self.cursor.peek() == symbols::TYPE_IMPLEMENTS {
                    self.cursor.try_advance();
                    word.push(symbols::TYPE_IMPLEMENTS);
                }
                continue;
            }
            if next == symbols::BEGIN_GENERIC && allow_generics && !word.is_empty() {
                self.cursor.try_advance();
                let arguments =
                    self.parse_nested_text(symbols::BEGIN_GENERIC, symbols::END_GENERIC, false, true)?;
                word.push(symbols::BEGIN_GENERIC);
                word.push_str(&arguments);
                word.push(symbols::END_GENERIC);
                continue;
            }
            if is_word_break(next) {
                break;
            }
            self.cursor.try_advance();
            word.push(next);
        }
        Ok(word)
    }

    /// Captures a type name, folding nullable markers and array ranks
    /// separated by whitespace (`int []` becomes `int[]`).
    pub fn capture_type_name(&mut self) -> Result<String, ParseError> {
        let mut name = self.capture_word(true)?;
        loop {
            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                symbols::NULLABLE => {
                    self.cursor.try_advance();
                    name.push(symbols::NULLABLE);
                }
                symbols::BEGIN_ATTRIBUTE => {
                    self.cursor.try_advance();
                    let rank = self.parse_nested_text(
                        symbols::BEGIN_ATTRIBUTE,
                        symbols::END_ATTRIBUTE,
                        false,
                        true,
                    )?;
                    name.push(symbols::BEGIN_ATTRIBUTE);
                    name.push_str(&rank);
                    name.push(symbols::END_ATTRIBUTE);
                }
                _ => break,
            }
        }
        Ok(name)
    }
}

// =============================================================================
// SPLITTING
// =============================================================================

/// Splits declaration text on whitespace outside `<>`, `()` and `[]`.
/// A word starting with `[` is joined to the word before it.
pub(crate) fn split_words(text: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    let mut word = String::new();
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if c.is_whitespace() && depth == 0 {
            push_word(&mut words, &mut word);
        } else {
            word.push(c);
        }
    }
    push_word(&mut words, &mut word);
    words
}

fn push_word(words: &mut Vec<String>, word: &mut String) {
    if word.is_empty() {
        return;
    }
    let word = std::mem::take(word);
    match words.last_mut() {
        Some(previous) if word.starts_with(symbols::BEGIN_ATTRIBUTE) => previous.push_str(&word),
        _ => words.push(word),
    }
}

/// Splits `text` on `separator` outside brackets, generic argument lists,
/// literals and comments. Parts are trimmed.
pub(crate) fn split_top_level(text: &str, separator: char) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut scanner = LexicalScanner::new();
    let mut depth = 0usize;
    let mut generic = 0usize;
    let mut parts = Vec::new();
    let mut part = String::new();

    for (i, &c) in chars.iter().enumerate() {
        let next = chars.get(i + 1).copied().unwrap_or(EOF);
        if scanner.feed(c, next) {
            match c {
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth = depth.saturating_sub(1),
                // `<` directly after an identifier opens a generic list.
                '<' if i > 0 && is_identifier_char(chars[i - 1]) => generic += 1,
                '>' if generic > 0 => generic -= 1,
                c if c == separator && depth == 0 && generic == 0 => {
                    parts.push(std::mem::take(&mut part).trim().to_string());
                    continue;
                }
                _ => {}
            }
        }
        part.push(c);
    }
    parts.push(part.trim().to_string());
    parts
}

/// `Name<T, U>` into `("Name", ["T", "U"])`.
pub(crate) fn split_generic_name(word: &str) -> (String, Vec<String>) {
    match word.find(symbols::BEGIN_GENERIC) {
        Some(open) if word.ends_with(symbols::END_GENERIC) => {
            let parameters = &word[open + 1..word.len() - 1];
            (
                word[..open].trim().to_string(),
                split_top_level(parameters, symbols::ALIAS_SEPARATOR),
            )
        }
        _ => (word.to_string(), Vec::new()),
    }
}

/// Splits an explicit interface member name at its last top-level dot:
/// `IList<T>.Add` into `(Some("IList<T>"), "Add")`.
pub(crate) fn split_qualified(name: &str) -> (Option<String>, String) {
    let mut depth = 0usize;
    let mut split = None;
    for (i, c) in name.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => split = Some(i),
            _ => {}
        }
    }
    match split {
        Some(i) => (Some(name[..i].to_string()), name[i + 1..].to_string()),
        None => (None, name.to_string()),
    }
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '@'
}

/// Removes trailing whitespace from the element text buffer.
pub(crate) fn trim_end_in_place(buffer: &mut String) {
    let trimmed = buffer.trim_end().len();
    buffer.truncate(trimmed);
}

// =============================================================================
// TESTS
// =============================================================================
