//! # Lexical Mode Scanner
//!
//! Tracks whether a character sits in code or inside a string, character
//! literal, line comment or block comment. Delimiter matching only counts
//! characters the scanner reports as code. Shared by the parser, which
//! matches delimiters, and the writer, which must not re-indent the inside
//! of a multi-line literal.
//!
//! ## Example
//!
//! ```rust
//! use csharp_model::lexical::LexicalScanner;
//!
//! let text: Vec<char> = "a\")\"b".chars().collect();
//! let mut scanner = LexicalScanner::new();
//! let code: Vec<bool> = (0..text.len())
//!     .map(|i| scanner.feed(text[i], text.get(i + 1).copied().unwrap_or('\0')))
//!     .collect();
//! assert_eq!(code, vec![true, false, false, false, true]);
//! ```

/// Mutually exclusive lexical modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexicalMode {
    #[default]
    Code,
    LineComment,
    BlockComment,
    /// String literal. Verbatim strings escape quotes by doubling them;
    /// interpolated strings open code holes at `{`.
    Str { verbatim: bool, interpolated: bool },
    Char,
}

/// What a fed character belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Code,
    /// Part of a string or character literal, quotes and interpolation
    /// holes included.
    Literal,
    /// Part of a comment, markers included.
    Comment,
}

/// An open `{...}` hole of an interpolated string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Hole {
    /// Whether the string the hole belongs to is verbatim.
    verbatim: bool,
    /// Brace depth inside the hole; the hole closes when it reaches zero.
    depth: usize,
}

/// Incremental lexical-mode state machine.
#[derive(Debug, Clone, Default)]
pub struct LexicalScanner {
    mode: LexicalMode,
    /// Previous character fed in code mode (for `@"`, `$"` and `$@"`).
    last: char,
    before_last: char,
    /// Inside a non-verbatim literal, the next character is escaped.
    escaped: bool,
    /// Class of the next character, consumed without interpretation.
    swallow: Option<CharClass>,
    /// Interpolation holes, innermost last.
    holes: Vec<Hole>,
}

impl LexicalScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> LexicalMode {
        self.mode
    }

    /// True when the scanner is in code mode between characters.
    pub fn in_code(&self) -> bool {
        self.mode == LexicalMode::Code && self.swallow.is_none() && self.holes.is_empty()
    }

    /// True when the next character would continue a string or character
    /// literal, including the holes of an interpolated string.
    pub fn in_literal(&self) -> bool {
        matches!(self.mode, LexicalMode::Str { .. } | LexicalMode::Char) || !self.holes.is_empty()
    }

    /// Feeds one character with one character of lookahead. Returns true
    /// when `c` is code and may be matched as a delimiter.
    pub fn feed(&mut self, c: char, next: char) -> bool {
        self.classify(c, next) == CharClass::Code
    }

    /// Feeds one character and reports its class.
    pub fn classify(&mut self, c: char, next: char) -> CharClass {
        let nested = !self.holes.is_empty();
        let class = self.classify_mode(c, next);
        if nested || !self.holes.is_empty() {
            CharClass::Literal
        } else {
            class
        }
    }

    fn classify_mode(&mut self, c: char, next: char) -> CharClass {
        if let Some(class) = self.swallow.take() {
            return class;
        }

        match self.mode {
            LexicalMode::Code => self.classify_code(c, next),
            LexicalMode::LineComment => {
                if c == '\n' {
                    self.mode = LexicalMode::Code;
                    return CharClass::Code;
                }
                CharClass::Comment
            }
            LexicalMode::BlockComment => {
                if c == '*' && next == '/' {
                    self.mode = LexicalMode::Code;
                    self.swallow = Some(CharClass::Comment);
                }
                CharClass::Comment
            }
            LexicalMode::Str { verbatim, interpolated: true } if !self.escaped && (c == '{' || c == '}') => {
                if next == c {
                    // `{{` and `}}` are literal braces.
                    self.swallow = Some(CharClass::Literal);
                } else if c == '{' {
                    self.holes.push(Hole { verbatim, depth: 1 });
                    self.mode = LexicalMode::Code;
                    self.last = c;
                }
                CharClass::Literal
            }
            LexicalMode::Str { verbatim: true, .. } => {
                if c == '"' {
                    if next == '"' {
                        self.swallow = Some(CharClass::Literal);
                    } else {
                        self.mode = LexicalMode::Code;
                    }
                }
                CharClass::Literal
            }
            LexicalMode::Str { verbatim: false, .. } => {
                self.feed_escaped(c, '"');
                CharClass::Literal
            }
            LexicalMode::Char => {
                self.feed_escaped(c, '\'');
                CharClass::Literal
            }
        }
    }

    fn classify_code(&mut self, c: char, next: char) -> CharClass {
        let class = match c {
            '/' if next == '/' => {
                self.mode = LexicalMode::LineComment;
                self.swallow = Some(CharClass::Comment);
                CharClass::Comment
            }
            '/' if next == '*' => {
                self.mode = LexicalMode::BlockComment;
                self.swallow = Some(CharClass::Comment);
                CharClass::Comment
            }
            '"' => {
                let verbatim = self.last == '@' || (self.last == '$' && self.before_last == '@');
                let interpolated = self.last == '$' || (self.last == '@' && self.before_last == '$');
                self.mode = LexicalMode::Str { verbatim, interpolated };
                CharClass::Literal
            }
            '\'' => {
                self.mode = LexicalMode::Char;
                CharClass::Literal
            }
            '{' => {
                if let Some(hole) = self.holes.last_mut() {
                    hole.depth += 1;
                }
                CharClass::Code
            }
            '}' => {
                self.close_brace();
                CharClass::Code
            }
            _ => CharClass::Code,
        };
        self.before_last = self.last;
        self.last = c;
        class
    }

    /// A `}` in code closes one brace level of the innermost hole, and the
    /// hole itself at depth zero.
    fn close_brace(&mut self) {
        let Some(hole) = self.holes.last_mut() else {
            return;
        };
        hole.depth -= 1;
        if hole.depth == 0 {
            let verbatim = hole.verbatim;
            self.holes.pop();
            self.mode = LexicalMode::Str { verbatim, interpolated: true };
        }
    }

    fn feed_escaped(&mut self, c: char, quote: char) {
        if self.escaped {
            self.escaped = false;
        } else if c == '\\' {
            self.escaped = true;
        } else if c == quote {
            self.mode = LexicalMode::Code;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns the characters of `text` reported as code.
    fn code_chars(text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut scanner = LexicalScanner::new();
        let mut out = String::new();
        for (i, c) in chars.iter().enumerate() {
            let next = chars.get(i + 1).copied().unwrap_or('\0');
            if scanner.feed(*c, next) {
                out.push(*c);
            }
        }
        out
    }

    #[test]
    fn test_string_hides_delimiters() {
        assert_eq!(code_chars(r#"f(")" )"#), "f( )");
    }

    #[test]
    fn test_escaped_quote_stays_in_string() {
        assert_eq!(code_chars(r#"a("\")") b"#), "a() b");
    }

    #[test]
    fn test_verbatim_string_doubled_quotes() {
        assert_eq!(code_chars(r#"x(@"a "")"" b") y"#), "x(@) y");
    }

    #[test]
    fn test_interpolated_verbatim_string() {
        assert_eq!(code_chars(r#"($@"c:\")"#), "($@)");
    }

    #[test]
    fn test_interpolation_hole_with_nested_string() {
        assert_eq!(code_chars(r#"{ s = $"{(b ? "}" : "x")}"; } y"#), "{ s = $; } y");
    }

    #[test]
    fn test_interpolation_hole_with_braces_and_nested_interpolation() {
        assert_eq!(code_chars(r#"( $"{new { A = 1 }.A} {$"{x}"}" ) z"#), "( $ ) z");
    }

    #[test]
    fn test_escaped_interpolation_braces() {
        assert_eq!(code_chars(r#"($"{{}}") b"#), "($) b");
        let mut scanner = LexicalScanner::new();
        for (c, next) in [('$', '"'), ('"', '{'), ('{', '{'), ('{', 'x')] {
            scanner.feed(c, next);
        }
        assert_eq!(scanner.mode(), LexicalMode::Str { verbatim: false, interpolated: true });
    }

    #[test]
    fn test_char_literal() {
        assert_eq!(code_chars(r"('}', '\'') ;"), "(, ) ;");
    }

    #[test]
    fn test_line_comment_ends_at_newline() {
        assert_eq!(code_chars("a // } )\nb"), "a \nb");
    }

    #[test]
    fn test_block_comment() {
        assert_eq!(code_chars("a /* } */ b"), "a  b");
        assert_eq!(code_chars("a /*/ } */b"), "a b");
    }

    #[test]
    fn test_division_is_code() {
        assert_eq!(code_chars("a / b"), "a / b");
    }

    #[test]
    fn test_classify_separates_comments_from_literals() {
        let text: Vec<char> = "a\"x\"/*y*/".chars().collect();
        let mut scanner = LexicalScanner::new();
        let classes: Vec<CharClass> = (0..text.len())
            .map(|i| scanner.classify(text[i], text.get(i + 1).copied().unwrap_or('\0')))
            .collect();
        assert_eq!(classes[0], CharClass::Code);
        assert!(classes[1..4].iter().all(|c| *c == CharClass::Literal));
        assert!(classes[4..].iter().all(|c| *c == CharClass::Comment));
    }

    #[test]
    fn test_mode_reporting() {
        let mut scanner = LexicalScanner::new();
        scanner.feed('"', 'x');
        assert_eq!(scanner.mode(), LexicalMode::Str { verbatim: false, interpolated: false });
        assert!(!scanner.in_code());
        assert!(scanner.in_literal());
        scanner.feed('x', '"');
        scanner.feed('"', '\0');
        assert!(scanner.in_code());
        assert!(!scanner.in_literal());
    }

    #[test]
    fn test_verbatim_literal_spans_lines() {
        let mut scanner = LexicalScanner::new();
        let text: Vec<char> = "x = @\"one\n".chars().collect();
        for (i, c) in text.iter().enumerate() {
            scanner.feed(*c, text.get(i + 1).copied().unwrap_or('\0'));
        }
        assert!(scanner.in_literal());
    }
}
