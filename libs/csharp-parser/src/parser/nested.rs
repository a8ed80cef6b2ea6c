//! # Nested-Text Extraction
//!
//! Balanced-delimiter reads that ignore delimiters inside string literals,
//! character literals and comments.
//!
//! ## Example
//!
//! ```rust
//! use config::constants::ParserConfig;
//! use csharp_parser::parser::{Parser, RegionPatterns};
//!
//! let patterns = RegionPatterns::compile(&ParserConfig::default()).unwrap();
//! let mut parser = Parser::new("(a(b)c) rest", &patterns);
//! assert_eq!(parser.parse_nested_text('(', ')', true, true).unwrap(), "a(b)c");
//! ```

use super::Parser;
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::symbols;
use crate::lexer::{CharClass, LexicalScanner, EOF};
use csharp_model::MemberBody;

/// How a member declaration continues after its signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BodyStart {
    /// `{`
    Block,
    /// `=>`
    Expression,
    /// `;`
    Statement,
}

impl<'a> Parser<'a> {
    /// Consumes `expected` after optional whitespace.
    pub fn eat_char(&mut self, expected: char) -> Result<(), ParseError> {
        self.cursor.skip_whitespace();
        match self.cursor.peek() {
            c if c == expected => {
                self.cursor.try_advance();
                Ok(())
            }
            EOF => Err(self.unexpected_eof(expected)),
            found => Err(self.error(ParseErrorKind::ExpectedCharacter {
                expected: expected.to_string(),
                found,
            })),
        }
    }

    pub(crate) fn unexpected_eof(&self, expected: char) -> ParseError {
        self.error(ParseErrorKind::UnexpectedEof {
            expected: expected.to_string(),
        })
    }

    /// Reads text up to the `end` that closes the current nesting level.
    ///
    /// With `begin_expected`, the opening `begin` is consumed first; the
    /// whitespace skipped before it is kept unless `trim` is set. The
    /// closing delimiter is consumed but not returned.
    pub fn parse_nested_text(
        &mut self,
        begin: char,
        end: char,
        begin_expected: bool,
        trim: bool,
    ) -> Result<String, ParseError> {
        let mut text = String::new();
        if begin_expected {
            while self.cursor.peek().is_whitespace() {
                self.cursor.try_advance();
                text.push(self.cursor.current());
            }
            self.eat_char(begin)?;
        }

        let mut scanner = LexicalScanner::new();
        let mut depth = 0usize;
        loop {
            if !self.cursor.try_advance() {
                return Err(self.unexpected_eof(end));
            }
            let c = self.cursor.current();
            if scanner.feed(c, self.cursor.peek()) {
                if c == begin {
                    depth += 1;
                } else if c == end {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
            }
            text.push(c);
        }

        if trim {
            Ok(text.trim().to_string())
        } else {
            Ok(text)
        }
    }

    /// Reads an expression up to the `;` that ends the statement and
    /// consumes it. Comments are dropped; the result is trimmed.
    pub(crate) fn read_statement_text(&mut self) -> Result<String, ParseError> {
        let mut scanner = LexicalScanner::new();
        let mut depth = 0usize;
        let mut text = String::new();
        loop {
            if !self.cursor.try_advance() {
                return Err(self.unexpected_eof(symbols::END_OF_STATEMENT));
            }
            let c = self.cursor.current();
            match scanner.classify(c, self.cursor.peek()) {
                CharClass::Comment => continue,
                CharClass::Literal => {}
                CharClass::Code => match c {
                    '(' | '[' | '{' => depth += 1,
                    ')' | ']' | '}' => depth = depth.saturating_sub(1),
                    symbols::END_OF_STATEMENT if depth == 0 => break,
                    _ => {}
                },
            }
            text.push(c);
        }
        Ok(text.trim().to_string())
    }

    /// Reads what follows a parameter list (constraint clauses or a
    /// constructor initializer) up to the body. Returns the trimmed text and
    /// how the body starts; the body opener is consumed.
    pub(crate) fn read_declaration_tail(&mut self) -> Result<(String, BodyStart), ParseError> {
        let mut scanner = LexicalScanner::new();
        let mut depth = 0usize;
        let mut text = String::new();
        loop {
            if !self.cursor.try_advance() {
                return Err(self.unexpected_eof(symbols::BEGIN_BLOCK));
            }
            let c = self.cursor.current();
            let next = self.cursor.peek();
            match scanner.classify(c, next) {
                CharClass::Comment => continue,
                CharClass::Literal => {}
                CharClass::Code if depth == 0 && c == symbols::BEGIN_BLOCK => {
                    return Ok((text.trim().to_string(), BodyStart::Block));
                }
                CharClass::Code if depth == 0 && c == symbols::END_OF_STATEMENT => {
                    return Ok((text.trim().to_string(), BodyStart::Statement));
                }
                CharClass::Code if depth == 0 && c == symbols::ASSIGNMENT && next == symbols::END_GENERIC => {
                    self.cursor.try_advance();
                    return Ok((text.trim().to_string(), BodyStart::Expression));
                }
                CharClass::Code => match c {
                    '(' | '[' => depth += 1,
                    ')' | ']' => depth = depth.saturating_sub(1),
                    _ => {}
                },
            }
            text.push(c);
        }
    }

    /// Reads a member body whose opener was consumed by
    /// [`read_declaration_tail`](Self::read_declaration_tail).
    pub(crate) fn read_body(&mut self, start: BodyStart) -> Result<MemberBody, ParseError> {
        Ok(match start {
            BodyStart::Block => MemberBody::Block(self.parse_nested_text(
                symbols::BEGIN_BLOCK,
                symbols::END_BLOCK,
                false,
                false,
            )?),
            BodyStart::Expression => MemberBody::Expression(self.read_statement_text()?),
            BodyStart::Statement => MemberBody::None,
        })
    }

    /// Reads block comment text after `/*` up to and including `*/`.
    pub(crate) fn read_block_comment_text(&mut self) -> Result<String, ParseError> {
        let mut text = String::new();
        loop {
            if !self.cursor.try_advance() {
                return Err(self.error(ParseErrorKind::UnexpectedEof {
                    expected: "*/".to_string(),
                }));
            }
            let c = self.cursor.current();
            if c == symbols::BLOCK_COMMENT_MARKER && self.cursor.peek() == symbols::COMMENT_START {
                self.cursor.try_advance();
                return Ok(text);
            }
            text.push(c);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RegionPatterns;
    use config::constants::ParserConfig;

    fn patterns() -> RegionPatterns {
        RegionPatterns::compile(&ParserConfig::default()).unwrap()
    }

    #[test]
    fn test_depth_tracking() {
        let patterns = patterns();
        let mut parser = Parser::new("(a(b)c)", &patterns);
        assert_eq!(parser.parse_nested_text('(', ')', true, true).unwrap(), "a(b)c");
        assert!(parser.cursor.is_eof());
    }

    #[test]
    fn test_string_literal_hides_closing_paren() {
        let patterns = patterns();
        let mut parser = Parser::new("f(\")\" )", &patterns);
        parser.cursor.try_advance();
        assert_eq!(parser.parse_nested_text('(', ')', true, true).unwrap(), "\")\"");
        assert!(parser.cursor.is_eof());
    }

    #[test]
    fn test_comments_and_chars_hide_delimiters() {
        let patterns = patterns();
        let source = "{ var c = '}'; // }\n /* } */ }";
        let mut parser = Parser::new(source, &patterns);
        let text = parser.parse_nested_text('{', '}', true, false).unwrap();
        assert_eq!(text, " var c = '}'; // }\n /* } */ ");
        assert!(parser.cursor.is_eof());
    }

    #[test]
    fn test_untrimmed_keeps_leading_whitespace() {
        let patterns = patterns();
        let mut parser = Parser::new("  ( x )", &patterns);
        assert_eq!(parser.parse_nested_text('(', ')', true, false).unwrap(), "   x ");
    }

    #[test]
    fn test_unexpected_end_of_file() {
        let patterns = patterns();
        let mut parser = Parser::new("{ if (x) { }", &patterns);
        let error = parser.parse_nested_text('{', '}', true, false).unwrap_err();
        assert_eq!(error.message(), "Unexpected end of file. Expected }");
    }

    #[test]
    fn test_missing_opening_delimiter() {
        let patterns = patterns();
        let mut parser = Parser::new("x)", &patterns);
        let error = parser.parse_nested_text('(', ')', true, true).unwrap_err();
        assert_eq!(error.message(), "Expected (, found 'x'");
    }

    #[test]
    fn test_statement_text_stops_at_top_level_semicolon() {
        let patterns = patterns();
        let mut parser = Parser::new(" new[] { 1, 2 }.Select(x => { return x; }) /* n */; next", &patterns);
        assert_eq!(
            parser.read_statement_text().unwrap(),
            "new[] { 1, 2 }.Select(x => { return x; })"
        );
        assert_eq!(parser.cursor.peek(), ' ');
    }

    #[test]
    fn test_declaration_tail() {
        let patterns = patterns();
        let mut parser = Parser::new(" : base(\"{\") // init\n{", &patterns);
        let (tail, start) = parser.read_declaration_tail().unwrap();
        assert_eq!(tail, ": base(\"{\")");
        assert_eq!(start, BodyStart::Block);

        let mut parser = Parser::new(" where T : new() => x;", &patterns);
        let (tail, start) = parser.read_declaration_tail().unwrap();
        assert_eq!(tail, "where T : new()");
        assert_eq!(start, BodyStart::Expression);
        assert_eq!(parser.read_body(start).unwrap(), MemberBody::Expression("x".to_string()));
    }

    #[test]
    fn test_block_comment_text() {
        let patterns = patterns();
        let mut parser = Parser::new(" a * b */x", &patterns);
        assert_eq!(parser.read_block_comment_text().unwrap(), " a * b ");
        assert_eq!(parser.cursor.peek(), 'x');
    }
}
