//! Attribute lists (`[Target: Name(args), Other]`) and array markers.

use super::words::trim_end_in_place;
use super::{BlockState, Parser, Step};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::symbols::{self, keyword};
use crate::lexer::EOF;
use csharp_model::{AttributeElement, ElementData, ElementId};

impl<'a> Parser<'a> {
    /// `[`: an attribute list when no element text is pending, otherwise
    /// an array rank or indexer parameter list folded into the text.
    pub(super) fn on_attribute_open(&mut self, state: &mut BlockState) -> Result<Step, ParseError> {
        if !state.buffer.trim().is_empty() {
            let inner = self.parse_nested_text(
                symbols::BEGIN_ATTRIBUTE,
                symbols::END_ATTRIBUTE,
                false,
                true,
            )?;
            trim_end_in_place(&mut state.buffer);
            state.buffer.push(symbols::BEGIN_ATTRIBUTE);
            state.buffer.push_str(&inner);
            state.buffer.push(symbols::END_ATTRIBUTE);
            return Ok(Step::NeedMore);
        }

        let (head, target) = self.parse_attribute_list()?;
        match target.as_deref() {
            // Assembly and module attributes apply to no declaration.
            Some(keyword::ASSEMBLY | keyword::MODULE) => {
                self.flush_comments(state)?;
                self.emit(state, vec![head])
            }
            _ => {
                state.attributes.push(head);
                Ok(Step::NeedMore)
            }
        }
    }

    /// Parses attributes up to the closing `]`. Attributes after the first
    /// are chained as its children.
    fn parse_attribute_list(&mut self) -> Result<(ElementId, Option<String>), ParseError> {
        let mut head: Option<ElementId> = None;
        let mut target: Option<String> = None;

        loop {
            let mut name = self.capture_word(true)?;
            self.cursor.skip_whitespace();
            if head.is_none() && self.cursor.peek() == symbols::TYPE_IMPLEMENTS {
                self.cursor.try_advance();
                target = Some(name);
                name = self.capture_word(true)?;
                self.cursor.skip_whitespace();
            }
            if name.is_empty() {
                return Err(self.error(ParseErrorKind::ExpectedName("an attribute name".to_string())));
            }

            let arguments = if self.cursor.peek() == symbols::BEGIN_PARAMETERS {
                Some(self.parse_nested_text(
                    symbols::BEGIN_PARAMETERS,
                    symbols::END_PARAMETERS,
                    true,
                    true,
                )?)
            } else {
                None
            };
            let attribute = AttributeElement {
                target: if head.is_none() { target.clone() } else { None },
                arguments,
            };
            let id = self.create(name, ElementData::Attribute(attribute));
            match head {
                None => head = Some(id),
                Some(head) => {
                    let result = self.tree.add_child(head, id);
                    self.model(result)?;
                }
            }

            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                symbols::ALIAS_SEPARATOR => {
                    self.cursor.try_advance();
                }
                symbols::END_ATTRIBUTE => {
                    self.cursor.try_advance();
                    break;
                }
                EOF => return Err(self.unexpected_eof(symbols::END_ATTRIBUTE)),
                found => {
                    return Err(self.error(ParseErrorKind::ExpectedCharacter {
                        expected: symbols::END_ATTRIBUTE.to_string(),
                        found,
                    }));
                }
            }
        }

        match head {
            Some(head) => Ok((head, target)),
            None => Err(self.error(ParseErrorKind::ExpectedName("an attribute name".to_string()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RegionPatterns;
    use config::constants::ParserConfig;

    #[test]
    fn test_attribute_list_with_target_and_chain() {
        let patterns = RegionPatterns::compile(&ParserConfig::default()).unwrap();
        let mut parser = Parser::new("return: NotNull, Range(1, \"]\")]", &patterns);
        let (head, target) = parser.parse_attribute_list().unwrap();
        assert_eq!(target.as_deref(), Some("return"));

        let tree = parser.tree();
        assert_eq!(tree.name(head), "NotNull");
        let chained = tree.children(head)[0];
        assert_eq!(tree.name(chained), "Range");
        let ElementData::Attribute(range) = tree.data(chained) else {
            panic!("expected attribute");
        };
        assert_eq!(range.arguments.as_deref(), Some("1, \"]\""));
        assert_eq!(range.target, None);
    }

    #[test]
    fn test_unterminated_attribute_list() {
        let patterns = RegionPatterns::compile(&ParserConfig::default()).unwrap();
        let mut parser = Parser::new("Obsolete", &patterns);
        let error = parser.parse_attribute_list().unwrap_err();
        assert_eq!(error.message(), "Unexpected end of file. Expected ]");
    }
}
