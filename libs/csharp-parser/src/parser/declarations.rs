//! Namespaces, usings and type declarations. These are recognized by
//! their keyword and parsed straight from the cursor.

use super::classifier::{classify_keywords, DeclarationKind};
use super::members::parse_constraint_clauses;
use super::words::{split_generic_name, split_top_level, split_words};
use super::{BlockState, Parser, Step};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::symbols::{self, keyword};
use crate::lexer::{CharClass, LexicalScanner, EOF};
use csharp_model::{
    ElementData, ElementId, InterfaceReference, InterfaceReferenceKind, NamespaceElement,
    TypeElement, TypeKind, TypeParameter, UsingElement,
};

impl<'a> Parser<'a> {
    /// `namespace A.B { ... }` or file-scoped `namespace A.B;`.
    pub(super) fn parse_namespace(&mut self, state: &mut BlockState) -> Result<Step, ParseError> {
        let name = self.capture_word(false)?;
        if name.is_empty() {
            return Err(self.error(ParseErrorKind::ExpectedName("a namespace name".to_string())));
        }

        self.cursor.skip_whitespace();
        let is_file_scoped = match self.cursor.peek() {
            symbols::END_OF_STATEMENT => true,
            symbols::BEGIN_BLOCK => false,
            EOF => return Err(self.unexpected_eof(symbols::BEGIN_BLOCK)),
            found => {
                return Err(self.error(ParseErrorKind::ExpectedCharacter {
                    expected: symbols::BEGIN_BLOCK.to_string(),
                    found,
                }));
            }
        };
        self.cursor.try_advance();

        let id = self.create(name, ElementData::Namespace(NamespaceElement { is_file_scoped }));
        self.parse_children(id)?;
        if !is_file_scoped {
            self.eat_char(symbols::END_BLOCK)?;
        }
        self.emit_member(state, id)
    }

    /// `using A.B;`, `using static A.B;` or `using Alias = A.B;`.
    pub(super) fn parse_using(&mut self, state: &mut BlockState) -> Result<Step, ParseError> {
        let mut name = self.capture_word(true)?;
        let is_static = name == keyword::STATIC;
        if is_static {
            name = self.capture_word(true)?;
        }
        if name.is_empty() {
            return Err(self.error(ParseErrorKind::ExpectedName(
                "a namespace or type name".to_string(),
            )));
        }

        self.cursor.skip_whitespace();
        let redefine = if self.cursor.peek() == symbols::ASSIGNMENT {
            self.cursor.try_advance();
            self.cursor.skip_whitespace();
            let target = if self.cursor.peek() == symbols::BEGIN_PARAMETERS {
                self.cursor.try_advance();
                let elements = self.parse_nested_text(
                    symbols::BEGIN_PARAMETERS,
                    symbols::END_PARAMETERS,
                    false,
                    true,
                )?;
                format!("({elements})")
            } else {
                self.capture_type_name()?
            };
            if target.is_empty() {
                return Err(self.error(ParseErrorKind::ExpectedName(format!(
                    "an alias target for '{name}'"
                ))));
            }
            Some(target)
        } else {
            None
        };
        self.eat_char(symbols::END_OF_STATEMENT)?;

        let using = UsingElement {
            redefine,
            is_static,
            is_movable: true,
        };
        let id = self.create(name, ElementData::Using(using));
        self.emit_member(state, id)
    }

    /// Type declaration after its keyword; `prefix` holds the keywords
    /// including the type keyword.
    pub(super) fn parse_type(&mut self, state: &mut BlockState, prefix: &[String]) -> Result<Step, ParseError> {
        let declaration = classify_keywords(prefix).map_err(|kind| self.error(kind))?;
        let DeclarationKind::Type(kind) = declaration.kind else {
            return Err(self.error(ParseErrorKind::UnhandledText(prefix.join(" "))));
        };

        let full_name = self.capture_word(true)?;
        if full_name.is_empty() {
            return Err(self.error(ParseErrorKind::ExpectedName(format!(
                "a name after '{}'",
                kind.keyword()
            ))));
        }
        let (name, parameter_names) = split_generic_name(&full_name);

        let mut element = TypeElement::new(kind);
        element.access = declaration.access;
        element.modifiers = declaration.modifiers;
        element.type_parameters = parameter_names.into_iter().map(TypeParameter::new).collect();

        let header = self.read_type_header()?;
        self.apply_type_header(&header, &mut element)?;

        if kind == TypeKind::Enum {
            element.body_text = Some(self.parse_nested_text(
                symbols::BEGIN_BLOCK,
                symbols::END_BLOCK,
                false,
                false,
            )?);
        }
        let id = self.create(name, ElementData::Type(element));
        if kind != TypeKind::Enum {
            self.parse_children(id)?;
            self.eat_char(symbols::END_BLOCK)?;
        }

        // `class A { };`
        self.cursor.advance_while(|c| c == ' ' || c == '\t');
        if self.cursor.peek() == symbols::END_OF_STATEMENT {
            self.cursor.try_advance();
        }

        self.emit_member(state, id)
    }

    /// Parses a nested block body and attaches its elements to `parent`.
    fn parse_children(&mut self, parent: ElementId) -> Result<(), ParseError> {
        for child in self.parse_block_guarded()? {
            let result = self.tree.add_child(parent, child);
            self.model(result)?;
        }
        Ok(())
    }

    /// Text between the type name and its opening brace, which is consumed.
    fn read_type_header(&mut self) -> Result<String, ParseError> {
        let mut scanner = LexicalScanner::new();
        let mut text = String::new();
        loop {
            if !self.cursor.try_advance() {
                return Err(self.unexpected_eof(symbols::BEGIN_BLOCK));
            }
            let c = self.cursor.current();
            match scanner.classify(c, self.cursor.peek()) {
                CharClass::Comment => continue,
                CharClass::Code if c == symbols::BEGIN_BLOCK => return Ok(text.trim().to_string()),
                _ => text.push(c),
            }
        }
    }

    /// Base list (`: Base, IFoo<T>`) and constraint clauses.
    fn apply_type_header(&self, header: &str, element: &mut TypeElement) -> Result<(), ParseError> {
        let words = split_words(header);
        let split = words
            .iter()
            .position(|w| w == keyword::WHERE)
            .unwrap_or(words.len());
        let bases = words[..split].join(" ");
        let clauses = words[split..].join(" ");

        if !bases.is_empty() {
            let Some(list) = bases.strip_prefix(symbols::TYPE_IMPLEMENTS) else {
                return Err(self.error(ParseErrorKind::UnhandledText(bases)));
            };
            for base in split_top_level(list, symbols::ALIAS_SEPARATOR) {
                if base.is_empty() {
                    return Err(self.error(ParseErrorKind::ExpectedTypeName));
                }
                element
                    .interfaces
                    .push(InterfaceReference::new(base, InterfaceReferenceKind::None));
            }
        }

        parse_constraint_clauses(&clauses, &mut element.type_parameters)
            .map_err(|kind| self.error(kind))
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

    fn header(text: &str) -> Result<TypeElement, ParseError> {
        let patterns = RegionPatterns::compile(&ParserConfig::default()).unwrap();
        let parser = Parser::new("", &patterns);
        let mut element = TypeElement::new(TypeKind::Class);
        element.type_parameters = vec![TypeParameter::new("T")];
        parser.apply_type_header(text, &mut element)?;
        Ok(element)
    }

    #[test]
    fn test_base_list_and_constraints() {
        let element = header(": Base<T>, IEquatable<T> where T : struct").unwrap();
        let names: Vec<&str> = element.interfaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Base<T>", "IEquatable<T>"]);
        assert_eq!(element.type_parameters[0].constraints(), ["struct"]);
    }

    #[test]
    fn test_empty_base_entry() {
        let error = header(": IFoo, ").unwrap_err();
        assert_eq!(error.message(), "Expected a class or interface name");
    }

    #[test]
    fn test_header_without_colon() {
        assert!(matches!(
            header("IFoo").unwrap_err().kind,
            ParseErrorKind::UnhandledText(_)
        ));
    }
}
