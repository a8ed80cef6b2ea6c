//! # Declaration Classifier
//!
//! Turns the word list of one declaration signature into keyword flags,
//! a name and a return type. The element kind is settled together with the
//! terminator that ended the signature.
//!
//! ## Example
//!
//! ```rust
//! use csharp_model::{CodeAccess, ElementKind, Modifiers};
//! use csharp_parser::parser::{classify, Terminator};
//!
//! let words = ["public", "static", "int", "Foo"].map(String::from);
//! let declaration = classify(&words).unwrap();
//! assert_eq!(declaration.access, CodeAccess::Public);
//! assert!(declaration.modifiers.contains(Modifiers::STATIC));
//! assert_eq!(declaration.name, "Foo");
//! assert_eq!(declaration.return_type.as_deref(), Some("int"));
//! assert_eq!(declaration.element_kind(Terminator::Parameters), Ok(ElementKind::Method));
//! ```

use crate::error::ParseErrorKind;
use crate::lexer::symbols::{self, keyword};
use csharp_model::{CodeAccess, ElementKind, Modifiers, OperatorKind, TypeKind};

/// Keyword-identified category of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    /// No kind keyword; the terminator decides.
    Member,
    Type(TypeKind),
    Event,
    Delegate,
}

/// Character that ended a declaration signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// `(`
    Parameters,
    /// `;`
    Statement,
    /// `=` starting an initializer.
    Assignment,
    /// `=>` starting an expression body.
    ExpressionBody,
    /// `{`
    Block,
}

impl Terminator {
    pub fn has_parameters(&self) -> bool {
        matches!(self, Self::Parameters)
    }
}

/// Classified declaration signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub access: CodeAccess,
    pub modifiers: Modifiers,
    pub is_async: bool,
    pub is_volatile: bool,
    pub is_fixed: bool,
    /// Declared name; empty when only keywords were classified.
    pub name: String,
    pub return_type: Option<String>,
    /// `Some` for operator declarations.
    pub operator: Option<OperatorKind>,
}

impl Declaration {
    fn new() -> Self {
        Self {
            kind: DeclarationKind::Member,
            access: CodeAccess::None,
            modifiers: Modifiers::NONE,
            is_async: false,
            is_volatile: false,
            is_fixed: false,
            name: String::new(),
            return_type: None,
            operator: None,
        }
    }

    /// Settles the element kind from the classified keywords and the
    /// terminator that followed the signature.
    pub fn element_kind(&self, terminator: Terminator) -> Result<ElementKind, ParseErrorKind> {
        let kind = match (self.kind, terminator) {
            (DeclarationKind::Delegate, Terminator::Parameters) => ElementKind::Delegate,
            (
                DeclarationKind::Event,
                Terminator::Statement | Terminator::Assignment | Terminator::Block,
            ) => ElementKind::Event,
            (DeclarationKind::Member, Terminator::Parameters) => {
                if self.return_type.is_none() && self.operator.is_none() {
                    ElementKind::Constructor
                } else {
                    ElementKind::Method
                }
            }
            (DeclarationKind::Member, _) if self.operator.is_some() => {
                return Err(self.unhandled());
            }
            (DeclarationKind::Member, Terminator::Statement | Terminator::Assignment) => {
                ElementKind::Field
            }
            (DeclarationKind::Member, Terminator::Block | Terminator::ExpressionBody) => {
                ElementKind::Property
            }
            _ => return Err(self.unhandled()),
        };

        let needs_type = !matches!(kind, ElementKind::Constructor | ElementKind::Method);
        if needs_type && self.return_type.is_none() {
            return Err(ParseErrorKind::MissingMemberType {
                name: self.name.clone(),
            });
        }
        Ok(kind)
    }

    fn unhandled(&self) -> ParseErrorKind {
        let text = [self.return_type.as_deref().unwrap_or(""), &self.name]
            .iter()
            .filter(|w| !w.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        ParseErrorKind::UnhandledText(text)
    }
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Classifies a full declaration signature: keywords, then name and
/// return type.
pub fn classify(words: &[String]) -> Result<Declaration, ParseErrorKind> {
    let (mut declaration, consumed) = strip_keywords(words)?;
    let unhandled = || ParseErrorKind::UnhandledText(words.join(" "));

    let mut rest = normalize_operator_words(&words[consumed..]);
    let name = rest
        .pop()
        .ok_or_else(|| ParseErrorKind::ExpectedName("a member name".to_string()))?;

    let mut return_type = if rest.last().map(String::as_str) == Some(keyword::OPERATOR) {
        rest.pop();
        match rest.last().map(String::as_str) {
            Some(keyword::IMPLICIT) => {
                rest.pop();
                declaration.operator = Some(OperatorKind::Implicit);
                None
            }
            Some(keyword::EXPLICIT) => {
                rest.pop();
                declaration.operator = Some(OperatorKind::Explicit);
                None
            }
            _ => {
                declaration.operator = Some(OperatorKind::None);
                Some(rest.pop().ok_or_else(|| ParseErrorKind::MissingMemberType {
                    name: name.clone(),
                })?)
            }
        }
    } else {
        rest.pop()
    };

    // `ref` and `ref readonly` returns keep their qualifiers.
    if !rest.is_empty() {
        let qualifiers = rest.iter().all(|w| w == keyword::REF || w == keyword::READONLY);
        match (&mut return_type, qualifiers) {
            (Some(return_type), true) => *return_type = format!("{} {}", rest.join(" "), return_type),
            _ => return Err(unhandled()),
        }
    }
    if let Some(return_type) = &return_type {
        let bare = return_type.rsplit(' ').next().unwrap_or(return_type);
        if symbols::is_declaration_keyword(bare) || bare == keyword::OPERATOR {
            return Err(unhandled());
        }
    }

    declaration.name = name;
    declaration.return_type = return_type;
    Ok(declaration)
}

/// Classifies a signature made only of keywords, such as the prefix of a
/// type declaration (`public sealed class`).
pub fn classify_keywords(words: &[String]) -> Result<Declaration, ParseErrorKind> {
    let (declaration, consumed) = strip_keywords(words)?;
    if consumed != words.len() {
        return Err(ParseErrorKind::UnhandledText(words.join(" ")));
    }
    Ok(declaration)
}

/// Strips the leading keyword run. Returns the flags and the number of
/// words consumed.
fn strip_keywords(words: &[String]) -> Result<(Declaration, usize), ParseErrorKind> {
    let unhandled = || ParseErrorKind::UnhandledText(words.join(" "));
    let mut declaration = Declaration::new();
    let mut access_words: Vec<&str> = Vec::new();
    let mut consumed = 0;

    for word in words {
        let word = word.as_str();
        if !symbols::is_declaration_keyword(word) {
            break;
        }
        consumed += 1;

        if symbols::is_access_keyword(word) {
            if access_words.contains(&word) {
                return Err(unhandled());
            }
            access_words.push(word);
            continue;
        }
        if let Some(flag) = Modifiers::from_keyword(word) {
            declaration.modifiers.insert(flag);
            continue;
        }

        match word {
            keyword::ASYNC => declaration.is_async = true,
            keyword::VOLATILE => declaration.is_volatile = true,
            keyword::FIXED => declaration.is_fixed = true,
            keyword::EVENT | keyword::DELEGATE if declaration.kind != DeclarationKind::Member => {
                return Err(unhandled());
            }
            keyword::EVENT => declaration.kind = DeclarationKind::Event,
            keyword::DELEGATE => declaration.kind = DeclarationKind::Delegate,
            _ => {
                let Some(type_kind) = symbols::type_keyword(word) else {
                    return Err(unhandled());
                };
                match declaration.kind {
                    DeclarationKind::Member => declaration.kind = DeclarationKind::Type(type_kind),
                    DeclarationKind::Type(_) => {
                        return Err(ParseErrorKind::ConflictingTypeKeywords(words.join(" ")));
                    }
                    _ => return Err(unhandled()),
                }
            }
        }
    }

    declaration.access = symbols::resolve_access(&access_words).ok_or_else(unhandled)?;
    Ok((declaration, consumed))
}

/// Splits a glued operator declarator (`operator==`) into two words.
fn normalize_operator_words(words: &[String]) -> Vec<String> {
    let mut normalized = Vec::with_capacity(words.len() + 1);
    for word in words {
        match word.strip_prefix(keyword::OPERATOR) {
            Some(symbol) if is_operator_symbol(symbol) => {
                normalized.push(keyword::OPERATOR.to_string());
                normalized.push(symbol.to_string());
            }
            _ => normalized.push(word.clone()),
        }
    }
    normalized
}

/// True for a non-empty run of operator punctuation.
pub(crate) fn is_operator_symbol(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| !c.is_alphanumeric() && c != '_' && !c.is_whitespace())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_public_static_method() {
        let declaration = classify(&words("public static int Foo")).unwrap();
        assert_eq!(declaration.access, CodeAccess::Public);
        assert_eq!(declaration.modifiers, Modifiers::STATIC);
        assert_eq!(declaration.name, "Foo");
        assert_eq!(declaration.return_type.as_deref(), Some("int"));
        assert!(Terminator::Parameters.has_parameters());
        assert_eq!(
            declaration.element_kind(Terminator::Parameters),
            Ok(ElementKind::Method)
        );
    }

    #[test]
    fn test_constructor_has_no_return_type() {
        let declaration = classify(&words("protected internal Widget")).unwrap();
        assert_eq!(declaration.access, CodeAccess::ProtectedInternal);
        assert_eq!(declaration.return_type, None);
        assert_eq!(
            declaration.element_kind(Terminator::Parameters),
            Ok(ElementKind::Constructor)
        );
    }

    #[test]
    fn test_shape_heuristics() {
        let declaration = classify(&words("private readonly int count")).unwrap();
        assert_eq!(declaration.element_kind(Terminator::Statement), Ok(ElementKind::Field));
        assert_eq!(declaration.element_kind(Terminator::Assignment), Ok(ElementKind::Field));
        assert_eq!(declaration.element_kind(Terminator::Block), Ok(ElementKind::Property));
    }

    #[test]
    fn test_event_and_delegate_keywords() {
        let event = classify(&words("public event EventHandler Changed")).unwrap();
        assert_eq!(event.kind, DeclarationKind::Event);
        assert_eq!(event.return_type.as_deref(), Some("EventHandler"));
        assert_eq!(event.element_kind(Terminator::Statement), Ok(ElementKind::Event));
        assert_eq!(event.element_kind(Terminator::Assignment), Ok(ElementKind::Event));

        let delegate = classify(&words("public delegate void Handler")).unwrap();
        assert_eq!(delegate.element_kind(Terminator::Parameters), Ok(ElementKind::Delegate));
        assert!(delegate.element_kind(Terminator::Statement).is_err());
    }

    #[test]
    fn test_type_keywords() {
        let declaration = classify_keywords(&words("public abstract partial class")).unwrap();
        assert_eq!(declaration.kind, DeclarationKind::Type(TypeKind::Class));
        assert!(declaration.modifiers.contains(Modifiers::ABSTRACT | Modifiers::PARTIAL));

        let conflict = classify_keywords(&words("class struct"));
        assert!(matches!(conflict, Err(ParseErrorKind::ConflictingTypeKeywords(_))));
    }

    #[test]
    fn test_operator_declarators() {
        let plus = classify(&words("public static Money operator +")).unwrap();
        assert_eq!(plus.name, "+");
        assert_eq!(plus.return_type.as_deref(), Some("Money"));
        assert_eq!(plus.operator, Some(OperatorKind::None));

        let glued = classify(&words("public static bool operator==")).unwrap();
        assert_eq!(glued.name, "==");

        let conversion = classify(&words("public static implicit operator Money")).unwrap();
        assert_eq!(conversion.name, "Money");
        assert_eq!(conversion.return_type, None);
        assert_eq!(conversion.operator, Some(OperatorKind::Implicit));
        assert_eq!(
            conversion.element_kind(Terminator::Parameters),
            Ok(ElementKind::Method)
        );
    }

    #[test]
    fn test_indexer_and_flags() {
        let indexer = classify(&words("public string this[int]")).unwrap();
        assert_eq!(indexer.name, "this[int]");
        assert_eq!(indexer.element_kind(Terminator::Block), Ok(ElementKind::Property));

        let field = classify(&words("private volatile bool _stop")).unwrap();
        assert!(field.is_volatile);

        let method = classify(&words("public async Task Run")).unwrap();
        assert!(method.is_async);
    }

    #[test]
    fn test_ref_return_type() {
        let declaration = classify(&words("public ref readonly int Find")).unwrap();
        assert_eq!(declaration.return_type.as_deref(), Some("ref readonly int"));
    }

    #[test]
    fn test_unhandled_words() {
        assert!(matches!(
            classify(&words("public int extra Foo")),
            Err(ParseErrorKind::UnhandledText(_))
        ));
        assert!(matches!(
            classify(&words("public private int Foo")),
            Err(ParseErrorKind::UnhandledText(_))
        ));
    }

    #[test]
    fn test_missing_member_type() {
        let declaration = classify(&words("private count")).unwrap();
        assert_eq!(
            declaration.element_kind(Terminator::Statement),
            Err(ParseErrorKind::MissingMemberType { name: "count".to_string() })
        );
    }
}
