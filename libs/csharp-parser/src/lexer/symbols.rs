//! # Lexical Symbol Tables
//!
//! Punctuation and keywords the driving loop reacts to. Everything here is
//! immutable and shared freely between parser instances.

use csharp_model::{CodeAccess, Modifiers, TypeKind};

// =============================================================================
// SYMBOLS
// =============================================================================

pub const COMMENT_START: char = '/';
pub const BLOCK_COMMENT_MARKER: char = '*';
pub const PREPROCESSOR: char = '#';
pub const BEGIN_ATTRIBUTE: char = '[';
pub const END_ATTRIBUTE: char = ']';
pub const BEGIN_BLOCK: char = '{';
pub const END_BLOCK: char = '}';
pub const BEGIN_PARAMETERS: char = '(';
pub const END_PARAMETERS: char = ')';
pub const END_OF_STATEMENT: char = ';';
pub const ALIAS_SEPARATOR: char = ',';
pub const ASSIGNMENT: char = '=';
pub const BEGIN_GENERIC: char = '<';
pub const END_GENERIC: char = '>';
pub const TYPE_IMPLEMENTS: char = ':';
pub const NULLABLE: char = '?';

/// Characters that end a word and may trigger a parser transition.
const SYMBOLS: [char; 16] = [
    COMMENT_START,
    BLOCK_COMMENT_MARKER,
    PREPROCESSOR,
    BEGIN_ATTRIBUTE,
    END_ATTRIBUTE,
    BEGIN_BLOCK,
    END_BLOCK,
    BEGIN_PARAMETERS,
    END_PARAMETERS,
    END_OF_STATEMENT,
    ALIAS_SEPARATOR,
    ASSIGNMENT,
    BEGIN_GENERIC,
    END_GENERIC,
    TYPE_IMPLEMENTS,
    NULLABLE,
];

/// True for syntactically significant punctuation.
pub fn is_symbol(c: char) -> bool {
    SYMBOLS.contains(&c)
}

/// True when `c` ends the word being accumulated.
pub fn is_word_break(c: char) -> bool {
    c.is_whitespace() || is_symbol(c) || c == crate::lexer::EOF
}

// =============================================================================
// KEYWORDS
// =============================================================================

pub mod keyword {
    pub const PUBLIC: &str = "public";
    pub const PRIVATE: &str = "private";
    pub const PROTECTED: &str = "protected";
    pub const INTERNAL: &str = "internal";

    pub const NAMESPACE: &str = "namespace";
    pub const USING: &str = "using";
    pub const STATIC: &str = "static";
    pub const CLASS: &str = "class";
    pub const STRUCT: &str = "struct";
    pub const INTERFACE: &str = "interface";
    pub const ENUM: &str = "enum";
    pub const EVENT: &str = "event";
    pub const DELEGATE: &str = "delegate";
    pub const OPERATOR: &str = "operator";
    pub const IMPLICIT: &str = "implicit";
    pub const EXPLICIT: &str = "explicit";
    pub const ASYNC: &str = "async";
    pub const VOLATILE: &str = "volatile";
    pub const FIXED: &str = "fixed";
    pub const WHERE: &str = "where";
    pub const GLOBAL: &str = "global";
    pub const REF: &str = "ref";
    pub const READONLY: &str = "readonly";
    pub const ASSEMBLY: &str = "assembly";
    pub const MODULE: &str = "module";

    pub const REGION: &str = "region";
    pub const END_REGION: &str = "endregion";
    pub const IF: &str = "if";
    pub const ELIF: &str = "elif";
    pub const ELSE: &str = "else";
    pub const END_IF: &str = "endif";
}

/// Access keyword as a single flag; combinations are resolved by
/// [`resolve_access`].
pub fn is_access_keyword(word: &str) -> bool {
    matches!(
        word,
        keyword::PUBLIC | keyword::PRIVATE | keyword::PROTECTED | keyword::INTERNAL
    )
}

/// Maps the set of access keywords seen on a declaration to one level.
/// Returns `None` for contradictory combinations.
pub fn resolve_access(words: &[&str]) -> Option<CodeAccess> {
    let has = |w: &str| words.contains(&w);
    let public = has(keyword::PUBLIC);
    let private = has(keyword::PRIVATE);
    let protected = has(keyword::PROTECTED);
    let internal = has(keyword::INTERNAL);

    match (public, private, protected, internal) {
        (false, false, false, false) => Some(CodeAccess::None),
        (true, false, false, false) => Some(CodeAccess::Public),
        (false, true, false, false) => Some(CodeAccess::Private),
        (false, false, true, false) => Some(CodeAccess::Protected),
        (false, false, false, true) => Some(CodeAccess::Internal),
        (false, false, true, true) => Some(CodeAccess::ProtectedInternal),
        (false, true, true, false) => Some(CodeAccess::PrivateProtected),
        _ => None,
    }
}

/// Type declaration keyword.
pub fn type_keyword(word: &str) -> Option<TypeKind> {
    TypeKind::from_keyword(word)
}

/// Member-level flags that are not part of [`Modifiers`].
pub fn is_flag_keyword(word: &str) -> bool {
    matches!(word, keyword::ASYNC | keyword::VOLATILE | keyword::FIXED)
}

/// Any keyword the classifier strips from the front of a declaration.
pub fn is_declaration_keyword(word: &str) -> bool {
    is_access_keyword(word)
        || Modifiers::from_keyword(word).is_some()
        || is_flag_keyword(word)
        || type_keyword(word).is_some()
        || matches!(word, keyword::EVENT | keyword::DELEGATE)
}

/// Keywords that may only precede other keywords (access and modifiers).
pub fn is_prefix_keyword(word: &str) -> bool {
    is_access_keyword(word) || Modifiers::from_keyword(word).is_some() || is_flag_keyword(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols() {
        for c in ['{', '}', '(', ')', ';', '<', '?', '#'] {
            assert!(is_symbol(c), "{c} should be a symbol");
        }
        assert!(!is_symbol('.'));
        assert!(!is_symbol('_'));
        assert!(is_word_break(' '));
        assert!(is_word_break(crate::lexer::EOF));
    }

    #[test]
    fn test_resolve_access_combinations() {
        assert_eq!(resolve_access(&["public"]), Some(CodeAccess::Public));
        assert_eq!(
            resolve_access(&["internal", "protected"]),
            Some(CodeAccess::ProtectedInternal)
        );
        assert_eq!(
            resolve_access(&["private", "protected"]),
            Some(CodeAccess::PrivateProtected)
        );
        assert_eq!(resolve_access(&[]), Some(CodeAccess::None));
        assert_eq!(resolve_access(&["public", "private"]), None);
    }

    #[test]
    fn test_declaration_keywords() {
        assert!(is_declaration_keyword("sealed"));
        assert!(is_declaration_keyword("struct"));
        assert!(is_declaration_keyword("delegate"));
        assert!(!is_declaration_keyword("int"));
        assert!(!is_prefix_keyword("class"));
    }
}
