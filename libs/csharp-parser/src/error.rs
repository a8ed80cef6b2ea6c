//! # Parse Errors
//!
//! Every failure aborts the parse of the current source and carries the
//! position the cursor had reached.
//!
//! ## Example
//!
//! ```rust
//! use csharp_parser::error::{ParseError, ParseErrorKind};
//! use csharp_parser::span::Position;
//!
//! let error = ParseError::new(ParseErrorKind::UnmatchedEndRegion, Position::new(40, 3, 0));
//! assert_eq!(error.to_string(), "Unmatched end region directive (line 4, column 1)");
//! ```

use crate::span::Position;
use csharp_model::ModelError;
use thiserror::Error;

// =============================================================================
// PARSE ERROR
// =============================================================================

/// A parse error with location information.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} ({position})")]
pub struct ParseError {
    /// Error kind with details.
    pub kind: ParseErrorKind,
    /// Cursor position when the error was raised.
    pub position: Position,
}

impl ParseError {
    pub const fn new(kind: ParseErrorKind, position: Position) -> Self {
        Self { kind, position }
    }

    /// Human-readable message without the position suffix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

// =============================================================================
// PARSE ERROR KIND
// =============================================================================

/// Kinds of parse errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    /// Input ended inside a construct.
    #[error("Unexpected end of file. Expected {expected}")]
    UnexpectedEof { expected: String },

    /// A specific character was required.
    #[error("Expected {expected}, found '{found}'")]
    ExpectedCharacter { expected: String, found: char },

    /// A character that cannot start or continue a declaration.
    #[error("Unexpected character '{0}'")]
    UnexpectedCharacter(char),

    /// A name was required but none was present.
    #[error("Expected {0}")]
    ExpectedName(String),

    /// A base list entry was empty.
    #[error("Expected a class or interface name")]
    ExpectedTypeName,

    /// A member declaration had no type.
    #[error("Expected a type for member '{name}'")]
    MissingMemberType { name: String },

    /// Declaration text that no rule could classify.
    #[error("Unhandled element text '{0}'")]
    UnhandledText(String),

    /// More than one type keyword in a declaration.
    #[error("Conflicting type keywords in '{0}'")]
    ConflictingTypeKeywords(String),

    /// `#endregion` or end comment directive without an open region.
    #[error("Unmatched end region directive")]
    UnmatchedEndRegion,

    /// A region still open at the end of its block.
    #[error("Missing end region directive for '{name}'")]
    MissingEndRegion { name: String },

    /// `#elif`, `#else` or `#endif` without an open `#if`.
    #[error("Unmatched #{0} directive")]
    UnmatchedConditional(String),

    /// `#elif` or `#else` following the `#else` of the same chain.
    #[error("Unexpected #{0} after #else")]
    BranchAfterElse(String),

    /// An `#if` still open at the end of its block.
    #[error("Expected #endif for condition '{condition}'")]
    MissingEndIf { condition: String },

    /// Preprocessor directives other than region and if-family.
    #[error("Unsupported preprocessor directive '#{0}'")]
    UnsupportedDirective(String),

    /// A preprocessor directive in the middle of a declaration.
    #[error("Preprocessor directive '#{directive}' interrupts element text '{text}'")]
    DirectiveInsideElement { directive: String, text: String },

    /// An attribute with no element to apply to.
    #[error("Attribute '{0}' is not associated with an element")]
    UnattachedAttribute(String),

    /// A region comment directive pattern failed to compile.
    #[error("Invalid region pattern '{pattern}': {message}")]
    InvalidRegionPattern { pattern: String, message: String },

    /// An element model invariant was violated while building the tree.
    #[error(transparent)]
    Model(#[from] ModelError),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_eof_display() {
        let error = ParseError::new(
            ParseErrorKind::UnexpectedEof { expected: "}".to_string() },
            Position::new(5, 0, 5),
        );
        assert_eq!(error.message(), "Unexpected end of file. Expected }");
        assert!(error.to_string().ends_with("(line 1, column 6)"));
    }

    #[test]
    fn test_missing_end_region_display() {
        let kind = ParseErrorKind::MissingEndRegion { name: "Fields".to_string() };
        assert_eq!(kind.to_string(), "Missing end region directive for 'Fields'");
    }

    #[test]
    fn test_branch_after_else_display() {
        let kind = ParseErrorKind::BranchAfterElse("elif".to_string());
        assert_eq!(kind.to_string(), "Unexpected #elif after #else");
    }

    #[test]
    fn test_model_error_is_transparent() {
        let kind: ParseErrorKind = ModelError::ConstructorConstraintNotLast {
            parameter: "T".to_string(),
        }
        .into();
        assert!(kind.to_string().starts_with("The new() constraint"));
    }
}
