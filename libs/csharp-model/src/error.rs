//! # Model Errors
//!
//! Errors raised by tree mutations that would break the element model's
//! invariants.

use crate::element::ElementKind;
use thiserror::Error;

/// Errors that can occur while mutating a [`CodeTree`](crate::CodeTree).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Adding the child would make an element its own ancestor.
    #[error("Cannot add an element beneath itself or one of its descendants")]
    CycleDetected,

    /// The owner kind does not accept header comments.
    #[error("Elements of kind {0:?} cannot carry header comments")]
    NotCommentable(ElementKind),

    /// The owner kind does not accept attributes.
    #[error("Elements of kind {0:?} cannot carry attributes")]
    NotAttributable(ElementKind),

    /// An operation required an element of a different kind.
    #[error("Expected an element of kind {expected:?}, found {found:?}")]
    KindMismatch {
        expected: ElementKind,
        found: ElementKind,
    },

    /// A constraint followed the `new()` constraint.
    #[error("The new() constraint must be the last constraint specified for type parameter '{parameter}'")]
    ConstructorConstraintNotLast { parameter: String },
}

// =============================================================================
// TESTS
// =============================================================================
