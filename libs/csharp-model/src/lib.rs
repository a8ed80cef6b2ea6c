//! # C# Element Model
//!
//! In-memory model of parsed C# source: an arena-backed [`CodeTree`] of
//! elements (namespaces, types, members, comments, attributes, regions and
//! conditional directives) with consistent parent/child links, deep cloning,
//! closed-set [`Visitor`] dispatch, and a [`CSharpWriter`] that renders a
//! tree back to text.
//!
//! ## Architecture
//!
//! ```text
//! csharp-parser → CodeTree → (reorganizer) → CSharpWriter → text
//! ```
//!
//! ## Design Principles
//!
//! - **Arena Ownership**: Nodes refer to each other by [`ElementId`]; no
//!   reference cycles
//! - **Typed Payloads**: One [`ElementData`] variant per element kind
//! - **Exhaustive Dispatch**: The visitor matches every kind at compile time

pub mod element;
pub mod error;
pub mod lexical;
pub mod tree;
pub mod visitor;
pub mod writer;

// Re-exports for convenience
pub use element::*;
pub use error::ModelError;
pub use tree::{CodeTree, ElementId, Node, ShapeEntry};
pub use visitor::{walk_children, Visitor};
pub use writer::{write_tree, CSharpWriter};
