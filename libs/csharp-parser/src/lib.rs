//! # C# Element Parser
//!
//! Reads C# source text into a [`CodeTree`] of namespaces, usings, types,
//! members, comments, attributes, regions and conditional directives.
//! Member bodies are kept as raw text; statements and expressions are not
//! parsed.
//!
//! ## Architecture
//!
//! ```text
//! Source Text → Cursor → Parser (per-block state machine) → CodeTree
//! ```
//!
//! ## Example
//!
//! ```rust
//! use csharp_parser::parse;
//!
//! let tree = parse("namespace Demo { public class Widget { } }").unwrap();
//! assert_eq!(tree.roots().len(), 1);
//! ```
//!
//! ## Pipeline Integration
//!
//! ```text
//! csharp-parser → csharp-model (CodeTree) → CSharpWriter
//! ```

pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;

// Re-export public API
pub use error::{ParseError, ParseErrorKind};
pub use parser::{BlockState, Parser, RegionPatterns, Step};
pub use span::Position;

use config::constants::ParserConfig;
use csharp_model::CodeTree;
use rayon::prelude::*;
use tracing::debug;

// =============================================================================
// PUBLIC API
// =============================================================================

/// Parses C# source with the default region patterns.
///
/// ## Example
///
/// ```rust
/// use csharp_parser::parse;
///
/// let error = parse("#region Open\nint x;").unwrap_err();
/// assert_eq!(error.message(), "Missing end region directive for 'Open'");
/// ```
pub fn parse(source: &str) -> Result<CodeTree, ParseError> {
    parse_with_config(source, &ParserConfig::default())
}

/// Parses C# source with the comment-region patterns from `config`.
pub fn parse_with_config(source: &str, config: &ParserConfig) -> Result<CodeTree, ParseError> {
    let patterns = RegionPatterns::compile(config)?;
    parse_with_patterns(source, &patterns)
}

/// Parses C# source with already compiled region patterns.
pub fn parse_with_patterns(source: &str, patterns: &RegionPatterns) -> Result<CodeTree, ParseError> {
    debug!(bytes = source.len(), "Parsing source");
    let tree = Parser::new(source, patterns).parse()?;
    debug!(
        roots = tree.roots().len(),
        elements = tree.len(),
        "Parsed source"
    );
    Ok(tree)
}

/// Parses independent sources in parallel. Results keep the input order.
pub fn parse_many(sources: &[&str], config: &ParserConfig) -> Vec<Result<CodeTree, ParseError>> {
    let patterns = match RegionPatterns::compile(config) {
        Ok(patterns) => patterns,
        Err(error) => return sources.iter().map(|_| Err(error.clone())).collect(),
    };
    sources
        .par_iter()
        .map(|source| parse_with_patterns(source, &patterns))
        .collect()
}
