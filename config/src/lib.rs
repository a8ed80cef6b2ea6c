//! # Config Crate
//!
//! Centralized configuration for the C# element parser and writer.
//! Tunable parameters (region directive patterns, indentation, stack
//! growth limits) are defined here so both crates agree on them.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{ParserConfig, WriterConfig, IndentStyle};
//!
//! let parser = ParserConfig::default();
//! assert!(parser.region_begin_pattern.contains("Name"));
//!
//! let writer = WriterConfig::default();
//! assert_eq!(writer.indent, IndentStyle::Spaces(4));
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All defaults defined once, used everywhere
//! - **Dependency Free**: Patterns are plain strings; consumers compile them
//! - **Validated**: Constructors reject values the parser cannot use

pub mod constants;
