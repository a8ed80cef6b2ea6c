//! # C# Lexical Layer
//!
//! The parser scans characters directly instead of running a separate
//! tokenization pass. This module provides the pieces it scans with:
//! the [`Cursor`] and the symbol and keyword tables. The
//! [`LexicalScanner`] that keeps string and comment contents out of
//! delimiter matching lives in `csharp_model::lexical`, where the writer
//! uses it too.

mod cursor;
pub mod symbols;

pub use cursor::{Cursor, EOF};
pub use csharp_model::lexical::{CharClass, LexicalMode, LexicalScanner};
pub use symbols::{is_symbol, is_word_break};
