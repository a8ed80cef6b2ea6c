//! # C# Element Parser
//!
//! Character-driven parser that builds a [`CodeTree`] while it scans.
//! Each block body (file, namespace, type) is parsed by repeatedly calling
//! [`Parser::step`], which consumes one character and either extends the
//! pending element text or produces elements.
//!
//! ## Example
//!
//! ```rust
//! use config::constants::ParserConfig;
//! use csharp_parser::parser::{Parser, RegionPatterns};
//!
//! let patterns = RegionPatterns::compile(&ParserConfig::default()).unwrap();
//! let tree = Parser::new("using System;", &patterns).parse().unwrap();
//! assert_eq!(tree.name(tree.roots()[0]), "System");
//! ```

mod attributes;
mod classifier;
mod declarations;
mod directives;
mod members;
mod nested;
mod words;

pub use classifier::{classify, classify_keywords, Declaration, DeclarationKind, Terminator};

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::symbols::{self, keyword};
use crate::lexer::{is_word_break, Cursor, EOF};
use crate::span::Position;
use config::constants::{
    ParserConfig, REGION_NAME_GROUP, STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES,
};
use csharp_model::{CodeTree, ElementData, ElementId, ModelError};
use regex::Regex;
use stacker::maybe_grow;
use tracing::trace;

// =============================================================================
// REGION PATTERNS
// =============================================================================

/// Compiled comment-directive patterns for region begin and end markers.
#[derive(Debug, Clone)]
pub struct RegionPatterns {
    begin: Regex,
    end: Regex,
}

impl RegionPatterns {
    /// Compiles the begin and end patterns of `config`.
    ///
    /// ## Returns
    ///
    /// `InvalidRegionPattern` naming the pattern that fails to compile.
    pub fn compile(config: &ParserConfig) -> Result<Self, ParseError> {
        Ok(Self {
            begin: compile_pattern(&config.region_begin_pattern)?,
            end: compile_pattern(&config.region_end_pattern)?,
        })
    }

    /// Region name when `comment` (text after `//`) opens a region.
    pub fn match_begin(&self, comment: &str) -> Option<String> {
        capture_name(&self.begin, comment)
    }

    /// Region name (possibly empty) when `comment` closes a region.
    pub fn match_end(&self, comment: &str) -> Option<String> {
        capture_name(&self.end, comment)
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, ParseError> {
    Regex::new(pattern).map_err(|e| {
        ParseError::new(
            ParseErrorKind::InvalidRegionPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            },
            Position::zero(),
        )
    })
}

fn capture_name(regex: &Regex, comment: &str) -> Option<String> {
    let captures = regex.captures(comment)?;
    Some(
        captures
            .name(REGION_NAME_GROUP)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
    )
}

// =============================================================================
// BLOCK STATE
// =============================================================================

/// An open region or `#if` chain awaiting its closing directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Enclosing {
    Region(ElementId),
    /// `head` is the `#if`; `current` the branch receiving elements.
    Conditional { head: ElementId, current: ElementId },
}

/// Mutable state of one block body.
#[derive(Debug, Default)]
pub struct BlockState {
    /// Element text collected since the last produced element.
    buffer: String,
    /// Comments waiting for the next declaration.
    comments: Vec<ElementId>,
    /// Attributes waiting for the next declaration.
    attributes: Vec<ElementId>,
    enclosing: Vec<Enclosing>,
    /// Elements produced at this block level.
    elements: Vec<ElementId>,
}

impl BlockState {
    /// Empty state at the start of a block body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending element text, with whitespace runs folded to one space.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Elements attached directly to this block, in source order.
    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    pub fn pending_comments(&self) -> &[ElementId] {
        &self.comments
    }

    pub fn pending_attributes(&self) -> &[ElementId] {
        &self.attributes
    }

    /// Depth of open regions and conditionals.
    pub fn open_scopes(&self) -> usize {
        self.enclosing.len()
    }

    fn take_buffer(&mut self) -> String {
        let text = std::mem::take(&mut self.buffer);
        text.trim().to_string()
    }
}

/// Outcome of one [`Parser::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The character extended the pending state.
    NeedMore,
    /// That many elements were attached to the block or an open scope.
    Produced(usize),
    /// End of input or a closing brace; the brace is left for the caller.
    Finished,
}

// =============================================================================
// PARSER
// =============================================================================

/// C# element parser over one source text.
///
/// Owns the [`CodeTree`] it builds; [`Parser::parse`] hands it over once
/// the whole source has been consumed.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    patterns: &'a RegionPatterns,
    tree: CodeTree,
}

impl<'a> Parser<'a> {
    /// Creates a parser positioned before the first character.
    ///
    /// ## Parameters
    ///
    /// - `source`: C# source text
    /// - `patterns`: Comment-directive region markers
    pub fn new(source: &'a str, patterns: &'a RegionPatterns) -> Self {
        Self {
            cursor: Cursor::new(source),
            patterns,
            tree: CodeTree::new(),
        }
    }

    /// Parses the whole source into a tree whose roots are the top-level
    /// elements.
    ///
    /// ## Returns
    ///
    /// The tree, or the first error. A `}` that closes nothing is reported
    /// as an unexpected character.
    pub fn parse(mut self) -> Result<CodeTree, ParseError> {
        let roots = self.parse_block_guarded()?;
        if self.cursor.peek() == symbols::END_BLOCK {
            return Err(self.error(ParseErrorKind::UnexpectedCharacter(symbols::END_BLOCK)));
        }
        for root in roots {
            self.tree.add_root(root);
        }
        Ok(self.tree)
    }

    /// Tree built so far.
    pub fn tree(&self) -> &CodeTree {
        &self.tree
    }

    /// Current cursor position.
    pub fn position(&self) -> Position {
        self.cursor.position()
    }

    pub(crate) fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.cursor.position())
    }

    pub(crate) fn model<T>(&self, result: Result<T, ModelError>) -> Result<T, ParseError> {
        result.map_err(|e| self.error(e.into()))
    }

    // =========================================================================
    // BLOCK LOOP
    // =========================================================================

    /// Parses a block body with stack growth for deeply nested input.
    pub(crate) fn parse_block_guarded(&mut self) -> Result<Vec<ElementId>, ParseError> {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            self.parse_block()
        })
    }

    /// Parses elements until end of input or an unconsumed `}`.
    ///
    /// Drives [`Parser::step`] to [`Step::Finished`], then checks that no
    /// text, attribute, region or `#if` is left open. Pending comments
    /// become elements of the block.
    ///
    /// ## Returns
    ///
    /// Ids of the elements produced at this level. They are not yet
    /// attached to a parent.
    pub fn parse_block(&mut self) -> Result<Vec<ElementId>, ParseError> {
        let mut state = BlockState::new();
        while self.step(&mut state)? != Step::Finished {}
        self.finish_block(state)
    }

    /// Consumes one character and applies its transition.
    ///
    /// Terminators (`(`, `;`, `=`, `{`) classify the pending text and may
    /// read further input for parameters, initializers or bodies before
    /// returning. Comments, directives and attributes are read whole.
    ///
    /// ## Parameters
    ///
    /// - `state`: Pending text and open scopes of the current block
    ///
    /// ## Returns
    ///
    /// - [`Step::NeedMore`] when the character only extended `state`
    /// - [`Step::Produced`] with the number of elements attached
    /// - [`Step::Finished`] at end of input or before a `}`, which stays
    ///   unconsumed
    ///
    /// ## Example
    ///
    /// ```rust
    /// use config::constants::ParserConfig;
    /// use csharp_parser::parser::{BlockState, Parser, RegionPatterns, Step};
    ///
    /// let patterns = RegionPatterns::compile(&ParserConfig::default()).unwrap();
    /// let mut parser = Parser::new("int a;}", &patterns);
    /// let mut state = BlockState::new();
    /// let mut steps = Vec::new();
    /// loop {
    ///     let step = parser.step(&mut state).unwrap();
    ///     steps.push(step);
    ///     if step != Step::NeedMore {
    ///         break;
    ///     }
    /// }
    /// assert_eq!(steps.last(), Some(&Step::Produced(1)));
    /// assert_eq!(parser.step(&mut state).unwrap(), Step::Finished);
    /// assert_eq!(state.elements().len(), 1);
    /// ```
    pub fn step(&mut self, state: &mut BlockState) -> Result<Step, ParseError> {
        let next = self.cursor.peek();
        if next == EOF || next == symbols::END_BLOCK {
            return Ok(Step::Finished);
        }
        self.cursor.try_advance();

        match next {
            symbols::COMMENT_START => self.on_comment_start(state),
            symbols::PREPROCESSOR => self.on_preprocessor(state),
            symbols::BEGIN_ATTRIBUTE => self.on_attribute_open(state),
            symbols::BEGIN_GENERIC if !in_operator_context(&state.buffer) => {
                self.on_generic_open(state)
            }
            symbols::NULLABLE => {
                words::trim_end_in_place(&mut state.buffer);
                state.buffer.push(symbols::NULLABLE);
                Ok(Step::NeedMore)
            }
            c if c.is_whitespace() => {
                if !state.buffer.is_empty() && !state.buffer.ends_with(' ') {
                    state.buffer.push(' ');
                }
                Ok(Step::NeedMore)
            }
            symbols::BEGIN_PARAMETERS => self.on_parameters_open(state),
            symbols::END_OF_STATEMENT => self.on_statement_end(state),
            symbols::ASSIGNMENT if !in_operator_context(&state.buffer) => {
                self.on_assignment(state)
            }
            symbols::BEGIN_BLOCK => self.on_block_open(state),
            c => {
                state.buffer.push(c);
                if is_word_break(self.cursor.peek()) {
                    self.on_word_end(state)
                } else {
                    Ok(Step::NeedMore)
                }
            }
        }
    }

    /// Keywords that start a declaration parsed directly from the cursor.
    fn on_word_end(&mut self, state: &mut BlockState) -> Result<Step, ParseError> {
        let text = state.buffer.trim();
        let mut prefix = words::split_words(text);
        let Some(last) = prefix.pop() else {
            return Ok(Step::NeedMore);
        };

        match last.as_str() {
            keyword::NAMESPACE if prefix.is_empty() => {
                state.buffer.clear();
                self.parse_namespace(state)
            }
            keyword::USING if prefix.is_empty() => {
                state.buffer.clear();
                self.parse_using(state)
            }
            word if symbols::type_keyword(word).is_some()
                && prefix.iter().all(|w| symbols::is_prefix_keyword(w)) =>
            {
                state.buffer.clear();
                prefix.push(last);
                self.parse_type(state, &prefix)
            }
            _ => Ok(Step::NeedMore),
        }
    }

    fn on_generic_open(&mut self, state: &mut BlockState) -> Result<Step, ParseError> {
        let arguments =
            self.parse_nested_text(symbols::BEGIN_GENERIC, symbols::END_GENERIC, false, true)?;
        words::trim_end_in_place(&mut state.buffer);
        state.buffer.push(symbols::BEGIN_GENERIC);
        state.buffer.push_str(&arguments);
        state.buffer.push(symbols::END_GENERIC);
        Ok(Step::NeedMore)
    }

    /// Checks what is left when the block ends and returns its elements.
    fn finish_block(&mut self, mut state: BlockState) -> Result<Vec<ElementId>, ParseError> {
        let text = state.take_buffer();
        if !text.is_empty() {
            return Err(self.error(ParseErrorKind::UnhandledText(text)));
        }
        match state.enclosing.last() {
            Some(Enclosing::Region(region)) => {
                return Err(self.error(ParseErrorKind::MissingEndRegion {
                    name: self.tree.name(*region).to_string(),
                }));
            }
            Some(Enclosing::Conditional { head, .. }) => {
                return Err(self.error(ParseErrorKind::MissingEndIf {
                    condition: self.tree.name(*head).to_string(),
                }));
            }
            None => {}
        }
        self.check_no_pending_attributes(&state)?;
        self.flush_comments(&mut state)?;
        Ok(state.elements)
    }

    // =========================================================================
    // ATTACHMENT
    // =========================================================================

    /// Attaches a finished element to the innermost open scope, or to the
    /// block's element list.
    pub(crate) fn attach(&mut self, state: &mut BlockState, id: ElementId) -> Result<(), ParseError> {
        match state.enclosing.last() {
            Some(Enclosing::Region(scope)) | Some(Enclosing::Conditional { current: scope, .. }) => {
                let result = self.tree.add_child(*scope, id);
                self.model(result)
            }
            None => {
                state.elements.push(id);
                Ok(())
            }
        }
    }

    /// Moves pending comments and attributes onto `id`.
    pub(crate) fn apply_header(&mut self, state: &mut BlockState, id: ElementId) -> Result<(), ParseError> {
        for comment in std::mem::take(&mut state.comments) {
            let result = self.tree.add_header_comment(id, comment);
            self.model(result)?;
        }
        for attribute in std::mem::take(&mut state.attributes) {
            let result = self.tree.add_attribute(id, attribute);
            self.model(result)?;
        }
        Ok(())
    }

    /// Attaches the primary element and its cloned siblings.
    pub(crate) fn emit(
        &mut self,
        state: &mut BlockState,
        ids: Vec<ElementId>,
    ) -> Result<Step, ParseError> {
        for id in &ids {
            trace!(
                kind = ?self.tree.kind(*id),
                name = self.tree.name(*id),
                "Parsed element"
            );
            self.attach(state, *id)?;
        }
        Ok(Step::Produced(ids.len()))
    }

    /// Pending comments become elements of their own at the current level.
    pub(crate) fn flush_comments(&mut self, state: &mut BlockState) -> Result<(), ParseError> {
        for comment in std::mem::take(&mut state.comments) {
            self.attach(state, comment)?;
        }
        Ok(())
    }

    pub(crate) fn check_no_pending_attributes(&self, state: &BlockState) -> Result<(), ParseError> {
        match state.attributes.first() {
            Some(attribute) => Err(self.error(ParseErrorKind::UnattachedAttribute(
                self.tree.name(*attribute).to_string(),
            ))),
            None => Ok(()),
        }
    }

    pub(crate) fn create(&mut self, name: impl Into<String>, data: ElementData) -> ElementId {
        self.tree.create(name, data)
    }
}

/// True when the buffer ends in an operator declarator, where `<` and `=`
/// are operator symbols.
fn in_operator_context(buffer: &str) -> bool {
    let mut words = buffer.split_whitespace().rev();
    match (words.next(), words.next()) {
        (Some(keyword::OPERATOR), _) => true,
        (Some(last), _) if last
            .strip_prefix(keyword::OPERATOR)
            .is_some_and(classifier::is_operator_symbol) =>
        {
            true
        }
        (Some(last), Some(keyword::OPERATOR)) => {
            !buffer.ends_with(' ') && classifier::is_operator_symbol(last)
        }
        _ => false,
    }
}

// =============================================================================
// TESTS
// =============================================================================
