//! Comments, region markers and `#if` chains.
//!
//! Regions come from `#region`/`#endregion` or from line comments matching
//! the configured begin and end patterns. Conditional chains link each
//! `#elif`/`#else` branch to the previous one.

use super::{BlockState, Enclosing, Parser, Step};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::symbols::{self, keyword};
use csharp_model::{CommentElement, CommentKind, ConditionDirectiveElement, ElementData, ElementId, RegionElement};

impl<'a> Parser<'a> {
    // =========================================================================
    // COMMENTS
    // =========================================================================

    /// `/`: a line, doc or block comment, or a literal slash.
    pub(super) fn on_comment_start(&mut self, state: &mut BlockState) -> Result<Step, ParseError> {
        match self.cursor.peek() {
            symbols::COMMENT_START => {
                self.cursor.try_advance();
                let kind = if self.cursor.peek() == symbols::COMMENT_START {
                    self.cursor.try_advance();
                    CommentKind::XmlLine
                } else {
                    CommentKind::Line
                };
                let text = self.cursor.read_line();

                if kind == CommentKind::Line {
                    if let Some(name) = self.patterns.match_begin(&text) {
                        return self.begin_region(state, name, false);
                    }
                    if self.patterns.match_end(&text).is_some() {
                        return self.end_region(state);
                    }
                }
                self.push_comment(state, CommentElement::new(kind, text));
                Ok(Step::NeedMore)
            }
            symbols::BLOCK_COMMENT_MARKER => {
                self.cursor.try_advance();
                let text = self.read_block_comment_text()?;
                self.push_comment(state, CommentElement::new(CommentKind::Block, text));
                Ok(Step::NeedMore)
            }
            _ => {
                state.buffer.push(symbols::COMMENT_START);
                Ok(Step::NeedMore)
            }
        }
    }

    fn push_comment(&mut self, state: &mut BlockState, comment: CommentElement) {
        let id = self.create("", ElementData::Comment(comment));
        state.comments.push(id);
    }

    // =========================================================================
    // PREPROCESSOR
    // =========================================================================

    /// `#`: region and conditional directives. Anything else is rejected.
    pub(super) fn on_preprocessor(&mut self, state: &mut BlockState) -> Result<Step, ParseError> {
        let line = self.cursor.read_line();
        let line = line.trim_start();
        let split = line
            .find(|c: char| !c.is_alphabetic())
            .unwrap_or(line.len());
        let (directive, rest) = line.split_at(split);
        let rest = rest.trim();

        let text = state.buffer.trim();
        if !text.is_empty() {
            return Err(self.error(ParseErrorKind::DirectiveInsideElement {
                directive: directive.to_string(),
                text: text.to_string(),
            }));
        }

        match directive {
            keyword::REGION => self.begin_region(state, rest.to_string(), true),
            keyword::END_REGION => self.end_region(state),
            keyword::IF => self.begin_condition(state, condition_text(rest)),
            keyword::ELIF => self.next_branch(state, Some(condition_text(rest)), directive),
            keyword::ELSE => self.next_branch(state, None, directive),
            keyword::END_IF => self.end_condition(state),
            other => Err(self.error(ParseErrorKind::UnsupportedDirective(other.to_string()))),
        }
    }

    // =========================================================================
    // REGIONS
    // =========================================================================

    fn begin_region(&mut self, state: &mut BlockState, name: String, is_directive: bool) -> Result<Step, ParseError> {
        self.check_no_pending_attributes(state)?;
        self.flush_comments(state)?;
        let id = self.create(name, ElementData::Region(RegionElement { is_directive }));
        state.enclosing.push(Enclosing::Region(id));
        Ok(Step::NeedMore)
    }

    fn end_region(&mut self, state: &mut BlockState) -> Result<Step, ParseError> {
        self.check_no_pending_attributes(state)?;
        let Some(&Enclosing::Region(region)) = state.enclosing.last() else {
            return Err(self.error(ParseErrorKind::UnmatchedEndRegion));
        };
        self.adopt_comments(state, region)?;
        state.enclosing.pop();
        self.emit(state, vec![region])
    }

    // =========================================================================
    // CONDITIONALS
    // =========================================================================

    fn begin_condition(&mut self, state: &mut BlockState, condition: String) -> Result<Step, ParseError> {
        self.check_no_pending_attributes(state)?;
        self.flush_comments(state)?;
        let id = self.create_branch(Some(condition));
        state.enclosing.push(Enclosing::Conditional { head: id, current: id });
        Ok(Step::NeedMore)
    }

    fn next_branch(
        &mut self,
        state: &mut BlockState,
        condition: Option<String>,
        directive: &str,
    ) -> Result<Step, ParseError> {
        self.check_no_pending_attributes(state)?;
        let (head, current) = self.open_conditional(state, directive)?;
        if let ElementData::ConditionDirective(ConditionDirectiveElement { condition: None, .. }) =
            self.tree.data(current)
        {
            return Err(self.error(ParseErrorKind::BranchAfterElse(directive.to_string())));
        }
        self.adopt_comments(state, current)?;

        let branch = self.create_branch(condition);
        let result = self.tree.set_else_condition(current, Some(branch));
        self.model(result)?;
        if let Some(top) = state.enclosing.last_mut() {
            *top = Enclosing::Conditional { head, current: branch };
        }
        Ok(Step::NeedMore)
    }

    fn end_condition(&mut self, state: &mut BlockState) -> Result<Step, ParseError> {
        self.check_no_pending_attributes(state)?;
        let (head, current) = self.open_conditional(state, keyword::END_IF)?;
        self.adopt_comments(state, current)?;
        state.enclosing.pop();
        self.emit(state, vec![head])
    }

    /// The innermost scope, which must be an `#if` chain.
    fn open_conditional(&self, state: &BlockState, directive: &str) -> Result<(ElementId, ElementId), ParseError> {
        match state.enclosing.last() {
            Some(&Enclosing::Conditional { head, current }) => Ok((head, current)),
            Some(&Enclosing::Region(region)) => Err(self.error(ParseErrorKind::MissingEndRegion {
                name: self.tree.name(region).to_string(),
            })),
            None => Err(self.error(ParseErrorKind::UnmatchedConditional(directive.to_string()))),
        }
    }

    fn create_branch(&mut self, condition: Option<String>) -> ElementId {
        let name = condition.clone().unwrap_or_default();
        self.create(
            name,
            ElementData::ConditionDirective(ConditionDirectiveElement {
                condition,
                else_condition: None,
            }),
        )
    }

    /// Pending comments become trailing children of a closing scope.
    fn adopt_comments(&mut self, state: &mut BlockState, scope: ElementId) -> Result<(), ParseError> {
        for comment in std::mem::take(&mut state.comments) {
            let result = self.tree.add_child(scope, comment);
            self.model(result)?;
        }
        Ok(())
    }
}

/// Condition expression without a trailing line comment.
fn condition_text(rest: &str) -> String {
    rest.split("//").next().unwrap_or(rest).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_text_drops_trailing_comment() {
        assert_eq!(condition_text("DEBUG && !TRACE // local builds"), "DEBUG && !TRACE");
        assert_eq!(condition_text("NET6_0"), "NET6_0");
    }
}
