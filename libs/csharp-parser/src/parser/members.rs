//! Member declarations: methods, constructors, delegates, fields,
//! properties and events. Each handler runs when its terminator character
//! has been consumed.

use super::classifier::{classify, Declaration, Terminator};
use super::nested::BodyStart;
use super::words::{split_generic_name, split_qualified, split_top_level, split_words};
use super::{in_operator_context, BlockState, Parser, Step};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::symbols::{self, keyword};
use csharp_model::{
    CommentElement, CommentKind, ConstructorElement, DelegateElement, ElementData, ElementId,
    ElementKind, EventElement, FieldElement, InterfaceReference, InterfaceReferenceKind,
    MemberBody, MethodElement, OperatorKind, PropertyElement, TypeParameter,
};
use tracing::warn;

/// One name of a comma-separated declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Declarator {
    name: String,
    initial_value: Option<String>,
}

impl<'a> Parser<'a> {
    // =========================================================================
    // TERMINATORS
    // =========================================================================

    /// `(`: a parameter list, or a tuple type when only keywords precede it.
    pub(super) fn on_parameters_open(&mut self, state: &mut BlockState) -> Result<Step, ParseError> {
        let words = split_words(state.buffer.trim());
        let only_keywords = words.iter().all(|w| symbols::is_prefix_keyword(w));
        if only_keywords && !in_operator_context(&state.buffer) {
            let elements = self.parse_nested_text(
                symbols::BEGIN_PARAMETERS,
                symbols::END_PARAMETERS,
                false,
                true,
            )?;
            if !state.buffer.is_empty() && !state.buffer.ends_with(' ') {
                state.buffer.push(' ');
            }
            state.buffer.push(symbols::BEGIN_PARAMETERS);
            state.buffer.push_str(&elements);
            state.buffer.push(symbols::END_PARAMETERS);
            return Ok(Step::NeedMore);
        }

        let text = state.take_buffer();
        let declaration = self.classify_signature(&text)?;
        let id = match self.element_kind(&declaration, Terminator::Parameters)? {
            ElementKind::Delegate => self.parse_delegate(declaration)?,
            ElementKind::Constructor => self.parse_constructor(declaration)?,
            _ => self.parse_method(declaration)?,
        };
        self.emit_member(state, id)
    }

    /// `;`: fields and events without accessors.
    pub(super) fn on_statement_end(&mut self, state: &mut BlockState) -> Result<Step, ParseError> {
        let text = state.take_buffer();
        if text.is_empty() {
            return Ok(Step::NeedMore);
        }
        let (declaration, mut declarators) = self.classify_declarators(&text)?;
        let kind = self.element_kind(&declaration, Terminator::Statement)?;

        let first = declarators.remove(0);
        let id = match kind {
            ElementKind::Event => self.create_event(&declaration, first, MemberBody::None),
            _ => {
                let trailing_comment = self.read_trailing_comment()?;
                self.create_field(&declaration, first, trailing_comment)
            }
        };
        self.emit_declarators(state, id, declarators)
    }

    /// `=`: a field or event initializer, or `=>` for an expression-bodied
    /// property.
    pub(super) fn on_assignment(&mut self, state: &mut BlockState) -> Result<Step, ParseError> {
        let text = state.take_buffer();
        if text.is_empty() {
            return Err(self.error(ParseErrorKind::UnexpectedCharacter(symbols::ASSIGNMENT)));
        }

        if self.cursor.peek() == symbols::END_GENERIC {
            self.cursor.try_advance();
            let declaration = self.classify_signature(&text)?;
            self.element_kind(&declaration, Terminator::ExpressionBody)?;
            let expression = self.read_statement_text()?;
            let id = self.create_property(&declaration, MemberBody::Expression(expression), None);
            return self.emit_member(state, id);
        }

        let (declaration, mut declarators) = self.classify_declarators(&text)?;
        let kind = self.element_kind(&declaration, Terminator::Assignment)?;
        let initializer = self.read_statement_text()?;
        let trailing_comment = match kind {
            ElementKind::Field => self.read_trailing_comment()?,
            _ => None,
        };

        // The first initializer belongs to the last name before `=`; any
        // further segments declare more names.
        let mut segments = split_top_level(&initializer, symbols::ALIAS_SEPARATOR).into_iter();
        let value = segments.next().filter(|v| !v.is_empty()).ok_or_else(|| {
            self.error(ParseErrorKind::ExpectedName(format!("an initial value for '{text}'")))
        })?;
        if let Some(last) = declarators.last_mut() {
            last.initial_value = Some(value);
        }
        for segment in segments {
            declarators.push(self.parse_declarator(&segment, &text)?);
        }

        let first = declarators.remove(0);
        let id = match kind {
            ElementKind::Event => self.create_event(&declaration, first, MemberBody::None),
            _ => self.create_field(&declaration, first, trailing_comment),
        };
        self.emit_declarators(state, id, declarators)
    }

    /// `{`: properties, indexers and events with accessor blocks.
    pub(super) fn on_block_open(&mut self, state: &mut BlockState) -> Result<Step, ParseError> {
        let text = state.take_buffer();
        if text.is_empty() {
            return Err(self.error(ParseErrorKind::UnexpectedCharacter(symbols::BEGIN_BLOCK)));
        }
        let declaration = self.classify_signature(&text)?;
        let kind = self.element_kind(&declaration, Terminator::Block)?;
        let body = MemberBody::Block(self.parse_nested_text(
            symbols::BEGIN_BLOCK,
            symbols::END_BLOCK,
            false,
            false,
        )?);

        let id = match kind {
            ElementKind::Event => {
                let declarator = Declarator {
                    name: declaration.name.clone(),
                    initial_value: None,
                };
                self.create_event(&declaration, declarator, body)
            }
            _ => {
                let initial_value = self.read_property_initializer()?;
                self.create_property(&declaration, body, initial_value)
            }
        };
        self.emit_member(state, id)
    }

    // =========================================================================
    // SIGNATURES
    // =========================================================================

    fn classify_signature(&self, text: &str) -> Result<Declaration, ParseError> {
        classify(&split_words(text)).map_err(|kind| self.error(kind))
    }

    fn element_kind(
        &self,
        declaration: &Declaration,
        terminator: Terminator,
    ) -> Result<ElementKind, ParseError> {
        declaration
            .element_kind(terminator)
            .map_err(|kind| self.error(kind))
    }

    /// Classifies the first declarator and collects the names that follow
    /// top-level commas.
    fn classify_declarators(&self, text: &str) -> Result<(Declaration, Vec<Declarator>), ParseError> {
        let mut segments = split_top_level(text, symbols::ALIAS_SEPARATOR).into_iter();
        let head = segments.next().unwrap_or_default();
        let declaration = self.classify_signature(&head)?;

        let mut declarators = vec![Declarator {
            name: declaration.name.clone(),
            initial_value: None,
        }];
        for segment in segments {
            if segment.is_empty() || segment.contains(char::is_whitespace) {
                return Err(self.error(ParseErrorKind::UnhandledText(text.to_string())));
            }
            declarators.push(Declarator {
                name: segment,
                initial_value: None,
            });
        }
        Ok((declaration, declarators))
    }

    /// `name` or `name = value` following an initializer.
    fn parse_declarator(&self, segment: &str, signature: &str) -> Result<Declarator, ParseError> {
        let (name, initial_value) = match segment.split_once(symbols::ASSIGNMENT) {
            Some((name, value)) => (name.trim(), Some(value.trim().to_string())),
            None => (segment.trim(), None),
        };
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(self.error(ParseErrorKind::UnhandledText(format!(
                "{signature} = {segment}"
            ))));
        }
        Ok(Declarator {
            name: name.to_string(),
            initial_value,
        })
    }

    /// Attaches `first` and one clone of it per extra declarator. Events
    /// are followed by a same-line comment as a sibling; fields keep it.
    fn emit_declarators(
        &mut self,
        state: &mut BlockState,
        first: ElementId,
        declarators: Vec<Declarator>,
    ) -> Result<Step, ParseError> {
        self.apply_header(state, first)?;
        let mut ids = vec![first];
        for declarator in declarators {
            let clone = self.tree.clone_element(first);
            let mut name = declarator.name;
            let mut dropped_comment = false;
            match self.tree.data_mut(clone) {
                ElementData::Field(field) => {
                    field.initial_value = declarator.initial_value;
                    dropped_comment = field.trailing_comment.take().is_some();
                    if field.is_fixed {
                        let (base, size) = split_fixed_size(&name);
                        field.fixed_size = size;
                        name = base;
                    }
                }
                ElementData::Event(event) => event.initial_value = declarator.initial_value,
                _ => {}
            }
            if dropped_comment {
                warn!(
                    name = name.as_str(),
                    "Trailing comment kept on the first declarator only"
                );
            }
            self.tree.set_name(clone, name);
            ids.push(clone);
        }

        if self.tree.kind(first) != ElementKind::Field {
            if let Some(comment) = self.read_trailing_comment()? {
                ids.push(self.create("", ElementData::Comment(comment)));
            }
        }
        self.emit(state, ids)
    }

    /// Attaches a finished declaration with its pending header, followed by
    /// a comment on the same line as a sibling element.
    pub(super) fn emit_member(&mut self, state: &mut BlockState, id: ElementId) -> Result<Step, ParseError> {
        self.apply_header(state, id)?;
        let mut ids = vec![id];
        if let Some(comment) = self.read_trailing_comment()? {
            ids.push(self.create("", ElementData::Comment(comment)));
        }
        self.emit(state, ids)
    }

    // =========================================================================
    // ELEMENTS
    // =========================================================================

    fn parse_method(&mut self, declaration: Declaration) -> Result<ElementId, ParseError> {
        let parameters =
            self.parse_nested_text(symbols::BEGIN_PARAMETERS, symbols::END_PARAMETERS, false, false)?;
        let (tail, start) = self.read_declaration_tail()?;
        let body = self.read_body(start)?;

        let is_operator = declaration.operator.is_some();
        let (implementations, name, mut type_parameters): (_, _, Vec<TypeParameter>) = if is_operator {
            (Vec::new(), declaration.name.clone(), Vec::new())
        } else {
            let (interface, name) = split_qualified(&declaration.name);
            let (name, parameters) = split_generic_name(&name);
            (
                interface_references(interface),
                name,
                parameters.into_iter().map(TypeParameter::new).collect(),
            )
        };
        self.apply_constraints(&tail, &mut type_parameters)?;

        let operator_kind = declaration.operator.unwrap_or(OperatorKind::None);
        let return_type = match operator_kind {
            OperatorKind::None => declaration.return_type,
            _ => None,
        };
        let method = MethodElement {
            access: declaration.access,
            modifiers: declaration.modifiers,
            return_type,
            parameters,
            type_parameters,
            implementations,
            is_operator,
            operator_kind,
            is_async: declaration.is_async,
            body,
        };
        Ok(self.create(name, ElementData::Method(method)))
    }

    fn parse_constructor(&mut self, declaration: Declaration) -> Result<ElementId, ParseError> {
        let parameters =
            self.parse_nested_text(symbols::BEGIN_PARAMETERS, symbols::END_PARAMETERS, false, false)?;
        let (tail, start) = self.read_declaration_tail()?;
        let reference = match tail.strip_prefix(symbols::TYPE_IMPLEMENTS) {
            Some(reference) => Some(reference.trim().to_string()),
            None if tail.is_empty() => None,
            None => return Err(self.error(ParseErrorKind::UnhandledText(tail))),
        };
        let body = self.read_body(start)?;

        let constructor = ConstructorElement {
            access: declaration.access,
            modifiers: declaration.modifiers,
            parameters,
            reference,
            body,
        };
        Ok(self.create(declaration.name, ElementData::Constructor(constructor)))
    }

    fn parse_delegate(&mut self, declaration: Declaration) -> Result<ElementId, ParseError> {
        let parameters =
            self.parse_nested_text(symbols::BEGIN_PARAMETERS, symbols::END_PARAMETERS, false, false)?;
        let (tail, start) = self.read_declaration_tail()?;
        if start != BodyStart::Statement {
            return Err(self.error(ParseErrorKind::ExpectedCharacter {
                expected: symbols::END_OF_STATEMENT.to_string(),
                found: self.cursor.current(),
            }));
        }

        let (name, parameter_names) = split_generic_name(&declaration.name);
        let mut type_parameters: Vec<TypeParameter> =
            parameter_names.into_iter().map(TypeParameter::new).collect();
        self.apply_constraints(&tail, &mut type_parameters)?;

        let delegate = DelegateElement {
            access: declaration.access,
            modifiers: declaration.modifiers,
            return_type: declaration.return_type.unwrap_or_default(),
            parameters,
            type_parameters,
        };
        Ok(self.create(name, ElementData::Delegate(delegate)))
    }

    fn create_field(
        &mut self,
        declaration: &Declaration,
        declarator: Declarator,
        trailing_comment: Option<CommentElement>,
    ) -> ElementId {
        let (name, fixed_size) = if declaration.is_fixed {
            split_fixed_size(&declarator.name)
        } else {
            (declarator.name, None)
        };
        let field = FieldElement {
            access: declaration.access,
            modifiers: declaration.modifiers,
            field_type: declaration.return_type.clone().unwrap_or_default(),
            initial_value: declarator.initial_value,
            is_volatile: declaration.is_volatile,
            is_fixed: declaration.is_fixed,
            fixed_size,
            trailing_comment,
        };
        self.create(name, ElementData::Field(field))
    }

    fn create_property(
        &mut self,
        declaration: &Declaration,
        body: MemberBody,
        initial_value: Option<String>,
    ) -> ElementId {
        let (interface, name) = split_qualified(&declaration.name);
        let property = PropertyElement {
            access: declaration.access,
            modifiers: declaration.modifiers,
            property_type: declaration.return_type.clone().unwrap_or_default(),
            implementations: interface_references(interface),
            body,
            initial_value,
        };
        self.create(name, ElementData::Property(property))
    }

    fn create_event(&mut self, declaration: &Declaration, declarator: Declarator, body: MemberBody) -> ElementId {
        let (interface, name) = split_qualified(&declarator.name);
        let event = EventElement {
            access: declaration.access,
            modifiers: declaration.modifiers,
            event_type: declaration.return_type.clone().unwrap_or_default(),
            implementations: interface_references(interface),
            body,
            initial_value: declarator.initial_value,
        };
        self.create(name, ElementData::Event(event))
    }

    // =========================================================================
    // CLAUSES
    // =========================================================================

    /// Applies `where T : a, b` clauses to the declared type parameters.
    pub(super) fn apply_constraints(
        &self,
        text: &str,
        parameters: &mut [TypeParameter],
    ) -> Result<(), ParseError> {
        parse_constraint_clauses(text, parameters).map_err(|kind| self.error(kind))
    }

    /// `= value;` after a property accessor block.
    fn read_property_initializer(&mut self) -> Result<Option<String>, ParseError> {
        self.cursor.skip_whitespace();
        if self.cursor.peek() != symbols::ASSIGNMENT {
            return Ok(None);
        }
        self.cursor.try_advance();
        Ok(Some(self.read_statement_text()?))
    }

    /// Comment on the same line after a declaration ends.
    pub(super) fn read_trailing_comment(&mut self) -> Result<Option<CommentElement>, ParseError> {
        self.cursor.advance_while(|c| c == ' ' || c == '\t');
        if self.cursor.peek() != symbols::COMMENT_START {
            return Ok(None);
        }
        self.cursor.try_advance();
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
                Ok(Some(CommentElement::new(kind, text)))
            }
            symbols::BLOCK_COMMENT_MARKER => {
                self.cursor.try_advance();
                let text = self.read_block_comment_text()?;
                Ok(Some(CommentElement::new(CommentKind::Block, text)))
            }
            _ => Err(self.error(ParseErrorKind::UnexpectedCharacter(symbols::COMMENT_START))),
        }
    }
}

fn interface_references(interface: Option<String>) -> Vec<InterfaceReference> {
    interface
        .map(|name| vec![InterfaceReference::new(name, InterfaceReferenceKind::Interface)])
        .unwrap_or_default()
}

/// `buf[16]` of a fixed-size buffer into the name and the element count.
fn split_fixed_size(name: &str) -> (String, Option<String>) {
    match name.find(symbols::BEGIN_ATTRIBUTE) {
        Some(open) if name.ends_with(symbols::END_ATTRIBUTE) => (
            name[..open].trim().to_string(),
            Some(name[open + 1..name.len() - 1].trim().to_string()),
        ),
        _ => (name.to_string(), None),
    }
}

/// Parses constraint clauses into `parameters`. An empty text is accepted.
pub(super) fn parse_constraint_clauses(
    text: &str,
    parameters: &mut [TypeParameter],
) -> Result<(), ParseErrorKind> {
    let mut clauses: Vec<String> = Vec::new();
    for word in split_words(text) {
        if word == keyword::WHERE {
            clauses.push(String::new());
            continue;
        }
        let Some(clause) = clauses.last_mut() else {
            return Err(ParseErrorKind::UnhandledText(text.to_string()));
        };
        if !clause.is_empty() {
            clause.push(' ');
        }
        clause.push_str(&word);
    }

    for clause in clauses {
        let Some((name, constraints)) = clause.split_once(symbols::TYPE_IMPLEMENTS) else {
            return Err(ParseErrorKind::UnhandledText(clause));
        };
        let name = name.trim();
        let Some(parameter) = parameters
            .iter_mut()
            .find(|p| p.name.split_whitespace().last() == Some(name))
        else {
            return Err(ParseErrorKind::UnhandledText(clause.clone()));
        };
        for constraint in split_top_level(constraints, symbols::ALIAS_SEPARATOR) {
            if constraint.is_empty() {
                return Err(ParseErrorKind::ExpectedName(format!(
                    "a constraint for type parameter '{name}'"
                )));
            }
            parameter.add_constraint(constraint)?;
        }
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use csharp_model::ModelError;

    #[test]
    fn test_constraint_clauses() {
        let mut parameters = vec![TypeParameter::new("TKey"), TypeParameter::new("out TValue")];
        parse_constraint_clauses(
            "where TKey : IComparable<TKey>, new() where TValue : class",
            &mut parameters,
        )
        .unwrap();
        assert_eq!(parameters[0].constraints(), ["IComparable<TKey>", "new()"]);
        assert_eq!(parameters[1].constraints(), ["class"]);
    }

    #[test]
    fn test_constructor_constraint_must_be_last() {
        let mut parameters = vec![TypeParameter::new("T")];
        let error = parse_constraint_clauses("where T : new(), IFoo", &mut parameters).unwrap_err();
        assert_eq!(
            error,
            ParseErrorKind::Model(ModelError::ConstructorConstraintNotLast {
                parameter: "T".to_string()
            })
        );
    }

    #[test]
    fn test_split_fixed_size() {
        assert_eq!(split_fixed_size("buf[16]"), ("buf".to_string(), Some("16".to_string())));
        assert_eq!(split_fixed_size("data[Size * 2]"), ("data".to_string(), Some("Size * 2".to_string())));
        assert_eq!(split_fixed_size("plain"), ("plain".to_string(), None));
    }

    #[test]
    fn test_unknown_constraint_target() {
        let mut parameters = vec![TypeParameter::new("T")];
        assert!(parse_constraint_clauses("where U : class", &mut parameters).is_err());
        assert!(parse_constraint_clauses("T : class", &mut parameters).is_err());
        assert!(parse_constraint_clauses("", &mut parameters).is_ok());
    }
}
