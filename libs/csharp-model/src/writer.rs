//! # C# Writer
//!
//! Renders a [`CodeTree`] back to C# source. Output is deterministic for a
//! given tree and [`WriterConfig`]; raw bodies are re-indented to the
//! nesting level they are written at.
//!
//! ## Example
//!
//! ```rust
//! use config::constants::WriterConfig;
//! use csharp_model::{write_tree, CodeTree, ElementData, UsingElement};
//!
//! let mut tree = CodeTree::new();
//! let using = tree.create("System", ElementData::Using(UsingElement {
//!     redefine: None,
//!     is_static: false,
//!     is_movable: true,
//! }));
//! tree.add_root(using);
//! assert_eq!(write_tree(&tree, &WriterConfig::default()), "using System;\n");
//! ```

use crate::element::*;
use crate::lexical::LexicalScanner;
use crate::tree::{CodeTree, ElementId};
use crate::visitor::Visitor;
use config::constants::{RegionStyle, WriterConfig, REGION_NAME_PLACEHOLDER};

/// Renders the whole tree with the given configuration.
pub fn write_tree(tree: &CodeTree, config: &WriterConfig) -> String {
    let mut writer = CSharpWriter::new(config.clone());
    writer.write_elements(tree, tree.roots());
    writer.finish()
}

/// Visitor that accumulates formatted C# text.
pub struct CSharpWriter {
    config: WriterConfig,
    indent_unit: String,
    depth: usize,
    out: String,
}

impl CSharpWriter {
    pub fn new(config: WriterConfig) -> Self {
        let indent_unit = config.indent.unit();
        Self {
            config,
            indent_unit,
            depth: 0,
            out: String::new(),
        }
    }

    /// Consumes the writer, returning the text written so far.
    pub fn finish(self) -> String {
        self.out
    }

    /// Writes sibling elements, separating declarations with blank lines.
    pub fn write_elements(&mut self, tree: &CodeTree, ids: &[ElementId]) {
        let mut previous: Option<ElementKind> = None;
        for id in ids {
            let kind = tree.kind(*id);
            if let Some(prev) = previous {
                if needs_blank_line(prev, kind) {
                    self.blank_line();
                }
            }
            tree.accept(*id, self);
            previous = Some(kind);
        }
    }

    // =========================================================================
    // LINE OUTPUT
    // =========================================================================

    fn line(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(&self.indent_unit);
            }
            self.out.push_str(text);
        }
        self.out.push_str(self.config.line_ending.as_str());
    }

    /// Writes a line without indentation.
    fn raw_line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push_str(self.config.line_ending.as_str());
    }

    /// Writes raw body text at the current depth.
    fn write_body_lines(&mut self, text: &str) {
        for body_line in reindent(text) {
            if body_line.literal {
                self.raw_line(&body_line.text);
            } else {
                self.line(&body_line.text);
            }
        }
    }

    fn blank_line(&mut self) {
        self.line("");
    }

    fn open_block(&mut self) {
        self.line("{");
        self.depth += 1;
    }

    fn close_block(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    /// Writes header comments and attributes that precede a declaration.
    fn write_header(&mut self, tree: &CodeTree, id: ElementId) {
        for comment in tree.header_comments(id) {
            tree.accept(*comment, self);
        }
        for attribute in tree.attributes(id) {
            tree.accept(*attribute, self);
        }
    }

    /// Writes a `{ ... }` body, inline when the raw text fits on one line.
    /// `suffix` follows the closing brace.
    fn write_raw_block(&mut self, signature: &str, text: &str, suffix: &str) {
        if !text.contains('\n') {
            let inner = text.trim();
            if inner.is_empty() {
                self.line(&format!("{signature} {{ }}{suffix}"));
            } else {
                self.line(&format!("{signature} {{ {inner} }}{suffix}"));
            }
            return;
        }
        self.line(signature);
        self.open_block();
        self.write_body_lines(text);
        self.depth = self.depth.saturating_sub(1);
        self.line(&format!("}}{suffix}"));
    }

    fn write_body(&mut self, signature: &str, body: &MemberBody) {
        match body {
            MemberBody::None => self.line(&format!("{signature};")),
            MemberBody::Expression(expr) => self.line(&format!("{signature} => {};", expr.trim())),
            MemberBody::Block(text) => {
                self.line(signature);
                self.open_block();
                self.write_body_lines(text);
                self.close_block();
            }
        }
    }

    fn region_style(&self, element: &RegionElement) -> RegionStyle {
        match self.config.region_style {
            RegionStyle::Preserve if element.is_directive => RegionStyle::Directive,
            RegionStyle::Preserve => RegionStyle::CommentDirective,
            style => style,
        }
    }
}

// =============================================================================
// VISITOR
// =============================================================================

impl Visitor for CSharpWriter {
    fn visit_namespace(&mut self, tree: &CodeTree, id: ElementId, element: &NamespaceElement) {
        self.write_header(tree, id);
        let name = tree.name(id);
        if element.is_file_scoped {
            self.line(&format!("namespace {name};"));
            if !tree.children(id).is_empty() {
                self.blank_line();
            }
            self.write_elements(tree, tree.children(id));
            return;
        }
        self.line(&format!("namespace {name}"));
        self.open_block();
        self.write_elements(tree, tree.children(id));
        self.close_block();
    }

    fn visit_using(&mut self, tree: &CodeTree, id: ElementId, element: &UsingElement) {
        self.write_header(tree, id);
        let name = tree.name(id);
        let text = match (&element.redefine, element.is_static) {
            (Some(target), _) => format!("using {name} = {target};"),
            (None, true) => format!("using static {name};"),
            (None, false) => format!("using {name};"),
        };
        self.line(&text);
    }

    fn visit_type(&mut self, tree: &CodeTree, id: ElementId, element: &TypeElement) {
        self.write_header(tree, id);
        let mut signature = join_words(&[
            element.access.keywords(),
            &element.modifiers.keywords().join(" "),
            element.kind.keyword(),
        ]);
        signature.push(' ');
        signature.push_str(tree.name(id));
        signature.push_str(&type_parameter_list(&element.type_parameters));
        if !element.interfaces.is_empty() {
            let names: Vec<&str> = element.interfaces.iter().map(|i| i.name.as_str()).collect();
            signature.push_str(" : ");
            signature.push_str(&names.join(", "));
        }
        signature.push_str(&constraint_clauses(&element.type_parameters));

        if element.kind == TypeKind::Enum {
            self.write_raw_block(&signature, element.body_text.as_deref().unwrap_or(""), "");
            return;
        }
        self.line(&signature);
        self.open_block();
        self.write_elements(tree, tree.children(id));
        self.close_block();
    }

    fn visit_method(&mut self, tree: &CodeTree, id: ElementId, element: &MethodElement) {
        self.write_header(tree, id);
        let name = qualified_name(&element.implementations, tree.name(id));
        let declarator = match (element.is_operator, element.operator_kind) {
            (true, OperatorKind::Implicit) => format!("implicit operator {name}"),
            (true, OperatorKind::Explicit) => format!("explicit operator {name}"),
            (true, OperatorKind::None) => join_words(&[
                element.return_type.as_deref().unwrap_or(""),
                "operator",
                &name,
            ]),
            (false, _) => join_words(&[element.return_type.as_deref().unwrap_or(""), &name]),
        };
        let signature = format!(
            "{}{}({}){}",
            join_words(&[
                element.access.keywords(),
                &element.modifiers.keywords().join(" "),
                if element.is_async { "async" } else { "" },
                &declarator,
            ]),
            type_parameter_list(&element.type_parameters),
            element.parameters.trim(),
            constraint_clauses(&element.type_parameters),
        );
        self.write_body(&signature, &element.body);
    }

    fn visit_field(&mut self, tree: &CodeTree, id: ElementId, element: &FieldElement) {
        self.write_header(tree, id);
        let mut text = join_words(&[
            element.access.keywords(),
            &element.modifiers.keywords().join(" "),
            if element.is_volatile { "volatile" } else { "" },
            if element.is_fixed { "fixed" } else { "" },
            &element.field_type,
            tree.name(id),
        ]);
        if let Some(size) = &element.fixed_size {
            text.push('[');
            text.push_str(size);
            text.push(']');
        }
        if let Some(value) = &element.initial_value {
            text.push_str(" = ");
            text.push_str(value.trim());
        }
        text.push(';');
        if let Some(comment) = &element.trailing_comment {
            text.push(' ');
            text.push_str(&comment_text(comment));
        }
        self.line(&text);
    }

    fn visit_property(&mut self, tree: &CodeTree, id: ElementId, element: &PropertyElement) {
        self.write_header(tree, id);
        let signature = join_words(&[
            element.access.keywords(),
            &element.modifiers.keywords().join(" "),
            &element.property_type,
            &qualified_name(&element.implementations, tree.name(id)),
        ]);
        match &element.body {
            MemberBody::Block(text) => {
                let initializer = element
                    .initial_value
                    .as_deref()
                    .map(|value| format!(" = {};", value.trim()))
                    .unwrap_or_default();
                self.write_raw_block(&signature, text, &initializer);
            }
            body => self.write_body(&signature, body),
        }
    }

    fn visit_event(&mut self, tree: &CodeTree, id: ElementId, element: &EventElement) {
        self.write_header(tree, id);
        let signature = join_words(&[
            element.access.keywords(),
            &element.modifiers.keywords().join(" "),
            "event",
            &element.event_type,
            &qualified_name(&element.implementations, tree.name(id)),
        ]);
        match (&element.body, &element.initial_value) {
            (MemberBody::Block(text), _) => self.write_raw_block(&signature, text, ""),
            (MemberBody::None, Some(value)) => {
                self.line(&format!("{signature} = {};", value.trim()));
            }
            (body, _) => self.write_body(&signature, body),
        }
    }

    fn visit_delegate(&mut self, tree: &CodeTree, id: ElementId, element: &DelegateElement) {
        self.write_header(tree, id);
        let text = format!(
            "{}{}({}){};",
            join_words(&[
                element.access.keywords(),
                &element.modifiers.keywords().join(" "),
                "delegate",
                &element.return_type,
                tree.name(id),
            ]),
            type_parameter_list(&element.type_parameters),
            element.parameters.trim(),
            constraint_clauses(&element.type_parameters),
        );
        self.line(&text);
    }

    fn visit_constructor(&mut self, tree: &CodeTree, id: ElementId, element: &ConstructorElement) {
        self.write_header(tree, id);
        let mut signature = format!(
            "{}({})",
            join_words(&[
                element.access.keywords(),
                &element.modifiers.keywords().join(" "),
                tree.name(id),
            ]),
            element.parameters.trim(),
        );
        if let Some(reference) = &element.reference {
            signature.push_str(" : ");
            signature.push_str(reference.trim());
        }
        self.write_body(&signature, &element.body);
    }

    fn visit_comment(&mut self, _tree: &CodeTree, _id: ElementId, element: &CommentElement) {
        let text = comment_text(element);
        let mut lines = text.lines();
        if let Some(first) = lines.next() {
            self.line(first);
        }
        for rest in lines {
            let rest = rest.trim_start();
            if rest.starts_with('*') {
                self.line(&format!(" {rest}"));
            } else {
                self.line(rest);
            }
        }
    }

    fn visit_attribute(&mut self, tree: &CodeTree, id: ElementId, element: &AttributeElement) {
        let mut text = String::from("[");
        if let Some(target) = &element.target {
            text.push_str(target);
            text.push_str(": ");
        }
        text.push_str(&attribute_text(tree.name(id), element));
        for chained in tree.children(id) {
            if let ElementData::Attribute(child) = tree.data(*chained) {
                text.push_str(", ");
                text.push_str(&attribute_text(tree.name(*chained), child));
            }
        }
        text.push(']');
        self.line(&text);
    }

    fn visit_region(&mut self, tree: &CodeTree, id: ElementId, element: &RegionElement) {
        let name = tree.name(id);
        let (begin, end) = match self.region_style(element) {
            RegionStyle::CommentDirective => (
                format!("// {}", self.config.region_begin_format.replace(REGION_NAME_PLACEHOLDER, name)),
                format!("// {}", self.config.region_end_format.replace(REGION_NAME_PLACEHOLDER, name)),
            ),
            _ => (format!("#region {name}"), "#endregion".to_string()),
        };
        self.line(begin.trim_end());
        if !tree.children(id).is_empty() {
            self.blank_line();
            self.write_elements(tree, tree.children(id));
            self.blank_line();
        }
        self.line(end.trim_end());
    }

    fn visit_condition_directive(
        &mut self,
        tree: &CodeTree,
        id: ElementId,
        element: &ConditionDirectiveElement,
    ) {
        self.line(&format!("#if {}", element.condition.as_deref().unwrap_or("").trim()));
        self.write_elements(tree, tree.children(id));

        let mut branch = element.else_condition;
        while let Some(current) = branch {
            let ElementData::ConditionDirective(data) = tree.data(current) else {
                break;
            };
            match &data.condition {
                Some(condition) => self.line(&format!("#elif {}", condition.trim())),
                None => self.line("#else"),
            }
            self.write_elements(tree, tree.children(current));
            branch = data.else_condition;
        }
        self.line("#endif");
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn needs_blank_line(previous: ElementKind, next: ElementKind) -> bool {
    !matches!(
        (previous, next),
        (ElementKind::Using, ElementKind::Using)
            | (ElementKind::Field, ElementKind::Field)
            | (ElementKind::Comment, _)
    )
}

fn join_words(words: &[&str]) -> String {
    words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn qualified_name(implementations: &[InterfaceReference], name: &str) -> String {
    match implementations.first() {
        Some(interface) => format!("{}.{}", interface.name, name),
        None => name.to_string(),
    }
}

fn type_parameter_list(params: &[TypeParameter]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    format!("<{}>", names.join(", "))
}

fn constraint_clauses(params: &[TypeParameter]) -> String {
    let mut text = String::new();
    for param in params.iter().filter(|p| !p.constraints().is_empty()) {
        // Strip variance (`out T`) from the constrained name.
        let name = param.name.split_whitespace().last().unwrap_or(&param.name);
        text.push_str(&format!(" where {} : {}", name, param.constraints().join(", ")));
    }
    text
}

fn attribute_text(name: &str, element: &AttributeElement) -> String {
    match &element.arguments {
        Some(arguments) => format!("{name}({})", arguments.trim()),
        None => name.to_string(),
    }
}

fn comment_text(comment: &CommentElement) -> String {
    match comment.kind {
        CommentKind::Line => format!("//{}", comment.text),
        CommentKind::XmlLine => format!("///{}", comment.text),
        CommentKind::Block => format!("/*{}*/", comment.text),
    }
}

/// A body line after re-indentation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BodyLine {
    text: String,
    /// Starts inside a multi-line literal; written as is, without indent.
    literal: bool,
}

/// A raw body line and the lexical state at its ends.
struct SourceLine {
    text: String,
    starts_in_literal: bool,
    ends_in_literal: bool,
}

/// Splits raw body text into lines, recording which ones begin or end
/// inside a string literal.
fn source_lines(text: &str) -> Vec<SourceLine> {
    let chars: Vec<char> = text.chars().collect();
    let mut scanner = LexicalScanner::new();
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut starts_in_literal = false;

    for (i, &c) in chars.iter().enumerate() {
        let next = chars.get(i + 1).copied().unwrap_or('\0');
        if c == '\n' {
            if current.ends_with('\r') {
                current.pop();
            }
            lines.push(SourceLine {
                text: std::mem::take(&mut current),
                starts_in_literal,
                ends_in_literal: scanner.in_literal(),
            });
            scanner.classify(c, next);
            starts_in_literal = scanner.in_literal();
            continue;
        }
        scanner.classify(c, next);
        current.push(c);
    }
    lines.push(SourceLine {
        text: current,
        starts_in_literal,
        ends_in_literal: scanner.in_literal(),
    });
    lines
}

/// Strips the common leading indentation and surrounding blank lines.
/// Text inside multi-line literals is left untouched.
fn reindent(text: &str) -> Vec<BodyLine> {
    let lines = source_lines(text);
    let blank = |line: &SourceLine| {
        !line.starts_in_literal && !line.ends_in_literal && line.text.trim().is_empty()
    };
    let first = lines.iter().position(|l| !blank(l));
    let last = lines.iter().rposition(|l| !blank(l));
    let (Some(first), Some(last)) = (first, last) else {
        return Vec::new();
    };
    let lines = &lines[first..=last];
    let common = lines
        .iter()
        .filter(|l| !l.starts_in_literal && !l.text.trim().is_empty())
        .map(|l| l.text.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| {
            let text = if line.ends_in_literal {
                line.text.as_str()
            } else {
                line.text.trim_end()
            };
            if line.starts_in_literal {
                BodyLine {
                    text: text.to_string(),
                    literal: true,
                }
            } else {
                BodyLine {
                    text: text.chars().skip(common).collect(),
                    literal: false,
                }
            }
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
