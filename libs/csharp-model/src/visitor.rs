//! # Element Visitor
//!
//! Single dispatch over the closed set of element kinds. Default methods walk
//! structural children so implementors only override what they need.

use crate::element::*;
use crate::tree::{CodeTree, ElementId};

pub trait Visitor {
    fn visit_namespace(&mut self, tree: &CodeTree, id: ElementId, _element: &NamespaceElement) {
        walk_children(self, tree, id)
    }

    fn visit_using(&mut self, _tree: &CodeTree, _id: ElementId, _element: &UsingElement) {}

    fn visit_type(&mut self, tree: &CodeTree, id: ElementId, _element: &TypeElement) {
        walk_children(self, tree, id)
    }

    fn visit_method(&mut self, _tree: &CodeTree, _id: ElementId, _element: &MethodElement) {}

    fn visit_field(&mut self, _tree: &CodeTree, _id: ElementId, _element: &FieldElement) {}

    fn visit_property(&mut self, _tree: &CodeTree, _id: ElementId, _element: &PropertyElement) {}

    fn visit_event(&mut self, _tree: &CodeTree, _id: ElementId, _element: &EventElement) {}

    fn visit_delegate(&mut self, _tree: &CodeTree, _id: ElementId, _element: &DelegateElement) {}

    fn visit_constructor(&mut self, _tree: &CodeTree, _id: ElementId, _element: &ConstructorElement) {}

    fn visit_comment(&mut self, _tree: &CodeTree, _id: ElementId, _element: &CommentElement) {}

    fn visit_attribute(&mut self, _tree: &CodeTree, _id: ElementId, _element: &AttributeElement) {}

    fn visit_region(&mut self, tree: &CodeTree, id: ElementId, _element: &RegionElement) {
        walk_children(self, tree, id)
    }

    fn visit_condition_directive(
        &mut self,
        tree: &CodeTree,
        id: ElementId,
        element: &ConditionDirectiveElement,
    ) {
        walk_children(self, tree, id);
        if let Some(branch) = element.else_condition {
            tree.accept(branch, self);
        }
    }
}

/// Visits every structural child of `id` in order.
pub fn walk_children<V: Visitor + ?Sized>(visitor: &mut V, tree: &CodeTree, id: ElementId) {
    for child in tree.children(id) {
        tree.accept(*child, visitor);
    }
}

impl CodeTree {
    /// Dispatches `visitor` on the element's kind.
    pub fn accept<V: Visitor + ?Sized>(&self, id: ElementId, visitor: &mut V) {
        match self.data(id) {
            ElementData::Namespace(e) => visitor.visit_namespace(self, id, e),
            ElementData::Using(e) => visitor.visit_using(self, id, e),
            ElementData::Type(e) => visitor.visit_type(self, id, e),
            ElementData::Method(e) => visitor.visit_method(self, id, e),
            ElementData::Field(e) => visitor.visit_field(self, id, e),
            ElementData::Property(e) => visitor.visit_property(self, id, e),
            ElementData::Event(e) => visitor.visit_event(self, id, e),
            ElementData::Delegate(e) => visitor.visit_delegate(self, id, e),
            ElementData::Constructor(e) => visitor.visit_constructor(self, id, e),
            ElementData::Comment(e) => visitor.visit_comment(self, id, e),
            ElementData::Attribute(e) => visitor.visit_attribute(self, id, e),
            ElementData::Region(e) => visitor.visit_region(self, id, e),
            ElementData::ConditionDirective(e) => visitor.visit_condition_directive(self, id, e),
        }
    }

    /// Dispatches `visitor` on every top-level element in order.
    pub fn accept_roots<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        for root in self.roots() {
            self.accept(*root, visitor);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
