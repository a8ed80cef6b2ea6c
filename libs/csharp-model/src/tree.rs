//! # Code Tree
//!
//! Arena that owns every element of one parsed file. Nodes refer to each
//! other by [`ElementId`]; parent and list membership are kept consistent by
//! the mutation methods on [`CodeTree`], so no node ever sits in two lists.
//!
//! A tree is a plain value: it is `Send`, and sharing one across threads
//! needs external synchronization like any other `Vec`-backed structure.
//!
//! ## Example
//!
//! ```rust
//! use csharp_model::{CodeTree, ElementData, NamespaceElement};
//!
//! let mut tree = CodeTree::new();
//! let outer = tree.create("Outer", ElementData::Namespace(NamespaceElement::default()));
//! let inner = tree.create("Inner", ElementData::Namespace(NamespaceElement::default()));
//! tree.add_root(outer);
//! tree.add_child(outer, inner).unwrap();
//! assert_eq!(tree.parent(inner), Some(outer));
//! ```

use crate::element::{ElementData, ElementKind};
use crate::error::ModelError;
use serde::{Deserialize, Serialize};

// =============================================================================
// IDS AND NODES
// =============================================================================

/// Index of a node inside its [`CodeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(usize);

impl ElementId {
    /// Returns the raw arena index.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One element: shared structure plus its kind-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    name: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    header_comments: Vec<ElementId>,
    attributes: Vec<ElementId>,
    data: ElementData,
}

impl Node {
    /// Declared name. Comments and `#else` branches use an empty name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn header_comments(&self) -> &[ElementId] {
        &self.header_comments
    }

    pub fn attributes(&self) -> &[ElementId] {
        &self.attributes
    }

    pub fn data(&self) -> &ElementData {
        &self.data
    }

    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }
}

/// Which list of its parent a node is linked into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Children,
    HeaderComments,
    Attributes,
}

/// One entry of a tree's structural signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeEntry {
    pub depth: usize,
    pub kind: ElementKind,
    pub name: String,
}

// =============================================================================
// CODE TREE
// =============================================================================

/// Arena of elements plus the ordered list of top-level elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeTree {
    nodes: Vec<Node>,
    roots: Vec<ElementId>,
}

impl CodeTree {
    /// Empty tree with no roots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes allocated, including detached ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocates a detached element.
    ///
    /// The element belongs to no list until it is added as a root, child,
    /// header comment or attribute.
    ///
    /// ## Returns
    ///
    /// The new element's id, valid for this tree only.
    pub fn create(&mut self, name: impl Into<String>, data: ElementData) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(Node {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            header_comments: Vec::new(),
            attributes: Vec::new(),
            data,
        });
        id
    }

    // =========================================================================
    // ACCESS
    // =========================================================================

    /// Returns a node. Ids are only minted by this tree, so lookups of ids
    /// from another tree are a caller bug and panic.
    pub fn node(&self, id: ElementId) -> &Node {
        &self.nodes[id.0]
    }

    /// Non-panicking [`CodeTree::node`].
    pub fn get(&self, id: ElementId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn name(&self, id: ElementId) -> &str {
        &self.node(id).name
    }

    pub fn set_name(&mut self, id: ElementId, name: impl Into<String>) {
        self.nodes[id.0].name = name.into();
    }

    pub fn kind(&self, id: ElementId) -> ElementKind {
        self.node(id).kind()
    }

    pub fn data(&self, id: ElementId) -> &ElementData {
        &self.node(id).data
    }

    /// Mutable payload access. Linked ids inside the payload (the `#elif`
    /// chain) should be changed through [`CodeTree::set_else_condition`].
    pub fn data_mut(&mut self, id: ElementId) -> &mut ElementData {
        &mut self.nodes[id.0].data
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node(id).parent
    }

    /// Member elements in declaration order.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        &self.node(id).children
    }

    /// Comments written directly above the element's declaration.
    pub fn header_comments(&self, id: ElementId) -> &[ElementId] {
        &self.node(id).header_comments
    }

    pub fn attributes(&self, id: ElementId) -> &[ElementId] {
        &self.node(id).attributes
    }

    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    /// Next branch of an `#if`/`#elif` chain.
    pub fn else_condition(&self, id: ElementId) -> Option<ElementId> {
        match self.data(id) {
            ElementData::ConditionDirective(c) => c.else_condition,
            _ => None,
        }
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    /// Appends an element to the top-level list, detaching it first.
    pub fn add_root(&mut self, id: ElementId) {
        if self.node(id).parent.is_none() && self.roots.contains(&id) {
            return;
        }
        self.detach(id);
        self.roots.push(id);
    }

    /// Appends `child` to `parent`'s children, moving it from wherever it
    /// was. Adding an existing child again is a no-op.
    ///
    /// ## Parameters
    ///
    /// - `parent`: Element receiving the child
    /// - `child`: Element to move; detached from its old parent or the roots
    ///
    /// ## Returns
    ///
    /// `CycleDetected` when `child` is `parent` or one of its ancestors.
    /// The tree is unchanged in that case.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use csharp_model::{CodeTree, ElementData, ModelError, NamespaceElement};
    ///
    /// let mut tree = CodeTree::new();
    /// let a = tree.create("A", ElementData::Namespace(NamespaceElement::default()));
    /// let b = tree.create("B", ElementData::Namespace(NamespaceElement::default()));
    /// let c = tree.create("C", ElementData::Namespace(NamespaceElement::default()));
    /// tree.add_child(a, c).unwrap();
    /// tree.add_child(b, c).unwrap();
    /// assert!(tree.children(a).is_empty());
    /// assert_eq!(tree.children(b), &[c]);
    /// assert_eq!(tree.add_child(c, b), Err(ModelError::CycleDetected));
    /// ```
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), ModelError> {
        if self.node(child).parent == Some(parent) && self.node(parent).children.contains(&child) {
            return Ok(());
        }
        self.check_no_cycle(parent, child)?;
        self.detach(child);
        self.link(parent, child, Slot::Children, None);
        Ok(())
    }

    /// Inserts `child` at `index` (clamped) of `parent`'s children.
    pub fn insert_child(
        &mut self,
        parent: ElementId,
        index: usize,
        child: ElementId,
    ) -> Result<(), ModelError> {
        self.check_no_cycle(parent, child)?;
        self.detach(child);
        self.link(parent, child, Slot::Children, Some(index));
        Ok(())
    }

    /// Removes `child` from `parent`'s children. Returns false if it was not
    /// a child of `parent`.
    pub fn remove_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        let children = &mut self.nodes[parent.0].children;
        match children.iter().position(|c| *c == child) {
            Some(index) => {
                children.remove(index);
                self.nodes[child.0].parent = None;
                true
            }
            None => false,
        }
    }

    /// Detaches every child of `parent`.
    pub fn clear_children(&mut self, parent: ElementId) {
        let children = std::mem::take(&mut self.nodes[parent.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    /// Attaches a comment element ahead of `owner`'s declaration.
    ///
    /// ## Returns
    ///
    /// `NotCommentable` for owners without a header (comments, regions,
    /// condition branches), or `KindMismatch` when `comment` is not a
    /// comment element.
    pub fn add_header_comment(&mut self, owner: ElementId, comment: ElementId) -> Result<(), ModelError> {
        let owner_kind = self.kind(owner);
        if !owner_kind.is_commentable() {
            return Err(ModelError::NotCommentable(owner_kind));
        }
        self.expect_kind(comment, ElementKind::Comment)?;
        if self.node(owner).header_comments.contains(&comment) {
            return Ok(());
        }
        self.detach(comment);
        self.link(owner, comment, Slot::HeaderComments, None);
        Ok(())
    }

    /// Applies an attribute element to `owner`, registering it in the
    /// owner's attribute list and setting its parent.
    pub fn add_attribute(&mut self, owner: ElementId, attribute: ElementId) -> Result<(), ModelError> {
        let owner_kind = self.kind(owner);
        if !owner_kind.is_attributable() {
            return Err(ModelError::NotAttributable(owner_kind));
        }
        self.expect_kind(attribute, ElementKind::Attribute)?;
        if self.node(owner).attributes.contains(&attribute) {
            return Ok(());
        }
        self.detach(attribute);
        self.link(owner, attribute, Slot::Attributes, None);
        Ok(())
    }

    /// Removes `attribute` from `owner`. Returns false if it was not
    /// applied there.
    pub fn remove_attribute(&mut self, owner: ElementId, attribute: ElementId) -> bool {
        let attributes = &mut self.nodes[owner.0].attributes;
        match attributes.iter().position(|a| *a == attribute) {
            Some(index) => {
                attributes.remove(index);
                self.nodes[attribute.0].parent = None;
                true
            }
            None => false,
        }
    }

    /// Links `branch` as the `#elif`/`#else` continuation of `condition`.
    /// `None` ends the chain at `condition`.
    ///
    /// ## Returns
    ///
    /// `KindMismatch` unless both ids are condition directives, or
    /// `CycleDetected` when `branch` already leads back to `condition`.
    pub fn set_else_condition(
        &mut self,
        condition: ElementId,
        branch: Option<ElementId>,
    ) -> Result<(), ModelError> {
        self.expect_kind(condition, ElementKind::ConditionDirective)?;
        if let Some(branch) = branch {
            self.expect_kind(branch, ElementKind::ConditionDirective)?;
            if branch == condition || self.chain(branch).contains(&condition) {
                return Err(ModelError::CycleDetected);
            }
            self.detach(branch);
        }
        if let ElementData::ConditionDirective(c) = &mut self.nodes[condition.0].data {
            c.else_condition = branch;
        }
        Ok(())
    }

    /// Removes an element from whichever list holds it (a parent's lists or
    /// the roots). The element stays allocated.
    pub fn detach(&mut self, id: ElementId) {
        match self.nodes[id.0].parent.take() {
            Some(parent) => {
                let node = &mut self.nodes[parent.0];
                node.children.retain(|c| *c != id);
                node.header_comments.retain(|c| *c != id);
                node.attributes.retain(|c| *c != id);
            }
            None => self.roots.retain(|r| *r != id),
        }
    }

    fn link(&mut self, parent: ElementId, child: ElementId, slot: Slot, index: Option<usize>) {
        let node = &mut self.nodes[parent.0];
        let list = match slot {
            Slot::Children => &mut node.children,
            Slot::HeaderComments => &mut node.header_comments,
            Slot::Attributes => &mut node.attributes,
        };
        match index {
            Some(index) => list.insert(index.min(list.len()), child),
            None => list.push(child),
        }
        self.nodes[child.0].parent = Some(parent);
    }

    fn check_no_cycle(&self, parent: ElementId, child: ElementId) -> Result<(), ModelError> {
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == child {
                return Err(ModelError::CycleDetected);
            }
            current = self.node(id).parent;
        }
        Ok(())
    }

    fn expect_kind(&self, id: ElementId, expected: ElementKind) -> Result<(), ModelError> {
        let found = self.kind(id);
        if found == expected {
            Ok(())
        } else {
            Err(ModelError::KindMismatch { expected, found })
        }
    }

    // =========================================================================
    // CLONING
    // =========================================================================

    /// Deep-copies an element with its children, header comments,
    /// attributes and `#elif` chain. The copy is detached.
    pub fn clone_element(&mut self, id: ElementId) -> ElementId {
        let source = self.node(id).clone();

        let mut data = source.data;
        if let ElementData::ConditionDirective(condition) = &mut data {
            condition.else_condition = condition.else_condition.map(|branch| self.clone_element(branch));
        }

        let copy = self.create(source.name, data);
        for child in source.children {
            let cloned = self.clone_element(child);
            self.link(copy, cloned, Slot::Children, None);
        }
        for comment in source.header_comments {
            let cloned = self.clone_element(comment);
            self.link(copy, cloned, Slot::HeaderComments, None);
        }
        for attribute in source.attributes {
            let cloned = self.clone_element(attribute);
            self.link(copy, cloned, Slot::Attributes, None);
        }
        copy
    }

    // =========================================================================
    // TRAVERSAL
    // =========================================================================

    /// The `#if` element followed by each `#elif`/`#else` branch.
    pub fn chain(&self, id: ElementId) -> Vec<ElementId> {
        let mut branches = vec![id];
        let mut current = self.else_condition(id);
        while let Some(branch) = current {
            if branches.contains(&branch) {
                break;
            }
            branches.push(branch);
            current = self.else_condition(branch);
        }
        branches
    }

    /// Pre-order list of `id` and all structural descendants.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            result.push(current);
            if let Some(branch) = self.else_condition(current) {
                stack.push(branch);
            }
            stack.extend(self.node(current).children.iter().rev().copied());
        }
        result
    }

    /// First element reachable from the roots with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<ElementId> {
        self.roots
            .iter()
            .flat_map(|root| self.descendants(*root))
            .find(|id| self.name(*id) == name)
    }

    /// Depth-first `(depth, kind, name)` signature of the structural tree.
    ///
    /// `#elif`/`#else` branches appear as siblings following their `#if`.
    pub fn shape(&self) -> Vec<ShapeEntry> {
        let mut entries = Vec::new();
        for root in &self.roots {
            self.collect_shape(*root, 0, &mut entries);
        }
        entries
    }

    fn collect_shape(&self, id: ElementId, depth: usize, entries: &mut Vec<ShapeEntry>) {
        for branch in self.chain(id) {
            entries.push(ShapeEntry {
                depth,
                kind: self.kind(branch),
                name: self.name(branch).to_string(),
            });
            for child in &self.node(branch).children {
                self.collect_shape(*child, depth + 1, entries);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
