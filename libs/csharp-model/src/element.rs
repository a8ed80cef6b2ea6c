//! # Element Payloads
//!
//! Kind-specific data carried by each node of a [`CodeTree`](crate::CodeTree).
//! Structure (name, parent, children, header comments, attributes) lives on
//! the node itself; everything here is per-kind state.

use crate::error::ModelError;
use crate::tree::ElementId;
use serde::{Deserialize, Serialize};

// =============================================================================
// ELEMENT KIND
// =============================================================================

/// Closed set of element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Namespace,
    Using,
    Type,
    Method,
    Field,
    Property,
    Event,
    Delegate,
    Constructor,
    Comment,
    Attribute,
    Region,
    ConditionDirective,
}

impl ElementKind {
    /// Whether header comments may be attached to elements of this kind.
    pub const fn is_commentable(&self) -> bool {
        !matches!(self, Self::Comment | Self::Region | Self::ConditionDirective)
    }

    /// Whether attributes may be attached to elements of this kind.
    pub const fn is_attributable(&self) -> bool {
        matches!(
            self,
            Self::Type
                | Self::Method
                | Self::Field
                | Self::Property
                | Self::Event
                | Self::Delegate
                | Self::Constructor
        )
    }

    /// Whether this kind is a type member (carries access and modifiers).
    pub const fn is_member(&self) -> bool {
        matches!(
            self,
            Self::Method
                | Self::Field
                | Self::Property
                | Self::Event
                | Self::Delegate
                | Self::Constructor
        )
    }
}

// =============================================================================
// ACCESS AND MODIFIERS
// =============================================================================

/// Declared access level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeAccess {
    /// No access keyword was written.
    #[default]
    None,
    Public,
    Private,
    Protected,
    Internal,
    ProtectedInternal,
    PrivateProtected,
}

impl CodeAccess {
    /// Source keywords for this access level, empty for `None`.
    pub const fn keywords(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Public => "public",
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Internal => "internal",
            Self::ProtectedInternal => "protected internal",
            Self::PrivateProtected => "private protected",
        }
    }
}

/// Modifier flag set shared by types and members.
///
/// ## Example
///
/// ```rust
/// use csharp_model::Modifiers;
///
/// let mut flags = Modifiers::STATIC;
/// flags.insert(Modifiers::READONLY);
/// assert!(flags.contains(Modifiers::STATIC | Modifiers::READONLY));
/// assert!(!flags.contains(Modifiers::ABSTRACT));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers(u16);

impl Modifiers {
    pub const NONE: Self = Self(0);
    pub const STATIC: Self = Self(1 << 0);
    pub const ABSTRACT: Self = Self(1 << 1);
    pub const SEALED: Self = Self(1 << 2);
    pub const VIRTUAL: Self = Self(1 << 3);
    pub const OVERRIDE: Self = Self(1 << 4);
    pub const NEW: Self = Self(1 << 5);
    pub const CONST: Self = Self(1 << 6);
    pub const READONLY: Self = Self(1 << 7);
    pub const EXTERN: Self = Self(1 << 8);
    pub const PARTIAL: Self = Self(1 << 9);
    pub const UNSAFE: Self = Self(1 << 10);

    /// Flags in canonical source order, paired with their keyword.
    const ORDERED: [(Self, &'static str); 11] = [
        (Self::NEW, "new"),
        (Self::CONST, "const"),
        (Self::STATIC, "static"),
        (Self::EXTERN, "extern"),
        (Self::ABSTRACT, "abstract"),
        (Self::SEALED, "sealed"),
        (Self::OVERRIDE, "override"),
        (Self::VIRTUAL, "virtual"),
        (Self::READONLY, "readonly"),
        (Self::UNSAFE, "unsafe"),
        (Self::PARTIAL, "partial"),
    ];

    pub const fn bits(&self) -> u16 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Looks up the flag for a modifier keyword.
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ORDERED
            .iter()
            .find(|(_, keyword)| *keyword == word)
            .map(|(flag, _)| *flag)
    }

    /// Keywords of all set flags, in canonical order.
    pub fn keywords(&self) -> Vec<&'static str> {
        Self::ORDERED
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, keyword)| *keyword)
            .collect()
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

// =============================================================================
// SHARED PIECES
// =============================================================================

/// Kind of a referenced interface or base type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceReferenceKind {
    /// Unknown without semantic analysis (base lists).
    #[default]
    None,
    Class,
    Interface,
}

/// A named reference to an interface or base type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceReference {
    pub name: String,
    pub kind: InterfaceReferenceKind,
}

impl InterfaceReference {
    pub fn new(name: impl Into<String>, kind: InterfaceReferenceKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Keyword of the constructor constraint.
pub const NEW_CONSTRAINT: &str = "new()";

/// A generic type parameter with its `where` constraints.
///
/// ## Example
///
/// ```rust
/// use csharp_model::TypeParameter;
///
/// let mut param = TypeParameter::new("T");
/// param.add_constraint("IDisposable").unwrap();
/// param.add_constraint("new()").unwrap();
/// assert!(param.add_constraint("IComparable").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeParameter {
    pub name: String,
    constraints: Vec<String>,
}

impl TypeParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
        }
    }

    /// Builds a parameter from a constraint list, validating ordering.
    pub fn with_constraints(
        name: impl Into<String>,
        constraints: impl IntoIterator<Item = String>,
    ) -> Result<Self, ModelError> {
        let mut param = Self::new(name);
        for constraint in constraints {
            param.add_constraint(constraint)?;
        }
        Ok(param)
    }

    /// Appends a constraint. Nothing may follow the constructor constraint.
    pub fn add_constraint(&mut self, constraint: impl Into<String>) -> Result<(), ModelError> {
        if self.constraints.last().is_some_and(|c| is_new_constraint(c)) {
            return Err(ModelError::ConstructorConstraintNotLast {
                parameter: self.name.clone(),
            });
        }
        self.constraints.push(constraint.into());
        Ok(())
    }

    pub fn constraints(&self) -> &[String] {
        &self.constraints
    }
}

fn is_new_constraint(constraint: &str) -> bool {
    constraint.split_whitespace().collect::<String>() == NEW_CONSTRAINT
}

/// Body of a member that may carry code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberBody {
    /// Declaration terminated by `;` (abstract, interface, extern, partial).
    #[default]
    None,
    /// Raw text between the outer braces.
    Block(String),
    /// Expression following `=>`, without the terminating `;`.
    Expression(String),
}

impl MemberBody {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Operator flavor of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    #[default]
    None,
    Implicit,
    Explicit,
}

/// Type declaration keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Structure,
    Interface,
    Enum,
}

impl TypeKind {
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Structure => "struct",
            Self::Interface => "interface",
            Self::Enum => "enum",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "class" => Some(Self::Class),
            "struct" => Some(Self::Structure),
            "interface" => Some(Self::Interface),
            "enum" => Some(Self::Enum),
            _ => None,
        }
    }
}

/// Comment flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentKind {
    /// `// text`
    Line,
    /// `/// text`
    XmlLine,
    /// `/* text */`
    Block,
}

// =============================================================================
// PER-KIND PAYLOADS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NamespaceElement {
    /// `namespace A.B;` rather than a braced body.
    pub is_file_scoped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsingElement {
    /// Target of an alias (`using Name = Redefine;`).
    pub redefine: Option<String>,
    /// `using static`.
    pub is_static: bool,
    /// May be relocated between file and namespace scope.
    pub is_movable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeElement {
    pub kind: TypeKind,
    pub access: CodeAccess,
    pub modifiers: Modifiers,
    pub interfaces: Vec<InterfaceReference>,
    pub type_parameters: Vec<TypeParameter>,
    /// Raw member text of an enum body.
    pub body_text: Option<String>,
}

impl TypeElement {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            access: CodeAccess::None,
            modifiers: Modifiers::NONE,
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
            body_text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MethodElement {
    pub access: CodeAccess,
    pub modifiers: Modifiers,
    pub return_type: Option<String>,
    /// Raw text between the parameter list parentheses.
    pub parameters: String,
    pub type_parameters: Vec<TypeParameter>,
    pub implementations: Vec<InterfaceReference>,
    pub is_operator: bool,
    pub operator_kind: OperatorKind,
    pub is_async: bool,
    pub body: MemberBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldElement {
    pub access: CodeAccess,
    pub modifiers: Modifiers,
    pub field_type: String,
    pub initial_value: Option<String>,
    pub is_volatile: bool,
    /// Fixed-size buffer (`fixed byte buf[16];`).
    pub is_fixed: bool,
    /// Element count of a fixed-size buffer, kept apart from the name.
    pub fixed_size: Option<String>,
    /// Comment on the same line after the terminating `;`.
    pub trailing_comment: Option<CommentElement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PropertyElement {
    pub access: CodeAccess,
    pub modifiers: Modifiers,
    pub property_type: String,
    pub implementations: Vec<InterfaceReference>,
    pub body: MemberBody,
    /// Auto-property initializer after the accessor block.
    pub initial_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventElement {
    pub access: CodeAccess,
    pub modifiers: Modifiers,
    pub event_type: String,
    pub implementations: Vec<InterfaceReference>,
    /// Accessor block (`add`/`remove`) if present.
    pub body: MemberBody,
    /// Initializer of a field-like event (`event EventHandler E = null;`).
    pub initial_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DelegateElement {
    pub access: CodeAccess,
    pub modifiers: Modifiers,
    pub return_type: String,
    pub parameters: String,
    pub type_parameters: Vec<TypeParameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConstructorElement {
    pub access: CodeAccess,
    pub modifiers: Modifiers,
    pub parameters: String,
    /// Chained constructor call, e.g. `base(name)`.
    pub reference: Option<String>,
    pub body: MemberBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentElement {
    pub kind: CommentKind,
    /// Text after the comment marker (inside `/* */` for blocks).
    pub text: String,
}

impl CommentElement {
    pub fn new(kind: CommentKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttributeElement {
    /// Explicit target such as `assembly` or `return`.
    pub target: Option<String>,
    /// Raw text between the argument parentheses.
    pub arguments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionElement {
    /// Parsed from `#region` rather than a comment directive.
    pub is_directive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConditionDirectiveElement {
    /// Condition expression; `None` for an `#else` branch.
    pub condition: Option<String>,
    /// Next `#elif`/`#else` branch of the chain.
    pub else_condition: Option<ElementId>,
}

// =============================================================================
// ELEMENT DATA
// =============================================================================

/// Tagged union of per-kind payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementData {
    Namespace(NamespaceElement),
    Using(UsingElement),
    Type(TypeElement),
    Method(MethodElement),
    Field(FieldElement),
    Property(PropertyElement),
    Event(EventElement),
    Delegate(DelegateElement),
    Constructor(ConstructorElement),
    Comment(CommentElement),
    Attribute(AttributeElement),
    Region(RegionElement),
    ConditionDirective(ConditionDirectiveElement),
}

impl ElementData {
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::Namespace(_) => ElementKind::Namespace,
            Self::Using(_) => ElementKind::Using,
            Self::Type(_) => ElementKind::Type,
            Self::Method(_) => ElementKind::Method,
            Self::Field(_) => ElementKind::Field,
            Self::Property(_) => ElementKind::Property,
            Self::Event(_) => ElementKind::Event,
            Self::Delegate(_) => ElementKind::Delegate,
            Self::Constructor(_) => ElementKind::Constructor,
            Self::Comment(_) => ElementKind::Comment,
            Self::Attribute(_) => ElementKind::Attribute,
            Self::Region(_) => ElementKind::Region,
            Self::ConditionDirective(_) => ElementKind::ConditionDirective,
        }
    }

    /// Access level of types and members; `None` for everything else.
    pub fn access(&self) -> CodeAccess {
        match self {
            Self::Type(e) => e.access,
            Self::Method(e) => e.access,
            Self::Field(e) => e.access,
            Self::Property(e) => e.access,
            Self::Event(e) => e.access,
            Self::Delegate(e) => e.access,
            Self::Constructor(e) => e.access,
            _ => CodeAccess::None,
        }
    }

    /// Modifier flags of types and members; empty for everything else.
    pub fn modifiers(&self) -> Modifiers {
        match self {
            Self::Type(e) => e.modifiers,
            Self::Method(e) => e.modifiers,
            Self::Field(e) => e.modifiers,
            Self::Property(e) => e.modifiers,
            Self::Event(e) => e.modifiers,
            Self::Delegate(e) => e.modifiers,
            Self::Constructor(e) => e.modifiers,
            _ => Modifiers::NONE,
        }
    }

    /// Declared type of a member (return type for methods and delegates).
    pub fn declared_type(&self) -> Option<&str> {
        match self {
            Self::Method(e) => e.return_type.as_deref(),
            Self::Field(e) => Some(&e.field_type),
            Self::Property(e) => Some(&e.property_type),
            Self::Event(e) => Some(&e.event_type),
            Self::Delegate(e) => Some(&e.return_type),
            _ => None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
