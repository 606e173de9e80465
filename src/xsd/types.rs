//! XSD type definitions
//!
//! Simple and complex type definitions, element and attribute declarations,
//! named groups and identity constraints. Every cross-reference (base types,
//! element and attribute types, group references) is a symbolic QName
//! string; nothing here resolves names. Resolution happens once, at
//! serialization time, against the registry.

use crate::annotations::{Annotated, Annotation};

use super::particles::{ModelGroup, Occurs};

/// An element declaration inside a type or group
#[derive(Debug, Clone)]
pub struct ElementDecl {
    /// Element name
    pub name: String,
    /// Symbolic type reference (`xsd:string`, `tns:Order`, ...)
    pub type_ref: String,
    /// Occurrence bounds
    pub occurs: Occurs,
    /// Whether xsi:nil is permitted
    pub nillable: bool,
    /// Default value
    pub default_value: Option<String>,
    /// Fixed value
    pub fixed_value: Option<String>,
    /// Identity constraints declared on this element
    pub identities: Vec<IdentityConstraint>,
    /// Annotation block
    pub annotation: Annotation,
}

impl ElementDecl {
    /// Create an element declaration
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            occurs: Occurs::once(),
            nillable: false,
            default_value: None,
            fixed_value: None,
            identities: Vec::new(),
            annotation: Annotation::default(),
        }
    }

    /// Set the occurrence bounds
    pub fn with_occurs(mut self, occurs: Occurs) -> Self {
        self.occurs = occurs;
        self
    }

    /// Mark the element nillable
    pub fn with_nillable(mut self, nillable: bool) -> Self {
        self.nillable = nillable;
        self
    }

    /// Set a default value
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set a fixed value
    pub fn with_fixed(mut self, value: impl Into<String>) -> Self {
        self.fixed_value = Some(value.into());
        self
    }

    /// Attach an identity constraint
    pub fn with_identity(mut self, identity: IdentityConstraint) -> Self {
        self.identities.push(identity);
        self
    }
}

impl Annotated for ElementDecl {
    fn annotation_mut(&mut self) -> &mut Annotation {
        &mut self.annotation
    }

    fn annotation(&self) -> &Annotation {
        &self.annotation
    }
}

/// Attribute use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeUse {
    /// May be absent
    #[default]
    Optional,
    /// Must be present
    Required,
    /// Must be absent
    Prohibited,
}

impl std::fmt::Display for AttributeUse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeUse::Optional => write!(f, "optional"),
            AttributeUse::Required => write!(f, "required"),
            AttributeUse::Prohibited => write!(f, "prohibited"),
        }
    }
}

/// An attribute declaration
#[derive(Debug, Clone)]
pub struct AttributeDecl {
    /// Attribute name
    pub name: String,
    /// Symbolic type reference
    pub type_ref: String,
    /// Attribute use
    pub use_: AttributeUse,
    /// Default value
    pub default_value: Option<String>,
    /// Fixed value
    pub fixed_value: Option<String>,
    /// Annotation block
    pub annotation: Annotation,
}

impl AttributeDecl {
    /// Create an attribute declaration
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            use_: AttributeUse::Optional,
            default_value: None,
            fixed_value: None,
            annotation: Annotation::default(),
        }
    }

    /// Set the attribute use
    pub fn with_use(mut self, use_: AttributeUse) -> Self {
        self.use_ = use_;
        self
    }

    /// Set a default value
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set a fixed value
    pub fn with_fixed(mut self, value: impl Into<String>) -> Self {
        self.fixed_value = Some(value.into());
        self
    }
}

impl Annotated for AttributeDecl {
    fn annotation_mut(&mut self) -> &mut Annotation {
        &mut self.annotation
    }

    fn annotation(&self) -> &Annotation {
        &self.annotation
    }
}

/// A constraining facet on a simple-type restriction
///
/// Facet values are stored verbatim; only shape rules locally checkable at
/// construction time are enforced elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Facet {
    /// An enumeration value
    Enumeration(String),
    /// A regular-expression pattern
    Pattern(String),
    /// Exact length
    Length(u32),
    /// Minimum length
    MinLength(u32),
    /// Maximum length
    MaxLength(u32),
    /// Inclusive minimum
    MinInclusive(String),
    /// Inclusive maximum
    MaxInclusive(String),
    /// Exclusive minimum
    MinExclusive(String),
    /// Exclusive maximum
    MaxExclusive(String),
    /// Total digits
    TotalDigits(u32),
    /// Fraction digits
    FractionDigits(u32),
    /// Whitespace handling (`preserve`, `replace`, `collapse`)
    WhiteSpace(String),
}

impl Facet {
    /// The XSD element name of this facet
    pub fn element_name(&self) -> &'static str {
        match self {
            Facet::Enumeration(_) => "enumeration",
            Facet::Pattern(_) => "pattern",
            Facet::Length(_) => "length",
            Facet::MinLength(_) => "minLength",
            Facet::MaxLength(_) => "maxLength",
            Facet::MinInclusive(_) => "minInclusive",
            Facet::MaxInclusive(_) => "maxInclusive",
            Facet::MinExclusive(_) => "minExclusive",
            Facet::MaxExclusive(_) => "maxExclusive",
            Facet::TotalDigits(_) => "totalDigits",
            Facet::FractionDigits(_) => "fractionDigits",
            Facet::WhiteSpace(_) => "whiteSpace",
        }
    }

    /// The facet's `value` attribute
    pub fn value(&self) -> String {
        match self {
            Facet::Enumeration(v)
            | Facet::Pattern(v)
            | Facet::MinInclusive(v)
            | Facet::MaxInclusive(v)
            | Facet::MinExclusive(v)
            | Facet::MaxExclusive(v)
            | Facet::WhiteSpace(v) => v.clone(),
            Facet::Length(n)
            | Facet::MinLength(n)
            | Facet::MaxLength(n)
            | Facet::TotalDigits(n)
            | Facet::FractionDigits(n) => n.to_string(),
        }
    }
}

/// Derivation of a simple type
#[derive(Debug, Clone)]
pub enum SimpleDerivation {
    /// Restriction of a base type by facets
    Restriction {
        /// Symbolic base type reference
        base: String,
        /// Facets in declaration order
        facets: Vec<Facet>,
    },
    /// List of an item type
    List {
        /// Symbolic item type reference
        item_type: String,
    },
    /// Union of member types
    Union {
        /// Symbolic member type references
        member_types: Vec<String>,
    },
}

/// A named simple type definition
#[derive(Debug, Clone)]
pub struct SimpleType {
    /// Type name (local, unqualified)
    pub name: String,
    /// Derivation
    pub derivation: SimpleDerivation,
    /// Annotation block
    pub annotation: Annotation,
}

impl SimpleType {
    /// Create a restriction of `xsd:string` with no facets
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            derivation: SimpleDerivation::Restriction {
                base: "xsd:string".to_string(),
                facets: Vec::new(),
            },
            annotation: Annotation::default(),
        }
    }

    /// Replace the derivation
    pub fn with_derivation(mut self, derivation: SimpleDerivation) -> Self {
        self.derivation = derivation;
        self
    }
}

impl Annotated for SimpleType {
    fn annotation_mut(&mut self) -> &mut Annotation {
        &mut self.annotation
    }

    fn annotation(&self) -> &Annotation {
        &self.annotation
    }
}

/// Derivation method for complex content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivationKind {
    /// Extension of the base
    Extension,
    /// Restriction of the base
    Restriction,
}

impl std::fmt::Display for DerivationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DerivationKind::Extension => write!(f, "extension"),
            DerivationKind::Restriction => write!(f, "restriction"),
        }
    }
}

/// Content model of a complex type
#[derive(Debug, Clone, Default)]
pub enum ComplexContent {
    /// No element content
    #[default]
    Empty,
    /// An inline model group
    Group(ModelGroup),
    /// `simpleContent` derivation from a base type
    Simple {
        /// Derivation method
        derivation: DerivationKind,
        /// Symbolic base type reference
        base: String,
    },
    /// `complexContent` derivation from a base type
    Derived {
        /// Derivation method
        derivation: DerivationKind,
        /// Symbolic base type reference
        base: String,
        /// Additional or restricted content
        group: Option<ModelGroup>,
    },
}

/// A named complex type definition
#[derive(Debug, Clone)]
pub struct ComplexType {
    /// Type name (local, unqualified)
    pub name: String,
    /// Whether the type is abstract
    pub abstract_: bool,
    /// Whether character content may interleave with elements
    pub mixed: bool,
    /// Content model
    pub content: ComplexContent,
    /// Attribute declarations, in declaration order
    pub attributes: Vec<AttributeDecl>,
    /// References to named attribute groups
    pub attribute_group_refs: Vec<String>,
    /// Annotation block
    pub annotation: Annotation,
}

impl ComplexType {
    /// Create an empty complex type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            abstract_: false,
            mixed: false,
            content: ComplexContent::Empty,
            attributes: Vec::new(),
            attribute_group_refs: Vec::new(),
            annotation: Annotation::default(),
        }
    }

    /// Mark the type abstract
    pub fn with_abstract(mut self, abstract_: bool) -> Self {
        self.abstract_ = abstract_;
        self
    }

    /// Mark the type mixed
    pub fn with_mixed(mut self, mixed: bool) -> Self {
        self.mixed = mixed;
        self
    }

    /// Replace the content model
    pub fn with_content(mut self, content: ComplexContent) -> Self {
        self.content = content;
        self
    }

    /// Add an attribute declaration
    pub fn push_attribute(&mut self, attribute: AttributeDecl) {
        self.attributes.push(attribute);
    }

    /// Add a reference to a named attribute group
    pub fn push_attribute_group_ref(&mut self, reference: impl Into<String>) {
        self.attribute_group_refs.push(reference.into());
    }

    /// The inline model group, if the content is a plain group
    pub fn group(&self) -> Option<&ModelGroup> {
        match &self.content {
            ComplexContent::Group(group) => Some(group),
            ComplexContent::Derived { group, .. } => group.as_ref(),
            _ => None,
        }
    }
}

impl Annotated for ComplexType {
    fn annotation_mut(&mut self) -> &mut Annotation {
        &mut self.annotation
    }

    fn annotation(&self) -> &Annotation {
        &self.annotation
    }
}

/// A named element group definition
#[derive(Debug, Clone)]
pub struct ElementGroup {
    /// Group name
    pub name: String,
    /// The group's model
    pub group: ModelGroup,
    /// Annotation block
    pub annotation: Annotation,
}

impl ElementGroup {
    /// Create a named group around a model group
    pub fn new(name: impl Into<String>, group: ModelGroup) -> Self {
        Self {
            name: name.into(),
            group,
            annotation: Annotation::default(),
        }
    }
}

impl Annotated for ElementGroup {
    fn annotation_mut(&mut self) -> &mut Annotation {
        &mut self.annotation
    }

    fn annotation(&self) -> &Annotation {
        &self.annotation
    }
}

/// A named attribute group definition
#[derive(Debug, Clone)]
pub struct AttributeGroup {
    /// Group name
    pub name: String,
    /// Attribute declarations, in declaration order
    pub attributes: Vec<AttributeDecl>,
    /// References to further attribute groups
    pub attribute_group_refs: Vec<String>,
    /// Annotation block
    pub annotation: Annotation,
}

impl AttributeGroup {
    /// Create an empty attribute group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            attribute_group_refs: Vec::new(),
            annotation: Annotation::default(),
        }
    }

    /// Add an attribute declaration
    pub fn push_attribute(&mut self, attribute: AttributeDecl) {
        self.attributes.push(attribute);
    }
}

impl Annotated for AttributeGroup {
    fn annotation_mut(&mut self) -> &mut Annotation {
        &mut self.annotation
    }

    fn annotation(&self) -> &Annotation {
        &self.annotation
    }
}

/// Kind of identity constraint
#[derive(Debug, Clone)]
pub enum IdentityKind {
    /// Unique and present
    Key,
    /// Reference to a key
    KeyRef {
        /// QName of the referenced key
        refer: String,
    },
    /// Unique when present
    Unique,
}

impl IdentityKind {
    /// The XSD element name of the constraint
    pub fn element_name(&self) -> &'static str {
        match self {
            IdentityKind::Key => "key",
            IdentityKind::KeyRef { .. } => "keyref",
            IdentityKind::Unique => "unique",
        }
    }
}

/// An identity constraint on an element declaration
///
/// Selector and field XPaths are stored verbatim.
#[derive(Debug, Clone)]
pub struct IdentityConstraint {
    /// Constraint name
    pub name: String,
    /// Constraint kind
    pub kind: IdentityKind,
    /// Selector XPath
    pub selector: String,
    /// Field XPaths, in declaration order
    pub fields: Vec<String>,
}

impl IdentityConstraint {
    /// Create an identity constraint
    pub fn new(
        name: impl Into<String>,
        kind: IdentityKind,
        selector: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            selector: selector.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field XPath
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }
}

/// A named type definition: simple or complex
#[derive(Debug, Clone)]
pub enum XsdType {
    /// Simple type
    Simple(SimpleType),
    /// Complex type
    Complex(ComplexType),
}

impl XsdType {
    /// The type's local name
    pub fn name(&self) -> &str {
        match self {
            XsdType::Simple(t) => &t.name,
            XsdType::Complex(t) => &t.name,
        }
    }

    /// Check if this is a simple type
    pub fn is_simple(&self) -> bool {
        matches!(self, XsdType::Simple(_))
    }

    /// Check if this is a complex type
    pub fn is_complex(&self) -> bool {
        matches!(self, XsdType::Complex(_))
    }

    /// Get as complex type
    pub fn as_complex(&self) -> Option<&ComplexType> {
        match self {
            XsdType::Complex(t) => Some(t),
            XsdType::Simple(_) => None,
        }
    }

    /// Get as simple type
    pub fn as_simple(&self) -> Option<&SimpleType> {
        match self {
            XsdType::Simple(t) => Some(t),
            XsdType::Complex(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xsd::particles::Compositor;

    #[test]
    fn test_element_builder() {
        let element = ElementDecl::new("id", "xsd:string")
            .with_occurs(Occurs::optional())
            .with_nillable(true)
            .with_default("0");
        assert_eq!(element.name, "id");
        assert_eq!(element.type_ref, "xsd:string");
        assert!(element.nillable);
        assert_eq!(element.default_value.as_deref(), Some("0"));
    }

    #[test]
    fn test_facet_serialization_shape() {
        let facet = Facet::MaxLength(32);
        assert_eq!(facet.element_name(), "maxLength");
        assert_eq!(facet.value(), "32");

        let pattern = Facet::Pattern("[A-Z]{2}".into());
        assert_eq!(pattern.element_name(), "pattern");
        assert_eq!(pattern.value(), "[A-Z]{2}");
    }

    #[test]
    fn test_complex_type_content() {
        let mut group = ModelGroup::new(Compositor::Sequence);
        group
            .push_element(ElementDecl::new("id", "xsd:string"))
            .unwrap();
        let typ = ComplexType::new("GetUserRequest").with_content(ComplexContent::Group(group));
        assert_eq!(typ.group().map(|g| g.len()), Some(1));
    }

    #[test]
    fn test_identity_constraint() {
        let key = IdentityConstraint::new("userKey", IdentityKind::Key, ".//user")
            .with_field("@id")
            .with_field("@region");
        assert_eq!(key.kind.element_name(), "key");
        assert_eq!(key.fields.len(), 2);
    }

    #[test]
    fn test_xsd_type_accessors() {
        let simple = XsdType::Simple(SimpleType::new("Code"));
        assert!(simple.is_simple());
        assert_eq!(simple.name(), "Code");
        assert!(simple.as_complex().is_none());
    }
}
