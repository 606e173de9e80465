//! Type registry and cross-document linkage
//!
//! A flat, name-keyed registry of type and group definitions. Registration
//! is phase one of a two-phase process: definitions accumulate here in any
//! order (forward references are a supported capability), and every
//! symbolic reference is resolved in phase two, at serialization time,
//! failing closed on misses.
//!
//! Built-in XSD types are never registered; a reference with the `xsd:` or
//! `xs:` prefix is always considered resolved.

use indexmap::IndexMap;

use crate::names::{is_builtin_ref, local_name};

use super::types::{AttributeGroup, ComplexType, ElementGroup, SimpleType, XsdType};

/// Name-keyed registry of schema definitions
///
/// Direct definition calls have keyed-map semantics: a second definition
/// under the same name replaces the first (last writer wins) while keeping
/// its position in the emission order.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, XsdType>,
    element_groups: IndexMap<String, ElementGroup>,
    attribute_groups: IndexMap<String, AttributeGroup>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a simple type (last writer wins)
    pub fn define_simple(&mut self, typ: SimpleType) {
        self.types.insert(typ.name.clone(), XsdType::Simple(typ));
    }

    /// Register a complex type (last writer wins)
    pub fn define_complex(&mut self, typ: ComplexType) {
        self.types.insert(typ.name.clone(), XsdType::Complex(typ));
    }

    /// Register a named element group (last writer wins)
    pub fn define_element_group(&mut self, group: ElementGroup) {
        self.element_groups.insert(group.name.clone(), group);
    }

    /// Register a named attribute group (last writer wins)
    pub fn define_attribute_group(&mut self, group: AttributeGroup) {
        self.attribute_groups.insert(group.name.clone(), group);
    }

    /// Look up a type by local name
    pub fn lookup(&self, name: &str) -> Option<&XsdType> {
        self.types.get(name)
    }

    /// Look up an element group by local name
    pub fn lookup_element_group(&self, name: &str) -> Option<&ElementGroup> {
        self.element_groups.get(name)
    }

    /// Look up an attribute group by local name
    pub fn lookup_attribute_group(&self, name: &str) -> Option<&AttributeGroup> {
        self.attribute_groups.get(name)
    }

    /// Check whether a symbolic reference resolves against this registry
    ///
    /// A reference resolves when it names a built-in (by well-known prefix)
    /// or its local part is registered as a type or group.
    pub fn resolves(&self, reference: &str) -> bool {
        if is_builtin_ref(reference) {
            return true;
        }
        let local = local_name(reference);
        self.types.contains_key(local)
            || self.element_groups.contains_key(local)
            || self.attribute_groups.contains_key(local)
    }

    /// Registered types, in definition order
    pub fn types(&self) -> impl Iterator<Item = &XsdType> {
        self.types.values()
    }

    /// Registered element groups, in definition order
    pub fn element_groups(&self) -> impl Iterator<Item = &ElementGroup> {
        self.element_groups.values()
    }

    /// Registered attribute groups, in definition order
    pub fn attribute_groups(&self) -> impl Iterator<Item = &AttributeGroup> {
        self.attribute_groups.values()
    }

    /// Total number of registered definitions
    pub fn len(&self) -> usize {
        self.types.len() + self.element_groups.len() + self.attribute_groups.len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.element_groups.is_empty() && self.attribute_groups.is_empty()
    }
}

/// An `import` of another namespace
#[derive(Debug, Clone)]
pub struct Import {
    /// Imported namespace URI
    pub namespace: String,
    /// Optional schema location
    pub location: Option<String>,
    /// Prefix under which the imported namespace is referenced
    pub prefix: Option<String>,
}

impl Import {
    /// Create an import of a namespace
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            location: None,
            prefix: None,
        }
    }

    /// Set the schema location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the reference prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

/// An `include` of a same-namespace document
#[derive(Debug, Clone)]
pub struct Include {
    /// Schema location
    pub location: String,
}

impl Include {
    /// Create an include
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

/// A `redefine` of definitions from another document
///
/// The shadow definitions live in their own registry, scoped to the
/// redefined location; they are never merged into the importing document's
/// registry.
#[derive(Debug, Default)]
pub struct Redefine {
    /// Schema location being redefined
    pub location: String,
    /// Shadow definitions
    pub registry: TypeRegistry,
}

impl Redefine {
    /// Create a redefine for a schema location
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            registry: TypeRegistry::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_after_definition() {
        let mut registry = TypeRegistry::new();
        registry.define_simple(SimpleType::new("Code"));
        registry.define_complex(ComplexType::new("Order"));

        assert!(registry.lookup("Code").is_some());
        assert!(registry.lookup("Order").is_some());
        assert!(registry.lookup("Missing").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_last_writer_wins_keeps_order() {
        let mut registry = TypeRegistry::new();
        registry.define_complex(ComplexType::new("A"));
        registry.define_complex(ComplexType::new("B"));
        registry.define_complex(ComplexType::new("A").with_abstract(true));

        let names: Vec<&str> = registry.types().map(|t| t.name()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(registry.lookup("A").unwrap().as_complex().unwrap().abstract_);
    }

    #[test]
    fn test_builtin_references_always_resolve() {
        let registry = TypeRegistry::new();
        assert!(registry.resolves("xsd:string"));
        assert!(registry.resolves("xs:int"));
        assert!(!registry.resolves("tns:Missing"));
    }

    #[test]
    fn test_forward_reference_resolves_after_definition() {
        let mut registry = TypeRegistry::new();
        // Referenced before being defined; only the serialization-time
        // check matters.
        assert!(!registry.resolves("tns:Order"));
        registry.define_complex(ComplexType::new("Order"));
        assert!(registry.resolves("tns:Order"));
    }

    #[test]
    fn test_redefine_scope_is_separate() {
        let mut registry = TypeRegistry::new();
        registry.define_complex(ComplexType::new("Order"));

        let mut redefine = Redefine::new("base.xsd");
        redefine.registry.define_complex(ComplexType::new("Order"));
        redefine.registry.define_simple(SimpleType::new("Shadow"));

        // Shadow definitions never leak into the main registry.
        assert!(registry.lookup("Shadow").is_none());
        assert!(redefine.registry.lookup("Shadow").is_some());
    }
}
