//! Property-based tests
//!
//! Covers the "for all" contracts: `all`-compositor occurrence bounds,
//! prefix-allocation bijection and the computed SOAP action default.

use proptest::prelude::*;

use wsdlgen::namespaces::PrefixAllocator;
use wsdlgen::xsd::{Compositor, ElementDecl, ModelGroup, Occurs};
use wsdlgen::Definitions;

proptest! {
    /// Valid bounds (min in {0,1}, max = 1) are always accepted by `all`.
    #[test]
    fn all_accepts_valid_bounds(min in 0u32..=1) {
        let mut group = ModelGroup::new(Compositor::All);
        let element = ElementDecl::new("field", "xsd:string")
            .with_occurs(Occurs::new(min, Some(1)));
        prop_assert!(group.push_element(element).is_ok());
        prop_assert_eq!(group.len(), 1);
    }

    /// Out-of-range bounds are rejected and the rejected call leaves the
    /// child list unchanged.
    #[test]
    fn all_rejects_invalid_bounds_atomically(
        min in 0u32..=5,
        max in proptest::option::of(0u32..=5),
    ) {
        let valid = min <= 1 && max == Some(1);
        prop_assume!(!valid);

        let mut group = ModelGroup::new(Compositor::All);
        group
            .push_element(ElementDecl::new("first", "xsd:string"))
            .unwrap();

        let element = ElementDecl::new("second", "xsd:string")
            .with_occurs(Occurs::new(min, max));
        prop_assert!(group.push_element(element).is_err());
        prop_assert_eq!(group.len(), 1);
    }

    /// Distinct URIs always get distinct prefixes, and a URI keeps its
    /// prefix across repeated lookups.
    #[test]
    fn prefix_assignment_is_a_bijection(uris in proptest::collection::vec("[a-z]{1,12}", 1..20)) {
        let mut allocator = PrefixAllocator::new();
        let mut assigned: std::collections::HashMap<String, String> = Default::default();

        for uri in &uris {
            let uri = format!("urn:{}", uri);
            let prefix = allocator.prefix_for(&uri).to_string();
            if let Some(previous) = assigned.get(&uri) {
                prop_assert_eq!(previous, &prefix);
            }
            assigned.insert(uri, prefix);
        }

        let distinct_prefixes: std::collections::HashSet<&String> = assigned.values().collect();
        prop_assert_eq!(distinct_prefixes.len(), assigned.len());
    }

    /// Without an explicit action, the shorthand computes
    /// `{targetNamespace}/{operationName}` exactly.
    #[test]
    fn computed_soap_action_default(operation in "[A-Za-z][A-Za-z0-9]{0,12}") {
        let mut doc = Definitions::new("UserService", "urn:example").unwrap();
        doc.one_way(operation.as_str()).commit().unwrap();

        let binding = &doc.bindings["UserServiceBinding"];
        let expected = format!("urn:example/{}", operation);
        prop_assert_eq!(
            binding.operations[operation.as_str()].soap_action(),
            Some(expected.as_str())
        );
    }
}
