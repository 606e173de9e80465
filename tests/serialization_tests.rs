//! Integration tests for XML emission
//!
//! These tests drive the whole pipeline: build a graph through the fluent
//! API, serialize it, and assert on the textual output — element order,
//! namespace declarations and version-dependent vocabulary.

use wsdlgen::extensions::{using_addressing, AlgorithmSuite, MimePart};
use wsdlgen::namespaces::WS_SECURITY_POLICY_NAMESPACE;
use wsdlgen::wsdl::{BindingOperation, BindingProtocol, HttpOperationBinding, HttpVerb};
use wsdlgen::xsd::{ComplexType, Facet, SimpleDerivation, SimpleType};
use wsdlgen::{Assertion, Definitions, Error, PolicyCarrier, SoapVersion, WsdlVersion};

fn document() -> Definitions {
    Definitions::new("UserService", "urn:example").unwrap()
}

/// Index of a substring, with a readable panic when absent.
fn offset(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("'{}' not found in:\n{}", needle, haystack))
}

#[test]
fn sections_appear_in_contract_order() {
    let mut doc = document();
    doc.types.define_simple(SimpleType::new("Code").with_derivation(
        SimpleDerivation::Restriction {
            base: "xsd:string".into(),
            facets: vec![Facet::MaxLength(8)],
        },
    ));
    doc.request_response("GetUser")
        .parameter("id", "xsd:string")
        .output_parameter("name", "xsd:string")
        .commit()
        .unwrap();
    doc.service("UserService")
        .port("UserPort", "UserServiceBinding", "https://example.com/user")
        .unwrap();

    let xml = doc.build().unwrap();
    let types_at = offset(&xml, "<wsdl:types>");
    let message_at = offset(&xml, "<wsdl:message");
    let port_type_at = offset(&xml, "<wsdl:portType");
    let binding_at = offset(&xml, "<wsdl:binding");
    let service_at = offset(&xml, "<wsdl:service");

    assert!(types_at < message_at, "types before messages");
    assert!(message_at < port_type_at, "messages before port-types");
    assert!(port_type_at < binding_at, "port-types before bindings");
    assert!(binding_at < service_at, "bindings before services");

    // The schema carries the restriction with its facet.
    assert!(xml.contains("<xsd:restriction base=\"xsd:string\">"));
    assert!(xml.contains("<xsd:maxLength value=\"8\"/>"));
    // Address element uses the SOAP 1.1 vocabulary of the default binding.
    assert!(xml.contains("<soap:address location=\"https://example.com/user\"/>"));
}

#[test]
fn unresolved_reference_aborts_without_output() {
    let mut doc = document();
    doc.message("GetUserInput")
        .part("parameters", "tns:NeverDefined");

    match doc.build() {
        Err(Error::UnresolvedReference { referrer, name }) => {
            assert!(referrer.contains("GetUserInput"));
            assert_eq!(name, "tns:NeverDefined");
        }
        Err(other) => panic!("expected UnresolvedReference, got {}", other),
        Ok(xml) => panic!("expected failure, got document:\n{}", xml),
    }
}

#[test]
fn forward_references_resolve_at_serialization_time() {
    let mut doc = document();
    // Reference first, define later.
    doc.message("OrderInput").part("parameters", "tns:Order");
    doc.types.define_complex(ComplexType::new("Order"));
    assert!(doc.build().is_ok());
}

#[test]
fn policy_tree_serializes_in_insertion_order() {
    let mut doc = document();
    doc.policy().all(|all| {
        all.assertion(Assertion::new(WS_SECURITY_POLICY_NAMESPACE, "A"));
        all.exactly_one(|xo| {
            xo.assertion(Assertion::new(WS_SECURITY_POLICY_NAMESPACE, "B"));
            xo.assertion(Assertion::new(WS_SECURITY_POLICY_NAMESPACE, "C"));
        });
    });

    let xml = doc.build().unwrap();
    let a_at = offset(&xml, "<sp:A");
    let exactly_one_at = offset(&xml, "<wsp:ExactlyOne>");
    let b_at = offset(&xml, "<sp:B");
    let c_at = offset(&xml, "<sp:C");

    assert!(a_at < exactly_one_at, "A before the nested ExactlyOne");
    assert!(exactly_one_at < b_at && b_at < c_at, "B before C inside it");
}

#[test]
fn namespace_prefixes_form_a_bijection() {
    let mut doc = document();
    doc.one_way("Ping").commit().unwrap();
    doc.policy()
        .assertion(AlgorithmSuite::Basic256.to_assertion());
    doc.service("UserService")
        .port("UserPort", "UserServiceBinding", "https://example.com/user")
        .unwrap();

    let xml = doc.build().unwrap();
    let mut prefixes = std::collections::HashSet::new();
    let mut uris = std::collections::HashSet::new();
    for piece in xml.split("xmlns:").skip(1) {
        let prefix = piece.split('=').next().unwrap().to_string();
        let uri = piece.split('"').nth(1).unwrap().to_string();
        assert!(prefixes.insert(prefix.clone()), "prefix '{}' bound twice", prefix);
        assert!(uris.insert(uri.clone()), "URI '{}' bound twice", uri);
    }
}

#[test]
fn soap_version_selects_the_binding_vocabulary() {
    let mut doc = document().with_soap_version(SoapVersion::V1_2);
    doc.one_way("Ping").commit().unwrap();
    doc.service("UserService")
        .port("UserPort", "UserServiceBinding", "https://example.com/user")
        .unwrap();

    let xml = doc.build().unwrap();
    assert!(xml.contains("xmlns:soap12=\"http://schemas.xmlsoap.org/wsdl/soap12/\""));
    assert!(xml.contains("<soap12:binding"));
    assert!(xml.contains("<soap12:operation soapAction=\"urn:example/Ping\"/>"));
    assert!(xml.contains("<soap12:address"));
}

#[test]
fn http_binding_emits_the_http_vocabulary() {
    let mut doc = document();
    doc.port_type("LookupPortType")
        .operation("Find")
        .input("tns:FindInput");
    doc.message("FindInput").part("query", "xsd:string");
    doc.binding(
        "LookupHttpBinding",
        "LookupPortType",
        BindingProtocol::http(HttpVerb::Get),
    )
    .bind_operation(
        "Find",
        BindingOperation::http(HttpOperationBinding::new("/find")),
    );
    doc.service("LookupService")
        .port("LookupPort", "LookupHttpBinding", "https://example.com/q")
        .unwrap();

    let xml = doc.build().unwrap();
    assert!(xml.contains("xmlns:http=\"http://schemas.xmlsoap.org/wsdl/http/\""));
    assert!(xml.contains("<http:binding verb=\"GET\"/>"));
    assert!(xml.contains("<http:operation location=\"/find\"/>"));
    assert!(xml.contains("<http:urlEncoded/>"));
    assert!(xml.contains("<http:address"));
}

#[test]
fn wsdl_two_renames_the_vocabulary() {
    let mut doc = Definitions::new("UserService", "urn:example")
        .unwrap()
        .with_wsdl_version(WsdlVersion::V2_0);
    doc.one_way("Ping").commit().unwrap();
    doc.service("UserService")
        .port("UserPort", "UserServiceBinding", "https://example.com/user")
        .unwrap();

    let xml = doc.build().unwrap();
    assert!(xml.contains("xmlns:wsdl=\"http://www.w3.org/ns/wsdl\""));
    assert!(xml.contains("<wsdl:description"));
    assert!(xml.contains("<wsdl:interface"));
    assert!(xml.contains("<wsdl:endpoint"));
    assert!(xml.contains("pattern=\"http://www.w3.org/ns/wsdl/in-only\""));
    assert!(!xml.contains("<wsdl:portType"));
    assert!(!xml.contains("<wsdl:port "));
}

#[test]
fn binding_extensions_and_mime_parts_are_emitted_in_order() {
    let mut doc = document();
    doc.one_way("Upload")
        .parameter("photo", "xsd:base64Binary")
        .commit()
        .unwrap();
    let binding = doc.bindings.get_mut("UserServiceBinding").unwrap();
    binding.push_extension(using_addressing(true));
    binding.push_extension(MimePart::new("image/jpeg").with_part("photo").to_element());

    let xml = doc.build().unwrap();
    let addressing_at = offset(&xml, "<wsaw:UsingAddressing");
    let mime_at = offset(&xml, "<mime:content");
    assert!(addressing_at < mime_at, "extensions keep attachment order");
    assert!(xml.contains("wsdl:required=\"true\""));
    assert!(xml.contains("type=\"image/jpeg\""));
}

#[test]
fn documentation_is_the_first_child() {
    use wsdlgen::annotations::Annotated;

    let mut doc = document();
    doc.document("User lookup service.");
    doc.one_way("Ping").commit().unwrap();

    let xml = doc.build().unwrap();
    let documentation_at = offset(&xml, "<wsdl:documentation>");
    let types_at = offset(&xml, "<wsdl:types>");
    assert!(documentation_at < types_at);
    assert!(xml.contains("User lookup service."));
}

#[test]
fn standalone_policy_is_referenceable_by_fragment() {
    let mut doc = document();
    doc.declare_policy("CommonSecurity")
        .unwrap()
        .assertion(AlgorithmSuite::Basic256.to_assertion());
    doc.one_way("Ping").commit().unwrap();
    let binding = doc.bindings.get_mut("UserServiceBinding").unwrap();
    binding.policy_reference("#CommonSecurity");

    let xml = doc.build().unwrap();
    assert!(xml.contains("wsu:Id=\"CommonSecurity\""));
    assert!(xml.contains("<wsp:PolicyReference URI=\"#CommonSecurity\"/>"));
}

#[test]
fn serialization_is_repeatable_and_read_only() {
    let mut doc = document();
    doc.one_way("Ping").commit().unwrap();

    let first = doc.build().unwrap();
    let second = doc.build().unwrap();
    pretty_assertions::assert_eq!(first, second);
}
