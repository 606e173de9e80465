//! WS-* extension value objects
//!
//! Immutable descriptors for the leaf concepts of the supported WS-*
//! vocabularies: addressing endpoints, security tokens and algorithm
//! suites, eventing delivery modes, topic expressions and MIME parts.
//! Each descriptor converts into an [`Assertion`] (a namespaced element
//! descriptor) for attachment to a policy or a graph node.
//!
//! All URIs here are fixed by the corresponding standards documents and
//! reproduced verbatim.

use crate::error::{ConstraintViolation, Result};
use crate::policy::Assertion;
use crate::namespaces::{
    MIME_NAMESPACE, WS_ADDRESSING_2004_NAMESPACE, WS_ADDRESSING_2005_NAMESPACE,
    WS_ADDRESSING_WSDL_NAMESPACE, WS_EVENTING_NAMESPACE, WS_MTOM_POLICY_NAMESPACE,
    WS_NOTIFICATION_NAMESPACE, WS_SECURITY_POLICY_NAMESPACE,
};

/// WS-Eventing push delivery mode URI
pub const DELIVERY_MODE_PUSH: &str =
    "http://schemas.xmlsoap.org/ws/2004/08/eventing/DeliveryModes/Push";

/// Token inclusion: never
pub const INCLUDE_TOKEN_NEVER: &str =
    "http://docs.oasis-open.org/ws-sx/ws-securitypolicy/200702/IncludeToken/Never";

/// Token inclusion: once
pub const INCLUDE_TOKEN_ONCE: &str =
    "http://docs.oasis-open.org/ws-sx/ws-securitypolicy/200702/IncludeToken/Once";

/// Token inclusion: always to recipient
pub const INCLUDE_TOKEN_ALWAYS_TO_RECIPIENT: &str =
    "http://docs.oasis-open.org/ws-sx/ws-securitypolicy/200702/IncludeToken/AlwaysToRecipient";

/// Token inclusion: always
pub const INCLUDE_TOKEN_ALWAYS: &str =
    "http://docs.oasis-open.org/ws-sx/ws-securitypolicy/200702/IncludeToken/Always";

/// WS-Topics simple topic dialect URI
pub const TOPIC_DIALECT_SIMPLE: &str = "http://docs.oasis-open.org/wsn/t-1/TopicExpression/Simple";

/// WS-Addressing vocabulary variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressingVariant {
    /// 2004/08 submission
    Submission,
    /// 2005/08 W3C recommendation
    #[default]
    Recommendation,
}

impl AddressingVariant {
    /// Namespace of the variant
    pub fn namespace(&self) -> &'static str {
        match self {
            AddressingVariant::Submission => WS_ADDRESSING_2004_NAMESPACE,
            AddressingVariant::Recommendation => WS_ADDRESSING_2005_NAMESPACE,
        }
    }
}

/// A WS-Addressing endpoint reference
#[derive(Debug, Clone)]
pub struct EndpointReference {
    /// Endpoint address URI
    pub address: String,
    /// Reference parameters as (local name, value) pairs
    pub reference_parameters: Vec<(String, String)>,
}

impl EndpointReference {
    /// Create an endpoint reference
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            reference_parameters: Vec::new(),
        }
    }

    /// Add a reference parameter
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.reference_parameters.push((name.into(), value.into()));
        self
    }

    /// Render as a `wsa:EndpointReference` element descriptor
    pub fn to_element(&self, variant: AddressingVariant) -> Assertion {
        let ns = variant.namespace();
        let mut element = Assertion::new(ns, "EndpointReference")
            .with_child(Assertion::new(ns, "Address").with_text(self.address.clone()));
        if !self.reference_parameters.is_empty() {
            let mut parameters = Assertion::new(ns, "ReferenceParameters");
            for (name, value) in &self.reference_parameters {
                parameters = parameters.with_child(
                    Assertion::new(ns, name.clone()).with_text(value.clone()),
                );
            }
            element = element.with_child(parameters);
        }
        element
    }
}

/// `wsaw:UsingAddressing` marker for a binding
pub fn using_addressing(required: bool) -> Assertion {
    let marker = Assertion::new(WS_ADDRESSING_WSDL_NAMESPACE, "UsingAddressing");
    if required {
        marker.with_attribute("wsdl:required", "true")
    } else {
        marker
    }
}

/// Security token kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Username token
    Username,
    /// X.509 certificate token
    X509,
    /// SAML token
    Saml,
    /// Issued token (WS-Trust)
    Issued,
}

impl TokenKind {
    /// Local name of the token assertion
    pub fn local_name(&self) -> &'static str {
        match self {
            TokenKind::Username => "UsernameToken",
            TokenKind::X509 => "X509Token",
            TokenKind::Saml => "SamlToken",
            TokenKind::Issued => "IssuedToken",
        }
    }
}

/// A security token requirement
#[derive(Debug, Clone)]
pub struct SecurityToken {
    /// Token kind
    pub kind: TokenKind,
    /// Token inclusion URI (one of the `INCLUDE_TOKEN_*` constants)
    pub inclusion: Option<String>,
}

impl SecurityToken {
    /// Create a token requirement
    pub fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            inclusion: None,
        }
    }

    /// Set the inclusion URI
    pub fn with_inclusion(mut self, inclusion: impl Into<String>) -> Self {
        self.inclusion = Some(inclusion.into());
        self
    }

    /// Render as an `sp:*Token` assertion
    pub fn to_assertion(&self) -> Assertion {
        let assertion = Assertion::new(WS_SECURITY_POLICY_NAMESPACE, self.kind.local_name());
        match &self.inclusion {
            Some(uri) => assertion.with_attribute("sp:IncludeToken", uri.clone()),
            None => assertion,
        }
    }
}

/// WS-SecurityPolicy algorithm suite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmSuite {
    /// Basic128
    Basic128,
    /// Basic192
    Basic192,
    /// Basic256
    Basic256,
    /// TripleDes
    TripleDes,
    /// Basic256Sha256
    Basic256Sha256,
}

impl AlgorithmSuite {
    /// Local name of the suite assertion
    pub fn local_name(&self) -> &'static str {
        match self {
            AlgorithmSuite::Basic128 => "Basic128",
            AlgorithmSuite::Basic192 => "Basic192",
            AlgorithmSuite::Basic256 => "Basic256",
            AlgorithmSuite::TripleDes => "TripleDes",
            AlgorithmSuite::Basic256Sha256 => "Basic256Sha256",
        }
    }

    /// Render as an `sp:AlgorithmSuite` assertion wrapping the suite name
    pub fn to_assertion(&self) -> Assertion {
        Assertion::new(WS_SECURITY_POLICY_NAMESPACE, "AlgorithmSuite").with_child(
            Assertion::new(WS_SECURITY_POLICY_NAMESPACE, self.local_name()),
        )
    }
}

/// MTOM optimized MIME serialization assertion
pub fn mtom() -> Assertion {
    Assertion::new(WS_MTOM_POLICY_NAMESPACE, "OptimizedMimeSerialization")
}

/// WS-Eventing delivery mode, a closed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// Push delivery
    #[default]
    Push,
}

impl DeliveryMode {
    /// The delivery mode URI
    pub fn uri(&self) -> &'static str {
        match self {
            DeliveryMode::Push => DELIVERY_MODE_PUSH,
        }
    }

    /// Parse a delivery mode URI; a value outside the closed set is a
    /// constraint violation
    pub fn from_uri(uri: &str) -> Result<Self> {
        match uri {
            DELIVERY_MODE_PUSH => Ok(DeliveryMode::Push),
            other => Err(ConstraintViolation::new("unknown delivery mode")
                .with_component("eventing")
                .with_value(other)
                .into()),
        }
    }

    /// Render as a `wse:Delivery` element descriptor
    pub fn to_element(&self) -> Assertion {
        Assertion::new(WS_EVENTING_NAMESPACE, "Delivery").with_attribute("Mode", self.uri())
    }
}

/// Marks a port-type as a WS-Eventing event source
pub fn event_source() -> Assertion {
    Assertion::new(WS_EVENTING_NAMESPACE, "EventSource").with_attribute("Value", "true")
}

/// A WS-Topics topic expression
#[derive(Debug, Clone)]
pub struct TopicExpression {
    /// Dialect URI
    pub dialect: String,
    /// Expression text
    pub expression: String,
}

impl TopicExpression {
    /// Create a topic expression in the simple dialect
    pub fn simple(expression: impl Into<String>) -> Self {
        Self {
            dialect: TOPIC_DIALECT_SIMPLE.to_string(),
            expression: expression.into(),
        }
    }

    /// Create a topic expression with an explicit dialect
    pub fn new(dialect: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            dialect: dialect.into(),
            expression: expression.into(),
        }
    }

    /// Render as a `wsnt:TopicExpression` element descriptor
    pub fn to_element(&self) -> Assertion {
        Assertion::new(WS_NOTIFICATION_NAMESPACE, "TopicExpression")
            .with_attribute("Dialect", self.dialect.clone())
            .with_text(self.expression.clone())
    }
}

/// A MIME part descriptor
#[derive(Debug, Clone)]
pub struct MimePart {
    /// Content type (e.g. `image/jpeg`)
    pub content_type: String,
    /// Referenced message part name
    pub part: Option<String>,
}

impl MimePart {
    /// Create a MIME part descriptor
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            part: None,
        }
    }

    /// Set the referenced message part
    pub fn with_part(mut self, part: impl Into<String>) -> Self {
        self.part = Some(part.into());
        self
    }

    /// Render as a `mime:content` element descriptor
    pub fn to_element(&self) -> Assertion {
        let element = Assertion::new(MIME_NAMESPACE, "content")
            .with_attribute("type", self.content_type.clone());
        match &self.part {
            Some(part) => element.with_attribute("part", part.clone()),
            None => element,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_reference_element() {
        let epr = EndpointReference::new("https://example.com/svc")
            .with_parameter("SessionId", "42")
            .to_element(AddressingVariant::Recommendation);

        assert_eq!(epr.name.local_name, "EndpointReference");
        assert_eq!(
            epr.name.namespace.as_deref(),
            Some(WS_ADDRESSING_2005_NAMESPACE)
        );
        assert_eq!(epr.children[0].text.as_deref(), Some("https://example.com/svc"));
        assert_eq!(epr.children[1].children.len(), 1);
    }

    #[test]
    fn test_security_token_assertion() {
        let token = SecurityToken::new(TokenKind::Username)
            .with_inclusion(INCLUDE_TOKEN_ALWAYS_TO_RECIPIENT)
            .to_assertion();
        assert_eq!(token.name.local_name, "UsernameToken");
        assert_eq!(
            token.attributes[0].1,
            INCLUDE_TOKEN_ALWAYS_TO_RECIPIENT
        );
    }

    #[test]
    fn test_algorithm_suite_nesting() {
        let suite = AlgorithmSuite::Basic256.to_assertion();
        assert_eq!(suite.name.local_name, "AlgorithmSuite");
        assert_eq!(suite.children[0].name.local_name, "Basic256");
    }

    #[test]
    fn test_delivery_mode_closed_set() {
        assert_eq!(
            DeliveryMode::from_uri(DELIVERY_MODE_PUSH).unwrap(),
            DeliveryMode::Push
        );
        let err = DeliveryMode::from_uri("urn:nonsense").unwrap_err();
        assert!(err.to_string().contains("delivery mode"));
    }

    #[test]
    fn test_mime_part_element() {
        let element = MimePart::new("image/jpeg").with_part("photo").to_element();
        assert_eq!(element.name.local_name, "content");
        assert_eq!(element.attributes.len(), 2);
    }

    #[test]
    fn test_using_addressing_required_flag() {
        assert!(using_addressing(false).attributes.is_empty());
        assert_eq!(using_addressing(true).attributes[0].0, "wsdl:required");
    }
}
