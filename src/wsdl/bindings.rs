//! Protocol bindings
//!
//! A binding realizes a port-type over a concrete protocol. The graph
//! layer stays protocol-agnostic: SOAP- and HTTP-specific details are
//! attached per operation, keyed by operation name. Whether every bound
//! operation exists in the referenced port-type is checked at
//! serialization time, once the whole graph is available.

use indexmap::IndexMap;

use crate::annotations::{Annotated, Annotation};
use crate::namespaces::SOAP_HTTP_TRANSPORT;
use crate::policy::{Assertion, PolicyAttachments, PolicyCarrier};
use crate::versions::SoapVersion;

/// SOAP binding style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoapStyle {
    /// Document style
    #[default]
    Document,
    /// RPC style
    Rpc,
}

impl std::fmt::Display for SoapStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoapStyle::Document => write!(f, "document"),
            SoapStyle::Rpc => write!(f, "rpc"),
        }
    }
}

/// SOAP body use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoapUse {
    /// Literal use
    #[default]
    Literal,
    /// Encoded use
    Encoded,
}

impl std::fmt::Display for SoapUse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoapUse::Literal => write!(f, "literal"),
            SoapUse::Encoded => write!(f, "encoded"),
        }
    }
}

/// HTTP binding verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpVerb {
    /// HTTP GET
    Get,
    /// HTTP POST
    #[default]
    Post,
}

impl std::fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpVerb::Get => write!(f, "GET"),
            HttpVerb::Post => write!(f, "POST"),
        }
    }
}

/// Protocol selection for a binding
#[derive(Debug, Clone)]
pub enum BindingProtocol {
    /// SOAP over a transport
    Soap {
        /// SOAP version, selects the binding vocabulary
        version: SoapVersion,
        /// Transport URI
        transport: String,
        /// Default style for operations without an override
        style: SoapStyle,
    },
    /// Plain HTTP binding
    Http {
        /// HTTP verb
        verb: HttpVerb,
    },
}

impl BindingProtocol {
    /// SOAP over HTTP with document style
    pub fn soap(version: SoapVersion) -> Self {
        BindingProtocol::Soap {
            version,
            transport: SOAP_HTTP_TRANSPORT.to_string(),
            style: SoapStyle::Document,
        }
    }

    /// HTTP binding with the given verb
    pub fn http(verb: HttpVerb) -> Self {
        BindingProtocol::Http { verb }
    }

    /// The SOAP version, when this is a SOAP binding
    pub fn soap_version(&self) -> Option<SoapVersion> {
        match self {
            BindingProtocol::Soap { version, .. } => Some(*version),
            BindingProtocol::Http { .. } => None,
        }
    }
}

/// SOAP details of one bound operation
#[derive(Debug, Clone, Default)]
pub struct SoapOperationBinding {
    /// SOAPAction value
    pub action: String,
    /// Style override (falls back to the binding default)
    pub style: Option<SoapStyle>,
    /// Body use for input and output
    pub use_: SoapUse,
    /// Body namespace (rpc style)
    pub body_namespace: Option<String>,
}

impl SoapOperationBinding {
    /// Create a binding entry with the given SOAPAction
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    /// Override the style
    pub fn with_style(mut self, style: SoapStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Set the body use
    pub fn with_use(mut self, use_: SoapUse) -> Self {
        self.use_ = use_;
        self
    }

    /// Set the body namespace
    pub fn with_body_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.body_namespace = Some(namespace.into());
        self
    }
}

/// Input serialization of an HTTP-bound operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpSerialization {
    /// `http:urlEncoded`
    #[default]
    UrlEncoded,
    /// `http:urlReplacement`
    UrlReplacement,
}

/// HTTP details of one bound operation
#[derive(Debug, Clone, Default)]
pub struct HttpOperationBinding {
    /// Relative location of the operation
    pub location: String,
    /// Input serialization
    pub serialization: HttpSerialization,
}

impl HttpOperationBinding {
    /// Create a binding entry with the given location
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    /// Set the input serialization
    pub fn with_serialization(mut self, serialization: HttpSerialization) -> Self {
        self.serialization = serialization;
        self
    }
}

/// Protocol detail of a bound operation
#[derive(Debug, Clone)]
pub enum OperationDetail {
    /// SOAP operation binding
    Soap(SoapOperationBinding),
    /// HTTP operation binding
    Http(HttpOperationBinding),
}

/// One bound operation: protocol detail plus attached policies
#[derive(Debug, Clone)]
pub struct BindingOperation {
    /// Protocol detail
    pub detail: OperationDetail,
    /// Attached policies
    pub policies: PolicyAttachments,
}

impl BindingOperation {
    /// Wrap a SOAP detail
    pub fn soap(detail: SoapOperationBinding) -> Self {
        Self {
            detail: OperationDetail::Soap(detail),
            policies: PolicyAttachments::default(),
        }
    }

    /// Wrap an HTTP detail
    pub fn http(detail: HttpOperationBinding) -> Self {
        Self {
            detail: OperationDetail::Http(detail),
            policies: PolicyAttachments::default(),
        }
    }

    /// The SOAPAction, when SOAP-bound
    pub fn soap_action(&self) -> Option<&str> {
        match &self.detail {
            OperationDetail::Soap(soap) => Some(&soap.action),
            OperationDetail::Http(_) => None,
        }
    }
}

impl PolicyCarrier for BindingOperation {
    fn attachments_mut(&mut self) -> &mut PolicyAttachments {
        &mut self.policies
    }

    fn attachments(&self) -> &PolicyAttachments {
        &self.policies
    }
}

/// A protocol realization of a port-type
#[derive(Debug)]
pub struct Binding {
    /// Binding name
    pub name: String,
    /// Name of the bound port-type
    pub port_type: String,
    /// Protocol selection
    pub protocol: BindingProtocol,
    /// Bound operations, keyed by operation name, in declaration order
    pub operations: IndexMap<String, BindingOperation>,
    /// Attached policies
    pub policies: PolicyAttachments,
    /// Attached WS-* extension elements, in attachment order
    pub extensions: Vec<Assertion>,
    /// Annotation block
    pub annotation: Annotation,
}

impl Binding {
    /// Create a binding over a port-type
    pub fn new(
        name: impl Into<String>,
        port_type: impl Into<String>,
        protocol: BindingProtocol,
    ) -> Self {
        Self {
            name: name.into(),
            port_type: port_type.into(),
            protocol,
            operations: IndexMap::new(),
            policies: PolicyAttachments::default(),
            extensions: Vec::new(),
            annotation: Annotation::default(),
        }
    }

    /// Attach a WS-* extension element (e.g. `wsaw:UsingAddressing`)
    pub fn push_extension(&mut self, extension: Assertion) -> &mut Self {
        self.extensions.push(extension);
        self
    }

    /// Bind an operation (last writer wins for the same name)
    pub fn bind_operation(
        &mut self,
        name: impl Into<String>,
        operation: BindingOperation,
    ) -> &mut Self {
        self.operations.insert(name.into(), operation);
        self
    }

    /// Check whether an operation is bound
    pub fn has_operation(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Number of bound operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if no operation is bound
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Annotated for Binding {
    fn annotation_mut(&mut self) -> &mut Annotation {
        &mut self.annotation
    }

    fn annotation(&self) -> &Annotation {
        &self.annotation
    }
}

impl PolicyCarrier for Binding {
    fn attachments_mut(&mut self) -> &mut PolicyAttachments {
        &mut self.policies
    }

    fn attachments(&self) -> &PolicyAttachments {
        &self.policies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soap_protocol_defaults() {
        let protocol = BindingProtocol::soap(SoapVersion::V1_1);
        let BindingProtocol::Soap {
            transport, style, ..
        } = &protocol
        else {
            panic!("expected SOAP protocol");
        };
        assert_eq!(transport, SOAP_HTTP_TRANSPORT);
        assert_eq!(*style, SoapStyle::Document);
        assert_eq!(protocol.soap_version(), Some(SoapVersion::V1_1));
    }

    #[test]
    fn test_bound_operations_keep_order() {
        let mut binding = Binding::new(
            "UserServiceBinding",
            "UserServicePortType",
            BindingProtocol::soap(SoapVersion::V1_1),
        );
        binding.bind_operation(
            "GetUser",
            BindingOperation::soap(SoapOperationBinding::new("urn:example/GetUser")),
        );
        binding.bind_operation(
            "DeleteUser",
            BindingOperation::soap(SoapOperationBinding::new("urn:example/DeleteUser")),
        );

        let names: Vec<&String> = binding.operations.keys().collect();
        assert_eq!(names, vec!["GetUser", "DeleteUser"]);
        assert_eq!(
            binding.operations["GetUser"].soap_action(),
            Some("urn:example/GetUser")
        );
    }

    #[test]
    fn test_rebinding_overwrites() {
        let mut binding = Binding::new(
            "B",
            "PT",
            BindingProtocol::soap(SoapVersion::V1_2),
        );
        binding.bind_operation(
            "Op",
            BindingOperation::soap(SoapOperationBinding::new("urn:a")),
        );
        binding.bind_operation(
            "Op",
            BindingOperation::soap(SoapOperationBinding::new("urn:b")),
        );
        assert_eq!(binding.len(), 1);
        assert_eq!(binding.operations["Op"].soap_action(), Some("urn:b"));
    }

    #[test]
    fn test_http_operation_binding() {
        let detail = HttpOperationBinding::new("/users")
            .with_serialization(HttpSerialization::UrlReplacement);
        let operation = BindingOperation::http(detail);
        assert!(operation.soap_action().is_none());
    }
}
