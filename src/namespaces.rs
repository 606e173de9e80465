//! XML namespace handling
//!
//! Well-known namespace URIs for WSDL, XML Schema and the WS-* extension
//! vocabularies, a small qualified-name value object, and the prefix
//! allocator used during serialization.
//!
//! Every namespace URI here is fixed by the corresponding W3C/OASIS
//! standard and is reproduced verbatim in the output document.

use indexmap::IndexMap;

/// WSDL 1.1 namespace
pub const WSDL_1_1_NAMESPACE: &str = "http://schemas.xmlsoap.org/wsdl/";

/// WSDL 2.0 namespace
pub const WSDL_2_0_NAMESPACE: &str = "http://www.w3.org/ns/wsdl";

/// XML Schema namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// SOAP 1.1 WSDL binding namespace
pub const SOAP_1_1_BINDING_NAMESPACE: &str = "http://schemas.xmlsoap.org/wsdl/soap/";

/// SOAP 1.2 WSDL binding namespace
pub const SOAP_1_2_BINDING_NAMESPACE: &str = "http://schemas.xmlsoap.org/wsdl/soap12/";

/// HTTP WSDL binding namespace
pub const HTTP_BINDING_NAMESPACE: &str = "http://schemas.xmlsoap.org/wsdl/http/";

/// MIME WSDL binding namespace
pub const MIME_NAMESPACE: &str = "http://schemas.xmlsoap.org/wsdl/mime/";

/// SOAP 1.1 envelope namespace
pub const SOAP_1_1_ENVELOPE_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// SOAP 1.2 envelope namespace
pub const SOAP_1_2_ENVELOPE_NAMESPACE: &str = "http://www.w3.org/2003/05/soap-envelope";

/// SOAP-over-HTTP transport URI
pub const SOAP_HTTP_TRANSPORT: &str = "http://schemas.xmlsoap.org/soap/http";

/// WS-Policy namespace (2004/09, the variant WSDL toolkits expect)
pub const WS_POLICY_NAMESPACE: &str = "http://schemas.xmlsoap.org/ws/2004/09/policy";

/// WS-Security utility namespace (wsu, carries the Id attribute)
pub const WS_SECURITY_UTILITY_NAMESPACE: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd";

/// WS-Security extension namespace (wsse)
pub const WS_SECURITY_EXTENSION_NAMESPACE: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";

/// WS-SecurityPolicy 1.2 namespace
pub const WS_SECURITY_POLICY_NAMESPACE: &str =
    "http://docs.oasis-open.org/ws-sx/ws-securitypolicy/200702";

/// WS-Trust 1.3 namespace
pub const WS_TRUST_NAMESPACE: &str = "http://docs.oasis-open.org/ws-sx/ws-trust/200512";

/// WS-Addressing 2004/08 namespace (submission variant)
pub const WS_ADDRESSING_2004_NAMESPACE: &str = "http://schemas.xmlsoap.org/ws/2004/08/addressing";

/// WS-Addressing 2005/08 namespace (W3C recommendation)
pub const WS_ADDRESSING_2005_NAMESPACE: &str = "http://www.w3.org/2005/08/addressing";

/// WS-Addressing WSDL binding namespace
pub const WS_ADDRESSING_WSDL_NAMESPACE: &str = "http://www.w3.org/2006/05/addressing/wsdl";

/// WS-Eventing namespace
pub const WS_EVENTING_NAMESPACE: &str = "http://schemas.xmlsoap.org/ws/2004/08/eventing";

/// WS-Notification (base notification) namespace
pub const WS_NOTIFICATION_NAMESPACE: &str = "http://docs.oasis-open.org/wsn/b-2";

/// MTOM / optimized MIME serialization policy namespace
pub const WS_MTOM_POLICY_NAMESPACE: &str =
    "http://schemas.xmlsoap.org/ws/2004/09/policy/optimizedmimeserialization";

/// Qualified name - namespace URI plus local name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<String>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }
}

impl std::fmt::Display for QName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Preferred prefixes for well-known namespaces
///
/// Used on first allocation only; a URI keeps whatever prefix it was first
/// assigned, and a taken prefix is never reused for a second URI.
const PREFERRED_PREFIXES: &[(&str, &str)] = &[
    (WSDL_1_1_NAMESPACE, "wsdl"),
    (WSDL_2_0_NAMESPACE, "wsdl"),
    (XSD_NAMESPACE, "xsd"),
    (SOAP_1_1_BINDING_NAMESPACE, "soap"),
    (SOAP_1_2_BINDING_NAMESPACE, "soap12"),
    (HTTP_BINDING_NAMESPACE, "http"),
    (MIME_NAMESPACE, "mime"),
    (WS_POLICY_NAMESPACE, "wsp"),
    (WS_SECURITY_UTILITY_NAMESPACE, "wsu"),
    (WS_SECURITY_EXTENSION_NAMESPACE, "wsse"),
    (WS_SECURITY_POLICY_NAMESPACE, "sp"),
    (WS_TRUST_NAMESPACE, "wst"),
    (WS_ADDRESSING_2004_NAMESPACE, "wsa"),
    (WS_ADDRESSING_2005_NAMESPACE, "wsa"),
    (WS_ADDRESSING_WSDL_NAMESPACE, "wsaw"),
    (WS_EVENTING_NAMESPACE, "wse"),
    (WS_NOTIFICATION_NAMESPACE, "wsnt"),
    (WS_MTOM_POLICY_NAMESPACE, "wsoma"),
];

/// Allocates one stable prefix per namespace URI
///
/// Assignment is first-seen-wins and the URI-to-prefix mapping is a
/// bijection: the same URI always yields the same prefix, and no prefix is
/// ever bound to two URIs. Iteration order of [`PrefixAllocator::bindings`]
/// is allocation order, which fixes the order of `xmlns` declarations in
/// the output.
#[derive(Debug, Default)]
pub struct PrefixAllocator {
    by_uri: IndexMap<String, String>,
    counter: u32,
}

impl PrefixAllocator {
    /// Create an empty allocator
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the prefix for a namespace URI, allocating one if unseen
    pub fn prefix_for(&mut self, uri: &str) -> &str {
        if !self.by_uri.contains_key(uri) {
            let prefix = self.pick_prefix(uri);
            self.by_uri.insert(uri.to_string(), prefix);
        }
        self.by_uri.get(uri).map(|s| s.as_str()).unwrap_or_default()
    }

    /// Get the prefix for a URI, preferring the given prefix if the URI is
    /// unseen and the prefix is still free
    pub fn prefix_for_with_hint(&mut self, uri: &str, hint: &str) -> &str {
        if !self.by_uri.contains_key(uri) {
            let prefix = if self.is_taken(hint) {
                self.next_generated()
            } else {
                hint.to_string()
            };
            self.by_uri.insert(uri.to_string(), prefix);
        }
        self.by_uri.get(uri).map(|s| s.as_str()).unwrap_or_default()
    }

    /// Look up the prefix for a URI without allocating
    pub fn get(&self, uri: &str) -> Option<&str> {
        self.by_uri.get(uri).map(|s| s.as_str())
    }

    /// All (uri, prefix) bindings in allocation order
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_uri.iter().map(|(u, p)| (u.as_str(), p.as_str()))
    }

    /// Number of allocated bindings
    pub fn len(&self) -> usize {
        self.by_uri.len()
    }

    /// Check if no binding has been allocated yet
    pub fn is_empty(&self) -> bool {
        self.by_uri.is_empty()
    }

    fn is_taken(&self, prefix: &str) -> bool {
        self.by_uri.values().any(|p| p == prefix)
    }

    fn pick_prefix(&mut self, uri: &str) -> String {
        let preferred = PREFERRED_PREFIXES
            .iter()
            .find(|(u, _)| *u == uri)
            .map(|(_, p)| *p);

        match preferred {
            Some(p) if !self.is_taken(p) => p.to_string(),
            _ => self.next_generated(),
        }
    }

    fn next_generated(&mut self) -> String {
        loop {
            let candidate = format!("ns{}", self.counter);
            self.counter += 1;
            if !self.is_taken(&candidate) {
                return candidate;
            }
        }
    }
}
