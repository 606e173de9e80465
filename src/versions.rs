//! WSDL and SOAP version selection
//!
//! Version-dependent vocabulary (element names, binding and envelope
//! namespaces) comes from the closed tables in this module. The versions
//! are resolved once at the document root and threaded through the
//! serializer; nothing re-decides them per node.

use crate::namespaces::{
    SOAP_1_1_BINDING_NAMESPACE, SOAP_1_1_ENVELOPE_NAMESPACE, SOAP_1_2_BINDING_NAMESPACE,
    SOAP_1_2_ENVELOPE_NAMESPACE, WSDL_1_1_NAMESPACE, WSDL_2_0_NAMESPACE,
};

/// WSDL document version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WsdlVersion {
    /// WSDL 1.1 (the version SOAP toolkits overwhelmingly consume)
    #[default]
    V1_1,
    /// WSDL 2.0
    V2_0,
}

impl WsdlVersion {
    /// Namespace of the WSDL vocabulary for this version
    pub fn namespace(&self) -> &'static str {
        match self {
            WsdlVersion::V1_1 => WSDL_1_1_NAMESPACE,
            WsdlVersion::V2_0 => WSDL_2_0_NAMESPACE,
        }
    }

    /// Root element local name (`definitions` vs `description`)
    pub fn root_element(&self) -> &'static str {
        match self {
            WsdlVersion::V1_1 => "definitions",
            WsdlVersion::V2_0 => "description",
        }
    }

    /// Local name of the abstract operation container (`portType` vs `interface`)
    pub fn port_type_element(&self) -> &'static str {
        match self {
            WsdlVersion::V1_1 => "portType",
            WsdlVersion::V2_0 => "interface",
        }
    }

    /// Local name of a service endpoint (`port` vs `endpoint`)
    pub fn port_element(&self) -> &'static str {
        match self {
            WsdlVersion::V1_1 => "port",
            WsdlVersion::V2_0 => "endpoint",
        }
    }
}

impl std::fmt::Display for WsdlVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WsdlVersion::V1_1 => write!(f, "1.1"),
            WsdlVersion::V2_0 => write!(f, "2.0"),
        }
    }
}

/// SOAP protocol version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoapVersion {
    /// SOAP 1.1
    #[default]
    V1_1,
    /// SOAP 1.2
    V1_2,
}

impl SoapVersion {
    /// Namespace of the WSDL SOAP-binding vocabulary for this version
    pub fn binding_namespace(&self) -> &'static str {
        match self {
            SoapVersion::V1_1 => SOAP_1_1_BINDING_NAMESPACE,
            SoapVersion::V1_2 => SOAP_1_2_BINDING_NAMESPACE,
        }
    }

    /// Namespace of the SOAP envelope for this version
    pub fn envelope_namespace(&self) -> &'static str {
        match self {
            SoapVersion::V1_1 => SOAP_1_1_ENVELOPE_NAMESPACE,
            SoapVersion::V1_2 => SOAP_1_2_ENVELOPE_NAMESPACE,
        }
    }

    /// Preferred prefix for the binding vocabulary (`soap` / `soap12`)
    pub fn preferred_prefix(&self) -> &'static str {
        match self {
            SoapVersion::V1_1 => "soap",
            SoapVersion::V1_2 => "soap12",
        }
    }
}

impl std::fmt::Display for SoapVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoapVersion::V1_1 => write!(f, "1.1"),
            SoapVersion::V1_2 => write!(f, "1.2"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wsdl_version_vocabulary() {
        assert_eq!(WsdlVersion::V1_1.port_type_element(), "portType");
        assert_eq!(WsdlVersion::V2_0.port_type_element(), "interface");
        assert_eq!(WsdlVersion::V1_1.root_element(), "definitions");
        assert_eq!(WsdlVersion::V2_0.root_element(), "description");
    }

    #[test]
    fn test_soap_version_namespaces() {
        assert_ne!(
            SoapVersion::V1_1.binding_namespace(),
            SoapVersion::V1_2.binding_namespace()
        );
        assert_eq!(
            SoapVersion::V1_2.envelope_namespace(),
            "http://www.w3.org/2003/05/soap-envelope"
        );
    }

    #[test]
    fn test_defaults() {
        assert_eq!(WsdlVersion::default(), WsdlVersion::V1_1);
        assert_eq!(SoapVersion::default(), SoapVersion::V1_1);
    }
}
