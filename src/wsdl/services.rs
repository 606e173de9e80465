//! Services and ports
//!
//! A service groups the network endpoints (ports) at which a binding is
//! reachable. The physical address is validated as a URI when the port is
//! added; everything else about a port is symbolic and resolved at
//! serialization time.

use indexmap::IndexMap;
use url::Url;

use crate::annotations::{Annotated, Annotation};
use crate::error::Result;
use crate::policy::{Assertion, PolicyAttachments, PolicyCarrier};

/// A network endpoint of a service
#[derive(Debug)]
pub struct Port {
    /// Port name
    pub name: String,
    /// Name of the bound binding
    pub binding: String,
    /// Physical address
    pub address: String,
    /// Attached policies
    pub policies: PolicyAttachments,
    /// Attached WS-* extension elements, in attachment order
    pub extensions: Vec<Assertion>,
    /// Annotation block
    pub annotation: Annotation,
}

impl Port {
    /// Attach a WS-* extension element (e.g. a `wsa:EndpointReference`)
    pub fn push_extension(&mut self, extension: Assertion) -> &mut Self {
        self.extensions.push(extension);
        self
    }
}

impl Annotated for Port {
    fn annotation_mut(&mut self) -> &mut Annotation {
        &mut self.annotation
    }

    fn annotation(&self) -> &Annotation {
        &self.annotation
    }
}

impl PolicyCarrier for Port {
    fn attachments_mut(&mut self) -> &mut PolicyAttachments {
        &mut self.policies
    }

    fn attachments(&self) -> &PolicyAttachments {
        &self.policies
    }
}

/// A named service: a set of ports
#[derive(Debug, Default)]
pub struct Service {
    /// Service name
    pub name: String,
    /// Ports, keyed by name, in declaration order
    pub ports: IndexMap<String, Port>,
    /// Attached policies
    pub policies: PolicyAttachments,
    /// Annotation block
    pub annotation: Annotation,
}

impl Service {
    /// Create an empty service
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a port (last writer wins for the same name)
    ///
    /// The address must parse as a URI.
    pub fn port(
        &mut self,
        name: impl Into<String>,
        binding: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<&mut Port> {
        let address = address.into();
        Url::parse(&address)?;
        let name = name.into();
        let port = Port {
            name: name.clone(),
            binding: binding.into(),
            address,
            policies: PolicyAttachments::default(),
            extensions: Vec::new(),
            annotation: Annotation::default(),
        };
        self.ports.insert(name.clone(), port);
        Ok(self.ports.get_mut(&name).expect("port just inserted"))
    }

    /// Number of ports
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Check if the service has no ports
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

impl Annotated for Service {
    fn annotation_mut(&mut self) -> &mut Annotation {
        &mut self.annotation
    }

    fn annotation(&self) -> &Annotation {
        &self.annotation
    }
}

impl PolicyCarrier for Service {
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
    fn test_port_address_validation() {
        let mut service = Service::new("UserService");
        assert!(service
            .port("UserPort", "tns:UserServiceBinding", "https://example.com/user")
            .is_ok());
        assert!(service
            .port("BadPort", "tns:UserServiceBinding", "not a uri")
            .is_err());
        // The rejected call added nothing.
        assert_eq!(service.len(), 1);
    }

    #[test]
    fn test_ports_keep_declaration_order() {
        let mut service = Service::new("UserService");
        service
            .port("A", "tns:B1", "https://example.com/a")
            .unwrap();
        service
            .port("B", "tns:B2", "https://example.com/b")
            .unwrap();
        let names: Vec<&String> = service.ports.keys().collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
