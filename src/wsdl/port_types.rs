//! Port-types and abstract operations
//!
//! A port-type (WSDL 2.0: interface) is a named set of operations. An
//! operation's message-exchange pattern is not stored; it follows from
//! which of input and output are present and which was declared first.

use indexmap::IndexMap;

use crate::annotations::{Annotated, Annotation};
use crate::policy::{PolicyAttachments, PolicyCarrier};

/// Message-exchange pattern of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangePattern {
    /// Input then output
    RequestResponse,
    /// Input only
    OneWay,
    /// Output only
    Notification,
    /// Output then input
    SolicitResponse,
}

impl ExchangePattern {
    /// The WSDL 2.0 pattern URI
    pub fn wsdl20_uri(&self) -> &'static str {
        match self {
            ExchangePattern::RequestResponse => "http://www.w3.org/ns/wsdl/in-out",
            ExchangePattern::OneWay => "http://www.w3.org/ns/wsdl/in-only",
            ExchangePattern::Notification => "http://www.w3.org/ns/wsdl/out-only",
            ExchangePattern::SolicitResponse => "http://www.w3.org/ns/wsdl/out-in",
        }
    }
}

/// A named fault reference on an operation
#[derive(Debug, Clone)]
pub struct FaultRef {
    /// Fault name
    pub name: String,
    /// Symbolic message reference
    pub message: String,
}

/// An abstract operation
#[derive(Debug, Clone, Default)]
pub struct Operation {
    /// Operation name
    pub name: String,
    /// Input message reference
    pub input: Option<String>,
    /// Output message reference
    pub output: Option<String>,
    /// Fault references, in declaration order
    pub faults: Vec<FaultRef>,
    /// RPC parameter order (space-separated part names)
    pub parameter_order: Option<String>,
    /// Whether output was declared before input
    output_first: bool,
    /// Annotation block
    pub annotation: Annotation,
}

impl Operation {
    /// Create an operation with no messages
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Declare the input message
    pub fn input(&mut self, message: impl Into<String>) -> &mut Self {
        self.input = Some(message.into());
        self
    }

    /// Declare the output message
    pub fn output(&mut self, message: impl Into<String>) -> &mut Self {
        if self.input.is_none() {
            self.output_first = true;
        }
        self.output = Some(message.into());
        self
    }

    /// Declare a fault
    pub fn fault(&mut self, name: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.faults.push(FaultRef {
            name: name.into(),
            message: message.into(),
        });
        self
    }

    /// Set the RPC parameter order
    pub fn parameter_order(&mut self, order: impl Into<String>) -> &mut Self {
        self.parameter_order = Some(order.into());
        self
    }

    /// The exchange pattern implied by the declared messages
    pub fn pattern(&self) -> Option<ExchangePattern> {
        match (&self.input, &self.output) {
            (Some(_), Some(_)) if self.output_first => Some(ExchangePattern::SolicitResponse),
            (Some(_), Some(_)) => Some(ExchangePattern::RequestResponse),
            (Some(_), None) => Some(ExchangePattern::OneWay),
            (None, Some(_)) => Some(ExchangePattern::Notification),
            (None, None) => None,
        }
    }

    /// Whether output should be emitted before input
    pub fn output_declared_first(&self) -> bool {
        self.output_first
    }
}

impl Annotated for Operation {
    fn annotation_mut(&mut self) -> &mut Annotation {
        &mut self.annotation
    }

    fn annotation(&self) -> &Annotation {
        &self.annotation
    }
}

/// A named set of abstract operations
#[derive(Debug, Default)]
pub struct PortType {
    /// Port-type name
    pub name: String,
    /// Operations, keyed by name, in declaration order
    pub operations: IndexMap<String, Operation>,
    /// Attached policies
    pub policies: PolicyAttachments,
    /// Annotation block
    pub annotation: Annotation,
}

impl PortType {
    /// Create an empty port-type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Get or create an operation by name
    pub fn operation(&mut self, name: impl Into<String>) -> &mut Operation {
        let name = name.into();
        self.operations
            .entry(name.clone())
            .or_insert_with(|| Operation::new(name))
    }

    /// Check whether an operation is declared
    pub fn has_operation(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Number of operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the port-type has no operations
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Annotated for PortType {
    fn annotation_mut(&mut self) -> &mut Annotation {
        &mut self.annotation
    }

    fn annotation(&self) -> &Annotation {
        &self.annotation
    }
}

impl PolicyCarrier for PortType {
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
    fn test_pattern_from_declared_messages() {
        let mut op = Operation::new("GetUser");
        op.input("tns:GetUserInput");
        assert_eq!(op.pattern(), Some(ExchangePattern::OneWay));

        op.output("tns:GetUserOutput");
        assert_eq!(op.pattern(), Some(ExchangePattern::RequestResponse));
    }

    #[test]
    fn test_notification_and_solicit_response() {
        let mut notify = Operation::new("StatusChanged");
        notify.output("tns:StatusChangedOutput");
        assert_eq!(notify.pattern(), Some(ExchangePattern::Notification));

        let mut solicit = Operation::new("Ping");
        solicit.output("tns:PingOutput");
        solicit.input("tns:PingInput");
        assert_eq!(solicit.pattern(), Some(ExchangePattern::SolicitResponse));
        assert!(solicit.output_declared_first());
    }

    #[test]
    fn test_empty_operation_has_no_pattern() {
        assert_eq!(Operation::new("Noop").pattern(), None);
    }

    #[test]
    fn test_operations_accumulate_in_call_order() {
        let mut port_type = PortType::new("UserServicePortType");
        port_type.operation("GetUser").input("tns:GetUserInput");
        port_type.operation("DeleteUser").input("tns:DeleteUserInput");
        // Re-entering an existing operation augments it in place.
        port_type.operation("GetUser").output("tns:GetUserOutput");

        let names: Vec<&String> = port_type.operations.keys().collect();
        assert_eq!(names, vec!["GetUser", "DeleteUser"]);
        assert_eq!(
            port_type.operations["GetUser"].pattern(),
            Some(ExchangePattern::RequestResponse)
        );
    }

    #[test]
    fn test_faults() {
        let mut op = Operation::new("GetUser");
        op.input("tns:In")
            .fault("NotFound", "tns:NotFoundFault")
            .fault("Denied", "tns:DeniedFault");
        assert_eq!(op.faults.len(), 2);
        assert_eq!(op.faults[0].name, "NotFound");
    }
}
