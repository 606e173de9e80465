//! Document root and shorthand orchestration
//!
//! [`Definitions`] owns the whole service description: the type registry,
//! the message/operation graph, cross-document linkage, standalone
//! policies and root-level attachments. All entities are created through
//! it (directly or via sub-builders) and live as long as it does.
//!
//! The shorthand operations (`one_way`, `notification`,
//! `request_response`) commit a consistent cluster of type, message,
//! port-type and binding entries on a single terminal call, using
//! find-or-create lookups for the conventional default containers so the
//! shorthands can be invoked repeatedly.

use indexmap::IndexMap;

use crate::annotations::{Annotated, Annotation};
use crate::error::{Error, Result};
use crate::names::{tns, validate_ncname};
use crate::policy::{Policy, PolicyAttachments, PolicyCarrier};
use crate::serializer;
use crate::versions::{SoapVersion, WsdlVersion};
use crate::wsdl::{
    Binding, BindingOperation, BindingProtocol, Message, PortType, Service, SoapOperationBinding,
};
use crate::xsd::{
    ComplexContent, ComplexType, Compositor, ElementDecl, Import, Include, ModelGroup, Redefine,
    TypeRegistry,
};

/// The root of a service description
#[derive(Debug, Default)]
pub struct Definitions {
    /// Service/document name; also the implicit service name for shorthands
    pub name: String,
    /// Target namespace, set once at creation
    target_namespace: String,
    /// WSDL version, resolved once and threaded through serialization
    pub wsdl_version: WsdlVersion,
    /// SOAP version used by default-created bindings
    pub soap_version: SoapVersion,
    /// The embedded schema's type registry
    pub types: TypeRegistry,
    /// Schema imports, in declaration order
    pub imports: Vec<Import>,
    /// Schema includes, in declaration order
    pub includes: Vec<Include>,
    /// Schema redefines, in declaration order
    pub redefines: Vec<Redefine>,
    /// Messages, keyed by name, in declaration order
    pub messages: IndexMap<String, Message>,
    /// Port-types, keyed by name, in declaration order
    pub port_types: IndexMap<String, PortType>,
    /// Bindings, keyed by name, in declaration order
    pub bindings: IndexMap<String, Binding>,
    /// Services, keyed by name, in declaration order
    pub services: IndexMap<String, Service>,
    /// Standalone policies, keyed by wsu:Id
    pub standalone_policies: IndexMap<String, Policy>,
    /// Policies attached to the root
    pub policies: PolicyAttachments,
    /// Annotation block
    pub annotation: Annotation,
}

impl Definitions {
    /// Create a document root
    ///
    /// The target namespace is fixed here and immutable thereafter.
    pub fn new(name: impl Into<String>, target_namespace: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_ncname(&name)?;
        Ok(Self {
            name,
            target_namespace: target_namespace.into(),
            ..Self::default()
        })
    }

    /// The document's target namespace
    pub fn target_namespace(&self) -> &str {
        &self.target_namespace
    }

    /// Set the WSDL version
    pub fn with_wsdl_version(mut self, version: WsdlVersion) -> Self {
        self.wsdl_version = version;
        self
    }

    /// Set the SOAP version
    pub fn with_soap_version(mut self, version: SoapVersion) -> Self {
        self.soap_version = version;
        self
    }

    /// Start a fresh message (a second call with the same name replaces the
    /// first; the symbol table is a keyed map, not an append-only log)
    pub fn message(&mut self, name: impl Into<String>) -> &mut Message {
        let name = name.into();
        self.messages.insert(name.clone(), Message::new(name.clone()));
        self.messages.get_mut(&name).expect("message just inserted")
    }

    /// Start a fresh port-type (last writer wins)
    pub fn port_type(&mut self, name: impl Into<String>) -> &mut PortType {
        let name = name.into();
        self.port_types
            .insert(name.clone(), PortType::new(name.clone()));
        self.port_types
            .get_mut(&name)
            .expect("port-type just inserted")
    }

    /// Start a fresh binding over a port-type (last writer wins)
    pub fn binding(
        &mut self,
        name: impl Into<String>,
        port_type: impl Into<String>,
        protocol: BindingProtocol,
    ) -> &mut Binding {
        let name = name.into();
        self.bindings
            .insert(name.clone(), Binding::new(name.clone(), port_type, protocol));
        self.bindings.get_mut(&name).expect("binding just inserted")
    }

    /// Start a fresh service (last writer wins)
    pub fn service(&mut self, name: impl Into<String>) -> &mut Service {
        let name = name.into();
        self.services
            .insert(name.clone(), Service::new(name.clone()));
        self.services.get_mut(&name).expect("service just inserted")
    }

    /// Declare a standalone policy with a wsu:Id
    ///
    /// Ids are reference targets; re-declaring one is a duplicate
    /// definition, not an overwrite.
    pub fn declare_policy(&mut self, id: impl Into<String>) -> Result<&mut Policy> {
        let id = id.into();
        if self.standalone_policies.contains_key(&id) {
            return Err(Error::duplicate("policy", id));
        }
        self.standalone_policies
            .insert(id.clone(), Policy::new().with_id(id.clone()));
        Ok(self
            .standalone_policies
            .get_mut(&id)
            .expect("policy just inserted"))
    }

    /// Declare a schema import
    pub fn import(&mut self, import: Import) -> &mut Self {
        self.imports.push(import);
        self
    }

    /// Declare a schema include
    pub fn include(&mut self, include: Include) -> &mut Self {
        self.includes.push(include);
        self
    }

    /// Declare a schema redefine and return its shadow scope
    pub fn redefine(&mut self, location: impl Into<String>) -> &mut Redefine {
        self.redefines.push(Redefine::new(location));
        self.redefines.last_mut().expect("redefine just pushed")
    }

    /// Start a one-way shorthand: input-only operation plus its request
    /// type, input message and binding entry
    pub fn one_way(&mut self, operation: impl Into<String>) -> OperationShorthand<'_> {
        OperationShorthand::new(self, operation, ShorthandKind::OneWay)
    }

    /// Start a notification shorthand: output-only operation plus its
    /// response type, output message and binding entry
    pub fn notification(&mut self, operation: impl Into<String>) -> OperationShorthand<'_> {
        OperationShorthand::new(self, operation, ShorthandKind::Notification)
    }

    /// Start a request-response shorthand: both directions at once
    pub fn request_response(&mut self, operation: impl Into<String>) -> OperationShorthand<'_> {
        OperationShorthand::new(self, operation, ShorthandKind::RequestResponse)
    }

    /// Serialize the finished graph to an XML string
    ///
    /// Read-only: the graph is left untouched and can be serialized again.
    pub fn build(&self) -> Result<String> {
        serializer::serialize(self)
    }

    /// Serialize the finished graph into a writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut W) -> Result<()> {
        let document = self.build()?;
        writer.write_all(document.as_bytes())?;
        Ok(())
    }

    fn default_port_type(&mut self) -> &mut PortType {
        let name = format!("{}PortType", self.name);
        self.port_types
            .entry(name.clone())
            .or_insert_with(|| PortType::new(name))
    }

    fn default_binding(&mut self) -> &mut Binding {
        let name = format!("{}Binding", self.name);
        let port_type = format!("{}PortType", self.name);
        let soap_version = self.soap_version;
        self.bindings
            .entry(name.clone())
            .or_insert_with(|| Binding::new(name, port_type, BindingProtocol::soap(soap_version)))
    }
}

impl Annotated for Definitions {
    fn annotation_mut(&mut self) -> &mut Annotation {
        &mut self.annotation
    }

    fn annotation(&self) -> &Annotation {
        &self.annotation
    }
}

impl PolicyCarrier for Definitions {
    fn attachments_mut(&mut self) -> &mut PolicyAttachments {
        &mut self.policies
    }

    fn attachments(&self) -> &PolicyAttachments {
        &self.policies
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShorthandKind {
    OneWay,
    Notification,
    RequestResponse,
}

/// Accumulates parameters for a shorthand operation
///
/// Nothing is committed until the terminal [`OperationShorthand::commit`]
/// call; dropping the builder leaves the document untouched.
#[derive(Debug)]
pub struct OperationShorthand<'a> {
    definitions: &'a mut Definitions,
    operation: String,
    kind: ShorthandKind,
    inputs: Vec<(String, String)>,
    outputs: Vec<(String, String)>,
    action: Option<String>,
}

impl<'a> OperationShorthand<'a> {
    fn new(
        definitions: &'a mut Definitions,
        operation: impl Into<String>,
        kind: ShorthandKind,
    ) -> Self {
        Self {
            definitions,
            operation: operation.into(),
            kind,
            inputs: Vec::new(),
            outputs: Vec::new(),
            action: None,
        }
    }

    /// Add a parameter to the request side (one-way, request-response)
    pub fn parameter(mut self, name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        self.inputs.push((name.into(), type_ref.into()));
        self
    }

    /// Add a parameter to the response side (notification, request-response)
    pub fn output_parameter(
        mut self,
        name: impl Into<String>,
        type_ref: impl Into<String>,
    ) -> Self {
        self.outputs.push((name.into(), type_ref.into()));
        self
    }

    /// Set an explicit SOAPAction, overriding the computed default
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Commit the cluster: type(s), message(s), default port-type entry and
    /// default binding entry
    ///
    /// Inputs are validated before the first mutation, so a failed call
    /// leaves the document exactly as it was.
    pub fn commit(self) -> Result<()> {
        validate_ncname(&self.operation)?;

        let doc = self.definitions;
        let operation = &self.operation;

        let input_message = match self.kind {
            ShorthandKind::OneWay | ShorthandKind::RequestResponse => Some(Self::register_side(
                doc,
                operation,
                "Request",
                "Input",
                &self.inputs,
            )),
            ShorthandKind::Notification => None,
        };
        let output_message = match self.kind {
            ShorthandKind::Notification | ShorthandKind::RequestResponse => Some(
                Self::register_side(doc, operation, "Response", "Output", &self.outputs),
            ),
            ShorthandKind::OneWay => None,
        };

        let port_type = doc.default_port_type();
        let entry = port_type.operation(operation.clone());
        // Input before output, so request-response does not read as
        // solicit-response.
        if let Some(message) = &input_message {
            entry.input(tns(message));
        }
        if let Some(message) = &output_message {
            entry.output(tns(message));
        }

        let action = self
            .action
            .unwrap_or_else(|| format!("{}/{}", doc.target_namespace, operation));
        doc.default_binding().bind_operation(
            operation.clone(),
            BindingOperation::soap(SoapOperationBinding::new(action)),
        );
        Ok(())
    }

    /// Create the complex type and message for one side of the exchange;
    /// returns the message name.
    fn register_side(
        doc: &mut Definitions,
        operation: &str,
        type_suffix: &str,
        message_suffix: &str,
        parameters: &[(String, String)],
    ) -> String {
        let type_name = format!("{}{}", operation, type_suffix);
        let mut group = ModelGroup::new(Compositor::Sequence);
        for (name, type_ref) in parameters {
            group
                .push_element(ElementDecl::new(name, type_ref))
                .expect("sequence accepts any occurrence bounds");
        }
        doc.types.define_complex(
            ComplexType::new(&type_name).with_content(ComplexContent::Group(group)),
        );

        let message_name = format!("{}{}", operation, message_suffix);
        let mut message = Message::new(&message_name);
        message.part("parameters", tns(&type_name));
        doc.messages.insert(message_name.clone(), message);
        message_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wsdl::ExchangePattern;

    fn document() -> Definitions {
        Definitions::new("UserService", "urn:example").unwrap()
    }

    #[test]
    fn test_target_namespace_fixed_at_creation() {
        let doc = document();
        assert_eq!(doc.target_namespace(), "urn:example");
    }

    #[test]
    fn test_one_way_cluster() {
        let mut doc = document();
        doc.one_way("GetUser")
            .parameter("id", "xsd:string")
            .commit()
            .unwrap();

        let typ = doc.types.lookup("GetUserRequest").expect("request type");
        let group = typ.as_complex().unwrap().group().unwrap();
        assert_eq!(group.len(), 1);

        let message = &doc.messages["GetUserInput"];
        assert_eq!(message.parts["parameters"].reference(), "tns:GetUserRequest");

        let port_type = &doc.port_types["UserServicePortType"];
        let operation = &port_type.operations["GetUser"];
        assert_eq!(operation.input.as_deref(), Some("tns:GetUserInput"));
        assert_eq!(operation.output, None);
        assert_eq!(operation.pattern(), Some(ExchangePattern::OneWay));

        let binding = &doc.bindings["UserServiceBinding"];
        assert_eq!(
            binding.operations["GetUser"].soap_action(),
            Some("urn:example/GetUser")
        );
    }

    #[test]
    fn test_notification_cluster() {
        let mut doc = document();
        doc.notification("StatusChanged")
            .output_parameter("status", "xsd:string")
            .commit()
            .unwrap();

        assert!(doc.types.lookup("StatusChangedResponse").is_some());
        let operation = &doc.port_types["UserServicePortType"].operations["StatusChanged"];
        assert_eq!(operation.input, None);
        assert_eq!(operation.pattern(), Some(ExchangePattern::Notification));
    }

    #[test]
    fn test_shorthand_reuses_default_containers() {
        let mut doc = document();
        doc.one_way("First").commit().unwrap();
        doc.notification("Second").commit().unwrap();

        assert_eq!(doc.port_types.len(), 1);
        assert_eq!(doc.bindings.len(), 1);
        let names: Vec<&String> = doc.port_types["UserServicePortType"]
            .operations
            .keys()
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
        let bound: Vec<&String> = doc.bindings["UserServiceBinding"].operations.keys().collect();
        assert_eq!(bound, vec!["First", "Second"]);
    }

    #[test]
    fn test_explicit_action_overrides_default() {
        let mut doc = document();
        doc.one_way("GetUser")
            .action("urn:example:custom")
            .commit()
            .unwrap();
        assert_eq!(
            doc.bindings["UserServiceBinding"].operations["GetUser"].soap_action(),
            Some("urn:example:custom")
        );
    }

    #[test]
    fn test_request_response_cluster() {
        let mut doc = document();
        doc.request_response("GetUser")
            .parameter("id", "xsd:string")
            .output_parameter("name", "xsd:string")
            .commit()
            .unwrap();

        assert!(doc.types.lookup("GetUserRequest").is_some());
        assert!(doc.types.lookup("GetUserResponse").is_some());
        let operation = &doc.port_types["UserServicePortType"].operations["GetUser"];
        assert_eq!(operation.pattern(), Some(ExchangePattern::RequestResponse));
    }

    #[test]
    fn test_uncommitted_shorthand_leaves_document_untouched() {
        let mut doc = document();
        drop(doc.one_way("GetUser").parameter("id", "xsd:string"));
        assert!(doc.types.is_empty());
        assert!(doc.messages.is_empty());
        assert!(doc.port_types.is_empty());
    }

    #[test]
    fn test_invalid_operation_name_commits_nothing() {
        let mut doc = document();
        let err = doc.one_way("not a name").commit().unwrap_err();
        assert!(matches!(err, Error::Name(_)));
        assert!(doc.port_types.is_empty());
        assert!(doc.bindings.is_empty());
    }

    #[test]
    fn test_direct_message_call_replaces() {
        let mut doc = document();
        doc.message("M").part("a", "xsd:string");
        doc.message("M").part("b", "xsd:int");
        assert_eq!(doc.messages["M"].len(), 1);
        assert!(doc.messages["M"].parts.contains_key("b"));
    }

    #[test]
    fn test_standalone_policy_ids_do_not_overwrite() {
        let mut doc = document();
        doc.declare_policy("Common").unwrap();
        let err = doc.declare_policy("Common").unwrap_err();
        assert!(matches!(err, Error::DuplicateDefinition { .. }));
    }
}
