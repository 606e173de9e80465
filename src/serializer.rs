//! XML serialization
//!
//! A single read-only traversal over a finished [`Definitions`] graph.
//! The traversal runs in three steps: collect every namespace URI the
//! graph references and assign prefixes (first-seen-wins bijection),
//! resolve every symbolic reference (failing closed before a single byte
//! is emitted), then walk the graph once and write namespace-qualified
//! XML in the contractual order: imports, types, messages, port-types,
//! bindings, services.
//!
//! Version-dependent vocabulary comes from the closed tables in
//! [`crate::versions`]; it is read once from the root and threaded
//! through the whole walk.

use std::collections::HashSet;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::definitions::Definitions;
use crate::error::{Error, Result};
use crate::names::{local_name, split_qname};
use crate::namespaces::{
    PrefixAllocator, HTTP_BINDING_NAMESPACE, WS_POLICY_NAMESPACE, WS_SECURITY_UTILITY_NAMESPACE,
    XSD_NAMESPACE,
};
use crate::annotations::Annotation;
use crate::policy::{
    Assertion, Operator, Policy, PolicyAttachment, PolicyAttachments, PolicyNode, PolicyReference,
};
use crate::versions::WsdlVersion;
use crate::wsdl::{
    Binding, BindingProtocol, HttpSerialization, Message, Operation, OperationDetail, PartRef,
    PortType, Service,
};
use crate::xsd::{
    AttributeDecl, AttributeGroup, AttributeUse, ComplexContent, ComplexType, ElementDecl,
    ElementGroup, IdentityKind, ModelGroup, Particle, SimpleDerivation, SimpleType, TypeRegistry,
    XsdType,
};

type XmlWriter = Writer<Vec<u8>>;

/// Serialize a finished graph to an XML string
///
/// Either the whole document is produced or an error is returned; no
/// partial output escapes.
pub fn serialize(doc: &Definitions) -> Result<String> {
    let mut serializer = Serializer::new(doc);
    serializer.collect_namespaces();
    serializer.validate()?;

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    serializer.emit(&mut writer)?;
    String::from_utf8(writer.into_inner()).map_err(|e| Error::Other(e.to_string()))
}

struct Serializer<'a> {
    doc: &'a Definitions,
    prefixes: PrefixAllocator,
    external_prefixes: HashSet<String>,
}

impl<'a> Serializer<'a> {
    fn new(doc: &'a Definitions) -> Self {
        let external_prefixes = doc
            .imports
            .iter()
            .filter_map(|i| i.prefix.clone())
            .collect();
        Self {
            doc,
            prefixes: PrefixAllocator::new(),
            external_prefixes,
        }
    }

    // ---------------------------------------------------------------------
    // Step 1: namespace collection
    // ---------------------------------------------------------------------

    fn collect_namespaces(&mut self) {
        let doc = self.doc;

        self.prefixes.prefix_for(doc.wsdl_version.namespace());
        self.prefixes
            .prefix_for_with_hint(doc.target_namespace(), "tns");
        self.prefixes.prefix_for(XSD_NAMESPACE);

        for import in &doc.imports {
            match &import.prefix {
                Some(prefix) => {
                    self.prefixes.prefix_for_with_hint(&import.namespace, prefix);
                }
                None => {
                    self.prefixes.prefix_for(&import.namespace);
                }
            }
        }

        for binding in doc.bindings.values() {
            match &binding.protocol {
                BindingProtocol::Soap { version, .. } => {
                    self.prefixes.prefix_for(version.binding_namespace());
                }
                BindingProtocol::Http { .. } => {
                    self.prefixes.prefix_for(HTTP_BINDING_NAMESPACE);
                }
            }
        }

        if self.has_policies() {
            self.prefixes.prefix_for(WS_POLICY_NAMESPACE);
        }
        if self.has_policy_ids() {
            self.prefixes.prefix_for(WS_SECURITY_UTILITY_NAMESPACE);
        }

        for policy in doc.standalone_policies.values() {
            self.collect_operator(&policy.root);
        }
        self.collect_attachments(&doc.policies);
        for port_type in doc.port_types.values() {
            self.collect_attachments(&port_type.policies);
        }
        for binding in doc.bindings.values() {
            self.collect_attachments(&binding.policies);
            for extension in &binding.extensions {
                self.collect_assertion(extension);
            }
            for operation in binding.operations.values() {
                self.collect_attachments(&operation.policies);
            }
        }
        for service in doc.services.values() {
            self.collect_attachments(&service.policies);
            for port in service.ports.values() {
                self.collect_attachments(&port.policies);
                for extension in &port.extensions {
                    self.collect_assertion(extension);
                }
            }
        }
    }

    fn collect_attachments(&mut self, attachments: &PolicyAttachments) {
        for item in &attachments.items {
            if let PolicyAttachment::Inline(policy) = item {
                self.collect_operator(&policy.root);
            }
        }
    }

    fn collect_operator(&mut self, operator: &Operator) {
        for child in &operator.children {
            match child {
                PolicyNode::All(op) | PolicyNode::ExactlyOne(op) => self.collect_operator(op),
                PolicyNode::Assertion(assertion) => self.collect_assertion(assertion),
                PolicyNode::Policy(policy) => self.collect_operator(&policy.root),
                PolicyNode::Reference(_) => {}
            }
        }
    }

    fn collect_assertion(&mut self, assertion: &Assertion) {
        if let Some(ns) = &assertion.name.namespace {
            self.prefixes.prefix_for(ns);
        }
        for child in &assertion.children {
            self.collect_assertion(child);
        }
    }

    fn has_policies(&self) -> bool {
        let doc = self.doc;
        !doc.standalone_policies.is_empty()
            || !doc.policies.is_empty()
            || doc.port_types.values().any(|p| !p.policies.is_empty())
            || doc.bindings.values().any(|b| {
                !b.policies.is_empty()
                    || b.operations.values().any(|o| !o.policies.is_empty())
            })
            || doc.services.values().any(|s| {
                !s.policies.is_empty() || s.ports.values().any(|p| !p.policies.is_empty())
            })
    }

    fn has_policy_ids(&self) -> bool {
        fn operator_has_id(operator: &Operator) -> bool {
            operator.children.iter().any(|child| match child {
                PolicyNode::All(op) | PolicyNode::ExactlyOne(op) => operator_has_id(op),
                PolicyNode::Policy(policy) => {
                    policy.id.is_some() || operator_has_id(&policy.root)
                }
                _ => false,
            })
        }
        fn attachments_have_id(attachments: &PolicyAttachments) -> bool {
            attachments.items.iter().any(|item| match item {
                PolicyAttachment::Inline(policy) => {
                    policy.id.is_some() || operator_has_id(&policy.root)
                }
                PolicyAttachment::Reference(_) => false,
            })
        }

        let doc = self.doc;
        !doc.standalone_policies.is_empty()
            || attachments_have_id(&doc.policies)
            || doc
                .port_types
                .values()
                .any(|p| attachments_have_id(&p.policies))
            || doc.bindings.values().any(|b| {
                attachments_have_id(&b.policies)
                    || b.operations
                        .values()
                        .any(|o| attachments_have_id(&o.policies))
            })
            || doc.services.values().any(|s| {
                attachments_have_id(&s.policies)
                    || s.ports.values().any(|p| attachments_have_id(&p.policies))
            })
    }

    // ---------------------------------------------------------------------
    // Step 2: reference resolution
    // ---------------------------------------------------------------------

    fn validate(&self) -> Result<()> {
        let doc = self.doc;

        for message in doc.messages.values() {
            for (part, reference) in &message.parts {
                self.check_type_ref(
                    &doc.types,
                    None,
                    reference.reference(),
                    || format!("message '{}' part '{}'", message.name, part),
                )?;
            }
        }

        self.validate_registry(&doc.types, None)?;
        for redefine in &doc.redefines {
            self.validate_registry(&redefine.registry, Some(&doc.types))?;
        }

        for port_type in doc.port_types.values() {
            for operation in port_type.operations.values() {
                let referrer = || {
                    format!(
                        "port-type '{}' operation '{}'",
                        port_type.name, operation.name
                    )
                };
                for message in operation.input.iter().chain(operation.output.iter()) {
                    self.check_message_ref(message, &referrer)?;
                }
                for fault in &operation.faults {
                    self.check_message_ref(&fault.message, &referrer)?;
                }
            }
        }

        for binding in doc.bindings.values() {
            let port_type_name = local_name(&binding.port_type);
            let port_type = doc.port_types.get(port_type_name).ok_or_else(|| {
                Error::unresolved(format!("binding '{}'", binding.name), &binding.port_type)
            })?;
            for operation_name in binding.operations.keys() {
                if !port_type.has_operation(operation_name) {
                    return Err(Error::unresolved(
                        format!("binding '{}'", binding.name),
                        format!("operation '{}' in port-type '{}'", operation_name, port_type_name),
                    ));
                }
            }
        }

        for service in doc.services.values() {
            for port in service.ports.values() {
                if !doc.bindings.contains_key(local_name(&port.binding)) {
                    return Err(Error::unresolved(
                        format!("service '{}' port '{}'", service.name, port.name),
                        &port.binding,
                    ));
                }
            }
        }

        Ok(())
    }

    fn validate_registry(
        &self,
        registry: &TypeRegistry,
        fallback: Option<&TypeRegistry>,
    ) -> Result<()> {
        for typ in registry.types() {
            match typ {
                XsdType::Simple(simple) => {
                    self.validate_simple(registry, fallback, simple)?;
                }
                XsdType::Complex(complex) => {
                    self.validate_complex(registry, fallback, complex)?;
                }
            }
        }
        for group in registry.element_groups() {
            self.validate_group(registry, fallback, &group.group, || {
                format!("group '{}'", group.name)
            })?;
        }
        for group in registry.attribute_groups() {
            for attribute in &group.attributes {
                self.check_type_ref(registry, fallback, &attribute.type_ref, || {
                    format!("attribute group '{}' attribute '{}'", group.name, attribute.name)
                })?;
            }
        }
        Ok(())
    }

    fn validate_simple(
        &self,
        registry: &TypeRegistry,
        fallback: Option<&TypeRegistry>,
        simple: &SimpleType,
    ) -> Result<()> {
        let referrer = || format!("simple type '{}'", simple.name);
        match &simple.derivation {
            SimpleDerivation::Restriction { base, .. } => {
                self.check_type_ref(registry, fallback, base, &referrer)?;
            }
            SimpleDerivation::List { item_type } => {
                self.check_type_ref(registry, fallback, item_type, &referrer)?;
            }
            SimpleDerivation::Union { member_types } => {
                for member in member_types {
                    self.check_type_ref(registry, fallback, member, &referrer)?;
                }
            }
        }
        Ok(())
    }

    fn validate_complex(
        &self,
        registry: &TypeRegistry,
        fallback: Option<&TypeRegistry>,
        complex: &ComplexType,
    ) -> Result<()> {
        let referrer = || format!("complex type '{}'", complex.name);
        match &complex.content {
            ComplexContent::Empty => {}
            ComplexContent::Group(group) => {
                self.validate_group(registry, fallback, group, &referrer)?;
            }
            ComplexContent::Simple { base, .. } => {
                self.check_type_ref(registry, fallback, base, &referrer)?;
            }
            ComplexContent::Derived { base, group, .. } => {
                self.check_type_ref(registry, fallback, base, &referrer)?;
                if let Some(group) = group {
                    self.validate_group(registry, fallback, group, &referrer)?;
                }
            }
        }
        for attribute in &complex.attributes {
            self.check_type_ref(registry, fallback, &attribute.type_ref, || {
                format!("complex type '{}' attribute '{}'", complex.name, attribute.name)
            })?;
        }
        for reference in &complex.attribute_group_refs {
            self.check_type_ref(registry, fallback, reference, &referrer)?;
        }
        Ok(())
    }

    fn validate_group(
        &self,
        registry: &TypeRegistry,
        fallback: Option<&TypeRegistry>,
        group: &ModelGroup,
        referrer: impl Fn() -> String + Copy,
    ) -> Result<()> {
        for particle in &group.particles {
            match particle {
                Particle::Element(element) => {
                    self.check_type_ref(registry, fallback, &element.type_ref, || {
                        format!("{} element '{}'", referrer(), element.name)
                    })?;
                }
                Particle::Any(_) => {}
                Particle::Group(nested) => {
                    self.validate_group(registry, fallback, nested, referrer)?;
                }
            }
        }
        Ok(())
    }

    fn check_type_ref(
        &self,
        registry: &TypeRegistry,
        fallback: Option<&TypeRegistry>,
        reference: &str,
        referrer: impl Fn() -> String,
    ) -> Result<()> {
        if registry.resolves(reference)
            || fallback.map_or(false, |f| f.resolves(reference))
            || self.is_external(reference)
        {
            Ok(())
        } else {
            Err(Error::unresolved(referrer(), reference))
        }
    }

    fn check_message_ref(&self, reference: &str, referrer: impl Fn() -> String) -> Result<()> {
        if self.doc.messages.contains_key(local_name(reference)) || self.is_external(reference) {
            Ok(())
        } else {
            Err(Error::unresolved(referrer(), reference))
        }
    }

    fn is_external(&self, reference: &str) -> bool {
        match split_qname(reference).0 {
            Some(prefix) => self.external_prefixes.contains(prefix),
            None => false,
        }
    }

    // ---------------------------------------------------------------------
    // Step 3: emission
    // ---------------------------------------------------------------------

    fn prefix(&self, uri: &str) -> Result<&str> {
        self.prefixes
            .get(uri)
            .ok_or_else(|| Error::Namespace(format!("no prefix allocated for '{}'", uri)))
    }

    fn qual(&self, uri: &str, local: &str) -> Result<String> {
        Ok(format!("{}:{}", self.prefix(uri)?, local))
    }

    fn wsdl_name(&self, local: &str) -> Result<String> {
        self.qual(self.doc.wsdl_version.namespace(), local)
    }

    fn xsd_name(&self, local: &str) -> Result<String> {
        self.qual(XSD_NAMESPACE, local)
    }

    fn wsp_name(&self, local: &str) -> Result<String> {
        self.qual(WS_POLICY_NAMESPACE, local)
    }

    fn emit(&self, w: &mut XmlWriter) -> Result<()> {
        let doc = self.doc;
        w.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let root_name = self.wsdl_name(doc.wsdl_version.root_element())?;
        let mut root = BytesStart::new(root_name.clone());
        root.push_attribute(("name", doc.name.as_str()));
        root.push_attribute(("targetNamespace", doc.target_namespace()));
        for (uri, prefix) in self.prefixes.bindings() {
            root.push_attribute((format!("xmlns:{}", prefix).as_str(), uri));
        }
        w.write_event(Event::Start(root))?;

        self.write_wsdl_documentation(w, &doc.annotation)?;
        self.write_imports(w)?;
        for policy in doc.standalone_policies.values() {
            self.write_policy(w, policy)?;
        }
        self.write_attachments(w, &doc.policies)?;
        self.write_types_section(w)?;
        for message in doc.messages.values() {
            self.write_message(w, message)?;
        }
        for port_type in doc.port_types.values() {
            self.write_port_type(w, port_type)?;
        }
        for binding in doc.bindings.values() {
            self.write_binding(w, binding)?;
        }
        for service in doc.services.values() {
            self.write_service(w, service)?;
        }

        w.write_event(Event::End(BytesEnd::new(root_name)))?;
        Ok(())
    }

    fn write_imports(&self, w: &mut XmlWriter) -> Result<()> {
        for import in &self.doc.imports {
            let mut el = BytesStart::new(self.wsdl_name("import")?);
            el.push_attribute(("namespace", import.namespace.as_str()));
            if let Some(location) = &import.location {
                el.push_attribute(("location", location.as_str()));
            }
            w.write_event(Event::Empty(el))?;
        }
        Ok(())
    }

    fn write_types_section(&self, w: &mut XmlWriter) -> Result<()> {
        let doc = self.doc;
        if doc.types.is_empty() && doc.includes.is_empty() && doc.redefines.is_empty() {
            return Ok(());
        }

        let types_name = self.wsdl_name("types")?;
        w.write_event(Event::Start(BytesStart::new(types_name.clone())))?;

        let schema_name = self.xsd_name("schema")?;
        let mut schema = BytesStart::new(schema_name.clone());
        schema.push_attribute(("targetNamespace", doc.target_namespace()));
        schema.push_attribute(("elementFormDefault", "qualified"));
        w.write_event(Event::Start(schema))?;

        for include in &doc.includes {
            let mut el = BytesStart::new(self.xsd_name("include")?);
            el.push_attribute(("schemaLocation", include.location.as_str()));
            w.write_event(Event::Empty(el))?;
        }
        for redefine in &doc.redefines {
            let redefine_name = self.xsd_name("redefine")?;
            let mut el = BytesStart::new(redefine_name.clone());
            el.push_attribute(("schemaLocation", redefine.location.as_str()));
            w.write_event(Event::Start(el))?;
            self.write_registry(w, &redefine.registry)?;
            w.write_event(Event::End(BytesEnd::new(redefine_name)))?;
        }

        self.write_registry(w, &doc.types)?;

        w.write_event(Event::End(BytesEnd::new(schema_name)))?;
        w.write_event(Event::End(BytesEnd::new(types_name)))?;
        Ok(())
    }

    fn write_registry(&self, w: &mut XmlWriter, registry: &TypeRegistry) -> Result<()> {
        for typ in registry.types() {
            match typ {
                XsdType::Simple(simple) => self.write_simple_type(w, simple)?,
                XsdType::Complex(complex) => self.write_complex_type(w, complex)?,
            }
        }
        for group in registry.element_groups() {
            self.write_element_group(w, group)?;
        }
        for group in registry.attribute_groups() {
            self.write_attribute_group(w, group)?;
        }
        Ok(())
    }

    fn write_simple_type(&self, w: &mut XmlWriter, simple: &SimpleType) -> Result<()> {
        let name = self.xsd_name("simpleType")?;
        let mut el = BytesStart::new(name.clone());
        el.push_attribute(("name", simple.name.as_str()));
        w.write_event(Event::Start(el))?;
        self.write_xsd_annotation(w, &simple.annotation)?;

        match &simple.derivation {
            SimpleDerivation::Restriction { base, facets } => {
                let restriction_name = self.xsd_name("restriction")?;
                let mut restriction = BytesStart::new(restriction_name.clone());
                restriction.push_attribute(("base", base.as_str()));
                if facets.is_empty() {
                    w.write_event(Event::Empty(restriction))?;
                } else {
                    w.write_event(Event::Start(restriction))?;
                    for facet in facets {
                        let mut facet_el = BytesStart::new(self.xsd_name(facet.element_name())?);
                        facet_el.push_attribute(("value", facet.value().as_str()));
                        w.write_event(Event::Empty(facet_el))?;
                    }
                    w.write_event(Event::End(BytesEnd::new(restriction_name)))?;
                }
            }
            SimpleDerivation::List { item_type } => {
                let mut list = BytesStart::new(self.xsd_name("list")?);
                list.push_attribute(("itemType", item_type.as_str()));
                w.write_event(Event::Empty(list))?;
            }
            SimpleDerivation::Union { member_types } => {
                let mut union = BytesStart::new(self.xsd_name("union")?);
                union.push_attribute(("memberTypes", member_types.join(" ").as_str()));
                w.write_event(Event::Empty(union))?;
            }
        }

        w.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_complex_type(&self, w: &mut XmlWriter, complex: &ComplexType) -> Result<()> {
        let name = self.xsd_name("complexType")?;
        let mut el = BytesStart::new(name.clone());
        el.push_attribute(("name", complex.name.as_str()));
        if complex.abstract_ {
            el.push_attribute(("abstract", "true"));
        }
        if complex.mixed {
            el.push_attribute(("mixed", "true"));
        }
        w.write_event(Event::Start(el))?;
        self.write_xsd_annotation(w, &complex.annotation)?;

        match &complex.content {
            ComplexContent::Empty => {
                self.write_attributes(w, &complex.attributes, &complex.attribute_group_refs)?;
            }
            ComplexContent::Group(group) => {
                self.write_model_group(w, group)?;
                self.write_attributes(w, &complex.attributes, &complex.attribute_group_refs)?;
            }
            ComplexContent::Simple { derivation, base } => {
                let content_name = self.xsd_name("simpleContent")?;
                w.write_event(Event::Start(BytesStart::new(content_name.clone())))?;
                let derivation_name = self.xsd_name(&derivation.to_string())?;
                let mut derivation_el = BytesStart::new(derivation_name.clone());
                derivation_el.push_attribute(("base", base.as_str()));
                if complex.attributes.is_empty() && complex.attribute_group_refs.is_empty() {
                    w.write_event(Event::Empty(derivation_el))?;
                } else {
                    w.write_event(Event::Start(derivation_el))?;
                    self.write_attributes(w, &complex.attributes, &complex.attribute_group_refs)?;
                    w.write_event(Event::End(BytesEnd::new(derivation_name)))?;
                }
                w.write_event(Event::End(BytesEnd::new(content_name)))?;
            }
            ComplexContent::Derived {
                derivation,
                base,
                group,
            } => {
                let content_name = self.xsd_name("complexContent")?;
                w.write_event(Event::Start(BytesStart::new(content_name.clone())))?;
                let derivation_name = self.xsd_name(&derivation.to_string())?;
                let mut derivation_el = BytesStart::new(derivation_name.clone());
                derivation_el.push_attribute(("base", base.as_str()));
                w.write_event(Event::Start(derivation_el))?;
                if let Some(group) = group {
                    self.write_model_group(w, group)?;
                }
                self.write_attributes(w, &complex.attributes, &complex.attribute_group_refs)?;
                w.write_event(Event::End(BytesEnd::new(derivation_name)))?;
                w.write_event(Event::End(BytesEnd::new(content_name)))?;
            }
        }

        w.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_attributes(
        &self,
        w: &mut XmlWriter,
        attributes: &[AttributeDecl],
        group_refs: &[String],
    ) -> Result<()> {
        for attribute in attributes {
            let mut el = BytesStart::new(self.xsd_name("attribute")?);
            el.push_attribute(("name", attribute.name.as_str()));
            el.push_attribute(("type", attribute.type_ref.as_str()));
            if attribute.use_ != AttributeUse::Optional {
                el.push_attribute(("use", attribute.use_.to_string().as_str()));
            }
            if let Some(default) = &attribute.default_value {
                el.push_attribute(("default", default.as_str()));
            }
            if let Some(fixed) = &attribute.fixed_value {
                el.push_attribute(("fixed", fixed.as_str()));
            }
            w.write_event(Event::Empty(el))?;
        }
        for reference in group_refs {
            let mut el = BytesStart::new(self.xsd_name("attributeGroup")?);
            el.push_attribute(("ref", reference.as_str()));
            w.write_event(Event::Empty(el))?;
        }
        Ok(())
    }

    fn write_model_group(&self, w: &mut XmlWriter, group: &ModelGroup) -> Result<()> {
        let name = self.xsd_name(&group.compositor.to_string())?;
        let mut el = BytesStart::new(name.clone());
        if group.occurs.min != 1 {
            el.push_attribute(("minOccurs", group.occurs.min.to_string().as_str()));
        }
        if group.occurs.max != Some(1) {
            el.push_attribute(("maxOccurs", group.occurs.max_attribute().as_str()));
        }
        if group.is_empty() {
            w.write_event(Event::Empty(el))?;
            return Ok(());
        }
        w.write_event(Event::Start(el))?;
        for particle in &group.particles {
            match particle {
                Particle::Element(element) => self.write_element(w, element)?,
                Particle::Any(any) => {
                    let mut any_el = BytesStart::new(self.xsd_name("any")?);
                    any_el.push_attribute((
                        "namespace",
                        any.namespace.attribute_value().as_str(),
                    ));
                    any_el.push_attribute((
                        "processContents",
                        any.process_contents.to_string().as_str(),
                    ));
                    if any.occurs.min != 1 {
                        any_el.push_attribute(("minOccurs", any.occurs.min.to_string().as_str()));
                    }
                    if any.occurs.max != Some(1) {
                        any_el.push_attribute(("maxOccurs", any.occurs.max_attribute().as_str()));
                    }
                    w.write_event(Event::Empty(any_el))?;
                }
                Particle::Group(nested) => self.write_model_group(w, nested)?,
            }
        }
        w.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_element(&self, w: &mut XmlWriter, element: &ElementDecl) -> Result<()> {
        let name = self.xsd_name("element")?;
        let mut el = BytesStart::new(name.clone());
        el.push_attribute(("name", element.name.as_str()));
        el.push_attribute(("type", element.type_ref.as_str()));
        if element.occurs.min != 1 {
            el.push_attribute(("minOccurs", element.occurs.min.to_string().as_str()));
        }
        if element.occurs.max != Some(1) {
            el.push_attribute(("maxOccurs", element.occurs.max_attribute().as_str()));
        }
        if element.nillable {
            el.push_attribute(("nillable", "true"));
        }
        if let Some(default) = &element.default_value {
            el.push_attribute(("default", default.as_str()));
        }
        if let Some(fixed) = &element.fixed_value {
            el.push_attribute(("fixed", fixed.as_str()));
        }

        if element.annotation.is_empty() && element.identities.is_empty() {
            w.write_event(Event::Empty(el))?;
            return Ok(());
        }

        w.write_event(Event::Start(el))?;
        self.write_xsd_annotation(w, &element.annotation)?;
        for identity in &element.identities {
            let identity_name = self.xsd_name(identity.kind.element_name())?;
            let mut identity_el = BytesStart::new(identity_name.clone());
            identity_el.push_attribute(("name", identity.name.as_str()));
            if let IdentityKind::KeyRef { refer } = &identity.kind {
                identity_el.push_attribute(("refer", refer.as_str()));
            }
            w.write_event(Event::Start(identity_el))?;
            let mut selector = BytesStart::new(self.xsd_name("selector")?);
            selector.push_attribute(("xpath", identity.selector.as_str()));
            w.write_event(Event::Empty(selector))?;
            for field in &identity.fields {
                let mut field_el = BytesStart::new(self.xsd_name("field")?);
                field_el.push_attribute(("xpath", field.as_str()));
                w.write_event(Event::Empty(field_el))?;
            }
            w.write_event(Event::End(BytesEnd::new(identity_name)))?;
        }
        w.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_element_group(&self, w: &mut XmlWriter, group: &ElementGroup) -> Result<()> {
        let name = self.xsd_name("group")?;
        let mut el = BytesStart::new(name.clone());
        el.push_attribute(("name", group.name.as_str()));
        w.write_event(Event::Start(el))?;
        self.write_xsd_annotation(w, &group.annotation)?;
        self.write_model_group(w, &group.group)?;
        w.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_attribute_group(&self, w: &mut XmlWriter, group: &AttributeGroup) -> Result<()> {
        let name = self.xsd_name("attributeGroup")?;
        let mut el = BytesStart::new(name.clone());
        el.push_attribute(("name", group.name.as_str()));
        w.write_event(Event::Start(el))?;
        self.write_xsd_annotation(w, &group.annotation)?;
        self.write_attributes(w, &group.attributes, &group.attribute_group_refs)?;
        w.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_message(&self, w: &mut XmlWriter, message: &Message) -> Result<()> {
        let name = self.wsdl_name("message")?;
        let mut el = BytesStart::new(name.clone());
        el.push_attribute(("name", message.name.as_str()));
        w.write_event(Event::Start(el))?;
        self.write_wsdl_documentation(w, &message.annotation)?;
        for (part_name, reference) in &message.parts {
            let mut part = BytesStart::new(self.wsdl_name("part")?);
            part.push_attribute(("name", part_name.as_str()));
            match reference {
                PartRef::Type(type_ref) => part.push_attribute(("type", type_ref.as_str())),
                PartRef::Element(element_ref) => {
                    part.push_attribute(("element", element_ref.as_str()))
                }
            }
            w.write_event(Event::Empty(part))?;
        }
        w.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_port_type(&self, w: &mut XmlWriter, port_type: &PortType) -> Result<()> {
        let name = self.wsdl_name(self.doc.wsdl_version.port_type_element())?;
        let mut el = BytesStart::new(name.clone());
        el.push_attribute(("name", port_type.name.as_str()));
        w.write_event(Event::Start(el))?;
        self.write_wsdl_documentation(w, &port_type.annotation)?;
        self.write_attachments(w, &port_type.policies)?;
        for operation in port_type.operations.values() {
            self.write_abstract_operation(w, operation)?;
        }
        w.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_abstract_operation(&self, w: &mut XmlWriter, operation: &Operation) -> Result<()> {
        let name = self.wsdl_name("operation")?;
        let mut el = BytesStart::new(name.clone());
        el.push_attribute(("name", operation.name.as_str()));
        if let Some(order) = &operation.parameter_order {
            el.push_attribute(("parameterOrder", order.as_str()));
        }
        if self.doc.wsdl_version == WsdlVersion::V2_0 {
            if let Some(pattern) = operation.pattern() {
                el.push_attribute(("pattern", pattern.wsdl20_uri()));
            }
        }
        w.write_event(Event::Start(el))?;
        self.write_wsdl_documentation(w, &operation.annotation)?;

        let input = operation
            .input
            .as_ref()
            .map(|message| ("input", message))
            .into_iter();
        let output = operation
            .output
            .as_ref()
            .map(|message| ("output", message))
            .into_iter();
        let directions: Vec<(&str, &String)> = if operation.output_declared_first() {
            output.chain(input).collect()
        } else {
            input.chain(output).collect()
        };
        for (direction, message) in directions {
            let mut direction_el = BytesStart::new(self.wsdl_name(direction)?);
            direction_el.push_attribute(("message", message.as_str()));
            w.write_event(Event::Empty(direction_el))?;
        }
        for fault in &operation.faults {
            let mut fault_el = BytesStart::new(self.wsdl_name("fault")?);
            fault_el.push_attribute(("name", fault.name.as_str()));
            fault_el.push_attribute(("message", fault.message.as_str()));
            w.write_event(Event::Empty(fault_el))?;
        }
        w.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_binding(&self, w: &mut XmlWriter, binding: &Binding) -> Result<()> {
        let doc = self.doc;
        let name = self.wsdl_name("binding")?;
        let mut el = BytesStart::new(name.clone());
        el.push_attribute(("name", binding.name.as_str()));
        let port_type_ref = self.qual(doc.target_namespace(), local_name(&binding.port_type))?;
        let port_type_attr = match doc.wsdl_version {
            WsdlVersion::V1_1 => "type",
            WsdlVersion::V2_0 => "interface",
        };
        el.push_attribute((port_type_attr, port_type_ref.as_str()));
        w.write_event(Event::Start(el))?;
        self.write_wsdl_documentation(w, &binding.annotation)?;
        self.write_attachments(w, &binding.policies)?;
        for extension in &binding.extensions {
            self.write_assertion(w, extension)?;
        }

        match &binding.protocol {
            BindingProtocol::Soap {
                version,
                transport,
                style,
            } => {
                let mut protocol_el =
                    BytesStart::new(self.qual(version.binding_namespace(), "binding")?);
                protocol_el.push_attribute(("transport", transport.as_str()));
                protocol_el.push_attribute(("style", style.to_string().as_str()));
                w.write_event(Event::Empty(protocol_el))?;
            }
            BindingProtocol::Http { verb } => {
                let mut protocol_el =
                    BytesStart::new(self.qual(HTTP_BINDING_NAMESPACE, "binding")?);
                protocol_el.push_attribute(("verb", verb.to_string().as_str()));
                w.write_event(Event::Empty(protocol_el))?;
            }
        }

        let port_type = &doc.port_types[local_name(&binding.port_type)];
        for (operation_name, bound) in &binding.operations {
            self.write_bound_operation(w, binding, port_type, operation_name, bound)?;
        }

        w.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_bound_operation(
        &self,
        w: &mut XmlWriter,
        binding: &Binding,
        port_type: &PortType,
        operation_name: &str,
        bound: &crate::wsdl::BindingOperation,
    ) -> Result<()> {
        let abstract_op = &port_type.operations[operation_name];
        let name = self.wsdl_name("operation")?;
        let mut el = BytesStart::new(name.clone());
        el.push_attribute(("name", operation_name));
        w.write_event(Event::Start(el))?;
        self.write_attachments(w, &bound.policies)?;

        match &bound.detail {
            OperationDetail::Soap(soap) => {
                let soap_ns = match &binding.protocol {
                    BindingProtocol::Soap { version, .. } => version.binding_namespace(),
                    // A SOAP operation detail under an HTTP binding has no
                    // vocabulary of its own; fall back to SOAP 1.1.
                    BindingProtocol::Http { .. } => {
                        crate::namespaces::SOAP_1_1_BINDING_NAMESPACE
                    }
                };
                let mut operation_el = BytesStart::new(self.qual(soap_ns, "operation")?);
                operation_el.push_attribute(("soapAction", soap.action.as_str()));
                if let Some(style) = soap.style {
                    operation_el.push_attribute(("style", style.to_string().as_str()));
                }
                w.write_event(Event::Empty(operation_el))?;

                let body = |w: &mut XmlWriter, this: &Self| -> Result<()> {
                    let mut body_el = BytesStart::new(this.qual(soap_ns, "body")?);
                    body_el.push_attribute(("use", soap.use_.to_string().as_str()));
                    if let Some(namespace) = &soap.body_namespace {
                        body_el.push_attribute(("namespace", namespace.as_str()));
                    }
                    w.write_event(Event::Empty(body_el))?;
                    Ok(())
                };

                if abstract_op.input.is_some() {
                    let input_name = self.wsdl_name("input")?;
                    w.write_event(Event::Start(BytesStart::new(input_name.clone())))?;
                    body(w, self)?;
                    w.write_event(Event::End(BytesEnd::new(input_name)))?;
                }
                if abstract_op.output.is_some() {
                    let output_name = self.wsdl_name("output")?;
                    w.write_event(Event::Start(BytesStart::new(output_name.clone())))?;
                    body(w, self)?;
                    w.write_event(Event::End(BytesEnd::new(output_name)))?;
                }
                for fault in &abstract_op.faults {
                    let fault_name = self.wsdl_name("fault")?;
                    let mut fault_el = BytesStart::new(fault_name.clone());
                    fault_el.push_attribute(("name", fault.name.as_str()));
                    w.write_event(Event::Start(fault_el))?;
                    let mut soap_fault = BytesStart::new(self.qual(soap_ns, "fault")?);
                    soap_fault.push_attribute(("name", fault.name.as_str()));
                    soap_fault.push_attribute(("use", soap.use_.to_string().as_str()));
                    w.write_event(Event::Empty(soap_fault))?;
                    w.write_event(Event::End(BytesEnd::new(fault_name)))?;
                }
            }
            OperationDetail::Http(http) => {
                let mut operation_el =
                    BytesStart::new(self.qual(HTTP_BINDING_NAMESPACE, "operation")?);
                operation_el.push_attribute(("location", http.location.as_str()));
                w.write_event(Event::Empty(operation_el))?;

                if abstract_op.input.is_some() {
                    let input_name = self.wsdl_name("input")?;
                    w.write_event(Event::Start(BytesStart::new(input_name.clone())))?;
                    let serialization = match http.serialization {
                        HttpSerialization::UrlEncoded => "urlEncoded",
                        HttpSerialization::UrlReplacement => "urlReplacement",
                    };
                    w.write_event(Event::Empty(BytesStart::new(
                        self.qual(HTTP_BINDING_NAMESPACE, serialization)?,
                    )))?;
                    w.write_event(Event::End(BytesEnd::new(input_name)))?;
                }
                if abstract_op.output.is_some() {
                    w.write_event(Event::Empty(BytesStart::new(self.wsdl_name("output")?)))?;
                }
            }
        }

        w.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_service(&self, w: &mut XmlWriter, service: &Service) -> Result<()> {
        let doc = self.doc;
        let name = self.wsdl_name("service")?;
        let mut el = BytesStart::new(name.clone());
        el.push_attribute(("name", service.name.as_str()));
        w.write_event(Event::Start(el))?;
        self.write_wsdl_documentation(w, &service.annotation)?;
        self.write_attachments(w, &service.policies)?;

        for port in service.ports.values() {
            let port_name = self.wsdl_name(doc.wsdl_version.port_element())?;
            let mut port_el = BytesStart::new(port_name.clone());
            port_el.push_attribute(("name", port.name.as_str()));
            let binding_ref = self.qual(doc.target_namespace(), local_name(&port.binding))?;
            port_el.push_attribute(("binding", binding_ref.as_str()));
            w.write_event(Event::Start(port_el))?;
            self.write_attachments(w, &port.policies)?;
            for extension in &port.extensions {
                self.write_assertion(w, extension)?;
            }

            let binding = &doc.bindings[local_name(&port.binding)];
            let address_ns = match &binding.protocol {
                BindingProtocol::Soap { version, .. } => version.binding_namespace(),
                BindingProtocol::Http { .. } => HTTP_BINDING_NAMESPACE,
            };
            let mut address = BytesStart::new(self.qual(address_ns, "address")?);
            address.push_attribute(("location", port.address.as_str()));
            w.write_event(Event::Empty(address))?;

            w.write_event(Event::End(BytesEnd::new(port_name)))?;
        }

        w.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Policies, extensions, annotations
    // ---------------------------------------------------------------------

    fn write_attachments(&self, w: &mut XmlWriter, attachments: &PolicyAttachments) -> Result<()> {
        for item in &attachments.items {
            match item {
                PolicyAttachment::Inline(policy) => self.write_policy(w, policy)?,
                PolicyAttachment::Reference(reference) => {
                    self.write_policy_reference(w, reference)?
                }
            }
        }
        Ok(())
    }

    fn write_policy(&self, w: &mut XmlWriter, policy: &Policy) -> Result<()> {
        let name = self.wsp_name("Policy")?;
        let mut el = BytesStart::new(name.clone());
        if let Some(id) = &policy.id {
            let id_attr = format!("{}:Id", self.prefix(WS_SECURITY_UTILITY_NAMESPACE)?);
            el.push_attribute((id_attr.as_str(), id.as_str()));
        }
        if let Some(policy_name) = &policy.name {
            el.push_attribute(("Name", policy_name.as_str()));
        }
        if policy.root.is_empty() {
            w.write_event(Event::Empty(el))?;
            return Ok(());
        }
        w.write_event(Event::Start(el))?;
        self.write_operator_children(w, &policy.root)?;
        w.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_operator_children(&self, w: &mut XmlWriter, operator: &Operator) -> Result<()> {
        for child in &operator.children {
            match child {
                PolicyNode::All(nested) => {
                    let name = self.wsp_name("All")?;
                    w.write_event(Event::Start(BytesStart::new(name.clone())))?;
                    self.write_operator_children(w, nested)?;
                    w.write_event(Event::End(BytesEnd::new(name)))?;
                }
                PolicyNode::ExactlyOne(nested) => {
                    let name = self.wsp_name("ExactlyOne")?;
                    w.write_event(Event::Start(BytesStart::new(name.clone())))?;
                    self.write_operator_children(w, nested)?;
                    w.write_event(Event::End(BytesEnd::new(name)))?;
                }
                PolicyNode::Assertion(assertion) => self.write_assertion(w, assertion)?,
                PolicyNode::Policy(policy) => self.write_policy(w, policy)?,
                PolicyNode::Reference(reference) => self.write_policy_reference(w, reference)?,
            }
        }
        Ok(())
    }

    fn write_policy_reference(
        &self,
        w: &mut XmlWriter,
        reference: &PolicyReference,
    ) -> Result<()> {
        let mut el = BytesStart::new(self.wsp_name("PolicyReference")?);
        el.push_attribute(("URI", reference.uri.as_str()));
        if let Some(digest) = &reference.digest {
            el.push_attribute(("Digest", BASE64.encode(digest).as_str()));
        }
        if let Some(algorithm) = &reference.digest_algorithm {
            el.push_attribute(("DigestAlgorithm", algorithm.as_str()));
        }
        w.write_event(Event::Empty(el))?;
        Ok(())
    }

    fn write_assertion(&self, w: &mut XmlWriter, assertion: &Assertion) -> Result<()> {
        let name = match &assertion.name.namespace {
            Some(ns) => self.qual(ns, &assertion.name.local_name)?,
            None => assertion.name.local_name.clone(),
        };
        let mut el = BytesStart::new(name.clone());
        for (attr_name, attr_value) in &assertion.attributes {
            el.push_attribute((attr_name.as_str(), attr_value.as_str()));
        }
        if assertion.text.is_none() && assertion.children.is_empty() {
            w.write_event(Event::Empty(el))?;
            return Ok(());
        }
        w.write_event(Event::Start(el))?;
        if let Some(text) = &assertion.text {
            w.write_event(Event::Text(BytesText::new(text)))?;
        }
        for child in &assertion.children {
            self.write_assertion(w, child)?;
        }
        w.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_wsdl_documentation(&self, w: &mut XmlWriter, annotation: &Annotation) -> Result<()> {
        for documentation in &annotation.documentation {
            let name = self.wsdl_name("documentation")?;
            let mut el = BytesStart::new(name.clone());
            if let Some(lang) = &documentation.lang {
                el.push_attribute(("xml:lang", lang.as_str()));
            }
            w.write_event(Event::Start(el))?;
            w.write_event(Event::Text(BytesText::new(&documentation.text)))?;
            w.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Ok(())
    }

    fn write_xsd_annotation(&self, w: &mut XmlWriter, annotation: &Annotation) -> Result<()> {
        if annotation.is_empty() {
            return Ok(());
        }
        let name = self.xsd_name("annotation")?;
        w.write_event(Event::Start(BytesStart::new(name.clone())))?;
        for documentation in &annotation.documentation {
            let doc_name = self.xsd_name("documentation")?;
            let mut el = BytesStart::new(doc_name.clone());
            if let Some(lang) = &documentation.lang {
                el.push_attribute(("xml:lang", lang.as_str()));
            }
            if let Some(source) = &documentation.source {
                el.push_attribute(("source", source.as_str()));
            }
            w.write_event(Event::Start(el))?;
            w.write_event(Event::Text(BytesText::new(&documentation.text)))?;
            w.write_event(Event::End(BytesEnd::new(doc_name)))?;
        }
        for app_info in &annotation.app_info {
            let info_name = self.xsd_name("appinfo")?;
            let mut el = BytesStart::new(info_name.clone());
            if let Some(source) = &app_info.source {
                el.push_attribute(("source", source.as_str()));
            }
            w.write_event(Event::Start(el))?;
            w.write_event(Event::Text(BytesText::new(&app_info.content)))?;
            w.write_event(Event::End(BytesEnd::new(info_name)))?;
        }
        w.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }
}
