//! WSDL messages
//!
//! A message is a named, ordered list of parts. Each part references a
//! schema type or a top-level element symbolically; the reference is
//! resolved at serialization time.

use indexmap::IndexMap;

use crate::annotations::{Annotated, Annotation};

/// What a message part points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartRef {
    /// `type=` reference to a schema type
    Type(String),
    /// `element=` reference to a top-level element
    Element(String),
}

impl PartRef {
    /// The symbolic reference string
    pub fn reference(&self) -> &str {
        match self {
            PartRef::Type(r) | PartRef::Element(r) => r,
        }
    }
}

/// A named message
#[derive(Debug, Clone, Default)]
pub struct Message {
    /// Message name
    pub name: String,
    /// Parts, keyed by part name, in declaration order
    pub parts: IndexMap<String, PartRef>,
    /// Annotation block
    pub annotation: Annotation,
}

impl Message {
    /// Create an empty message
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parts: IndexMap::new(),
            annotation: Annotation::default(),
        }
    }

    /// Add a part with a `type=` reference
    pub fn part(&mut self, name: impl Into<String>, type_ref: impl Into<String>) -> &mut Self {
        self.parts.insert(name.into(), PartRef::Type(type_ref.into()));
        self
    }

    /// Add a part with an `element=` reference
    pub fn element_part(
        &mut self,
        name: impl Into<String>,
        element_ref: impl Into<String>,
    ) -> &mut Self {
        self.parts
            .insert(name.into(), PartRef::Element(element_ref.into()));
        self
    }

    /// Number of parts
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check if the message has no parts
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl Annotated for Message {
    fn annotation_mut(&mut self) -> &mut Annotation {
        &mut self.annotation
    }

    fn annotation(&self) -> &Annotation {
        &self.annotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_keep_declaration_order() {
        let mut message = Message::new("GetUserInput");
        message.part("header", "tns:Header");
        message.part("parameters", "tns:GetUserRequest");

        let names: Vec<&String> = message.parts.keys().collect();
        assert_eq!(names, vec!["header", "parameters"]);
    }

    #[test]
    fn test_part_kinds() {
        let mut message = Message::new("M");
        message.part("a", "xsd:string");
        message.element_part("b", "tns:Envelope");

        assert_eq!(message.parts["a"], PartRef::Type("xsd:string".into()));
        assert_eq!(message.parts["b"], PartRef::Element("tns:Envelope".into()));
        assert_eq!(message.parts["b"].reference(), "tns:Envelope");
    }

    #[test]
    fn test_same_part_name_overwrites() {
        let mut message = Message::new("M");
        message.part("parameters", "tns:A");
        message.part("parameters", "tns:B");
        assert_eq!(message.len(), 1);
        assert_eq!(message.parts["parameters"].reference(), "tns:B");
    }
}
