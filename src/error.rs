//! Error types for wsdlgen
//!
//! This module defines all error types used throughout the library.
//! Construction-time rule violations and serialization-time resolution
//! failures are reported through the same crate-wide [`Error`] enum.

use std::fmt;
use thiserror::Error;

/// Result type alias using wsdlgen Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for wsdlgen operations
#[derive(Error, Debug)]
pub enum Error {
    /// A locally checkable structural rule was violated by the offending call
    #[error("constraint violation: {0}")]
    Constraint(#[from] ConstraintViolation),

    /// A symbolic reference could not be resolved at serialization time
    #[error("unresolved reference: '{name}' referenced by {referrer} is neither a built-in nor a registered definition")]
    UnresolvedReference {
        /// The entity holding the dangling reference
        referrer: String,
        /// The name that could not be resolved
        name: String,
    },

    /// A name collision in a symbol table without overwrite semantics
    #[error("duplicate definition: {kind} '{name}' is already defined")]
    DuplicateDefinition {
        /// Kind of symbol table (e.g. "policy")
        kind: &'static str,
        /// The colliding name
        name: String,
    },

    /// Name error (invalid NCName or QName)
    #[error("name error: {0}")]
    Name(String),

    /// Namespace error
    #[error("namespace error: {0}")]
    Namespace(String),

    /// XML writing error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an unresolved-reference error
    pub fn unresolved(referrer: impl Into<String>, name: impl Into<String>) -> Self {
        Error::UnresolvedReference {
            referrer: referrer.into(),
            name: name.into(),
        }
    }

    /// Create a duplicate-definition error
    pub fn duplicate(kind: &'static str, name: impl Into<String>) -> Self {
        Error::DuplicateDefinition {
            kind,
            name: name.into(),
        }
    }
}

/// Violation of a structural rule that is checkable at the moment of the
/// offending call, without traversing the rest of the graph
#[derive(Debug, Clone)]
pub struct ConstraintViolation {
    /// Error message
    pub message: String,
    /// The component on which the rule is defined
    pub component: Option<String>,
    /// The value that violated the rule
    pub value: Option<String>,
}

impl ConstraintViolation {
    /// Create a new constraint violation
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            component: None,
            value: None,
        }
    }

    /// Set the component the rule belongs to
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Set the offending value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref component) = self.component {
            write!(f, " (component: {})", component)?;
        }

        if let Some(ref value) = self.value {
            write!(f, " (value: {})", value)?;
        }

        Ok(())
    }
}

impl std::error::Error for ConstraintViolation {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_violation_display() {
        let err = ConstraintViolation::new("minOccurs out of range for xs:all")
            .with_component("all")
            .with_value("minOccurs=3");

        let msg = format!("{}", err);
        assert!(msg.contains("minOccurs out of range"));
        assert!(msg.contains("component: all"));
        assert!(msg.contains("value: minOccurs=3"));
    }

    #[test]
    fn test_unresolved_reference_display() {
        let err = Error::unresolved("message 'GetUserInput' part 'parameters'", "tns:Missing");
        let msg = format!("{}", err);
        assert!(msg.contains("tns:Missing"));
        assert!(msg.contains("GetUserInput"));
    }

    #[test]
    fn test_duplicate_definition_display() {
        let err = Error::duplicate("policy", "CommonPolicy");
        let msg = format!("{}", err);
        assert!(msg.contains("policy"));
        assert!(msg.contains("CommonPolicy"));
    }

    #[test]
    fn test_error_conversion() {
        let violation = ConstraintViolation::new("test");
        let err: Error = violation.into();
        assert!(matches!(err, Error::Constraint(_)));
    }
}
