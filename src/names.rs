//! XML name validation and utilities
//!
//! This module provides validation for NCNames and QNames as used for
//! component names and symbolic cross-references. References between
//! components follow the QName convention (`tns:Name`, `xsd:string`);
//! they are recorded as plain strings and resolved at serialization time.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static NCNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}][A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\-\.0-9\u{B7}]*$")
        .unwrap()
});

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    NCNAME.is_match(name)
}

/// Check if a string is a valid QName (`prefix:localName` or `localName`)
pub fn is_valid_qname(name: &str) -> bool {
    if let Some((prefix, local)) = name.split_once(':') {
        is_valid_ncname(prefix) && is_valid_ncname(local)
    } else {
        is_valid_ncname(name)
    }
}

/// Validate an NCName and return an error if invalid
pub fn validate_ncname(name: &str) -> Result<()> {
    if is_valid_ncname(name) {
        Ok(())
    } else {
        Err(Error::Name(format!("Invalid NCName: '{}'", name)))
    }
}

/// Validate a QName and return an error if invalid
pub fn validate_qname(name: &str) -> Result<()> {
    if is_valid_qname(name) {
        Ok(())
    } else {
        Err(Error::Name(format!("Invalid QName: '{}'", name)))
    }
}

/// Split a QName into prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

/// Get the local part of a QName
pub fn local_name(qname: &str) -> &str {
    split_qname(qname).1
}

/// Qualify a local name with the target-namespace prefix
pub fn tns(local: &str) -> String {
    format!("tns:{}", local)
}

/// Check whether a symbolic reference names an XSD built-in type
///
/// Built-ins are recognized by well-known prefix and are never registered;
/// every other reference must resolve against the type registry.
pub fn is_builtin_ref(reference: &str) -> bool {
    matches!(split_qname(reference).0, Some("xsd") | Some("xs"))
}
