//! # wsdlgen
//!
//! A Rust library for building WSDL 1.1/2.0 service descriptions with an
//! embedded XML Schema type system and optional WS-* extensions
//! (Addressing, Policy, Eventing, Security, MTOM, HTTP/MIME bindings).
//!
//! The library is one-directional: a document is assembled in memory
//! through [`Definitions`] and its sub-builders, then serialized once into
//! namespace-correct XML. Cross-references between components are symbolic
//! QName strings resolved at serialization time, so types, messages and
//! bindings can be declared in any order.
//!
//! ## Example
//!
//! ```rust
//! use wsdlgen::Definitions;
//!
//! let mut doc = Definitions::new("UserService", "urn:example")?;
//! doc.one_way("GetUser")
//!     .parameter("id", "xsd:string")
//!     .commit()?;
//! doc.service("UserService")
//!     .port("UserPort", "UserServiceBinding", "https://example.com/user")?;
//!
//! let xml = doc.build()?;
//! assert!(xml.contains("<wsdl:definitions"));
//! # Ok::<(), wsdlgen::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;

// Names and namespaces
pub mod names;
pub mod namespaces;
pub mod versions;

// Document model
pub mod annotations;
pub mod extensions;
pub mod policy;
pub mod wsdl;
pub mod xsd;

// Orchestration and output
pub mod definitions;
pub mod serializer;

// Re-exports for convenience
pub use definitions::{Definitions, OperationShorthand};
pub use error::{ConstraintViolation, Error, Result};
pub use policy::{Assertion, Policy, PolicyCarrier, PolicyReference};
pub use versions::{SoapVersion, WsdlVersion};

/// Version of the wsdlgen library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
