//! Embedded XML Schema type system
//!
//! The `types` section of a service description: type and group
//! definitions, the particles and compositors they are built from, and the
//! name-keyed registry that makes forward references work.

pub mod particles;
pub mod registry;
pub mod types;

pub use particles::{
    AnyElement, Compositor, ModelGroup, Occurs, Particle, ProcessContents, WildcardNamespace,
};
pub use registry::{Import, Include, Redefine, TypeRegistry};
pub use types::{
    AttributeDecl, AttributeGroup, AttributeUse, ComplexContent, ComplexType, DerivationKind,
    ElementDecl, ElementGroup, Facet, IdentityConstraint, IdentityKind, SimpleDerivation,
    SimpleType, XsdType,
};
