//! XSD particles and model-group compositors
//!
//! Occurrence bounds (minOccurs, maxOccurs) and the compositors that
//! combine child elements: `sequence`, `choice`, `all`, plus the `any`
//! wildcard.
//!
//! The `all` compositor enforces its occurrence-bound rule synchronously
//! at element-addition time. Rules that are purely local are checked
//! eagerly; rules that need the whole graph (reference resolution) wait
//! for serialization.

use crate::error::{ConstraintViolation, Result};

use super::types::ElementDecl;

/// Occurrence bounds for a particle (minOccurs, maxOccurs)
///
/// `None` for `max` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurs {
    /// Minimum number of occurrences (default 1)
    pub min: u32,
    /// Maximum number of occurrences (None = unbounded, default 1)
    pub max: Option<u32>,
}

impl Occurs {
    /// Create new occurrence bounds
    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// Default occurrence (1, 1)
    pub fn once() -> Self {
        Self { min: 1, max: Some(1) }
    }

    /// Optional occurrence (0, 1)
    pub fn optional() -> Self {
        Self { min: 0, max: Some(1) }
    }

    /// Zero or more (0, unbounded)
    pub fn zero_or_more() -> Self {
        Self { min: 0, max: None }
    }

    /// One or more (1, unbounded)
    pub fn one_or_more() -> Self {
        Self { min: 1, max: None }
    }

    /// Check if this particle can be absent (minOccurs == 0)
    pub fn is_emptiable(&self) -> bool {
        self.min == 0
    }

    /// Check if maxOccurs == 1
    pub fn is_single(&self) -> bool {
        self.max == Some(1)
    }

    /// Check if these bounds are the (1, 1) default
    pub fn is_default(&self) -> bool {
        *self == Self::once()
    }

    /// The maxOccurs attribute value (`unbounded` when unlimited)
    pub fn max_attribute(&self) -> String {
        match self.max {
            Some(max) => max.to_string(),
            None => "unbounded".to_string(),
        }
    }
}

impl Default for Occurs {
    fn default() -> Self {
        Self::once()
    }
}

/// Model group compositor kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compositor {
    /// Ordered content
    #[default]
    Sequence,
    /// One of multiple alternatives
    Choice,
    /// Unordered content, each child at most once
    All,
}

impl std::fmt::Display for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compositor::Sequence => write!(f, "sequence"),
            Compositor::Choice => write!(f, "choice"),
            Compositor::All => write!(f, "all"),
        }
    }
}

/// Namespace constraint of an `any` wildcard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WildcardNamespace {
    /// Any namespace
    #[default]
    Any,
    /// Any namespace other than the target namespace
    Other,
    /// An explicit namespace list
    List(Vec<String>),
}

impl WildcardNamespace {
    /// The value of the `namespace` attribute
    pub fn attribute_value(&self) -> String {
        match self {
            WildcardNamespace::Any => "##any".to_string(),
            WildcardNamespace::Other => "##other".to_string(),
            WildcardNamespace::List(uris) => uris.join(" "),
        }
    }
}

/// Contents-processing mode of an `any` wildcard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessContents {
    /// Full validation required
    #[default]
    Strict,
    /// Validate if a declaration is available
    Lax,
    /// No validation
    Skip,
}

impl std::fmt::Display for ProcessContents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessContents::Strict => write!(f, "strict"),
            ProcessContents::Lax => write!(f, "lax"),
            ProcessContents::Skip => write!(f, "skip"),
        }
    }
}

/// An `any` element wildcard
#[derive(Debug, Clone, Default)]
pub struct AnyElement {
    /// Namespace constraint
    pub namespace: WildcardNamespace,
    /// Processing mode
    pub process_contents: ProcessContents,
    /// Occurrence bounds
    pub occurs: Occurs,
}

/// A particle inside a model group
#[derive(Debug, Clone)]
pub enum Particle {
    /// Element declaration
    Element(ElementDecl),
    /// `any` wildcard
    Any(AnyElement),
    /// Nested model group
    Group(ModelGroup),
}

/// A model group: a compositor and its child particles, in insertion order
#[derive(Debug, Clone, Default)]
pub struct ModelGroup {
    /// Compositor kind
    pub compositor: Compositor,
    /// Occurrence bounds of the group itself
    pub occurs: Occurs,
    /// Child particles, in insertion order
    pub particles: Vec<Particle>,
}

impl ModelGroup {
    /// Create an empty model group
    pub fn new(compositor: Compositor) -> Self {
        Self {
            compositor,
            occurs: Occurs::once(),
            particles: Vec::new(),
        }
    }

    /// Set the group's occurrence bounds
    pub fn with_occurs(mut self, occurs: Occurs) -> Self {
        self.occurs = occurs;
        self
    }

    /// Add an element declaration to the group
    ///
    /// Inside an `all` compositor children must have minOccurs 0 or 1 and
    /// maxOccurs 1; the check happens here and a rejected call leaves the
    /// group unchanged.
    pub fn push_element(&mut self, element: ElementDecl) -> Result<()> {
        if self.compositor == Compositor::All {
            let occurs = element.occurs;
            if occurs.min > 1 || occurs.max != Some(1) {
                return Err(ConstraintViolation::new(
                    "children of an 'all' group must have minOccurs 0 or 1 and maxOccurs 1",
                )
                .with_component("all")
                .with_value(format!(
                    "element '{}' minOccurs={} maxOccurs={}",
                    element.name,
                    occurs.min,
                    occurs.max_attribute()
                ))
                .into());
            }
        }
        self.particles.push(Particle::Element(element));
        Ok(())
    }

    /// Add an `any` wildcard to the group
    pub fn push_any(&mut self, any: AnyElement) -> Result<()> {
        if self.compositor == Compositor::All {
            return Err(ConstraintViolation::new(
                "an 'all' group may contain only element declarations",
            )
            .with_component("all")
            .with_value("any")
            .into());
        }
        self.particles.push(Particle::Any(any));
        Ok(())
    }

    /// Add a nested model group
    pub fn push_group(&mut self, group: ModelGroup) -> Result<()> {
        if self.compositor == Compositor::All {
            return Err(ConstraintViolation::new(
                "an 'all' group may contain only element declarations",
            )
            .with_component("all")
            .with_value(group.compositor.to_string())
            .into());
        }
        self.particles.push(Particle::Group(group));
        Ok(())
    }

    /// Number of child particles
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Check if the group has no children
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, occurs: Occurs) -> ElementDecl {
        ElementDecl::new(name, "xsd:string").with_occurs(occurs)
    }

    #[test]
    fn test_occurs_constructors() {
        assert_eq!(Occurs::once(), Occurs::new(1, Some(1)));
        assert_eq!(Occurs::optional(), Occurs::new(0, Some(1)));
        assert!(Occurs::zero_or_more().is_emptiable());
        assert_eq!(Occurs::one_or_more().max_attribute(), "unbounded");
        assert!(Occurs::default().is_default());
    }

    #[test]
    fn test_sequence_accepts_any_bounds() {
        let mut group = ModelGroup::new(Compositor::Sequence);
        group
            .push_element(element("items", Occurs::zero_or_more()))
            .unwrap();
        group
            .push_element(element("tail", Occurs::new(2, Some(5))))
            .unwrap();
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn test_all_accepts_valid_bounds() {
        let mut group = ModelGroup::new(Compositor::All);
        group.push_element(element("a", Occurs::once())).unwrap();
        group.push_element(element("b", Occurs::optional())).unwrap();
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn test_all_rejects_out_of_range_bounds() {
        let mut group = ModelGroup::new(Compositor::All);
        group.push_element(element("a", Occurs::once())).unwrap();

        let err = group
            .push_element(element("b", Occurs::zero_or_more()))
            .unwrap_err();
        assert!(err.to_string().contains("all"));
        // The rejected call left the group unchanged.
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn test_all_rejects_wildcards_and_groups() {
        let mut group = ModelGroup::new(Compositor::All);
        assert!(group.push_any(AnyElement::default()).is_err());
        assert!(group
            .push_group(ModelGroup::new(Compositor::Sequence))
            .is_err());
        assert!(group.is_empty());
    }

    #[test]
    fn test_wildcard_namespace_attribute() {
        assert_eq!(WildcardNamespace::Any.attribute_value(), "##any");
        assert_eq!(WildcardNamespace::Other.attribute_value(), "##other");
        assert_eq!(
            WildcardNamespace::List(vec!["urn:a".into(), "urn:b".into()]).attribute_value(),
            "urn:a urn:b"
        );
    }
}
