//! WS-Policy assertion trees
//!
//! A policy is a recursive tree of `All` (conjunction) and `ExactlyOne`
//! (disjunction) operators over leaf assertions and external references.
//! Child order is insertion order at every level and is reproduced exactly
//! in the serialized XML.
//!
//! Nested scopes are built through closures: the closure body works on the
//! child operator, and returning from it is the "return to parent"
//! navigation. A node is only reachable from the call that created it, so
//! the tree is cycle-free by construction.

use crate::namespaces::QName;

/// A leaf policy assertion
#[derive(Debug, Clone)]
pub struct Assertion {
    /// Qualified assertion name
    pub name: QName,
    /// Attributes, in declaration order
    pub attributes: Vec<(String, String)>,
    /// Optional text content
    pub text: Option<String>,
    /// Nested assertions (e.g. token assertions inside a binding assertion)
    pub children: Vec<Assertion>,
}

impl Assertion {
    /// Create an assertion
    pub fn new(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            name: QName::namespaced(namespace, local_name),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Add a nested assertion
    pub fn with_child(mut self, child: Assertion) -> Self {
        self.children.push(child);
        self
    }
}

/// An external policy reference
#[derive(Debug, Clone)]
pub struct PolicyReference {
    /// URI of the referenced policy
    pub uri: String,
    /// Optional digest of the referenced policy document
    pub digest: Option<Vec<u8>>,
    /// Optional digest algorithm URI
    pub digest_algorithm: Option<String>,
}

impl PolicyReference {
    /// Create a policy reference
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            digest: None,
            digest_algorithm: None,
        }
    }

    /// Set the digest bytes (base64-encoded on serialization)
    pub fn with_digest(mut self, digest: Vec<u8>) -> Self {
        self.digest = Some(digest);
        self
    }

    /// Set the digest algorithm URI
    pub fn with_digest_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.digest_algorithm = Some(algorithm.into());
        self
    }
}

/// A node in a policy tree
#[derive(Debug, Clone)]
pub enum PolicyNode {
    /// Conjunction of children
    All(Operator),
    /// Disjunction of children
    ExactlyOne(Operator),
    /// Leaf assertion
    Assertion(Assertion),
    /// Nested policy
    Policy(Policy),
    /// External reference
    Reference(PolicyReference),
}

/// An `All` or `ExactlyOne` operator: an ordered list of child nodes
#[derive(Debug, Clone, Default)]
pub struct Operator {
    /// Children, in insertion order
    pub children: Vec<PolicyNode>,
}

impl Operator {
    /// Open a nested `All` operator; the closure builds its children
    pub fn all(&mut self, build: impl FnOnce(&mut Operator)) -> &mut Self {
        let mut operator = Operator::default();
        build(&mut operator);
        self.children.push(PolicyNode::All(operator));
        self
    }

    /// Open a nested `ExactlyOne` operator; the closure builds its children
    pub fn exactly_one(&mut self, build: impl FnOnce(&mut Operator)) -> &mut Self {
        let mut operator = Operator::default();
        build(&mut operator);
        self.children.push(PolicyNode::ExactlyOne(operator));
        self
    }

    /// Append a leaf assertion
    pub fn assertion(&mut self, assertion: Assertion) -> &mut Self {
        self.children.push(PolicyNode::Assertion(assertion));
        self
    }

    /// Append a nested policy
    pub fn policy(&mut self, build: impl FnOnce(&mut Policy)) -> &mut Self {
        let mut policy = Policy::new();
        build(&mut policy);
        self.children.push(PolicyNode::Policy(policy));
        self
    }

    /// Append an external reference
    pub fn reference(&mut self, reference: PolicyReference) -> &mut Self {
        self.children.push(PolicyNode::Reference(reference));
        self
    }

    /// Number of direct children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check if the operator has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// A policy: an optionally identified root operator
///
/// A policy belongs to exactly one owner, the carrier or operator it was
/// created on; there is no API to re-attach an existing subtree elsewhere.
#[derive(Debug, Clone, Default)]
pub struct Policy {
    /// wsu:Id, referenceable as a fragment URI
    pub id: Option<String>,
    /// Optional policy name URI
    pub name: Option<String>,
    /// Root children, in insertion order
    pub root: Operator,
}

impl Policy {
    /// Create an empty policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wsu:Id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the policy name URI
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Open an `All` operator at the root
    pub fn all(&mut self, build: impl FnOnce(&mut Operator)) -> &mut Self {
        self.root.all(build);
        self
    }

    /// Open an `ExactlyOne` operator at the root
    pub fn exactly_one(&mut self, build: impl FnOnce(&mut Operator)) -> &mut Self {
        self.root.exactly_one(build);
        self
    }

    /// Append a leaf assertion at the root
    pub fn assertion(&mut self, assertion: Assertion) -> &mut Self {
        self.root.assertion(assertion);
        self
    }

    /// Append an external reference at the root
    pub fn reference(&mut self, reference: PolicyReference) -> &mut Self {
        self.root.reference(reference);
        self
    }
}

/// One attached item: an inline policy or an external reference
#[derive(Debug, Clone)]
pub enum PolicyAttachment {
    /// Inline policy
    Inline(Policy),
    /// External reference
    Reference(PolicyReference),
}

/// Ordered list of policy attachments on a carrier
#[derive(Debug, Clone, Default)]
pub struct PolicyAttachments {
    /// Attachments, in attachment order
    pub items: Vec<PolicyAttachment>,
}

impl PolicyAttachments {
    /// Check if nothing is attached
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Capability trait for entities that can carry policies
///
/// Implemented only by the entity kinds that opt in; everything else does
/// not expose the attachment surface.
pub trait PolicyCarrier {
    /// Mutable access to the attachment list
    fn attachments_mut(&mut self) -> &mut PolicyAttachments;

    /// Read access to the attachment list
    fn attachments(&self) -> &PolicyAttachments;

    /// Create a policy, append it, and return it for population
    fn policy(&mut self) -> &mut Policy {
        let attachments = self.attachments_mut();
        attachments.items.push(PolicyAttachment::Inline(Policy::new()));
        match attachments.items.last_mut() {
            Some(PolicyAttachment::Inline(policy)) => policy,
            _ => unreachable!("just pushed an inline policy"),
        }
    }

    /// Append an external policy reference
    fn policy_reference(&mut self, uri: impl Into<String>) -> &mut Self
    where
        Self: Sized,
    {
        self.attachments_mut()
            .items
            .push(PolicyAttachment::Reference(PolicyReference::new(uri)));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::WS_SECURITY_POLICY_NAMESPACE;

    fn assertion(local: &str) -> Assertion {
        Assertion::new(WS_SECURITY_POLICY_NAMESPACE, local)
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut policy = Policy::new();
        policy.all(|all| {
            all.assertion(assertion("A"));
            all.exactly_one(|xo| {
                xo.assertion(assertion("B"));
                xo.assertion(assertion("C"));
            });
        });

        let PolicyNode::All(all) = &policy.root.children[0] else {
            panic!("expected All at root");
        };
        assert_eq!(all.len(), 2);
        assert!(matches!(&all.children[0], PolicyNode::Assertion(a) if a.name.local_name == "A"));
        let PolicyNode::ExactlyOne(xo) = &all.children[1] else {
            panic!("expected ExactlyOne after A");
        };
        assert!(matches!(&xo.children[0], PolicyNode::Assertion(a) if a.name.local_name == "B"));
        assert!(matches!(&xo.children[1], PolicyNode::Assertion(a) if a.name.local_name == "C"));
    }

    #[test]
    fn test_unbounded_nesting() {
        let mut policy = Policy::new();
        policy.all(|l1| {
            l1.all(|l2| {
                l2.exactly_one(|l3| {
                    l3.assertion(assertion("Deep"));
                });
            });
        });

        let PolicyNode::All(l1) = &policy.root.children[0] else {
            panic!()
        };
        let PolicyNode::All(l2) = &l1.children[0] else {
            panic!()
        };
        let PolicyNode::ExactlyOne(l3) = &l2.children[0] else {
            panic!()
        };
        assert_eq!(l3.len(), 1);
    }

    #[test]
    fn test_carrier_capability() {
        struct Carrier {
            attachments: PolicyAttachments,
        }
        impl PolicyCarrier for Carrier {
            fn attachments_mut(&mut self) -> &mut PolicyAttachments {
                &mut self.attachments
            }
            fn attachments(&self) -> &PolicyAttachments {
                &self.attachments
            }
        }

        let mut carrier = Carrier {
            attachments: PolicyAttachments::default(),
        };
        carrier.policy().assertion(assertion("UsernameToken"));
        carrier.policy_reference("#CommonPolicy");

        assert_eq!(carrier.attachments().items.len(), 2);
        assert!(matches!(
            &carrier.attachments().items[1],
            PolicyAttachment::Reference(r) if r.uri == "#CommonPolicy"
        ));
    }

    #[test]
    fn test_assertion_builder() {
        let token = assertion("IssuedToken")
            .with_attribute("sp:IncludeToken", "AlwaysToRecipient")
            .with_child(assertion("RequestSecurityTokenTemplate"));
        assert_eq!(token.attributes.len(), 1);
        assert_eq!(token.children.len(), 1);
    }
}
