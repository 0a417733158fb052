//! Capabilities: typed facts a resource offers in a namespace.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use crate::attributes::{AttributeValue, Attributes, Directives, Effective};
use crate::error::Result;
use crate::namespace::{NamespaceRegistry, NamespaceRule};
use crate::resource::{Resource, ResourceId, ResourceInner};

/// A validated capability that has not been attached to a resource yet.
pub(crate) struct CapabilityDecl {
    namespace: String,
    attributes: Attributes,
    directives: Directives,
    rule: Arc<NamespaceRule>,
}

impl CapabilityDecl {
    pub(crate) fn validate(
        registry: &NamespaceRegistry,
        namespace: &str,
        mut attributes: Attributes,
        directives: Directives,
    ) -> Result<Self> {
        let rule = registry.rule(namespace);
        rule.validate(namespace, &mut attributes, false)?;
        Ok(Self {
            namespace: namespace.to_string(),
            attributes,
            directives,
            rule,
        })
    }

    pub(crate) fn namespace(&self) -> &str {
        &self.namespace
    }

    pub(crate) fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub(crate) fn attach(
        self,
        owner: ResourceId,
        index: usize,
        resource: Weak<ResourceInner>,
    ) -> Capability {
        let effective = Effective::from_directives(&self.directives);
        Capability(Arc::new(CapabilityInner {
            namespace: self.namespace,
            attributes: self.attributes,
            directives: self.directives,
            effective,
            rule: self.rule,
            owner,
            index,
            resource,
        }))
    }
}

struct CapabilityInner {
    namespace: String,
    attributes: Attributes,
    directives: Directives,
    effective: Effective,
    rule: Arc<NamespaceRule>,
    owner: ResourceId,
    index: usize,
    resource: Weak<ResourceInner>,
}

/// A typed fact offered by exactly one resource.
///
/// Capabilities are immutable and cheap to clone. Two handles are equal when
/// they denote the same declaration of the same resource instance.
#[derive(Clone)]
pub struct Capability(Arc<CapabilityInner>);

impl Capability {
    pub fn namespace(&self) -> &str {
        &self.0.namespace
    }

    pub fn attributes(&self) -> &Attributes {
        &self.0.attributes
    }

    pub fn directives(&self) -> &Directives {
        &self.0.directives
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.0.attributes.get(key)
    }

    /// The value keyed by the capability's own namespace, e.g. the package
    /// name of a package capability.
    pub fn namespace_value(&self) -> Option<&AttributeValue> {
        self.0.attributes.get(&self.0.namespace)
    }

    pub fn effective(&self) -> &Effective {
        &self.0.effective
    }

    pub fn rule(&self) -> &NamespaceRule {
        &self.0.rule
    }

    /// Id of the owning resource.
    pub fn owner(&self) -> ResourceId {
        self.0.owner
    }

    /// The owning resource, if it is still alive.
    pub fn resource(&self) -> Option<Resource> {
        Resource::upgrade(&self.0.resource)
    }
}

impl PartialEq for Capability {
    fn eq(&self, other: &Self) -> bool {
        self.0.owner == other.0.owner && self.0.index == other.0.index
    }
}

impl Eq for Capability {}

impl Hash for Capability {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.owner.hash(state);
        self.0.index.hash(state);
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("namespace", &self.0.namespace)
            .field("owner", &self.0.owner)
            .field("attributes", &self.0.attributes)
            .field("directives", &self.0.directives)
            .finish()
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_declaration(f, &self.0.namespace, &self.0.attributes, &self.0.directives)
    }
}

/// `namespace[key=value, ...; directive:=value, ...]`
pub(crate) fn write_declaration(
    f: &mut fmt::Formatter<'_>,
    namespace: &str,
    attributes: &Attributes,
    directives: &Directives,
) -> fmt::Result {
    write!(f, "{namespace}[")?;
    for (i, (key, value)) in attributes.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{key}={value}")?;
    }
    for (i, (name, value)) in directives.iter().enumerate() {
        f.write_str(if i == 0 { "; " } else { ", " })?;
        write!(f, "{name}:={value}")?;
    }
    f.write_str("]")
}
