//! Requirements: typed queries a resource needs satisfied by capabilities.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use crate::attributes::{
    AttributeValue, Attributes, Cardinality, Directives, Effective, Resolution, Visibility,
};
use crate::capability::{Capability, write_declaration};
use crate::error::Result;
use crate::matcher::Matcher;
use crate::namespace::{NamespaceRegistry, NamespaceRule};
use crate::resource::{Resource, ResourceId, ResourceInner};

/// A validated requirement that has not been attached to a resource yet.
pub(crate) struct RequirementDecl {
    namespace: String,
    attributes: Attributes,
    directives: Directives,
    rule: Arc<NamespaceRule>,
    cardinality: Cardinality,
    resolution: Resolution,
    effective: Effective,
    visibility: Option<Visibility>,
}

impl RequirementDecl {
    pub(crate) fn validate(
        registry: &NamespaceRegistry,
        namespace: &str,
        mut attributes: Attributes,
        directives: Directives,
    ) -> Result<Self> {
        let rule = registry.rule(namespace);
        rule.validate(namespace, &mut attributes, true)?;

        let cardinality = Cardinality::from_directives(&directives)?;
        let resolution = Resolution::from_directives(&directives)?;
        let effective = Effective::from_directives(&directives);
        let visibility = if rule.identity {
            Some(Visibility::from_directives(&directives)?)
        } else {
            None
        };

        Ok(Self {
            namespace: namespace.to_string(),
            attributes,
            directives,
            rule,
            cardinality,
            resolution,
            effective,
            visibility,
        })
    }

    pub(crate) fn attach(
        self,
        owner: ResourceId,
        index: usize,
        resource: Weak<ResourceInner>,
    ) -> Requirement {
        Requirement(Arc::new(RequirementInner {
            decl: self,
            owner,
            index,
            resource,
        }))
    }
}

struct RequirementInner {
    decl: RequirementDecl,
    owner: ResourceId,
    index: usize,
    resource: Weak<ResourceInner>,
}

/// A typed query over capabilities, owned by exactly one resource.
#[derive(Clone)]
pub struct Requirement(Arc<RequirementInner>);

impl Requirement {
    pub fn namespace(&self) -> &str {
        &self.0.decl.namespace
    }

    pub fn attributes(&self) -> &Attributes {
        &self.0.decl.attributes
    }

    pub fn directives(&self) -> &Directives {
        &self.0.decl.directives
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.0.decl.attributes.get(key)
    }

    /// The value keyed by the requirement's own namespace.
    pub fn namespace_value(&self) -> Option<&AttributeValue> {
        self.0.decl.attributes.get(&self.0.decl.namespace)
    }

    /// Attribute names every requirement in this namespace must carry.
    pub fn mandatory_attributes(&self) -> &[String] {
        &self.0.decl.rule.mandatory
    }

    pub fn rule(&self) -> &NamespaceRule {
        &self.0.decl.rule
    }

    pub fn cardinality(&self) -> Cardinality {
        self.0.decl.cardinality
    }

    pub fn resolution(&self) -> Resolution {
        self.0.decl.resolution
    }

    pub fn is_optional(&self) -> bool {
        self.0.decl.resolution == Resolution::Optional
    }

    pub fn effective(&self) -> &Effective {
        &self.0.decl.effective
    }

    /// Visibility of identity-style requirements; `None` elsewhere.
    pub fn visibility(&self) -> Option<Visibility> {
        self.0.decl.visibility
    }

    pub fn owner(&self) -> ResourceId {
        self.0.owner
    }

    pub fn resource(&self) -> Option<Resource> {
        Resource::upgrade(&self.0.resource)
    }

    /// Test `capability` with the default [`Matcher`].
    pub fn matches(&self, capability: &Capability) -> bool {
        Matcher::new().matches(self, capability)
    }
}

impl PartialEq for Requirement {
    fn eq(&self, other: &Self) -> bool {
        self.0.owner == other.0.owner && self.0.index == other.0.index
    }
}

impl Eq for Requirement {}

impl Hash for Requirement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.owner.hash(state);
        self.0.index.hash(state);
    }
}

impl fmt::Debug for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Requirement")
            .field("namespace", &self.0.decl.namespace)
            .field("owner", &self.0.owner)
            .field("attributes", &self.0.decl.attributes)
            .field("directives", &self.0.decl.directives)
            .finish()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_declaration(
            f,
            &self.0.decl.namespace,
            &self.0.decl.attributes,
            &self.0.decl.directives,
        )
    }
}
