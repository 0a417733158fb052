//! Builder producing validated [`Resource`]s.
//!
//! Declarations are validated as they are added, so a malformed version or a
//! missing mandatory attribute is reported by the `add_*` call that
//! introduced it.
//!
//! # Example
//!
//! ```
//! use resolver_model::{Attributes, Directives, ResourceBuilder, Version};
//!
//! let mut builder = ResourceBuilder::new();
//! builder
//!     .add_identity_capability("com.acme.app", Some(Version::new(1, 0, 0)))?
//!     .add_package_requirement(
//!         "org.slf4j",
//!         Attributes::new().with("version", "[1.7,2.0)"),
//!         Directives::new().with("resolution", "optional"),
//!     )?;
//! let resource = builder.build()?;
//! assert_eq!(resource.symbolic_name(), "com.acme.app");
//! # Ok::<(), resolver_model::Error>(())
//! ```

use std::sync::Arc;

use crate::attributes::{AttributeValue, Attributes, Directives};
use crate::capability::CapabilityDecl;
use crate::error::{Error, Result};
use crate::namespace::{
    BUNDLE_NAMESPACE, BUNDLE_VERSION_ATTRIBUTE, HOST_NAMESPACE, IDENTITY_NAMESPACE,
    NamespaceRegistry, PACKAGE_NAMESPACE, TYPE_ATTRIBUTE, TYPE_BUNDLE, VERSION_ATTRIBUTE,
};
use crate::requirement::RequirementDecl;
use crate::resource::{Identity, Resource, ResourceId, ResourceInner};
use crate::version::Version;

/// Collects declarations and produces an immutable [`Resource`].
pub struct ResourceBuilder {
    registry: Arc<NamespaceRegistry>,
    capabilities: Vec<CapabilityDecl>,
    requirements: Vec<RequirementDecl>,
}

impl Default for ResourceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceBuilder {
    /// Create a builder using the built-in namespace rules.
    pub fn new() -> Self {
        Self::with_registry(NamespaceRegistry::builtins())
    }

    /// Create a builder validating against a custom namespace registry.
    pub fn with_registry(registry: Arc<NamespaceRegistry>) -> Self {
        Self {
            registry,
            capabilities: Vec::new(),
            requirements: Vec::new(),
        }
    }

    /// Add a capability in any namespace.
    pub fn add_capability(
        &mut self,
        namespace: &str,
        attributes: Attributes,
        directives: Directives,
    ) -> Result<&mut Self> {
        let decl = CapabilityDecl::validate(&self.registry, namespace, attributes, directives)?;
        self.capabilities.push(decl);
        Ok(self)
    }

    /// Add a requirement in any namespace.
    pub fn add_requirement(
        &mut self,
        namespace: &str,
        attributes: Attributes,
        directives: Directives,
    ) -> Result<&mut Self> {
        let decl = RequirementDecl::validate(&self.registry, namespace, attributes, directives)?;
        self.requirements.push(decl);
        Ok(self)
    }

    /// Add the identity capability. A missing version means `0.0.0`.
    pub fn add_identity_capability(
        &mut self,
        symbolic_name: &str,
        version: Option<Version>,
    ) -> Result<&mut Self> {
        let attributes = Attributes::new()
            .with(IDENTITY_NAMESPACE, symbolic_name)
            .with(VERSION_ATTRIBUTE, version.unwrap_or_default())
            .with(TYPE_ATTRIBUTE, TYPE_BUNDLE);
        self.add_capability(IDENTITY_NAMESPACE, attributes, Directives::new())
    }

    /// Add a capability other resources can require as a whole.
    pub fn add_bundle_capability(
        &mut self,
        symbolic_name: &str,
        version: Option<Version>,
    ) -> Result<&mut Self> {
        let attributes = Attributes::new()
            .with(BUNDLE_NAMESPACE, symbolic_name)
            .with(BUNDLE_VERSION_ATTRIBUTE, version.unwrap_or_default());
        self.add_capability(BUNDLE_NAMESPACE, attributes, Directives::new())
    }

    /// Require another resource as a whole.
    pub fn add_bundle_requirement(
        &mut self,
        symbolic_name: &str,
        attributes: Attributes,
        directives: Directives,
    ) -> Result<&mut Self> {
        self.add_requirement(
            BUNDLE_NAMESPACE,
            attributes.with(BUNDLE_NAMESPACE, symbolic_name),
            directives,
        )
    }

    /// Offer this resource as a fragment host.
    pub fn add_host_capability(
        &mut self,
        symbolic_name: &str,
        version: Option<Version>,
    ) -> Result<&mut Self> {
        let attributes = Attributes::new()
            .with(HOST_NAMESPACE, symbolic_name)
            .with(BUNDLE_VERSION_ATTRIBUTE, version.unwrap_or_default());
        self.add_capability(HOST_NAMESPACE, attributes, Directives::new())
    }

    /// Declare the host this fragment attaches to.
    pub fn add_host_requirement(
        &mut self,
        symbolic_name: &str,
        attributes: Attributes,
        directives: Directives,
    ) -> Result<&mut Self> {
        self.add_requirement(
            HOST_NAMESPACE,
            attributes.with(HOST_NAMESPACE, symbolic_name),
            directives,
        )
    }

    /// Export a package.
    pub fn add_package_capability(
        &mut self,
        name: &str,
        attributes: Attributes,
        directives: Directives,
    ) -> Result<&mut Self> {
        self.add_capability(
            PACKAGE_NAMESPACE,
            attributes.with(PACKAGE_NAMESPACE, name),
            directives,
        )
    }

    /// Import a package.
    pub fn add_package_requirement(
        &mut self,
        name: &str,
        attributes: Attributes,
        directives: Directives,
    ) -> Result<&mut Self> {
        self.add_requirement(
            PACKAGE_NAMESPACE,
            attributes.with(PACKAGE_NAMESPACE, name),
            directives,
        )
    }

    /// Produce the resource.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDeclaration` unless exactly one identity
    /// capability was added, or if its name or version has the wrong type.
    pub fn build(self) -> Result<Resource> {
        let identity = self.identity()?;
        let id = ResourceId::next();
        tracing::debug!(
            %id,
            %identity,
            capabilities = self.capabilities.len(),
            requirements = self.requirements.len(),
            "Built resource"
        );

        let inner = Arc::new_cyclic(|weak| {
            let capabilities = self
                .capabilities
                .into_iter()
                .enumerate()
                .map(|(index, decl)| decl.attach(id, index, weak.clone()))
                .collect();
            let requirements = self
                .requirements
                .into_iter()
                .enumerate()
                .map(|(index, decl)| decl.attach(id, index, weak.clone()))
                .collect();
            ResourceInner::new(id, identity, capabilities, requirements)
        });
        Ok(Resource::from_inner(inner))
    }

    fn identity(&self) -> Result<Identity> {
        let mut identities = self
            .capabilities
            .iter()
            .filter(|decl| decl.namespace() == IDENTITY_NAMESPACE);
        let decl = match (identities.next(), identities.next()) {
            (Some(decl), None) => decl,
            (None, _) => {
                return Err(Error::declaration(
                    IDENTITY_NAMESPACE,
                    "resource has no identity capability",
                ));
            }
            (Some(_), Some(_)) => {
                return Err(Error::declaration(
                    IDENTITY_NAMESPACE,
                    "resource has more than one identity capability",
                ));
            }
        };

        let symbolic_name = match decl.attribute(IDENTITY_NAMESPACE) {
            Some(AttributeValue::String(name)) if !name.is_empty() => name.clone(),
            _ => {
                return Err(Error::declaration(
                    IDENTITY_NAMESPACE,
                    "symbolic name must be a non-empty string",
                ));
            }
        };
        let version = match decl.attribute(VERSION_ATTRIBUTE) {
            None => Version::EMPTY,
            Some(AttributeValue::Version(version)) => version.clone(),
            Some(other) => {
                return Err(Error::declaration(
                    IDENTITY_NAMESPACE,
                    format!("identity version must be a version, got '{other}'"),
                ));
            }
        };
        let kind = decl
            .attribute(TYPE_ATTRIBUTE)
            .and_then(AttributeValue::as_str)
            .unwrap_or(TYPE_BUNDLE)
            .to_string();

        Ok(Identity {
            symbolic_name,
            version,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_identity() {
        let mut builder = ResourceBuilder::new();
        builder
            .add_package_capability("foo", Attributes::new(), Directives::new())
            .unwrap();
        let err = builder.build().unwrap_err();
        assert!(matches!(err, Error::InvalidDeclaration { .. }));
    }

    #[test]
    fn test_build_rejects_two_identities() {
        let mut builder = ResourceBuilder::new();
        builder
            .add_identity_capability("a", None)
            .unwrap()
            .add_identity_capability("b", None)
            .unwrap();
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_identity_defaults() {
        let mut builder = ResourceBuilder::new();
        builder.add_identity_capability("system.bundle", None).unwrap();
        let res = builder.build().unwrap();
        assert_eq!(res.version(), &Version::EMPTY);
        assert_eq!(res.identity().kind, TYPE_BUNDLE);
    }

    #[test]
    fn test_identity_from_generic_capability() {
        let mut builder = ResourceBuilder::new();
        builder
            .add_capability(
                IDENTITY_NAMESPACE,
                Attributes::new()
                    .with(IDENTITY_NAMESPACE, "frag")
                    .with(VERSION_ATTRIBUTE, "2.1")
                    .with(TYPE_ATTRIBUTE, "osgi.fragment"),
                Directives::new(),
            )
            .unwrap();
        let res = builder.build().unwrap();
        assert_eq!(res.version(), &Version::new(2, 1, 0));
        assert_eq!(res.identity().kind, "osgi.fragment");
    }

    #[test]
    fn test_identity_name_must_be_string() {
        let mut builder = ResourceBuilder::new();
        builder
            .add_capability(
                IDENTITY_NAMESPACE,
                Attributes::new().with(IDENTITY_NAMESPACE, Version::new(1, 0, 0)),
                Directives::new(),
            )
            .unwrap();
        assert!(builder.build().is_err());
    }
}
