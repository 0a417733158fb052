//! Declarative resource descriptors.
//!
//! A descriptor is the key/value form of a resource, fed through
//! [`ResourceBuilder`] so it is validated exactly like code-built resources.
//!
//! # Example TOML
//!
//! ```toml
//! [identity]
//! name = "com.acme.app"
//! version = "1.0.0"
//!
//! [[capability]]
//! namespace = "osgi.wiring.package"
//! attributes = { "osgi.wiring.package" = "com.acme.api", version = "1.2" }
//!
//! [[requirement]]
//! namespace = "osgi.wiring.package"
//! attributes = { "osgi.wiring.package" = "org.slf4j", version = "[1.7,2.0)" }
//! directives = { resolution = "optional" }
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::attributes::{Attributes, Directives, KNOWN_DIRECTIVES};
use crate::builder::ResourceBuilder;
use crate::error::{Error, Result};
use crate::namespace::{IDENTITY_NAMESPACE, NamespaceRegistry, TYPE_ATTRIBUTE, VERSION_ATTRIBUTE};
use crate::resource::Resource;

/// A resource in declarative form.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResourceDescriptor {
    pub identity: IdentityDescriptor,
    #[serde(default, rename = "capability")]
    pub capabilities: Vec<DeclarationDescriptor>,
    #[serde(default, rename = "requirement")]
    pub requirements: Vec<DeclarationDescriptor>,
}

/// The `[identity]` table.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityDescriptor {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// One `[[capability]]` or `[[requirement]]` entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationDescriptor {
    pub namespace: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub directives: Directives,
}

impl DeclarationDescriptor {
    fn warn_unknown_directives(&self) {
        for (name, _) in self.directives.iter() {
            if !KNOWN_DIRECTIVES.contains(&name) {
                tracing::warn!(
                    namespace = %self.namespace,
                    directive = name,
                    "Unknown directive in resource descriptor"
                );
            }
        }
    }
}

impl ResourceDescriptor {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a descriptor file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Build the resource using the built-in namespace rules.
    pub fn build(&self) -> Result<Resource> {
        self.build_with(NamespaceRegistry::builtins())
    }

    /// Build the resource against a custom namespace registry.
    pub fn build_with(&self, registry: Arc<NamespaceRegistry>) -> Result<Resource> {
        let mut builder = ResourceBuilder::with_registry(registry);

        let mut identity = Attributes::new().with(IDENTITY_NAMESPACE, self.identity.name.as_str());
        if let Some(version) = &self.identity.version {
            identity.insert(VERSION_ATTRIBUTE, version.as_str());
        }
        if let Some(kind) = &self.identity.kind {
            identity.insert(TYPE_ATTRIBUTE, kind.as_str());
        }
        builder.add_capability(IDENTITY_NAMESPACE, identity, Directives::new())?;

        for cap in &self.capabilities {
            cap.warn_unknown_directives();
            builder.add_capability(
                &cap.namespace,
                cap.attributes.clone(),
                cap.directives.clone(),
            )?;
        }
        for req in &self.requirements {
            req.warn_unknown_directives();
            builder.add_requirement(
                &req.namespace,
                req.attributes.clone(),
                req.directives.clone(),
            )?;
        }

        builder.build()
    }
}
