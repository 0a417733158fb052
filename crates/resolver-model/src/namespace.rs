//! Namespace rules and the registry that maps namespaces to them.
//!
//! Every capability and requirement belongs to a namespace. The engine is
//! namespace-agnostic except for what a [`NamespaceRule`] says: which
//! attributes a declaration must carry, which attributes hold versions, and
//! whether the namespace uses identity-style matching.
//!
//! Extra namespaces can be declared in TOML:
//!
//! ```toml
//! [namespaces."com.acme.service"]
//! mandatory = ["com.acme.service"]
//! identity = false
//! version-attributes = ["version"]
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};

use crate::attributes::Attributes;
use crate::error::{Error, Result};

/// Resource identity: one capability per resource naming it.
pub const IDENTITY_NAMESPACE: &str = "osgi.identity";
/// Require-bundle style dependencies on another resource as a whole.
pub const BUNDLE_NAMESPACE: &str = "osgi.wiring.bundle";
/// Fragment to host attachment.
pub const HOST_NAMESPACE: &str = "osgi.wiring.host";
/// Package export/import.
pub const PACKAGE_NAMESPACE: &str = "osgi.wiring.package";

/// Version attribute of identity and package declarations.
pub const VERSION_ATTRIBUTE: &str = "version";
/// Version attribute of bundle and host declarations.
pub const BUNDLE_VERSION_ATTRIBUTE: &str = "bundle-version";
/// Symbolic name of the exporting resource on a package capability.
pub const BUNDLE_SYMBOLIC_NAME_ATTRIBUTE: &str = "bundle-symbolic-name";
/// Type attribute of identity capabilities.
pub const TYPE_ATTRIBUTE: &str = "type";
/// Default value of [`TYPE_ATTRIBUTE`].
pub const TYPE_BUNDLE: &str = "osgi.bundle";

/// Validation and matching rule for one namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NamespaceRule {
    /// Attributes every declaration in the namespace must carry.
    #[serde(default)]
    pub mandatory: Vec<String>,
    /// Identity-style matching: a resource never satisfies its own
    /// requirement, and version ranges are checked against the candidate's
    /// version with `0.0.0` as the default.
    #[serde(default)]
    pub identity: bool,
    /// Attributes parsed as versions on capabilities and as version ranges
    /// on requirements.
    #[serde(default = "default_version_attributes")]
    pub version_attributes: Vec<String>,
}

fn default_version_attributes() -> Vec<String> {
    vec![VERSION_ATTRIBUTE.to_string()]
}

impl Default for NamespaceRule {
    fn default() -> Self {
        Self {
            mandatory: Vec::new(),
            identity: false,
            version_attributes: default_version_attributes(),
        }
    }
}

impl NamespaceRule {
    fn builtin(namespace: &str, identity: bool, version_attributes: &[&str]) -> Self {
        Self {
            mandatory: vec![namespace.to_string()],
            identity,
            version_attributes: version_attributes.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// True when `attribute` holds a version in this namespace.
    pub fn is_version_attribute(&self, attribute: &str) -> bool {
        self.version_attributes.iter().any(|a| a == attribute)
    }

    /// Validate a declaration's attributes in place.
    ///
    /// Version attributes given as strings are parsed eagerly: as versions on
    /// capabilities, as ranges on requirements (`as_range`).
    pub(crate) fn validate(
        &self,
        namespace: &str,
        attributes: &mut Attributes,
        as_range: bool,
    ) -> Result<()> {
        if namespace.is_empty() {
            return Err(Error::declaration(namespace, "namespace must not be empty"));
        }
        if let Some(missing) = self
            .mandatory
            .iter()
            .find(|name| !attributes.contains_key(name))
        {
            return Err(Error::declaration(
                namespace,
                format!("missing mandatory attribute '{missing}'"),
            ));
        }
        attributes.parse_versions(&self.version_attributes, as_range)
    }
}

/// TOML layout of namespace configuration files.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NamespaceConfig {
    #[serde(default)]
    pub namespaces: BTreeMap<String, NamespaceRule>,
}

static BUILTINS: LazyLock<Arc<NamespaceRegistry>> =
    LazyLock::new(|| Arc::new(NamespaceRegistry::with_builtins()));

/// Registry mapping namespace names to their rules.
///
/// Unknown namespaces resolve to a permissive default rule.
///
/// # Example
///
/// ```
/// use resolver_model::namespace::{NamespaceRegistry, IDENTITY_NAMESPACE};
///
/// let registry = NamespaceRegistry::with_builtins();
/// assert!(registry.rule(IDENTITY_NAMESPACE).identity);
/// assert!(!registry.rule("com.acme.service").identity);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NamespaceRegistry {
    rules: HashMap<String, Arc<NamespaceRule>>,
    fallback: Arc<NamespaceRule>,
}

impl NamespaceRegistry {
    /// Create a registry that knows no namespaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the well-known namespaces registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(
            IDENTITY_NAMESPACE,
            NamespaceRule::builtin(IDENTITY_NAMESPACE, true, &[VERSION_ATTRIBUTE]),
        );
        registry.register(
            BUNDLE_NAMESPACE,
            NamespaceRule::builtin(BUNDLE_NAMESPACE, true, &[BUNDLE_VERSION_ATTRIBUTE]),
        );
        registry.register(
            HOST_NAMESPACE,
            NamespaceRule::builtin(HOST_NAMESPACE, true, &[BUNDLE_VERSION_ATTRIBUTE]),
        );
        registry.register(
            PACKAGE_NAMESPACE,
            NamespaceRule::builtin(
                PACKAGE_NAMESPACE,
                false,
                &[VERSION_ATTRIBUTE, BUNDLE_VERSION_ATTRIBUTE],
            ),
        );
        registry
    }

    /// Shared instance of [`NamespaceRegistry::with_builtins`].
    pub fn builtins() -> Arc<Self> {
        Arc::clone(&BUILTINS)
    }

    /// Builtins overlaid with the namespaces declared in `content`.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: NamespaceConfig = toml::from_str(content)?;
        let mut registry = Self::with_builtins();
        for (namespace, rule) in config.namespaces {
            tracing::debug!(%namespace, ?rule, "Configured namespace rule");
            registry.register(namespace, rule);
        }
        Ok(registry)
    }

    /// Load a namespace configuration file.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigNotFound` if `path` does not exist, or a parse
    /// error if the file is not valid configuration.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Register or replace the rule for a namespace.
    pub fn register(&mut self, namespace: impl Into<String>, rule: NamespaceRule) {
        self.rules.insert(namespace.into(), Arc::new(rule));
    }

    /// The rule for `namespace`, or the default rule if none is registered.
    pub fn rule(&self, namespace: &str) -> Arc<NamespaceRule> {
        self.rules
            .get(namespace)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.rules.contains_key(namespace)
    }

    /// Registered namespace names, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rules.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_is_empty() {
        let registry = NamespaceRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.rule("anything").as_ref(), &NamespaceRule::default());
    }

    #[test]
    fn test_builtins() {
        let registry = NamespaceRegistry::with_builtins();
        assert_eq!(
            registry.namespaces(),
            vec![
                IDENTITY_NAMESPACE,
                BUNDLE_NAMESPACE,
                HOST_NAMESPACE,
                PACKAGE_NAMESPACE
            ]
        );

        let identity = registry.rule(IDENTITY_NAMESPACE);
        assert!(identity.identity);
        assert_eq!(identity.mandatory, vec![IDENTITY_NAMESPACE]);

        let package = registry.rule(PACKAGE_NAMESPACE);
        assert!(!package.identity);
        assert!(package.is_version_attribute(BUNDLE_VERSION_ATTRIBUTE));
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = NamespaceRegistry::with_builtins();
        registry.register(PACKAGE_NAMESPACE, NamespaceRule::default());
        assert!(registry.rule(PACKAGE_NAMESPACE).mandatory.is_empty());
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_validate_missing_mandatory() {
        let rule = NamespaceRegistry::with_builtins().rule(PACKAGE_NAMESPACE);
        let mut attrs = Attributes::new().with(VERSION_ATTRIBUTE, "1.0");
        let err = rule.validate(PACKAGE_NAMESPACE, &mut attrs, false).unwrap_err();
        assert!(matches!(err, Error::InvalidDeclaration { .. }));
        assert!(err.to_string().contains(PACKAGE_NAMESPACE));
    }

    #[test]
    fn test_validate_empty_namespace() {
        let rule = NamespaceRule::default();
        assert!(rule.validate("", &mut Attributes::new(), false).is_err());
    }

    #[test]
    fn test_shared_builtins_is_same_instance() {
        assert!(Arc::ptr_eq(
            &NamespaceRegistry::builtins(),
            &NamespaceRegistry::builtins()
        ));
    }
}
