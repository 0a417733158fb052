//! Attribute and directive maps attached to capabilities and requirements.
//!
//! Attribute values form a small closed set so matching can compare them
//! exhaustively. Directives are plain strings with a handful of well-known
//! names that control resolution; those are exposed through typed accessors.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::version::{Version, VersionRange};

/// Directive naming how many wires may satisfy a requirement.
pub const CARDINALITY_DIRECTIVE: &str = "cardinality";
/// Directive marking a requirement mandatory or optional.
pub const RESOLUTION_DIRECTIVE: &str = "resolution";
/// Directive controlling when a capability or requirement is effective.
pub const EFFECTIVE_DIRECTIVE: &str = "effective";
/// Directive controlling re-export of identity-style requirements.
pub const VISIBILITY_DIRECTIVE: &str = "visibility";
/// Capability directive listing attributes a requirement must specify.
pub const MANDATORY_DIRECTIVE: &str = "mandatory";

/// Directive names recognised by descriptors; others are kept but reported.
pub const KNOWN_DIRECTIVES: &[&str] = &[
    CARDINALITY_DIRECTIVE,
    RESOLUTION_DIRECTIVE,
    EFFECTIVE_DIRECTIVE,
    VISIBILITY_DIRECTIVE,
    MANDATORY_DIRECTIVE,
    "uses",
    "filter",
];

/// The only `effective` value that takes part in wiring.
pub const EFFECTIVE_RESOLVE: &str = "resolve";

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    String(String),
    Version(Version),
    VersionRange(VersionRange),
    /// Any other value, carried verbatim.
    Opaque(serde_json::Value),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_version(&self) -> Option<&Version> {
        match self {
            Self::Version(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_version_range(&self) -> Option<&VersionRange> {
        match self {
            Self::VersionRange(r) => Some(r),
            _ => None,
        }
    }

    /// Compare a requirement-side value (`self`) with a capability-side value.
    ///
    /// Equal variants compare by value; a range on the requirement side
    /// accepts any capability version it contains. Every other pairing is a
    /// mismatch.
    pub fn accepts(&self, capability_value: &AttributeValue) -> bool {
        match (self, capability_value) {
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Version(a), Self::Version(b)) => a == b,
            (Self::VersionRange(range), Self::Version(v)) => range.is_in_range(v),
            (Self::VersionRange(a), Self::VersionRange(b)) => a == b,
            (Self::Opaque(a), Self::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Version(v) => write!(f, "{v}"),
            Self::VersionRange(r) => write!(f, "{r}"),
            Self::Opaque(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Version> for AttributeValue {
    fn from(value: Version) -> Self {
        Self::Version(value)
    }
}

impl From<VersionRange> for AttributeValue {
    fn from(value: VersionRange) -> Self {
        Self::VersionRange(value)
    }
}

/// Immutable attribute map, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, AttributeValue>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replace string values of the named attributes with parsed versions
    /// (`as_range == false`) or version ranges (`as_range == true`).
    pub(crate) fn parse_versions(&mut self, keys: &[String], as_range: bool) -> Result<()> {
        for key in keys {
            let Some(AttributeValue::String(raw)) = self.0.get(key) else {
                continue;
            };
            let parsed = if as_range {
                AttributeValue::VersionRange(VersionRange::parse(raw)?)
            } else {
                AttributeValue::Version(Version::parse(raw)?)
            };
            self.0.insert(key.clone(), parsed);
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Immutable directive map, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Directives(BTreeMap<String, String>);

impl Directives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Attribute names listed in the capability `mandatory` directive.
    pub fn mandatory_attributes(&self) -> Vec<&str> {
        self.get(MANDATORY_DIRECTIVE)
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Directives {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// How many wires may satisfy a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cardinality {
    #[default]
    Single,
    Multiple,
}

/// Whether an unsatisfied requirement fails resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Resolution {
    #[default]
    Mandatory,
    Optional,
}

/// Whether an identity-style requirement re-exports what it wires to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Private,
    Reexport,
}

/// When a capability or requirement is effective.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Effective {
    #[default]
    Resolve,
    /// Any other value; excluded from resolution and from the wiring view.
    Other(String),
}

fn parse_directive<T>(
    directives: &Directives,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>> {
    match directives.get(name) {
        None => Ok(None),
        Some(value) => parse(value).map(Some).ok_or_else(|| Error::InvalidDirective {
            directive: name.to_string(),
            value: value.to_string(),
        }),
    }
}

impl Cardinality {
    pub(crate) fn from_directives(directives: &Directives) -> Result<Self> {
        let parsed = parse_directive(directives, CARDINALITY_DIRECTIVE, |v| match v {
            "single" => Some(Self::Single),
            "multiple" => Some(Self::Multiple),
            _ => None,
        })?;
        Ok(parsed.unwrap_or_default())
    }
}

impl Resolution {
    pub(crate) fn from_directives(directives: &Directives) -> Result<Self> {
        let parsed = parse_directive(directives, RESOLUTION_DIRECTIVE, |v| match v {
            "mandatory" => Some(Self::Mandatory),
            "optional" => Some(Self::Optional),
            _ => None,
        })?;
        Ok(parsed.unwrap_or_default())
    }
}

impl Visibility {
    pub(crate) fn from_directives(directives: &Directives) -> Result<Self> {
        let parsed = parse_directive(directives, VISIBILITY_DIRECTIVE, |v| match v {
            "private" => Some(Self::Private),
            "reexport" => Some(Self::Reexport),
            _ => None,
        })?;
        Ok(parsed.unwrap_or_default())
    }
}

impl Effective {
    pub(crate) fn from_directives(directives: &Directives) -> Self {
        match directives.get(EFFECTIVE_DIRECTIVE) {
            None | Some(EFFECTIVE_RESOLVE) => Self::Resolve,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    pub fn is_resolve(&self) -> bool {
        matches!(self, Self::Resolve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_strings() {
        let req = AttributeValue::from("foo");
        assert!(req.accepts(&AttributeValue::from("foo")));
        assert!(!req.accepts(&AttributeValue::from("Foo")));
    }

    #[test]
    fn test_accepts_range_contains_version() {
        let req = AttributeValue::from(VersionRange::parse("[1.0,2.0)").unwrap());
        assert!(req.accepts(&AttributeValue::from(Version::new(1, 5, 0))));
        assert!(!req.accepts(&AttributeValue::from(Version::new(2, 0, 0))));
    }

    #[test]
    fn test_accepts_mixed_types_mismatch() {
        let req = AttributeValue::from("1.0.0");
        assert!(!req.accepts(&AttributeValue::from(Version::new(1, 0, 0))));

        // A version on the requirement side is not a range
        let req = AttributeValue::from(Version::new(1, 0, 0));
        assert!(!req.accepts(&AttributeValue::from(
            VersionRange::parse("1.0").unwrap()
        )));
    }

    #[test]
    fn test_accepts_opaque() {
        let req = AttributeValue::Opaque(serde_json::json!([1, 2]));
        assert!(req.accepts(&AttributeValue::Opaque(serde_json::json!([1, 2]))));
        assert!(!req.accepts(&AttributeValue::Opaque(serde_json::json!(3))));
    }

    #[test]
    fn test_parse_versions_only_touches_strings() {
        let mut attrs = Attributes::new()
            .with("version", "1.2")
            .with("other", "1.2")
            .with("bundle-version", Version::new(3, 0, 0));
        attrs
            .parse_versions(&["version".into(), "bundle-version".into()], false)
            .unwrap();
        assert_eq!(
            attrs.get("version"),
            Some(&AttributeValue::Version(Version::new(1, 2, 0)))
        );
        assert_eq!(attrs.get("other"), Some(&AttributeValue::from("1.2")));
        assert_eq!(
            attrs.get("bundle-version"),
            Some(&AttributeValue::Version(Version::new(3, 0, 0)))
        );
    }

    #[test]
    fn test_parse_versions_fails_fast() {
        let mut attrs = Attributes::new().with("version", "one.two");
        assert!(attrs.parse_versions(&["version".into()], true).is_err());
    }

    #[test]
    fn test_effective_directive() {
        assert!(Effective::from_directives(&Directives::new()).is_resolve());
        assert!(
            Effective::from_directives(&Directives::new().with("effective", "resolve"))
                .is_resolve()
        );
        assert_eq!(
            Effective::from_directives(&Directives::new().with("effective", "active")),
            Effective::Other("active".into())
        );
    }

    #[test]
    fn test_invalid_resolution_directive() {
        let dirs = Directives::new().with("resolution", "sometimes");
        let err = Resolution::from_directives(&dirs).unwrap_err();
        assert!(matches!(err, Error::InvalidDirective { .. }));
    }

    #[test]
    fn test_mandatory_attributes_list() {
        let dirs = Directives::new().with("mandatory", "vendor, region,");
        assert_eq!(dirs.mandatory_attributes(), vec!["vendor", "region"]);
    }
}
