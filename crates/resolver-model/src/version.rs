//! Version and version-range parsing.
//!
//! Versions use the dotted `major[.minor[.micro[.qualifier]]]` form. Missing
//! numeric components default to `0`, so `"1"`, `"1.0"` and `"1.0.0"` are the
//! same version. A qualifier sorts after the bare numeric version.
//!
//! Ranges use interval notation:
//!
//! - `[1.0,2.0)` includes `1.0`, excludes `2.0`
//! - `(1.0,2.0]` excludes `1.0`, includes `2.0`
//! - `1.0` on its own means "at least `1.0`", unbounded above
//!
//! # Examples
//!
//! ```
//! use resolver_model::version::{Version, VersionRange};
//!
//! let range = VersionRange::parse("[1.0,2.0)").unwrap();
//! assert!(range.is_in_range(&Version::parse("1.0").unwrap()));
//! assert!(range.is_in_range(&Version::parse("1.9999").unwrap()));
//! assert!(!range.is_in_range(&Version::parse("2.0").unwrap()));
//!
//! assert!(VersionRange::parse("[2.0,1.0]").is_err());
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A resource or package version.
///
/// The numeric part is a [`semver::Version`]; the qualifier is kept
/// alongside it since it may contain `_`, which semver identifiers reject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    numbers: semver::Version,
    qualifier: String,
}

impl Version {
    /// The `0.0.0` version, used when a declaration omits its version.
    pub const EMPTY: Version = Version::new(0, 0, 0);

    /// Create a version from its numeric components.
    pub const fn new(major: u64, minor: u64, micro: u64) -> Self {
        Self {
            numbers: semver::Version::new(major, minor, micro),
            qualifier: String::new(),
        }
    }

    /// Parse a dotted version string such as `1`, `1.2`, `1.2.3` or
    /// `1.2.3.v20120101_1200`. Qualifiers are `[A-Za-z0-9_-]+`.
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim();
        if s.is_empty() {
            return Err(Error::version(input, "empty version"));
        }

        let mut parts = s.splitn(4, '.');
        let major = parse_component(input, parts.next())?;
        let minor = parts
            .next()
            .map(|p| parse_component(input, Some(p)))
            .transpose()?
            .unwrap_or(0);
        let micro = parts
            .next()
            .map(|p| parse_component(input, Some(p)))
            .transpose()?
            .unwrap_or(0);

        let mut version = Self::new(major, minor, micro);
        if let Some(qualifier) = parts.next() {
            if qualifier.is_empty() {
                return Err(Error::version(input, "empty qualifier"));
            }
            if let Some(bad) = qualifier
                .chars()
                .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
            {
                return Err(Error::version(
                    input,
                    format!("invalid character '{bad}' in qualifier"),
                ));
            }
            version.qualifier = qualifier.to_string();
        }

        Ok(version)
    }

    pub fn major(&self) -> u64 {
        self.numbers.major
    }

    pub fn minor(&self) -> u64 {
        self.numbers.minor
    }

    pub fn micro(&self) -> u64 {
        self.numbers.patch
    }

    /// The qualifier, or an empty string when none was given.
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }
}

fn parse_component(input: &str, part: Option<&str>) -> Result<u64> {
    let part = part.unwrap_or_default();
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::version(
            input,
            format!("non-numeric version component '{part}'"),
        ));
    }
    part.parse::<u64>()
        .map_err(|e| Error::version(input, format!("component '{part}': {e}")))
}

impl Default for Version {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.numbers
            .cmp_precedence(&other.numbers)
            .then_with(|| self.qualifier.cmp(&other.qualifier))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major(), self.minor(), self.micro())?;
        if !self.qualifier.is_empty() {
            write!(f, ".{}", self.qualifier)?;
        }
        Ok(())
    }
}

impl From<semver::Version> for Version {
    fn from(version: semver::Version) -> Self {
        Self::new(version.major, version.minor, version.patch)
    }
}

impl std::str::FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

/// An interval of versions, closed or open at either end.
///
/// Equality and hashing are structural: `[1.0,2.0)` and `[1.0.0,2.0.0)` are
/// equal, `[1.0,2.0)` and `[1.0,2.0]` are not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionRange {
    low: Version,
    low_inclusive: bool,
    high: Option<Version>,
    high_inclusive: bool,
}

impl VersionRange {
    /// A range containing `low` and everything above it.
    pub fn at_least(low: Version) -> Self {
        Self {
            low,
            low_inclusive: true,
            high: None,
            high_inclusive: false,
        }
    }

    /// A range containing exactly one version.
    pub fn exact(version: Version) -> Self {
        Self {
            low: version.clone(),
            low_inclusive: true,
            high: Some(version),
            high_inclusive: true,
        }
    }

    /// Parse interval notation (`[1.0,2.0)`) or a bare lower bound (`1.0`).
    ///
    /// # Errors
    ///
    /// Returns `Error::VersionParse` for non-numeric components, a low bound
    /// above the high bound, or mismatched bracket characters.
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim();
        if s.is_empty() {
            return Err(Error::version(input, "empty version range"));
        }

        let low_inclusive = match s.as_bytes()[0] {
            b'[' => true,
            b'(' => false,
            _ => {
                if s.contains([',', '[', ']', '(', ')']) {
                    return Err(Error::version(input, "mismatched bracket characters"));
                }
                return Ok(Self::at_least(Version::parse(s)?));
            }
        };

        let high_inclusive = match s.as_bytes()[s.len() - 1] {
            b']' if s.len() > 1 => true,
            b')' if s.len() > 1 => false,
            _ => return Err(Error::version(input, "mismatched bracket characters")),
        };

        let inner = &s[1..s.len() - 1];
        let (low, high) = inner
            .split_once(',')
            .ok_or_else(|| Error::version(input, "expected 'low,high' between brackets"))?;
        if high.contains(',') || inner.contains(['[', ']', '(', ')']) {
            return Err(Error::version(input, "mismatched bracket characters"));
        }

        let low = Version::parse(low)?;
        let high = Version::parse(high)?;
        if low > high {
            return Err(Error::version(
                input,
                format!("low bound {low} is above high bound {high}"),
            ));
        }

        Ok(Self {
            low,
            low_inclusive,
            high: Some(high),
            high_inclusive,
        })
    }

    /// Check whether `version` lies inside this range.
    pub fn is_in_range(&self, version: &Version) -> bool {
        let above_low = if self.low_inclusive {
            version >= &self.low
        } else {
            version > &self.low
        };
        if !above_low {
            return false;
        }
        match &self.high {
            None => true,
            Some(high) if self.high_inclusive => version <= high,
            Some(high) => version < high,
        }
    }

    /// True when no version can satisfy the range, e.g. `(1.0,1.0)`.
    pub fn is_empty(&self) -> bool {
        match &self.high {
            Some(high) => {
                &self.low == high && !(self.low_inclusive && self.high_inclusive)
            }
            None => false,
        }
    }

    pub fn low(&self) -> &Version {
        &self.low
    }

    pub fn high(&self) -> Option<&Version> {
        self.high.as_ref()
    }

    pub fn is_low_inclusive(&self) -> bool {
        self.low_inclusive
    }

    pub fn is_high_inclusive(&self) -> bool {
        self.high_inclusive
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.high {
            None => write!(f, "{}", self.low),
            Some(high) => write!(
                f,
                "{}{},{}{}",
                if self.low_inclusive { '[' } else { '(' },
                self.low,
                high,
                if self.high_inclusive { ']' } else { ')' },
            ),
        }
    }
}

impl std::str::FromStr for VersionRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VersionRange {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<VersionRange> for String {
    fn from(range: VersionRange) -> Self {
        range.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    // --- Version::parse ---

    #[test]
    fn test_parse_defaults_missing_components() {
        assert_eq!(v("1"), Version::new(1, 0, 0));
        assert_eq!(v("1.2"), Version::new(1, 2, 0));
        assert_eq!(v("1.2.3"), Version::new(1, 2, 3));
    }

    #[test]
    fn test_parse_qualifier() {
        let version = v("1.2.3.beta-1");
        assert_eq!(version.micro(), 3);
        assert_eq!(version.qualifier(), "beta-1");
        assert_eq!(version.to_string(), "1.2.3.beta-1");
    }

    #[test]
    fn test_parse_whitespace() {
        assert_eq!(v("  2.0 "), Version::new(2, 0, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Version::parse("").is_err());
        assert!(Version::parse("abc").is_err());
        assert!(Version::parse("1.x").is_err());
        assert!(Version::parse("1..2").is_err());
        assert!(Version::parse("+1.0").is_err());
        assert!(Version::parse("1.0.0.").is_err());
    }

    #[test]
    fn test_qualifier_sorts_after_bare() {
        assert!(v("1.0.0.alpha") > v("1.0.0"));
        assert!(v("1.0.0.alpha") < v("1.0.1"));
        assert!(v("1.0.0.a") < v("1.0.0.b"));
    }

    #[test]
    fn test_numeric_ordering() {
        assert!(v("1.10") > v("1.9"));
        assert!(v("2") > v("1.9999"));
    }

    #[test]
    fn test_from_semver_drops_prerelease() {
        let version = Version::from(semver::Version::parse("1.2.3-rc.1").unwrap());
        assert_eq!(version, Version::new(1, 2, 3));
    }

    // --- VersionRange::parse ---

    #[test]
    fn test_range_half_open() {
        let range = VersionRange::parse("[1.0,2.0)").unwrap();
        assert!(range.is_low_inclusive());
        assert!(!range.is_high_inclusive());
        assert_eq!(range.low(), &Version::new(1, 0, 0));
        assert_eq!(range.high(), Some(&Version::new(2, 0, 0)));
    }

    #[test]
    fn test_range_bare_is_unbounded() {
        let range = VersionRange::parse("1.5").unwrap();
        assert!(range.high().is_none());
        assert!(range.is_in_range(&v("1.5")));
        assert!(range.is_in_range(&v("99")));
        assert!(!range.is_in_range(&v("1.4.9")));
    }

    #[test]
    fn test_range_low_above_high_rejected() {
        assert!(VersionRange::parse("[2.0,1.0]").is_err());
    }

    #[test]
    fn test_range_mismatched_brackets_rejected() {
        assert!(VersionRange::parse("[1.0,2.0").is_err());
        assert!(VersionRange::parse("1.0,2.0)").is_err());
        assert!(VersionRange::parse("1.0,2.0").is_err());
        assert!(VersionRange::parse("[1.0]").is_err());
        assert!(VersionRange::parse("[1.0,2.0,3.0]").is_err());
        assert!(VersionRange::parse("[").is_err());
    }

    #[test]
    fn test_range_exclusive_low() {
        let range = VersionRange::parse("(1.0,2.0]").unwrap();
        assert!(!range.is_in_range(&v("1.0")));
        assert!(range.is_in_range(&v("1.0.0.q")));
        assert!(range.is_in_range(&v("2.0")));
    }

    #[test]
    fn test_range_structural_equality() {
        assert_eq!(
            VersionRange::parse("[1.0,2.0)").unwrap(),
            VersionRange::parse("[1.0.0, 2.0.0)").unwrap()
        );
        assert_ne!(
            VersionRange::parse("[1.0,2.0)").unwrap(),
            VersionRange::parse("[1.0,2.0]").unwrap()
        );
    }

    #[test]
    fn test_range_empty() {
        assert!(VersionRange::parse("(1.0,1.0)").unwrap().is_empty());
        assert!(!VersionRange::parse("[1.0,1.0]").unwrap().is_empty());
        assert!(!VersionRange::exact(v("1.0")).is_empty());
    }

    #[test]
    fn test_range_display() {
        let range = VersionRange::parse("[1,2)").unwrap();
        assert_eq!(range.to_string(), "[1.0.0,2.0.0)");
        assert_eq!(VersionRange::parse("3").unwrap().to_string(), "3.0.0");
    }
}
