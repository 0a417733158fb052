//! Requirement-to-capability matching.
//!
//! A requirement matches a capability when:
//!
//! 1. both live in the same namespace (exact, case-sensitive);
//! 2. they are owned by different resources, for identity-style namespaces
//!    (and for every namespace when self-exclusion is requested);
//! 3. every requirement attribute accepts the capability's attribute of the
//!    same key (an absent version attribute counts as `0.0.0`), and the
//!    requirement specifies every attribute named by the capability's
//!    `mandatory` directive;
//! 4. for identity-style namespaces, every version range on the requirement
//!    contains the capability's version, which defaults to `0.0.0`.
//!
//! `effective` and `visibility` do not take part. A mismatch is `false`,
//! never an error.

use crate::attributes::AttributeValue;
use crate::capability::Capability;
use crate::requirement::Requirement;
use crate::version::Version;

/// Pure, thread-safe matching predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Matcher {
    exclude_self: bool,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also reject capabilities of the requiring resource in
    /// non-identity namespaces.
    pub fn excluding_self(mut self) -> Self {
        self.exclude_self = true;
        self
    }

    pub fn matches(&self, requirement: &Requirement, capability: &Capability) -> bool {
        match self.mismatch(requirement, capability) {
            None => true,
            Some(reason) => {
                tracing::trace!(%requirement, %capability, reason, "No match");
                false
            }
        }
    }

    fn mismatch(&self, requirement: &Requirement, capability: &Capability) -> Option<&'static str> {
        if requirement.namespace() != capability.namespace() {
            return Some("namespace differs");
        }

        let rule = requirement.rule();
        if requirement.owner() == capability.owner() && (rule.identity || self.exclude_self) {
            return Some("resource cannot satisfy its own requirement");
        }

        let unversioned = AttributeValue::Version(Version::EMPTY);

        for (key, wanted) in requirement.attributes().iter() {
            // Identity versions are checked below with a default.
            if rule.identity && rule.is_version_attribute(key) {
                continue;
            }
            let offered = capability
                .attribute(key)
                .or_else(|| rule.is_version_attribute(key).then_some(&unversioned));
            match offered {
                Some(offered) if wanted.accepts(offered) => {}
                Some(_) => return Some("attribute value differs"),
                None => return Some("attribute missing on capability"),
            }
        }

        if capability
            .directives()
            .mandatory_attributes()
            .iter()
            .any(|name| !requirement.attributes().contains_key(name))
        {
            return Some("mandatory capability attribute not specified");
        }

        if rule.identity {
            let empty = Version::EMPTY;
            for key in &rule.version_attributes {
                let Some(wanted) = requirement.attribute(key) else {
                    continue;
                };
                let offered = capability
                    .attribute(key)
                    .and_then(AttributeValue::as_version)
                    .unwrap_or(&empty);
                let in_range = match wanted {
                    AttributeValue::VersionRange(range) => range.is_in_range(offered),
                    AttributeValue::Version(version) => version == offered,
                    _ => false,
                };
                if !in_range {
                    return Some("version out of range");
                }
            }
        }

        None
    }
}
