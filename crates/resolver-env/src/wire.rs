//! Wires: realized requirement-to-capability satisfactions.

use std::fmt;

use resolver_model::{Capability, Requirement, Resource};

use crate::error::{Error, Result};

/// An edge from a requiring resource to a providing resource.
///
/// Construction guarantees that the requirement matches the capability and
/// that provider and requirer are the owners of capability and requirement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Wire {
    capability: Capability,
    requirement: Requirement,
    provider: Resource,
    requirer: Resource,
}

impl Wire {
    /// Wire `requirement` to `capability`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsatisfiedWire` if the requirement does not match the
    /// capability or either owning resource has been dropped.
    pub fn new(capability: Capability, requirement: Requirement) -> Result<Self> {
        let unsatisfied = |reason: &str| Error::UnsatisfiedWire {
            requirement: requirement.to_string(),
            capability: capability.to_string(),
            reason: reason.to_string(),
        };

        if !requirement.matches(&capability) {
            return Err(unsatisfied("requirement does not match capability"));
        }
        let provider = capability
            .resource()
            .ok_or_else(|| unsatisfied("providing resource no longer exists"))?;
        let requirer = requirement
            .resource()
            .ok_or_else(|| unsatisfied("requiring resource no longer exists"))?;

        Ok(Self {
            capability,
            requirement,
            provider,
            requirer,
        })
    }

    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    pub fn provider(&self) -> &Resource {
        &self.provider
    }

    pub fn requirer(&self) -> &Resource {
        &self.requirer
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} via {}",
            self.requirer.identity(),
            self.provider.identity(),
            self.requirement
        )
    }
}
