//! Per-resource view of the wire graph.
//!
//! A [`Wiring`] combines a resource's declarations with the wires recorded
//! for it. Its effective capabilities and requirements are what the resource
//! contributes once resolved:
//!
//! - declarations whose `effective` directive is not `resolve` are dropped;
//! - a declared capability is elided when the resource also imports the same
//!   value in that namespace through a wire (an export that was substituted
//!   by an import);
//! - an optional requirement is pruned unless one of the required wires
//!   carries the same namespace value.
//!
//! Namespace values are compared by equality; a missing value never matches.

use std::fmt;

use resolver_model::{AttributeValue, Capability, Requirement, Resource};

use crate::wire::Wire;

/// Snapshot of one resource's wires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wiring {
    resource: Resource,
    required: Vec<Wire>,
    provided: Vec<Wire>,
}

impl Wiring {
    pub fn new(resource: Resource, required: Vec<Wire>, provided: Vec<Wire>) -> Self {
        Self {
            resource,
            required,
            provided,
        }
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Effective capabilities in declaration order.
    pub fn resource_capabilities(&self, namespace: Option<&str>) -> Vec<Capability> {
        self.resource
            .capabilities(namespace)
            .into_iter()
            .filter(|cap| cap.effective().is_resolve())
            .filter(|cap| !self.imports(cap.namespace(), cap.namespace_value()))
            .collect()
    }

    /// Effective requirements in declaration order.
    pub fn resource_requirements(&self, namespace: Option<&str>) -> Vec<Requirement> {
        self.resource
            .requirements(namespace)
            .into_iter()
            .filter(|req| req.effective().is_resolve())
            .filter(|req| {
                !req.is_optional() || self.imports(req.namespace(), req.namespace_value())
            })
            .collect()
    }

    /// Wires where this resource is the provider.
    pub fn provided_resource_wires(&self, namespace: Option<&str>) -> Vec<Wire> {
        filter_wires(&self.provided, namespace)
    }

    /// Wires where this resource is the requirer.
    pub fn required_resource_wires(&self, namespace: Option<&str>) -> Vec<Wire> {
        filter_wires(&self.required, namespace)
    }

    /// True if a required wire delivers `value` in `namespace`.
    fn imports(&self, namespace: &str, value: Option<&AttributeValue>) -> bool {
        let Some(value) = value else {
            return false;
        };
        self.required.iter().any(|wire| {
            let cap = wire.capability();
            cap.namespace() == namespace && cap.namespace_value() == Some(value)
        })
    }
}

impl fmt::Display for Wiring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} required, {} provided)",
            self.resource,
            self.required.len(),
            self.provided.len()
        )
    }
}

fn filter_wires(wires: &[Wire], namespace: Option<&str>) -> Vec<Wire> {
    wires
        .iter()
        .filter(|wire| namespace.is_none_or(|ns| wire.capability().namespace() == ns))
        .cloned()
        .collect()
}
