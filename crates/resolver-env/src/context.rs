//! The boundary between the environment and a resolver.
//!
//! A [`ResolveContext`] names the resources a resolve round must wire
//! (mandatory) and may wire (optional), and gives a [`Resolver`] read access
//! to installed providers. The resolver returns a [`WireMap`] which
//! [`ResolveContext::apply`] records in the environment.

use std::collections::HashMap;
use std::sync::Arc;

use resolver_model::{Capability, Matcher, Requirement, Resource};

use crate::environment::{Environment, WireMap};
use crate::error::Result;
use crate::wiring::Wiring;

/// Inputs of one resolve round.
#[derive(Debug, Clone)]
pub struct ResolveContext {
    environment: Arc<Environment>,
    mandatory: Vec<Resource>,
    optional: Vec<Resource>,
    matcher: Matcher,
}

impl ResolveContext {
    pub fn new(
        environment: Arc<Environment>,
        mandatory: Vec<Resource>,
        optional: Vec<Resource>,
    ) -> Self {
        Self {
            environment,
            mandatory,
            optional,
            matcher: Matcher::new(),
        }
    }

    /// Use `matcher` instead of the default when finding providers.
    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn environment(&self) -> &Arc<Environment> {
        &self.environment
    }

    pub fn mandatory_resources(&self) -> &[Resource] {
        &self.mandatory
    }

    pub fn optional_resources(&self) -> &[Resource] {
        &self.optional
    }

    /// Whether `requirement` takes part in resolution at all.
    pub fn is_effective(&self, requirement: &Requirement) -> bool {
        requirement.effective().is_resolve()
    }

    /// Capabilities of installed resources that satisfy `requirement`, in
    /// install order then declaration order.
    ///
    /// Only capabilities effective at resolve time are offered.
    pub fn find_providers(&self, requirement: &Requirement) -> Vec<Capability> {
        let snapshot = self.environment.snapshot();
        let providers: Vec<Capability> = snapshot
            .resources()
            .iter()
            .flat_map(|resource| resource.capabilities(Some(requirement.namespace())))
            .filter(|cap| cap.effective().is_resolve())
            .filter(|cap| self.matcher.matches(requirement, cap))
            .collect();
        tracing::trace!(%requirement, count = providers.len(), "Found providers");
        providers
    }

    /// Current wirings of the environment.
    pub fn wirings(&self) -> HashMap<Resource, Wiring> {
        self.environment.wirings()
    }

    /// Record a resolver's output in the environment.
    pub fn apply(&self, wires: WireMap) -> Result<()> {
        self.environment.update_wiring(wires)
    }
}

/// A search algorithm producing wires for a [`ResolveContext`].
///
/// No implementation ships with this crate.
pub trait Resolver {
    fn resolve(&self, context: &ResolveContext) -> std::result::Result<WireMap, ResolutionError>;
}

/// A resolver could not satisfy the mandatory resources.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} ({} unresolved)", .unresolved.len())]
pub struct ResolutionError {
    message: String,
    unresolved: Vec<Requirement>,
}

impl ResolutionError {
    pub fn new(message: impl Into<String>, unresolved: Vec<Requirement>) -> Self {
        Self {
            message: message.into(),
            unresolved,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Requirements left without a provider.
    pub fn unresolved_requirements(&self) -> &[Requirement] {
        &self.unresolved
    }
}
