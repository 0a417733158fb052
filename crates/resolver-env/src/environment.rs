//! The shared environment: installed resources and their recorded wires.
//!
//! Readers load an immutable [`Snapshot`] and never block. Writers are
//! serialized, build a replacement snapshot from the current one and publish
//! it in a single store, so a reader observes either the whole of an update
//! or none of it. A rejected write publishes nothing.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::convert::Infallible;
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use resolver_model::{Resource, ResourceId};

use crate::error::{Error, Result};
use crate::wire::Wire;
use crate::wiring::Wiring;

/// Wires to record, keyed by requiring resource.
pub type WireMap = BTreeMap<Resource, Vec<Wire>>;

/// Immutable view of the environment at one point in time.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    installed: Vec<Resource>,
    ids: HashSet<ResourceId>,
    required: HashMap<ResourceId, Vec<Wire>>,
}

impl Snapshot {
    /// Installed resources in install order.
    pub fn resources(&self) -> &[Resource] {
        &self.installed
    }

    pub fn is_installed(&self, resource: &Resource) -> bool {
        self.ids.contains(&resource.id())
    }

    /// The wiring of `resource`, if it has been wired as requirer or provider.
    pub fn wiring(&self, resource: &Resource) -> Option<Wiring> {
        let required = self.required.get(&resource.id());
        let provided: Vec<Wire> = self
            .stored_wires()
            .filter(|wire| wire.provider() == resource)
            .cloned()
            .collect();
        if required.is_none() && provided.is_empty() {
            return None;
        }
        Some(Wiring::new(
            resource.clone(),
            required.cloned().unwrap_or_default(),
            provided,
        ))
    }

    /// Wirings of every wired resource.
    pub fn wirings(&self) -> HashMap<Resource, Wiring> {
        let mut provided: HashMap<ResourceId, Vec<Wire>> = HashMap::new();
        for wire in self.stored_wires() {
            provided
                .entry(wire.provider().id())
                .or_default()
                .push(wire.clone());
        }

        self.installed
            .iter()
            .filter_map(|resource| {
                let required = self.required.get(&resource.id());
                let provided = provided.remove(&resource.id());
                if required.is_none() && provided.is_none() {
                    return None;
                }
                let wiring = Wiring::new(
                    resource.clone(),
                    required.cloned().unwrap_or_default(),
                    provided.unwrap_or_default(),
                );
                Some((resource.clone(), wiring))
            })
            .collect()
    }

    /// Every stored wire, by requirer install order then wire order.
    fn stored_wires(&self) -> impl Iterator<Item = &Wire> {
        self.installed
            .iter()
            .filter_map(|resource| self.required.get(&resource.id()))
            .flatten()
    }

    fn check_wire_map(&self, wires: &WireMap) -> Result<()> {
        for (requirer, list) in wires {
            if !self.is_installed(requirer) {
                return Err(Error::inconsistent(format!("{requirer} is not installed")));
            }
            for wire in list {
                if wire.requirer() != requirer {
                    return Err(Error::inconsistent(format!(
                        "wire {wire} is listed under {requirer}"
                    )));
                }
                if !self.is_installed(wire.provider()) {
                    return Err(Error::inconsistent(format!(
                        "provider {} of wire {wire} is not installed",
                        wire.provider()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Thread-safe container of installed resources and recorded wires.
#[derive(Debug, Default)]
pub struct Environment {
    state: ArcSwap<Snapshot>,
    writer: Mutex<()>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the current state for a consistent series of reads.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.state.load_full()
    }

    /// Install resources, all or none.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateResource` if a resource is already installed
    /// or appears twice in `resources`.
    pub fn install_resources(&self, resources: &[Resource]) -> Result<()> {
        self.write(|next| {
            for resource in resources {
                if !next.ids.insert(resource.id()) {
                    return Err(Error::DuplicateResource {
                        resource: resource.to_string(),
                    });
                }
                next.installed.push(resource.clone());
            }
            tracing::debug!(count = resources.len(), "Installed resources");
            Ok(())
        })
    }

    /// Remove resources along with every wire that names them, returning
    /// how many were removed.
    ///
    /// Resources that are not installed are skipped with a warning.
    pub fn uninstall_resources(&self, resources: &[Resource]) -> usize {
        let Ok(count) = self.write(|next| {
            let mut removed = HashSet::new();
            for resource in resources {
                if next.ids.remove(&resource.id()) {
                    removed.insert(resource.id());
                } else {
                    tracing::warn!(%resource, "Resource is not installed, skipping uninstall");
                }
            }
            if removed.is_empty() {
                return Ok::<_, Infallible>(0);
            }

            next.installed.retain(|resource| !removed.contains(&resource.id()));
            next.required.retain(|id, _| !removed.contains(id));
            let mut dropped = 0;
            for wires in next.required.values_mut() {
                let before = wires.len();
                wires.retain(|wire| !removed.contains(&wire.provider().id()));
                dropped += before - wires.len();
            }
            tracing::debug!(
                count = removed.len(),
                dropped_wires = dropped,
                "Uninstalled resources"
            );
            Ok(removed.len())
        });
        count
    }

    /// Record wires for each requiring resource, replacing what was stored
    /// for that resource. Validation covers the whole map before anything is
    /// applied.
    ///
    /// # Errors
    ///
    /// Returns `Error::InconsistentWireMap` if a key or wire provider is not
    /// installed, or a wire is listed under a resource other than its
    /// requirer.
    pub fn update_wiring(&self, wires: WireMap) -> Result<()> {
        self.write(|next| {
            next.check_wire_map(&wires)?;
            for (requirer, list) in wires {
                tracing::debug!(resource = %requirer, wires = list.len(), "Updating wiring");
                next.required.insert(requirer.id(), list);
            }
            Ok(())
        })
    }

    /// Wirings of every wired resource.
    pub fn wirings(&self) -> HashMap<Resource, Wiring> {
        self.snapshot().wirings()
    }

    pub fn wiring(&self, resource: &Resource) -> Option<Wiring> {
        self.snapshot().wiring(resource)
    }

    /// Installed resources in install order.
    pub fn installed_resources(&self) -> Vec<Resource> {
        self.snapshot().resources().to_vec()
    }

    pub fn is_installed(&self, resource: &Resource) -> bool {
        self.snapshot().is_installed(resource)
    }

    /// Apply `update` to a copy of the current state and publish it on
    /// success.
    fn write<T, E>(
        &self,
        update: impl FnOnce(&mut Snapshot) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = Snapshot::clone(&self.state.load());
        let value = update(&mut next)?;
        self.state.store(Arc::new(next));
        Ok(value)
    }
}
