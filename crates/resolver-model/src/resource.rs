//! Resources: immutable bundles of capabilities and requirements.
//!
//! A [`Resource`] is a cheap, cloneable handle. It exclusively owns its
//! capability and requirement lists; each of those holds a non-owning
//! back-reference to the resource, so handles never form a strong cycle.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use crate::capability::Capability;
use crate::requirement::Requirement;
use crate::version::Version;

static NEXT_RESOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a resource instance.
///
/// Two resources built from identical declarations still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(u64);

impl ResourceId {
    pub(crate) fn next() -> Self {
        Self(NEXT_RESOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Symbolic name, version and type read from the identity capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub symbolic_name: String,
    pub version: Version,
    pub kind: String,
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.symbolic_name, self.version)
    }
}

/// Host-context objects attached to a resource, keyed by type.
#[derive(Default)]
struct Attachments(RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>);

pub(crate) struct ResourceInner {
    pub(crate) id: ResourceId,
    pub(crate) identity: Identity,
    pub(crate) capabilities: Vec<Capability>,
    pub(crate) requirements: Vec<Requirement>,
    attachments: Attachments,
}

impl ResourceInner {
    pub(crate) fn new(
        id: ResourceId,
        identity: Identity,
        capabilities: Vec<Capability>,
        requirements: Vec<Requirement>,
    ) -> Self {
        Self {
            id,
            identity,
            capabilities,
            requirements,
            attachments: Attachments::default(),
        }
    }
}

/// A modular unit with an identity, declaring capabilities and requirements.
///
/// Equality and hashing follow the instance ([`ResourceId`]), not the
/// identity: two resources may share a symbolic name and version.
#[derive(Clone)]
pub struct Resource(Arc<ResourceInner>);

impl Resource {
    pub(crate) fn from_inner(inner: Arc<ResourceInner>) -> Self {
        Self(inner)
    }

    pub(crate) fn upgrade(weak: &Weak<ResourceInner>) -> Option<Self> {
        weak.upgrade().map(Self)
    }

    pub fn id(&self) -> ResourceId {
        self.0.id
    }

    pub fn identity(&self) -> &Identity {
        &self.0.identity
    }

    pub fn symbolic_name(&self) -> &str {
        &self.0.identity.symbolic_name
    }

    pub fn version(&self) -> &Version {
        &self.0.identity.version
    }

    /// Declared capabilities in `namespace`, or all of them for `None`.
    ///
    /// Declaration order is preserved.
    pub fn capabilities(&self, namespace: Option<&str>) -> Vec<Capability> {
        self.0
            .capabilities
            .iter()
            .filter(|cap| namespace.is_none_or(|ns| cap.namespace() == ns))
            .cloned()
            .collect()
    }

    /// Declared requirements in `namespace`, or all of them for `None`.
    pub fn requirements(&self, namespace: Option<&str>) -> Vec<Requirement> {
        self.0
            .requirements
            .iter()
            .filter(|req| namespace.is_none_or(|ns| req.namespace() == ns))
            .cloned()
            .collect()
    }

    /// Attach a host-context value, returning the value it replaced.
    pub fn attach<T: Any + Send + Sync>(&self, value: T) -> Option<Arc<T>> {
        let mut table = self
            .0
            .attachments
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        table
            .insert(TypeId::of::<T>(), Arc::new(value))
            .and_then(|previous| previous.downcast::<T>().ok())
    }

    /// The attached value of type `T`, if any.
    pub fn attachment<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let table = self
            .0
            .attachments
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        table
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|value| value.downcast::<T>().ok())
    }

    /// Remove and return the attached value of type `T`.
    pub fn detach<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let mut table = self
            .0
            .attachments
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        table
            .remove(&TypeId::of::<T>())
            .and_then(|value| value.downcast::<T>().ok())
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Resource {}

impl Hash for Resource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl PartialOrd for Resource {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Resource {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.id.cmp(&other.0.id)
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("id", &self.0.id)
            .field("identity", &self.0.identity)
            .field("capabilities", &self.0.capabilities.len())
            .field("requirements", &self.0.requirements.len())
            .finish()
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Resource[{}]", self.0.identity)
    }
}
