//! Data model and matching for the resource resolver.
//!
//! A [`Resource`] declares [`Capability`]s it offers and [`Requirement`]s it
//! needs, each scoped to a namespace. [`Requirement::matches`] (or a
//! configured [`Matcher`]) decides whether a capability satisfies a
//! requirement; it is pure and safe to call from any number of threads.
//!
//! Resources are built and validated by [`ResourceBuilder`], either directly
//! or from a TOML [`ResourceDescriptor`]. Namespace-specific rules (mandatory
//! attributes, version attributes, identity-style matching) come from a
//! [`NamespaceRegistry`].

pub mod attributes;
pub mod builder;
pub mod capability;
pub mod descriptor;
pub mod error;
pub mod matcher;
pub mod namespace;
pub mod requirement;
pub mod resource;
pub mod version;

pub use attributes::{
    AttributeValue, Attributes, Cardinality, Directives, Effective, Resolution, Visibility,
};
pub use builder::ResourceBuilder;
pub use capability::Capability;
pub use descriptor::ResourceDescriptor;
pub use error::{Error, Result};
pub use matcher::Matcher;
pub use namespace::{NamespaceRegistry, NamespaceRule};
pub use requirement::Requirement;
pub use resource::{Identity, Resource, ResourceId};
pub use version::{Version, VersionRange};
