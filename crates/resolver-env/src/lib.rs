//! Wires, wirings and the shared environment of the resource resolver.
//!
//! The [`Environment`] holds installed resources and the wires recorded for
//! them. Reads go through immutable snapshots; [`Environment::update_wiring`]
//! validates a whole [`WireMap`] before publishing any of it.
//!
//! The search for a consistent set of wires is left to an external
//! [`Resolver`]; [`ResolveContext`] is what it works against.

pub mod context;
pub mod environment;
pub mod error;
pub mod wire;
pub mod wiring;

pub use context::{ResolutionError, ResolveContext, Resolver};
pub use environment::{Environment, Snapshot, WireMap};
pub use error::{Error, Result};
pub use wire::Wire;
pub use wiring::Wiring;
