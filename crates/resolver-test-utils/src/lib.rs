//! Shared test utilities for the resolver workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`resources`]: ready-made resources (system resource, exporters, importers)
//! - [`env`]: [`TestEnv`] for installing resources and wiring them by package
//! - [`fixtures`]: descriptor files under `test-fixtures/resources`

pub mod env;
pub mod fixtures;
pub mod resources;

pub use env::TestEnv;
