//! Resource constructors for common test shapes.

use resolver_model::namespace::VERSION_ATTRIBUTE;
use resolver_model::{Attributes, Directives, Resource, ResourceBuilder, Version};

/// Symbolic name of the resource every test environment starts with.
pub const SYSTEM_BUNDLE: &str = "system.bundle";

/// The system resource: identity plus bundle and host capabilities, no
/// requirements.
pub fn system_resource() -> Resource {
    let mut builder = ResourceBuilder::new();
    builder
        .add_identity_capability(SYSTEM_BUNDLE, None)
        .unwrap()
        .add_bundle_capability(SYSTEM_BUNDLE, None)
        .unwrap()
        .add_host_capability(SYSTEM_BUNDLE, None)
        .unwrap();
    builder.build().unwrap()
}

/// A resource exporting `package` at `version`.
pub fn exporter(name: &str, package: &str, version: &str) -> Resource {
    let mut builder = ResourceBuilder::new();
    builder
        .add_identity_capability(name, Some(Version::new(1, 0, 0)))
        .unwrap()
        .add_package_capability(
            package,
            Attributes::new().with(VERSION_ATTRIBUTE, version),
            Directives::new(),
        )
        .unwrap();
    builder.build().unwrap()
}

/// A resource importing `package`, optionally restricted to `range`.
pub fn importer(name: &str, package: &str, range: Option<&str>, optional: bool) -> Resource {
    let mut attributes = Attributes::new();
    if let Some(range) = range {
        attributes.insert(VERSION_ATTRIBUTE, range);
    }
    let mut directives = Directives::new();
    if optional {
        directives.insert("resolution", "optional");
    }

    let mut builder = ResourceBuilder::new();
    builder
        .add_identity_capability(name, None)
        .unwrap()
        .add_package_requirement(package, attributes, directives)
        .unwrap();
    builder.build().unwrap()
}

/// A resource that both exports and imports `package`.
pub fn substitutable(name: &str, package: &str, version: &str) -> Resource {
    let mut builder = ResourceBuilder::new();
    builder
        .add_identity_capability(name, None)
        .unwrap()
        .add_package_capability(
            package,
            Attributes::new().with(VERSION_ATTRIBUTE, version),
            Directives::new(),
        )
        .unwrap()
        .add_package_requirement(package, Attributes::new(), Directives::new())
        .unwrap();
    builder.build().unwrap()
}
