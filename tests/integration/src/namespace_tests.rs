//! Custom namespace rules loaded from configuration files

use std::sync::Arc;

use pretty_assertions::assert_eq;
use resolver_env::{Environment, Wire, WireMap};
use resolver_model::{Error, NamespaceRegistry, ResourceDescriptor};
use resolver_test_utils::fixtures::FixtureDir;

const NAMESPACES: &str = r#"
[namespaces."com.acme.module"]
mandatory = ["com.acme.module"]
identity = true
version-attributes = ["module-version"]
"#;

const MODULE: &str = r#"
[identity]
name = "core"
version = "3.1.0"

[[capability]]
namespace = "com.acme.module"
attributes = { "com.acme.module" = "core", module-version = "3.1" }

[[requirement]]
namespace = "com.acme.module"
attributes = { "com.acme.module" = "core" }
"#;

const CONSUMER: &str = r#"
[identity]
name = "consumer"

[[requirement]]
namespace = "com.acme.module"
attributes = { "com.acme.module" = "core", module-version = "[3.0,4.0)" }
"#;

fn load(dir: &FixtureDir) -> (Arc<NamespaceRegistry>, ResourceDescriptor, ResourceDescriptor) {
    let registry = NamespaceRegistry::load(&dir.write("namespaces.toml", NAMESPACES)).unwrap();
    let module = ResourceDescriptor::load(&dir.write("module.toml", MODULE)).unwrap();
    let consumer = ResourceDescriptor::load(&dir.write("consumer.toml", CONSUMER)).unwrap();
    (Arc::new(registry), module, consumer)
}

#[test]
fn test_configured_identity_namespace() {
    let dir = FixtureDir::new();
    let (registry, module, consumer) = load(&dir);
    let module = module.build_with(Arc::clone(&registry)).unwrap();
    let consumer = consumer.build_with(registry).unwrap();

    let cap = module.capabilities(Some("com.acme.module")).remove(0);
    let own = module.requirements(Some("com.acme.module")).remove(0);
    let theirs = consumer.requirements(Some("com.acme.module")).remove(0);

    // Identity-style: a module can never satisfy itself.
    assert!(!own.matches(&cap));
    assert!(theirs.matches(&cap));

    let env = Environment::new();
    env.install_resources(&[module.clone(), consumer.clone()]).unwrap();
    let wire = Wire::new(cap, theirs).unwrap();
    env.update_wiring(WireMap::from([(consumer.clone(), vec![wire.clone()])]))
        .unwrap();
    assert_eq!(env.wiring(&module).unwrap().provided_resource_wires(None), vec![wire]);
}

#[test]
fn test_configured_mandatory_attribute_enforced() {
    let dir = FixtureDir::new();
    let path = dir.write("namespaces.toml", NAMESPACES);
    let registry = Arc::new(NamespaceRegistry::load(&path).unwrap());
    let descriptor = ResourceDescriptor::from_toml(
        "[identity]\nname = \"bad\"\n\n[[capability]]\nnamespace = \"com.acme.module\"\n",
    )
    .unwrap();

    let err = descriptor.build_with(registry).unwrap_err();
    assert!(matches!(err, Error::InvalidDeclaration { .. }));
    // Without the configuration the namespace is unconstrained.
    assert!(descriptor.build().is_ok());
}

#[test]
fn test_configured_version_attribute_parsed() {
    let dir = FixtureDir::new();
    let (registry, _, consumer) = load(&dir);
    let consumer = consumer.build_with(registry).unwrap();
    let req = consumer.requirements(None).remove(0);
    assert!(req.attribute("module-version").unwrap().as_version_range().is_some());
}
