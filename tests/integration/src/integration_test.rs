//! End-to-end integration test over descriptor fixtures
//!
//! Exercises the complete flow: descriptor loading -> install -> provider
//! lookup -> wiring update -> effective views -> uninstall.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use resolver_env::{ResolveContext, Wire, WireMap};
use resolver_model::namespace::{
    BUNDLE_NAMESPACE, HOST_NAMESPACE, IDENTITY_NAMESPACE, PACKAGE_NAMESPACE,
};
use resolver_model::{Requirement, Resource, Version};
use resolver_test_utils::TestEnv;
use resolver_test_utils::fixtures::load_resource;

struct Scenario {
    env: TestEnv,
    api: Resource,
    logging: Resource,
    app: Resource,
    fragment: Resource,
}

fn install_fixtures() -> Scenario {
    let env = TestEnv::new();
    let api = env.install(load_resource("api"));
    let logging = env.install(load_resource("logging"));
    let app = env.install(load_resource("app"));
    let fragment = env.install(load_resource("fragment"));
    Scenario {
        env,
        api,
        logging,
        app,
        fragment,
    }
}

/// Wire every effective requirement of `resource` to its first provider.
fn wire_first(context: &ResolveContext, resource: &Resource) -> Vec<Wire> {
    resource
        .requirements(None)
        .into_iter()
        .filter(|req| context.is_effective(req))
        .filter_map(|req: Requirement| {
            let capability = context.find_providers(&req).into_iter().next()?;
            Some(Wire::new(capability, req).unwrap())
        })
        .collect()
}

fn namespace_values(wires: &[Wire]) -> Vec<String> {
    wires
        .iter()
        .map(|w| {
            let cap = w.capability();
            format!("{}={}", cap.namespace(), cap.namespace_value().unwrap())
        })
        .collect()
}

fn resolve(scenario: &Scenario) -> ResolveContext {
    let context = ResolveContext::new(
        Arc::clone(scenario.env.environment()),
        vec![scenario.app.clone(), scenario.fragment.clone()],
        vec![],
    );
    let mut wires = WireMap::new();
    for resource in context.mandatory_resources() {
        wires.insert(resource.clone(), wire_first(&context, resource));
    }
    context.apply(wires).unwrap();
    context
}

#[test]
fn test_fixture_identities() {
    let scenario = install_fixtures();
    assert_eq!(scenario.app.symbolic_name(), "com.acme.app");
    assert_eq!(scenario.logging.version(), &Version::new(1, 7, 36));
    assert_eq!(scenario.fragment.identity().kind, "osgi.fragment");
    assert_eq!(scenario.env.installed_resources().len(), 5);
}

#[test]
fn test_resolve_fixture_graph() {
    let scenario = install_fixtures();
    let context = resolve(&scenario);
    let wirings = context.wirings();

    let app = &wirings[&scenario.app];
    assert_eq!(
        namespace_values(&app.required_resource_wires(None)),
        vec![
            "osgi.wiring.bundle=com.acme.api",
            "osgi.wiring.package=com.acme.api",
            "osgi.wiring.package=org.slf4j",
        ]
    );

    let api = &wirings[&scenario.api];
    assert_eq!(api.provided_resource_wires(None).len(), 3);
    assert_eq!(api.provided_resource_wires(Some(BUNDLE_NAMESPACE)).len(), 1);
    assert_eq!(api.provided_resource_wires(Some(PACKAGE_NAMESPACE)).len(), 1);
    let host = api.provided_resource_wires(Some(HOST_NAMESPACE));
    assert_eq!(host.len(), 1);
    assert_eq!(host[0].requirer(), &scenario.fragment);
    // Wires provided to app come before those provided to the fragment.
    assert_eq!(api.provided_resource_wires(None)[2], host[0]);

    assert_eq!(
        wirings[&scenario.logging].provided_resource_wires(None)[0].requirer(),
        &scenario.app
    );
    assert!(!wirings.contains_key(scenario.env.system()));
}

#[test]
fn test_effective_views_of_resolved_app() {
    let scenario = install_fixtures();
    let context = resolve(&scenario);
    let app = context.environment().wiring(&scenario.app).unwrap();

    // The optional org.junit import found no provider and is pruned.
    let requirements: Vec<String> = app
        .resource_requirements(None)
        .iter()
        .map(|req| req.namespace_value().unwrap().to_string())
        .collect();
    assert_eq!(requirements, vec!["com.acme.api", "com.acme.api", "org.slf4j"]);

    // The service capability is only effective at runtime.
    let capabilities: Vec<String> = app
        .resource_capabilities(None)
        .iter()
        .map(|cap| cap.namespace().to_string())
        .collect();
    assert_eq!(capabilities, vec![IDENTITY_NAMESPACE, PACKAGE_NAMESPACE]);
}

#[test]
fn test_uninstall_provider_after_resolve() {
    let scenario = install_fixtures();
    let context = resolve(&scenario);

    scenario.env.uninstall_resources(&[scenario.logging.clone()]);

    let app = context.environment().wiring(&scenario.app).unwrap();
    assert_eq!(app.required_resource_wires(Some(PACKAGE_NAMESPACE)).len(), 1);
    assert!(
        app.resource_requirements(Some(PACKAGE_NAMESPACE))
            .iter()
            .all(|req| !req.is_optional())
    );
    assert!(context.wirings().get(&scenario.logging).is_none());
}
