//! [`TestEnv`]: an environment pre-populated with the system resource.

use std::sync::Arc;

use resolver_env::{Environment, Wire, WireMap};
use resolver_model::Resource;

use crate::resources::system_resource;

/// An [`Environment`] with the system resource installed.
///
/// # Example
///
/// ```rust
/// use resolver_test_utils::TestEnv;
/// use resolver_test_utils::resources::{exporter, importer};
///
/// let env = TestEnv::new();
/// let a = env.install(exporter("a", "foo", "1.0"));
/// let b = env.install(importer("b", "foo", None, false));
/// env.apply([(b.clone(), vec![env.wire(&b, &a, "osgi.wiring.package")])]);
/// assert_eq!(env.wirings().len(), 2);
/// ```
pub struct TestEnv {
    env: Arc<Environment>,
    system: Resource,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let env = Arc::new(Environment::new());
        let system = system_resource();
        env.install_resources(std::slice::from_ref(&system))
            .expect("TestEnv::new: failed to install system resource");
        Self { env, system }
    }

    pub fn environment(&self) -> &Arc<Environment> {
        &self.env
    }

    pub fn system(&self) -> &Resource {
        &self.system
    }

    /// Install `resource` and hand it back.
    pub fn install(&self, resource: Resource) -> Resource {
        self.env
            .install_resources(std::slice::from_ref(&resource))
            .expect("TestEnv::install: failed to install resource");
        resource
    }

    /// Wire the first requirement of `requirer` in `namespace` to the first
    /// capability of `provider` in the same namespace.
    pub fn wire(&self, requirer: &Resource, provider: &Resource, namespace: &str) -> Wire {
        let requirement = requirer
            .requirements(Some(namespace))
            .into_iter()
            .next()
            .expect("TestEnv::wire: requirer has no requirement in namespace");
        let capability = provider
            .capabilities(Some(namespace))
            .into_iter()
            .next()
            .expect("TestEnv::wire: provider has no capability in namespace");
        Wire::new(capability, requirement).expect("TestEnv::wire: requirement does not match")
    }

    /// Record wires, panicking if the environment rejects them.
    pub fn apply(&self, wires: impl IntoIterator<Item = (Resource, Vec<Wire>)>) {
        let map: WireMap = wires.into_iter().collect();
        self.env
            .update_wiring(map)
            .expect("TestEnv::apply: wire map rejected");
    }
}

impl std::ops::Deref for TestEnv {
    type Target = Environment;

    fn deref(&self) -> &Self::Target {
        &self.env
    }
}
