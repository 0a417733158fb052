//! Descriptor fixtures.

use std::path::{Path, PathBuf};

use resolver_model::{Resource, ResourceDescriptor};
use tempfile::TempDir;

/// Directory holding the shared `*.toml` resource descriptors.
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures/resources")
}

/// Build the resource described by `test-fixtures/resources/<name>.toml`.
pub fn load_resource(name: &str) -> Resource {
    let path = fixtures_dir().join(format!("{name}.toml"));
    ResourceDescriptor::load(&path)
        .and_then(|descriptor| descriptor.build())
        .unwrap_or_else(|e| panic!("failed to load fixture {}: {e}", path.display()))
}

/// A temporary directory for descriptor and namespace files written by a test.
pub struct FixtureDir {
    temp_dir: TempDir,
}

impl Default for FixtureDir {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureDir {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `name` and return the full path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }
}
