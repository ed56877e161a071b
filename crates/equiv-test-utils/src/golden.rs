//! Golden fixture files
//!
//! Checked-in fixtures live under `test-fixtures/golden` at the workspace
//! root. [`GoldenDir`] gives tests a scratch directory for fixtures they
//! write themselves.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Directory holding the checked-in golden fixtures
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/golden")
}

/// Read a checked-in fixture by file name, e.g. `orders.xml`.
///
/// Panics with the full path if the file cannot be read.
pub fn load(name: &str) -> String {
    let path = fixtures_dir().join(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read golden fixture {}: {e}", path.display()))
}

/// A temporary directory of fixtures written during a test
pub struct GoldenDir {
    temp_dir: TempDir,
}

impl Default for GoldenDir {
    fn default() -> Self {
        Self::new()
    }
}

impl GoldenDir {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `name` and return its path
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.root().join(name)).unwrap()
    }
}
