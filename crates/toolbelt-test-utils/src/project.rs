//! [`TestProject`] builder for configuration test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project directory with helpers for laying out config files.
///
/// # Example
///
/// ```rust,no_run
/// use toolbelt_test_utils::TestProject;
///
/// let project = TestProject::new();
/// project.write_file("base.yaml", "variables:\n  TB_A: one\n");
/// let main = project.write_file("toolbelt.yaml", "include: base.yaml\n");
/// project.assert_file_exists("toolbelt.yaml");
/// # let _ = main;
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the project.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// The string form of [`TestProject::path`], as recorded in `sources`.
    pub fn source(&self, relative: &str) -> String {
        self.path(relative).to_string_lossy().into_owned()
    }

    /// Write `content` to `relative`, creating parent directories.
    ///
    /// Returns the absolute path written.
    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("Could not write {}: {e}", path.display()));
        path
    }

    /// Write a `pyproject.toml` whose `[tool.toolbelt]` table includes `references`.
    pub fn write_pyproject(&self, references: &[&str]) -> PathBuf {
        let list = references
            .iter()
            .map(|r| format!("\"{r}\""))
            .collect::<Vec<_>>()
            .join(", ");
        self.write_file(
            "pyproject.toml",
            &format!("[project]\nname = \"fixture\"\n\n[tool.toolbelt]\ninclude = [{list}]\n"),
        )
    }

    /// Assert that `relative` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}
