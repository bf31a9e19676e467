//! Loading and layering configuration files
//!
//! [`ConfigLoader`] ties discovery, include expansion, parsing and the typed
//! merge together. The environment overlay is applied once, after every
//! file has been merged.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::discovery::find_config_sources;
use crate::env::Environment;
use crate::format::{ConfigFormat, load_raw};
use crate::includes::{IncludeProcessor, MAX_INCLUDE_DEPTH};
use crate::model::ToolbeltConfig;
use crate::parser::parse_toolbelt_config;
use crate::raw::RawDocument;
use crate::reference::ReferenceResolver;
use crate::resources::{BUILTIN_PACKAGE, PackageResources, ResourceResolver};
use crate::script::{PythonEvaluator, ScriptEvaluator};
use crate::{Error, Result};

/// Source marker recorded when the built-in default preset is used.
pub const DEFAULT_SOURCE: &str = "__default__";

/// Preset loaded when no configuration file is found.
pub const DEFAULT_PRESET: &str = "resources/presets/hdw.yaml";

/// Loads the effective configuration for a working directory.
pub struct ConfigLoader {
    cwd: PathBuf,
    resources: Box<dyn ResourceResolver>,
    scripts: Box<dyn ScriptEvaluator>,
    env: Environment,
    home: Option<PathBuf>,
    max_include_depth: usize,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// A loader for the process working directory and environment, using
    /// the bundled package resources and an external Python interpreter.
    pub fn new() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            cwd,
            resources: Box::new(PackageResources::new()),
            scripts: Box::new(PythonEvaluator::new()),
            env: Environment::from_process(),
            home: None,
            max_include_depth: MAX_INCLUDE_DEPTH,
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    pub fn with_resources(mut self, resources: impl ResourceResolver + 'static) -> Self {
        self.resources = Box::new(resources);
        self
    }

    pub fn with_script_evaluator(mut self, scripts: impl ScriptEvaluator + 'static) -> Self {
        self.scripts = Box::new(scripts);
        self
    }

    pub fn with_environment(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    /// Expand `~/` references against `home` instead of the platform home.
    pub fn with_home_dir(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    fn references(&self) -> ReferenceResolver<'_> {
        let references = ReferenceResolver::new(self.resources.as_ref());
        match &self.home {
            Some(home) => references.with_home_dir(home.clone()),
            None => references,
        }
    }

    /// Discover configuration files for the working directory.
    pub fn find_sources(&self, explicit: Option<&Path>) -> Vec<PathBuf> {
        find_config_sources(explicit, &self.cwd, &self.references())
    }

    /// Load the effective configuration.
    ///
    /// With `paths`, exactly those files are loaded in order; otherwise the
    /// sources are discovered. No files at all yields the default preset.
    /// The allow-listed environment is overlaid last.
    pub fn load(&self, paths: Option<&[PathBuf]>) -> Result<ToolbeltConfig> {
        let sources = match paths {
            Some(paths) => paths.to_vec(),
            None => self.find_sources(None),
        };

        let config = match sources.as_slice() {
            [] => {
                tracing::debug!("No configuration found, using default preset");
                self.default_config()?
            }
            [single] => self.load_file(single)?,
            [first, rest @ ..] => {
                let mut merged = self.load_file(first)?;
                for path in rest {
                    merged = merged.merge(&self.load_file(path)?);
                }
                merged
            }
        };

        tracing::debug!(sources = ?config.sources, "Configuration loaded");
        Ok(config.with_environment(&self.env))
    }

    /// Load one file with its includes, without the environment overlay.
    ///
    /// A relative `path` is taken from the loader's working directory.
    /// `sources` lists the included files followed by the path itself. Any
    /// failure is reported together with the file and its format.
    pub fn load_file(&self, path: &Path) -> Result<ToolbeltConfig> {
        let path = self.cwd.join(path);
        let format = ConfigFormat::require(&path)?;
        self.load_file_as(&path, format)
            .map_err(|e| Error::load(format, &path, e))
    }

    fn load_file_as(&self, path: &Path, format: ConfigFormat) -> Result<ToolbeltConfig> {
        tracing::debug!(?path, %format, "Loading config file");
        let raw = load_raw(path, format, self.scripts.as_ref())?;

        let own = path.to_string_lossy().into_owned();
        let in_progress = HashSet::from([own.clone()]);
        let base_dir = path.parent().unwrap_or(Path::new(""));

        let references = self.references();
        let processor = IncludeProcessor::new(&references, self.scripts.as_ref())
            .with_max_depth(self.max_include_depth);
        let expanded = processor.process(&raw, base_dir, &in_progress);

        let mut config = parse_toolbelt_config(&expanded.document)?;
        config.sources = expanded.sources;
        config.sources.push(own);
        Ok(config)
    }

    /// The built-in default configuration, assembled from the bundled preset.
    pub fn default_config(&self) -> Result<ToolbeltConfig> {
        let mut raw = RawDocument::new();
        raw.insert(
            "include",
            Value::String(format!("@{BUILTIN_PACKAGE}:{DEFAULT_PRESET}")),
        );

        let references = self.references();
        let processor = IncludeProcessor::new(&references, self.scripts.as_ref())
            .with_max_depth(self.max_include_depth);
        let expanded = processor.process(&raw, &self.cwd, &HashSet::new());

        let mut config = parse_toolbelt_config(&expanded.document)?;
        config.sources = expanded.sources;
        config.sources.push(DEFAULT_SOURCE.to_string());
        Ok(config)
    }
}

/// Load the effective configuration for the process working directory.
pub fn load_config(paths: Option<&[PathBuf]>) -> Result<ToolbeltConfig> {
    ConfigLoader::new().load(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::NoScripts;
    use tempfile::TempDir;

    fn loader(dir: &Path) -> ConfigLoader {
        ConfigLoader::new()
            .with_cwd(dir)
            .with_environment(Environment::empty())
            .with_script_evaluator(NoScripts)
            .with_resources(PackageResources::new().with_extract_dir(dir.join(".extract")))
    }

    #[test]
    fn default_config_comes_from_bundled_preset() {
        let temp = TempDir::new().unwrap();
        let config = loader(temp.path()).default_config().unwrap();

        assert_eq!(config.sources.last().map(String::as_str), Some(DEFAULT_SOURCE));
        assert_eq!(config.sources.len(), 5);
        assert!(config.profile("python").is_some());
        assert!(config.profile("javascript").is_some());
        assert!(config.profile("yaml").is_some());
        assert_eq!(config.profiles["javascript"].extensions[0], ".js");
    }

    #[test]
    fn empty_explicit_list_uses_default() {
        let temp = TempDir::new().unwrap();
        let nothing: &[PathBuf] = &[];
        let config = loader(temp.path()).load(Some(nothing)).unwrap();
        assert_eq!(config.sources.last().map(String::as_str), Some(DEFAULT_SOURCE));
    }

    #[test]
    fn unsupported_file_type_is_rejected() {
        let temp = TempDir::new().unwrap();
        let err = loader(temp.path())
            .load_file(&temp.path().join("config.json"))
            .unwrap_err();
        assert!(err.to_string().contains("Unsupported configuration file type"));
    }

    #[test]
    fn relative_file_is_read_from_loader_cwd() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("lint")).unwrap();
        std::fs::write(temp.path().join("lint/base.yaml"), "variables:\n  TB_BASE: '1'\n").unwrap();
        std::fs::write(
            temp.path().join("toolbelt.yaml"),
            "include: lint/base.yaml\nvariables:\n  TB_MAIN: '1'\n",
        )
        .unwrap();

        let config = loader(temp.path())
            .load_file(Path::new("toolbelt.yaml"))
            .unwrap();

        assert_eq!(config.variables["TB_BASE"], "1");
        assert_eq!(config.variables["TB_MAIN"], "1");
        assert_eq!(
            config.sources,
            vec![
                temp.path().join("lint/base.yaml").to_string_lossy().into_owned(),
                temp.path().join("toolbelt.yaml").to_string_lossy().into_owned(),
            ]
        );
    }

    #[test]
    fn self_include_is_dropped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("toolbelt.yaml");
        std::fs::write(&path, "include: toolbelt.yaml\nvariables:\n  A: '1'\n").unwrap();

        let config = loader(temp.path()).load_file(&path).unwrap();
        assert_eq!(config.sources, vec![path.to_string_lossy().into_owned()]);
        assert_eq!(config.variables["A"], "1");
    }
}
