//! Typed configuration model
//!
//! These types are produced by [`crate::parser`] from fully merged raw
//! documents. Merging two loaded configurations always builds a new
//! [`ToolbeltConfig`]; nothing here is patched in place.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::env::Environment;
use crate::raw::RawDocument;
use crate::template::expand_string;
use crate::{Error, Result};

/// Default ignore-file list for profiles and tools.
pub fn default_ignore_files() -> Vec<String> {
    vec![".gitignore".to_string()]
}

/// Prefix a `.` onto every extension that lacks one.
pub fn normalize_extensions<S: AsRef<str>>(extensions: &[S]) -> Vec<String> {
    extensions
        .iter()
        .map(|ext| {
            let ext = ext.as_ref();
            if ext.starts_with('.') {
                ext.to_string()
            } else {
                format!(".{ext}")
            }
        })
        .collect()
}

/// How a tool receives its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileHandlingMode {
    /// Matching files are passed explicitly
    #[default]
    PerFile,
    /// The tool is given directories or a default target and discovers files itself
    Batch,
    /// The tool runs without any target arguments
    NoTarget,
}

impl fmt::Display for FileHandlingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileHandlingMode::PerFile => write!(f, "per_file"),
            FileHandlingMode::Batch => write!(f, "batch"),
            FileHandlingMode::NoTarget => write!(f, "no_target"),
        }
    }
}

/// One invocable check or format tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    pub name: String,

    /// Executable, may contain `${...}` placeholders
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub file_handling_mode: FileHandlingMode,

    /// Target used in `batch` mode when none are given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_target: Option<String>,

    /// Replace the input file with the tool's stdout
    #[serde(default)]
    pub output_to_file: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,

    #[serde(default = "default_ignore_files")]
    pub ignore_files: Vec<String>,

    /// Per-tool override of the profile's extensions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
}

impl ToolConfig {
    /// Create a per-file tool with no arguments.
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            args: Vec::new(),
            description: None,
            file_handling_mode: FileHandlingMode::default(),
            default_target: None,
            output_to_file: false,
            working_dir: None,
            ignore_files: default_ignore_files(),
            extensions: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_mode(mut self, mode: FileHandlingMode) -> Self {
        self.file_handling_mode = mode;
        self
    }

    /// Whether the tool finds its own files instead of being handed them.
    pub fn can_discover_files(&self) -> bool {
        matches!(
            self.file_handling_mode,
            FileHandlingMode::Batch | FileHandlingMode::NoTarget
        )
    }

    /// Check required fields and normalize shorthand forms.
    pub(crate) fn validate(mut self, context: &str) -> Result<Self> {
        if self.name.trim().is_empty() {
            return Err(Error::validation(format!("{context}: tool name must not be empty")));
        }
        if self.command.trim().is_empty() {
            return Err(Error::validation(format!(
                "{context}: tool '{}' has an empty command",
                self.name
            )));
        }
        if let Some(extensions) = self.extensions.take() {
            if extensions.iter().any(String::is_empty) {
                return Err(Error::validation(format!(
                    "{context}: tool '{}' has an empty extension",
                    self.name
                )));
            }
            self.extensions = Some(normalize_extensions(&extensions));
        }
        Ok(self)
    }
}

/// A named bundle of extension rules and tool lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Always equal to the profile's key in [`ToolbeltConfig::profiles`]
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub extensions: Vec<String>,

    #[serde(default)]
    pub check_tools: Vec<ToolConfig>,

    #[serde(default)]
    pub format_tools: Vec<ToolConfig>,

    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    #[serde(default = "default_ignore_files")]
    pub ignore_files: Vec<String>,
}

impl ProfileConfig {
    /// Create an empty profile; extensions are normalized.
    pub fn new<S: AsRef<str>>(name: impl Into<String>, extensions: &[S]) -> Self {
        Self {
            name: name.into(),
            extensions: normalize_extensions(extensions),
            check_tools: Vec::new(),
            format_tools: Vec::new(),
            exclude_patterns: Vec::new(),
            ignore_files: default_ignore_files(),
        }
    }

    pub fn with_check_tools(mut self, tools: Vec<ToolConfig>) -> Self {
        self.check_tools = tools;
        self
    }

    pub fn with_format_tools(mut self, tools: Vec<ToolConfig>) -> Self {
        self.format_tools = tools;
        self
    }

    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Look up a tool by name, check tools first.
    pub fn tool(&self, name: &str) -> Option<&ToolConfig> {
        self.check_tools
            .iter()
            .chain(self.format_tools.iter())
            .find(|t| t.name == name)
    }

    /// Layer `other` on top of `self`.
    ///
    /// Each list field takes `other`'s value when it is non-empty and keeps
    /// `self`'s otherwise. Tool lists are replaced wholesale, never merged
    /// element by element.
    pub fn merged_with(&self, other: &ProfileConfig) -> ProfileConfig {
        fn pick<T: Clone>(base: &[T], over: &[T]) -> Vec<T> {
            if over.is_empty() {
                base.to_vec()
            } else {
                over.to_vec()
            }
        }

        ProfileConfig {
            name: self.name.clone(),
            extensions: pick(&self.extensions, &other.extensions),
            check_tools: pick(&self.check_tools, &other.check_tools),
            format_tools: pick(&self.format_tools, &other.format_tools),
            exclude_patterns: pick(&self.exclude_patterns, &other.exclude_patterns),
            ignore_files: pick(&self.ignore_files, &other.ignore_files),
        }
    }
}

/// The effective configuration: the root aggregate returned by the loader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolbeltConfig {
    /// Every contributing file, in the order it finished loading
    #[serde(default)]
    pub sources: Vec<String>,

    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,

    #[serde(default)]
    pub global_exclude_patterns: Vec<String>,

    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl ToolbeltConfig {
    pub fn profile(&self, name: &str) -> Option<&ProfileConfig> {
        self.profiles.get(name)
    }

    pub fn list_profiles(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    /// Layer `other` on top of `self`, producing a new configuration.
    ///
    /// Profiles present on both sides are combined with
    /// [`ProfileConfig::merged_with`]; global excludes and sources are
    /// concatenated; variables are shallow-merged with `other` winning.
    pub fn merge(&self, other: &ToolbeltConfig) -> ToolbeltConfig {
        let mut profiles = self.profiles.clone();
        for (name, over) in &other.profiles {
            let merged = match profiles.get(name) {
                Some(base) => base.merged_with(over),
                None => over.clone(),
            };
            profiles.insert(name.clone(), merged);
        }

        let mut variables = self.variables.clone();
        variables.extend(other.variables.iter().map(|(k, v)| (k.clone(), v.clone())));

        ToolbeltConfig {
            sources: [self.sources.as_slice(), other.sources.as_slice()].concat(),
            profiles,
            global_exclude_patterns: [
                self.global_exclude_patterns.as_slice(),
                other.global_exclude_patterns.as_slice(),
            ]
            .concat(),
            variables,
        }
    }

    /// A copy whose variables are overlaid by the allow-listed environment.
    pub fn with_environment(&self, env: &Environment) -> ToolbeltConfig {
        let overlay = env.overlay();
        if overlay.is_empty() {
            return self.clone();
        }
        let mut variables = self.variables.clone();
        variables.extend(overlay);
        ToolbeltConfig {
            variables,
            ..self.clone()
        }
    }

    /// Variables ready for command materialization.
    ///
    /// Each declared value is expanded once against the full, unfiltered
    /// environment overlaid by the configuration's own variables, so a
    /// config author may pull in any environment value explicitly.
    pub fn resolved_variables(&self, env: &Environment) -> BTreeMap<String, String> {
        let mut context = env.all().clone();
        context.extend(self.variables.iter().map(|(k, v)| (k.clone(), v.clone())));

        self.variables
            .iter()
            .map(|(name, value)| (name.clone(), expand_string(value, &context)))
            .collect()
    }

    /// Dump back to a raw document equivalent to this configuration.
    ///
    /// `sources` is bookkeeping, not configuration, and is left out.
    pub fn to_raw(&self) -> Result<RawDocument> {
        let value = serde_json::to_value(self)?;
        let mut raw = RawDocument::from_value(value)?;
        raw.remove("sources");
        Ok(raw)
    }
}
