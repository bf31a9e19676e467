//! Per-format raw loaders

use std::fmt;
use std::path::Path;

use crate::raw::RawDocument;
use crate::script::ScriptEvaluator;
use crate::{Error, Result};

/// The on-disk flavour of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` / `.yml` documents
    Yaml,
    /// `.py` modules exposing a `config` attribute
    Python,
}

impl ConfigFormat {
    /// Detect the format from the file suffix (case-sensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "py" => Some(ConfigFormat::Python),
            _ => None,
        }
    }

    /// Like [`ConfigFormat::from_path`], failing for unknown suffixes.
    pub fn require(path: &Path) -> Result<Self> {
        Self::from_path(path).ok_or_else(|| Error::UnsupportedFormat {
            extension: suffix(path),
        })
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::Yaml => write!(f, "YAML"),
            ConfigFormat::Python => write!(f, "Python"),
        }
    }
}

/// The suffix of `path` including its dot, or an empty string.
pub(crate) fn suffix(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

/// Read one file into a raw document.
///
/// The file is read completely and closed before anything else happens
/// with its content.
pub(crate) fn load_raw(
    path: &Path,
    format: ConfigFormat,
    scripts: &dyn ScriptEvaluator,
) -> Result<RawDocument> {
    match format {
        ConfigFormat::Yaml => {
            let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
            RawDocument::from_yaml_str(&content)
        }
        ConfigFormat::Python => scripts.evaluate(path)?.into_raw(),
    }
}
