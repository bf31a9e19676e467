//! Error types for toolbelt-config

use std::path::PathBuf;

use crate::format::ConfigFormat;

/// Result type for toolbelt-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or loading configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A top-level configuration file could not be loaded.
    ///
    /// Wraps the root cause together with the offending file.
    #[error("Error loading {format} config file {path}: {source}")]
    Load {
        format: ConfigFormat,
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The merged document does not satisfy the configuration schema
    #[error("Invalid configuration: {message}")]
    Validation { message: String },

    #[error("Configuration document must be a mapping, found {found}")]
    NotAMapping { found: String },

    #[error("Unsupported configuration file type: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Invalid package reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    #[error("Package '{package}' is not registered")]
    UnknownPackage { package: String },

    #[error("Resource '{resource}' not found in package '{package}'")]
    ResourceNotFound { package: String, resource: String },

    #[error("Home directory not found")]
    HomeNotFound,

    #[error("Python config file {path} must define a 'config' variable")]
    MissingConfigAttribute { path: PathBuf },

    #[error("Config must be a dictionary or ToolbeltConfig instance, got {found} in {path}")]
    InvalidConfigType { path: PathBuf, found: String },

    #[error("Config module {path} failed (exit code {code}): {stderr}")]
    ScriptFailed {
        path: PathBuf,
        code: i32,
        stderr: String,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn load(format: ConfigFormat, path: impl Into<PathBuf>, source: Error) -> Self {
        Self::Load {
            format,
            path: path.into(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_names_file_and_cause() {
        let err = Error::load(
            ConfigFormat::Yaml,
            "/project/toolbelt.yaml",
            Error::validation("profile 'python': missing field `command`"),
        );

        let display = err.to_string();
        assert!(display.starts_with("Error loading YAML config file /project/toolbelt.yaml"));
        assert!(display.contains("missing field `command`"));
    }
}
