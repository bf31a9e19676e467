//! Executable-module configuration files
//!
//! A `.py` configuration is a module exposing a `config` attribute, either a
//! plain mapping or a configuration object with `model_dump()`. Evaluation
//! is a capability handed to the loader: [`PythonEvaluator`] runs the module
//! in a separate interpreter process that reports nothing back except the
//! `config` value as JSON.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;
use serde_json::Value;

use crate::format::suffix;
use crate::model::ToolbeltConfig;
use crate::raw::{RawDocument, value_kind};
use crate::{Error, Result};

/// Environment variable naming the interpreter used by [`PythonEvaluator`].
pub const PYTHON_ENV_VAR: &str = "TOOLBELT_PYTHON";

const DEFAULT_INTERPRETER: &str = "python3";

const EXIT_MISSING_CONFIG: i32 = 3;
const EXIT_INVALID_TYPE: i32 = 4;

/// Runs the module and prints `{"kind": ..., "data": ...}` on stdout.
const DRIVER: &str = r#"
import json, os, runpy, sys

path = sys.argv[1]
sys.path.insert(0, os.path.dirname(os.path.abspath(path)))
namespace = runpy.run_path(path, run_name="toolbelt_config")
if "config" not in namespace:
    sys.exit(3)
config = namespace["config"]
if hasattr(config, "model_dump"):
    kind, data = "model", config.model_dump(mode="json")
elif isinstance(config, dict):
    kind, data = "mapping", config
else:
    sys.stderr.write(type(config).__name__)
    sys.exit(4)
json.dump({"kind": kind, "data": data}, sys.stdout)
"#;

/// What a module's `config` attribute held.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleConfig {
    /// A plain mapping, which may still carry `include` entries
    Raw(RawDocument),
    /// A fully formed configuration object
    Typed(ToolbeltConfig),
}

impl ModuleConfig {
    /// Reduce to a raw document so includes and merging treat both forms alike.
    pub fn into_raw(self) -> Result<RawDocument> {
        match self {
            ModuleConfig::Raw(raw) => Ok(raw),
            ModuleConfig::Typed(config) => config.to_raw(),
        }
    }
}

/// Evaluates executable-module configuration files.
pub trait ScriptEvaluator {
    fn evaluate(&self, path: &Path) -> Result<ModuleConfig>;
}

/// Refuses to evaluate anything.
///
/// For embedders that must never execute configuration code.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScripts;

impl ScriptEvaluator for NoScripts {
    fn evaluate(&self, path: &Path) -> Result<ModuleConfig> {
        Err(Error::UnsupportedFormat {
            extension: suffix(path),
        })
    }
}

/// Evaluates `.py` configs with an external Python interpreter.
#[derive(Debug, Clone)]
pub struct PythonEvaluator {
    interpreter: PathBuf,
}

impl Default for PythonEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl PythonEvaluator {
    /// Use `$TOOLBELT_PYTHON`, falling back to `python3` on `PATH`.
    pub fn new() -> Self {
        let interpreter = std::env::var_os(PYTHON_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INTERPRETER));
        Self { interpreter }
    }

    pub fn with_interpreter(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PayloadKind {
    Mapping,
    Model,
}

#[derive(Debug, Deserialize)]
struct Payload {
    kind: PayloadKind,
    data: Value,
}

impl ScriptEvaluator for PythonEvaluator {
    fn evaluate(&self, path: &Path) -> Result<ModuleConfig> {
        if !path.is_file() {
            return Err(Error::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "config module not found"),
            ));
        }

        tracing::debug!(?path, interpreter = ?self.interpreter, "Evaluating config module");
        let output = Command::new(&self.interpreter)
            .arg("-c")
            .arg(DRIVER)
            .arg(path)
            .output()
            .map_err(|e| Error::io(&self.interpreter, e))?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        match output.status.code() {
            Some(0) => {}
            Some(EXIT_MISSING_CONFIG) => {
                return Err(Error::MissingConfigAttribute {
                    path: path.to_path_buf(),
                });
            }
            Some(EXIT_INVALID_TYPE) => {
                return Err(Error::InvalidConfigType {
                    path: path.to_path_buf(),
                    found: stderr,
                });
            }
            code => {
                return Err(Error::ScriptFailed {
                    path: path.to_path_buf(),
                    code: code.unwrap_or(-1),
                    stderr,
                });
            }
        }

        let payload: Payload = serde_json::from_slice(&output.stdout)?;
        match payload.kind {
            PayloadKind::Mapping => match payload.data {
                Value::Object(map) => Ok(ModuleConfig::Raw(map.into())),
                other => Err(Error::InvalidConfigType {
                    path: path.to_path_buf(),
                    found: value_kind(&other).to_string(),
                }),
            },
            PayloadKind::Model => {
                let config: ToolbeltConfig = serde_json::from_value(payload.data)?;
                Ok(ModuleConfig::Typed(config))
            }
        }
    }
}
