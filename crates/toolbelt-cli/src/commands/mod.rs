//! Command implementations for toolbelt-cli

pub mod command;
pub mod config;
pub mod list;

use std::path::{Path, PathBuf};

use toolbelt_config::{ConfigLoader, ToolbeltConfig};

use crate::error::Result;

pub use command::run_command;
pub use config::run_config;
pub use list::run_list;

/// Load the effective configuration for `cwd`.
///
/// Explicit `--config` paths replace discovery.
pub fn load(cwd: &Path, configs: &[PathBuf]) -> Result<ToolbeltConfig> {
    let loader = ConfigLoader::new().with_cwd(cwd);
    let explicit = (!configs.is_empty()).then_some(configs);
    Ok(loader.load(explicit)?)
}
