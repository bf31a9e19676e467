//! Tool command-line materialization

use std::path::{Path, PathBuf};

use toolbelt_config::{Environment, ToolConfig};

use crate::commands::load;
use crate::error::{CliError, Result};

/// Print the command line `tool` of `profile` would run with `files`.
///
/// `files` are passed as files to per-file tools and as targets to batch
/// tools. Variables are resolved against the process environment.
pub fn run_command(
    cwd: &Path,
    configs: &[PathBuf],
    profile: &str,
    tool: &str,
    files: &[String],
) -> Result<()> {
    let config = load(cwd, configs)?;

    let found = config.profile(profile).ok_or_else(|| {
        CliError::user(format!(
            "Unknown profile '{}'. Available: {}",
            profile,
            config.list_profiles().join(", ")
        ))
    })?;
    let tool_config: &ToolConfig = found.tool(tool).ok_or_else(|| {
        let names: Vec<&str> = found
            .check_tools
            .iter()
            .chain(found.format_tools.iter())
            .map(|t| t.name.as_str())
            .collect();
        CliError::user(format!(
            "Unknown tool '{}' in profile '{}'. Available: {}",
            tool,
            profile,
            names.join(", ")
        ))
    })?;

    let variables = config.resolved_variables(&Environment::from_process());
    let command = tool_config.command_line(files, files, &variables);
    tracing::debug!(unexpanded = ?command.unexpanded_base_command, "Materialized command");

    println!("{}", command.display());
    Ok(())
}
