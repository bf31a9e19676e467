//! Profile listing

use std::path::{Path, PathBuf};

use colored::Colorize;
use toolbelt_config::{ProfileConfig, ToolConfig};

use crate::commands::load;
use crate::error::{CliError, Result};

/// List every profile, or only `profile`
pub fn run_list(cwd: &Path, configs: &[PathBuf], profile: Option<&str>) -> Result<()> {
    let config = load(cwd, configs)?;

    let selected: Vec<&ProfileConfig> = match profile {
        Some(name) => {
            let found = config.profile(name).ok_or_else(|| {
                CliError::user(format!(
                    "Unknown profile '{}'. Available: {}",
                    name,
                    config.list_profiles().join(", ")
                ))
            })?;
            vec![found]
        }
        None => config.profiles.values().collect(),
    };

    if selected.is_empty() {
        println!("{}", "No profiles configured.".dimmed());
        return Ok(());
    }

    for (i, profile) in selected.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_profile(profile);
    }

    Ok(())
}

fn print_profile(profile: &ProfileConfig) {
    println!("{}", profile.name.bold());
    println!(
        "  {:<12} {}",
        "Extensions:".dimmed(),
        if profile.extensions.is_empty() {
            "(none)".to_string()
        } else {
            profile.extensions.join(" ")
        }
    );
    print_tools("Check", &profile.check_tools);
    print_tools("Format", &profile.format_tools);
}

fn print_tools(label: &str, tools: &[ToolConfig]) {
    if tools.is_empty() {
        println!("  {:<12} {}", format!("{label}:").dimmed(), "(none)".dimmed());
        return;
    }
    println!("  {}:", label.dimmed());
    for tool in tools {
        let description = tool.description.as_deref().unwrap_or("");
        println!(
            "    {} {:<18} [{}] {}",
            "+".green(),
            tool.name,
            tool.file_handling_mode,
            description.dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &Path) -> PathBuf {
        let path = dir.join("toolbelt.yaml");
        std::fs::write(
            &path,
            "profiles:\n  python:\n    extensions: [py]\n    check_tools:\n      - {name: ruff, command: ruff}\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_list_known_profile() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path());
        assert!(run_list(temp.path(), &[path], Some("python")).is_ok());
    }

    #[test]
    fn test_list_unknown_profile_is_user_error() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path());

        let err = run_list(temp.path(), &[path], Some("rust")).unwrap_err();
        assert!(matches!(err, CliError::User { .. }));
        assert!(err.to_string().contains("Available: python"));
    }
}
