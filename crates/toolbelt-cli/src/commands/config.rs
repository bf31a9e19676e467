//! Effective configuration display

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::commands::load;
use crate::error::Result;

/// Display the effective configuration
pub fn run_config(cwd: &Path, configs: &[PathBuf], json: bool) -> Result<()> {
    let config = load(cwd, configs)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Effective Configuration".bold());
    println!();

    println!("  {}:", "Sources".dimmed());
    for (i, source) in config.sources.iter().enumerate() {
        println!("    {:>2}. {}", i + 1, source);
    }
    println!();

    if config.variables.is_empty() {
        println!("  {:<18} {}", "Variables:".dimmed(), "(none)".dimmed());
    } else {
        println!("  {}:", "Variables".dimmed());
        for (name, value) in &config.variables {
            println!("    {} = {}", name.cyan(), value);
        }
    }
    println!();

    if config.global_exclude_patterns.is_empty() {
        println!("  {:<18} {}", "Global excludes:".dimmed(), "(none)".dimmed());
    } else {
        println!("  {}:", "Global excludes".dimmed());
        for pattern in &config.global_exclude_patterns {
            println!("    {} {}", "-".red(), pattern);
        }
    }
    println!();

    if config.profiles.is_empty() {
        println!("  {:<18} {}", "Profiles:".dimmed(), "(none)".dimmed());
    } else {
        println!("  {}:", "Profiles".dimmed());
        for (name, profile) in &config.profiles {
            println!(
                "    {} {:<14} {} check, {} format",
                "+".green(),
                name,
                profile.check_tools.len(),
                profile.format_tools.len()
            );
        }
    }

    Ok(())
}
