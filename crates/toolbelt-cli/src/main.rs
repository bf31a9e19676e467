//! toolbelt CLI
//!
//! Read-only inspection of the configuration a project resolves to.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)
        .map_err(|e| CliError::user(format!("Failed to initialise logging: {e}")))?;
    tracing::debug!(configs = ?cli.configs, "Starting toolbelt");

    match cli.command {
        Some(cmd) => execute_command(cmd, &cli.configs),
        None => {
            println!("{} configuration inspector", "toolbelt".green().bold());
            println!();
            println!("Run {} for available commands.", "toolbelt --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands, configs: &[std::path::PathBuf]) -> Result<()> {
    let cwd = std::env::current_dir()?;
    match cmd {
        Commands::Config { json } => commands::run_config(&cwd, configs, json),
        Commands::List { profile } => commands::run_list(&cwd, configs, profile.as_deref()),
        Commands::Command {
            profile,
            tool,
            files,
        } => commands::run_command(&cwd, configs, &profile, &tool, &files),
    }
}
