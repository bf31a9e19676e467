//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// toolbelt - Inspect the effective lint/format configuration of a project
#[derive(Parser, Debug)]
#[command(name = "toolbelt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file to load instead of discovering one (repeatable)
    #[arg(short, long = "config", global = true, value_name = "PATH")]
    pub configs: Vec<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show the effective configuration
    ///
    /// Lists the contributing sources in load order, then variables,
    /// global exclude patterns and profiles.
    Config {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List profiles and their tools
    List {
        /// Only show this profile
        profile: Option<String>,
    },

    /// Print the command line a tool would run
    ///
    /// Examples:
    ///   toolbelt command python ruff-check
    ///   toolbelt command javascript prettier src/app.js
    Command {
        /// Profile containing the tool
        profile: String,

        /// Tool name (check tools are searched first)
        tool: String,

        /// Files for per-file tools, or targets for batch tools
        files: Vec<String>,
    },
}
