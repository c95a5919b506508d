//! Command-line interface for podhub.
//!
//! This module provides the CLI structure for the `podhub` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    BuildCommand, CheckCommand, ConfigCommand, ListCommand, NewCommand, OutputFormat,
};

/// podhub - Episode tooling for the podcast hub
///
/// Checks contributed episode entries, scaffolds new ones from the dated
/// template and assembles the static site directory.
#[derive(Debug, Parser)]
#[command(name = "podhub")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to project configuration file (default: ./podhub.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the static site directory
    Build(BuildCommand),

    /// Check the README, templates and episode entries
    Check(CheckCommand),

    /// List episodes
    List(ListCommand),

    /// Create a new episode entry from the latest template
    New(NewCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
