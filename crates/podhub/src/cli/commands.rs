//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

/// Build command arguments.
#[derive(Debug, Args)]
pub struct BuildCommand {
    /// Print the build report as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Check command arguments.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Output findings as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only list episodes from this series
    #[arg(short, long)]
    pub series: Option<String>,

    /// Maximum number of episodes, newest first
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// New episode command arguments.
#[derive(Debug, Args)]
pub struct NewCommand {
    /// Episode title
    pub title: String,

    /// Series directory to create the entry in
    #[arg(short, long, default_value = "main")]
    pub series: String,

    /// Publication date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Slug to use instead of one derived from the title
    #[arg(long)]
    pub slug: Option<String>,

    /// Overwrite an existing entry
    #[arg(short, long)]
    pub force: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the per-user configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Plain,
    /// Formatted table
    #[default]
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_new_command_debug() {
        let cmd = NewCommand {
            title: "Hello".to_string(),
            series: "main".to_string(),
            date: None,
            slug: None,
            force: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Hello"));
        assert!(debug_str.contains("series"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        assert!(format!("{cmd:?}").contains("Show"));
    }
}
