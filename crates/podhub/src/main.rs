//! `podhub` - CLI for the podcast hub
//!
//! Checks episode entries, scaffolds new ones and builds the site directory.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::Context;
use chrono::Local;
use clap::Parser;

use podhub::cli::{
    BuildCommand, CheckCommand, Cli, Command, ConfigCommand, ListCommand, NewCommand,
    OutputFormat,
};
use podhub::site::ManifestEntry;
use podhub::{
    build_site, check_repository, create_episode, init_logging, load_episodes, Config, Episode,
    NewEpisode, Severity,
};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Build(cmd) => handle_build(&config, &cmd),
        Command::Check(cmd) => handle_check(&config, &cmd),
        Command::List(cmd) => handle_list(&config, &cmd),
        Command::New(cmd) => handle_new(&config, cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn handle_build(config: &Config, cmd: &BuildCommand) -> anyhow::Result<ExitCode> {
    let report = build_site(config).context("building site")?;
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Built {}: {} written, {} unchanged, {} episodes",
            report.output_dir.display(),
            report.copied,
            report.unchanged,
            report.episodes
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_check(config: &Config, cmd: &CheckCommand) -> anyhow::Result<ExitCode> {
    let report = check_repository(config);
    let errors = report.count(Severity::Error);
    let warnings = report.count(Severity::Warning);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for finding in &report.findings {
            println!("{finding}");
        }
        println!(
            "Checked {} episodes: {errors} errors, {warnings} warnings",
            report.episodes_checked
        );
    }

    let failed = report.has_errors() || (cmd.strict && warnings > 0);
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<ExitCode> {
    let episodes = load_episodes(&config.episodes_dir()).context("loading episodes")?;
    let selected: Vec<&Episode> = episodes
        .iter()
        .filter(|e| cmd.series.as_deref().map_or(true, |s| e.series == s))
        .take(cmd.limit.unwrap_or(usize::MAX))
        .collect();

    match cmd.format {
        OutputFormat::Json => {
            let entries: Vec<ManifestEntry<'_>> =
                selected.iter().map(|e| ManifestEntry::from(*e)).collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Plain => {
            for episode in &selected {
                println!("{}  {}", episode.date.format("%Y-%m-%d"), episode.title);
            }
        }
        OutputFormat::Table => {
            let series_width = selected
                .iter()
                .map(|e| e.series.len())
                .max()
                .unwrap_or(0)
                .max("SERIES".len());
            println!(
                "{:<10}  {:<series_width$}  {:>8}  TITLE",
                "DATE", "SERIES", "DURATION"
            );
            for episode in &selected {
                println!(
                    "{:<10}  {:<series_width$}  {:>8}  {}",
                    episode.date.format("%Y-%m-%d").to_string(),
                    episode.series,
                    episode.duration,
                    episode.title
                );
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_new(config: &Config, cmd: NewCommand) -> anyhow::Result<ExitCode> {
    let request = NewEpisode {
        title: cmd.title,
        date: cmd.date.unwrap_or_else(|| Local::now().date_naive()),
        series: cmd.series,
        slug: cmd.slug,
        force: cmd.force,
    };
    let path = create_episode(&config.template_dir(), &config.episodes_dir(), &request)
        .context("creating episode")?;
    println!("{}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Paths]");
                println!("  Root:               {}", config.paths.root.display());
                println!("  Episodes:           {}", config.episodes_dir().display());
                println!("  Output:             {}", config.output_dir().display());
                println!("  README:             {}", config.readme_path().display());
                println!("  Templates:          {}", config.template_dir().display());
                println!();
                println!("[Site]");
                println!(
                    "  Static files:       {}",
                    config
                        .site
                        .static_files
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                println!("  Manifest:           {}", config.site.manifest_name);
                println!("  Skip unchanged:     {}", config.site.skip_unchanged);
                println!();
                println!("[Check]");
                println!("  Warn missing slug:  {}", config.check.warn_missing_slug);
                println!("  Warn missing reddit: {}", config.check.warn_missing_reddit);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::user_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(|| podhub::config::PROJECT_CONFIG_FILE.into());
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
