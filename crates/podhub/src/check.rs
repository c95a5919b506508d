//! Repository checks run before accepting a contribution.
//!
//! Errors block a pull request; warnings point at entries that work but
//! stray from the conventions.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::error::Error;
use crate::loader::load_episodes_lenient;
use crate::template::find_latest_template;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Stray from convention.
    Warning,
    /// Must be fixed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One problem found in the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// How serious it is.
    pub severity: Severity,
    /// The file concerned.
    pub path: PathBuf,
    /// What is wrong.
    pub message: String,
}

impl Finding {
    fn error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path: path.into(),
            message: message.into(),
        }
    }

    fn warning(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.path.display(), self.message)
    }
}

/// Everything `check` found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Episode files examined.
    pub episodes_checked: usize,
    /// Findings, errors first.
    pub findings: Vec<Finding>,
}

impl CheckReport {
    /// Whether any finding is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    /// Number of findings with the given severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }
}

/// Run every check against the repository described by `config`.
#[must_use]
pub fn check_repository(config: &Config) -> CheckReport {
    let mut report = CheckReport::default();

    check_readme(&config.readme_path(), &mut report.findings);
    check_template(&config.template_dir(), &mut report.findings);
    report.episodes_checked = check_episodes(config, &mut report.findings);

    report
        .findings
        .sort_by(|a, b| b.severity.cmp(&a.severity).then_with(|| a.path.cmp(&b.path)));
    report
}

fn check_readme(path: &Path, findings: &mut Vec<Finding>) {
    match std::fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => {
            findings.push(Finding::error(path, "README is empty"));
        }
        Ok(_) => debug!("README present at {}", path.display()),
        Err(e) => findings.push(Finding::error(path, format!("README is unreadable: {e}"))),
    }
}

fn check_template(dir: &Path, findings: &mut Vec<Finding>) {
    match find_latest_template(dir) {
        Ok(path) => debug!("Latest template is {}", path.display()),
        Err(e) => findings.push(Finding::error(dir, e.to_string())),
    }
}

fn check_episodes(config: &Config, findings: &mut Vec<Finding>) -> usize {
    let episodes_dir = config.episodes_dir();
    let outcomes = match load_episodes_lenient(&episodes_dir) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            findings.push(Finding::error(&episodes_dir, e.to_string()));
            return 0;
        }
    };

    let mut slugs: HashMap<(String, String), PathBuf> = HashMap::new();
    for outcome in &outcomes {
        let episode = match &outcome.result {
            Ok(episode) => episode,
            Err(e) => {
                findings.push(Finding::error(&outcome.path, describe(e)));
                continue;
            }
        };
        let path = &outcome.path;

        match episode.dated_name() {
            None => findings.push(Finding::warning(
                path,
                "file name does not follow YYYY-MM-DD-<slug>.md",
            )),
            Some(name) if name.date != episode.date.date_naive() => {
                findings.push(Finding::warning(
                    path,
                    format!(
                        "file name date {} differs from front matter date {}",
                        name.date,
                        episode.date.date_naive()
                    ),
                ));
            }
            Some(_) => {}
        }

        if config.check.warn_missing_slug && episode.slug.is_none() {
            findings.push(Finding::warning(path, "missing slug in front matter"));
        }
        if config.check.warn_missing_reddit && episode.reddit.is_none() {
            findings.push(Finding::warning(path, "missing reddit in front matter"));
        }

        let key = (episode.series.clone(), episode.slug());
        if let Some(first) = slugs.get(&key) {
            findings.push(Finding::error(
                path,
                format!(
                    "slug '{}' already used by {} in series '{}'",
                    key.1,
                    first.display(),
                    key.0
                ),
            ));
        } else {
            slugs.insert(key, path.clone());
        }
    }

    outcomes.len()
}

/// The path is already carried by the finding; keep only the cause.
fn describe(err: &Error) -> String {
    match err {
        Error::FrontMatterMissing { .. } => "does not start with a '---' line".to_string(),
        Error::FrontMatterUnterminated { .. } => "front matter is never closed by '---'".to_string(),
        Error::FrontMatterInvalid { source, .. } => format!("invalid front matter: {source}"),
        Error::NotMarkdown { .. } => "not a markdown file".to_string(),
        other => other.to_string(),
    }
}
