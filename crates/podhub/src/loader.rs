//! Loading episode entries from the repository.
//!
//! Layout: `<episodes_dir>/<series>/<YYYY-MM-DD-slug>.md`. Every series
//! directory may contain only Markdown files; dated templates placed
//! alongside episodes are skipped.

use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::episode::Episode;
use crate::error::{Error, Result};
use crate::naming::DatedName;

/// The result of loading one file.
#[derive(Debug)]
pub struct LoadOutcome {
    /// The file that was loaded.
    pub path: PathBuf,
    /// The parsed episode, or why it could not be loaded.
    pub result: Result<Episode>,
}

/// Load every episode under `episodes_dir`, newest first.
///
/// # Errors
///
/// Fails on the first directory that cannot be read or file that cannot
/// be loaded.
pub fn load_episodes(episodes_dir: &Path) -> Result<Vec<Episode>> {
    let mut episodes = load_episodes_lenient(episodes_dir)?
        .into_iter()
        .map(|outcome| outcome.result)
        .collect::<Result<Vec<_>>>()?;
    sort_newest_first(&mut episodes);
    info!(
        "Loaded {} episodes from {}",
        episodes.len(),
        episodes_dir.display()
    );
    Ok(episodes)
}

/// Load every episode file, keeping per-file failures.
///
/// Outcomes are ordered by path.
///
/// # Errors
///
/// Only fails if a directory cannot be listed.
pub fn load_episodes_lenient(episodes_dir: &Path) -> Result<Vec<LoadOutcome>> {
    let mut outcomes = Vec::new();

    for series_dir in list_dir(episodes_dir)? {
        if !series_dir.is_dir() {
            debug!("Ignoring {} outside any series", series_dir.display());
            continue;
        }
        let series = series_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        for path in list_dir(&series_dir)? {
            if path.is_dir() {
                debug!("Ignoring nested directory {}", path.display());
                continue;
            }
            if DatedName::from_path(&path).is_some_and(|name| name.is_template()) {
                debug!("Skipping template {}", path.display());
                continue;
            }
            let result = load_file(&path, &series);
            outcomes.push(LoadOutcome { path, result });
        }
    }

    Ok(outcomes)
}

fn load_file(path: &Path, series: &str) -> Result<Episode> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
        return Err(Error::NotMarkdown {
            path: path.to_path_buf(),
        });
    }
    debug!("Loading episode {}", path.display());
    let mut episode = Episode::from_file(path)?;
    episode.series = series.to_string();
    Ok(episode)
}

/// List non-hidden entries of a directory, sorted by path.
fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::directory_read(dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::directory_read(dir, e))?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

/// Newest first; ties by series, then by source path.
pub fn sort_newest_first(episodes: &mut [Episode]) {
    episodes.sort_by(|a, b| {
        (Reverse(a.date), &a.series, &a.source).cmp(&(Reverse(b.date), &b.series, &b.source))
    });
}
