//! Static site assembly.
//!
//! Builds the output directory: static assets are copied from the
//! repository root and all episodes are summarized into a JSON manifest.
//! Outputs whose content hash already matches are left untouched so that
//! rebuilding an unchanged hub does not touch file modification times.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::episode::Episode;
use crate::error::{Error, Result};
use crate::loader::load_episodes;

/// Summary of one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Where the site was written.
    pub output_dir: PathBuf,
    /// Outputs written this run.
    pub copied: usize,
    /// Outputs skipped because their content was unchanged.
    pub unchanged: usize,
    /// Episodes listed in the manifest.
    pub episodes: usize,
}

/// One manifest record. The episode body is left out.
#[derive(Debug, Serialize)]
pub struct ManifestEntry<'a> {
    /// Episode title.
    pub title: &'a str,
    /// Publication time.
    pub date: DateTime<Utc>,
    /// Effective slug.
    pub slug: String,
    /// Series directory.
    pub series: &'a str,
    /// Audio location.
    pub file: &'a str,
    /// Running time.
    pub duration: &'a str,
    /// Audio size.
    pub length: &'a str,
    /// Discussion link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reddit: Option<&'a str>,
}

impl<'a> From<&'a Episode> for ManifestEntry<'a> {
    fn from(episode: &'a Episode) -> Self {
        Self {
            title: &episode.title,
            date: episode.date,
            slug: episode.slug(),
            series: &episode.series,
            file: &episode.file,
            duration: &episode.duration,
            length: &episode.length,
            reddit: episode.reddit.as_deref(),
        }
    }
}

/// Build the site described by `config`.
///
/// # Errors
///
/// Fails if the output directory cannot be created, a static file is
/// missing, an episode cannot be loaded, or a write fails.
pub fn build_site(config: &Config) -> Result<BuildReport> {
    let output_dir = config.output_dir();
    fs::create_dir_all(&output_dir).map_err(|source| Error::DirectoryCreate {
        path: output_dir.clone(),
        source,
    })?;

    let mut report = BuildReport {
        output_dir: output_dir.clone(),
        ..BuildReport::default()
    };
    let skip = config.site.skip_unchanged;

    for file in &config.site.static_files {
        let from = config.resolve(file);
        let to = output_dir.join(file);
        record(&mut report, copy_static(&from, &to, skip)?);
    }

    let episodes = load_episodes(&config.episodes_dir())?;
    let entries: Vec<ManifestEntry<'_>> = episodes.iter().map(ManifestEntry::from).collect();
    let manifest = serde_json::to_vec_pretty(&entries)?;
    record(
        &mut report,
        write_if_changed(&config.manifest_path(), &manifest, skip)?,
    );
    report.episodes = episodes.len();

    info!(
        "Built {} ({} written, {} unchanged, {} episodes)",
        output_dir.display(),
        report.copied,
        report.unchanged,
        report.episodes
    );
    Ok(report)
}

fn record(report: &mut BuildReport, written: bool) {
    if written {
        report.copied += 1;
    } else {
        report.unchanged += 1;
    }
}

/// Copy one static asset. Returns whether the target was written.
fn copy_static(from: &Path, to: &Path, skip_unchanged: bool) -> Result<bool> {
    if !from.is_file() {
        return Err(Error::StaticFileMissing {
            path: from.to_path_buf(),
        });
    }
    if skip_unchanged && same_content(from, to)? {
        debug!("Unchanged {}", to.display());
        return Ok(false);
    }
    ensure_parent(to)?;
    fs::copy(from, to).map_err(|source| Error::FileCopy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;
    debug!("Copied {} -> {}", from.display(), to.display());
    Ok(true)
}

/// Write generated bytes. Returns whether the target was written.
fn write_if_changed(to: &Path, bytes: &[u8], skip_unchanged: bool) -> Result<bool> {
    if skip_unchanged && hash_file(to)? == Some(blake3::hash(bytes)) {
        debug!("Unchanged {}", to.display());
        return Ok(false);
    }
    ensure_parent(to)?;
    fs::write(to, bytes).map_err(|source| Error::FileWrite {
        path: to.to_path_buf(),
        source,
    })?;
    debug!("Wrote {}", to.display());
    Ok(true)
}

fn same_content(a: &Path, b: &Path) -> Result<bool> {
    let (Some(a), Some(b)) = (hash_file(a)?, hash_file(b)?) else {
        return Ok(false);
    };
    Ok(a == b)
}

/// BLAKE3 hash of a file's bytes, or `None` if it does not exist.
fn hash_file(path: &Path) -> Result<Option<blake3::Hash>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(blake3::hash(&bytes))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::file_read(path, e)),
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}
