//! Creating new episode entries from the dated template.
//!
//! Contributors copy the newest `YYYY-MM-DD-template.md`, fill in its
//! fields and open a pull request. [`create_episode`] does the copy and
//! fills in the fields it knows (title, date, slug), leaving every other
//! template field for the contributor.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime, SecondsFormat};
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use crate::episode::split_front_matter;
use crate::error::{Error, Result};
use crate::naming::{episode_file_name, DatedName};

/// What to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEpisode {
    /// Episode title.
    pub title: String,
    /// Publication date; also the file name prefix.
    pub date: NaiveDate,
    /// Series directory to create the entry in.
    pub series: String,
    /// Slug override; slugified like a title.
    pub slug: Option<String>,
    /// Overwrite an existing entry.
    pub force: bool,
}

/// Find the template with the newest date in `dir`.
///
/// # Errors
///
/// Returns [`Error::TemplateNotFound`] if `dir` holds no dated template,
/// or [`Error::DirectoryRead`] if it cannot be listed.
pub fn find_latest_template(dir: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(dir).map_err(|e| Error::directory_read(dir, e))?;

    let mut latest: Option<(DatedName, PathBuf)> = None;
    for entry in entries {
        let entry = entry.map_err(|e| Error::directory_read(dir, e))?;
        let path = entry.path();
        let Some(name) = DatedName::from_path(&path).filter(DatedName::is_template) else {
            continue;
        };
        if !path.is_file() {
            continue;
        }
        if latest.as_ref().map_or(true, |(best, _)| name > *best) {
            latest = Some((name, path));
        }
    }

    latest
        .map(|(_, path)| path)
        .ok_or_else(|| Error::TemplateNotFound {
            dir: dir.to_path_buf(),
        })
}

/// Copy the newest template in `template_dir` into a new episode entry
/// under `episodes_dir`, returning the path written.
///
/// # Errors
///
/// Fails if no template exists, the template front matter is not a
/// mapping, the series name is not a plain directory name, the target
/// already exists without `force`, or any file operation fails.
pub fn create_episode(
    template_dir: &Path,
    episodes_dir: &Path,
    request: &NewEpisode,
) -> Result<PathBuf> {
    validate_series(&request.series)?;

    let template = find_latest_template(template_dir)?;
    debug!("Using template {}", template.display());
    let content = fs::read_to_string(&template).map_err(|e| Error::file_read(&template, e))?;
    let (front_matter, body) = split_front_matter(&template, &content)?;

    let name = episode_file_name(
        request.date,
        request.slug.as_deref().unwrap_or(&request.title),
    )?;

    let parsed: Value =
        serde_yaml::from_str(front_matter).map_err(|source| Error::FrontMatterInvalid {
            path: template.clone(),
            source,
        })?;
    let mut fields = match parsed {
        Value::Mapping(fields) => fields,
        Value::Null => Mapping::new(),
        _ => return Err(Error::TemplateShape { path: template }),
    };
    let date = request
        .date
        .and_time(NaiveTime::MIN)
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Secs, true);
    fields.insert("title".into(), request.title.clone().into());
    fields.insert("date".into(), date.into());
    fields.insert("slug".into(), name.stem.clone().into());
    let rendered = format!("---\n{}---\n{body}", serde_yaml::to_string(&fields)?);

    let series_dir = episodes_dir.join(&request.series);
    let target = series_dir.join(name.file_name());
    if target.exists() && !request.force {
        return Err(Error::EpisodeExists { path: target });
    }

    fs::create_dir_all(&series_dir).map_err(|source| Error::DirectoryCreate {
        path: series_dir.clone(),
        source,
    })?;
    fs::write(&target, rendered).map_err(|source| Error::FileWrite {
        path: target.clone(),
        source,
    })?;
    info!("Created {}", target.display());
    Ok(target)
}

fn validate_series(series: &str) -> Result<()> {
    let plain = !series.is_empty()
        && !series.starts_with('.')
        && !series.contains(['/', '\\']);
    if plain {
        Ok(())
    } else {
        Err(Error::InvalidSeries {
            name: series.to_string(),
        })
    }
}
