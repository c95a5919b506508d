//! Episode entries.
//!
//! An episode is a Markdown file whose YAML front matter sits between two
//! `---` lines:
//!
//! ```text
//! ---
//! title: Interview with Ferris
//! date: 2024-05-01T18:00:00Z
//! file: https://cdn.example.org/ep42.mp3
//! duration: "01:02:03"
//! length: "59612345"
//! ---
//! Show notes in Markdown.
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::naming::{slugify, DatedName};

/// Front matter delimiter line.
const DELIMITER: &str = "---";

/// A single podcast episode entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Episode title.
    pub title: String,

    /// Publication time.
    pub date: DateTime<Utc>,

    /// URL slug; derived from the file name or title when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// Location of the exported audio.
    pub file: String,

    /// Running time as written by the author.
    pub duration: String,

    /// Audio file size as written by the author.
    pub length: String,

    /// Discussion thread link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reddit: Option<String>,

    /// Markdown following the front matter.
    #[serde(default)]
    pub body: String,

    /// Series directory this episode was loaded from.
    #[serde(skip_deserializing)]
    pub series: String,

    /// File the episode was loaded from.
    #[serde(skip_deserializing)]
    pub source: PathBuf,
}

/// Split a document into its front matter and body.
///
/// The document must open with a `---` line; the front matter runs until
/// the next line consisting only of `---`. Both LF and CRLF endings are
/// accepted. The body is everything after the closing line.
///
/// # Errors
///
/// Returns [`Error::FrontMatterMissing`] or [`Error::FrontMatterUnterminated`]
/// naming `path`.
pub fn split_front_matter<'a>(path: &Path, content: &'a str) -> Result<(&'a str, &'a str)> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
        .ok_or_else(|| Error::FrontMatterMissing {
            path: path.to_path_buf(),
        })?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            return Ok((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    Err(Error::FrontMatterUnterminated {
        path: path.to_path_buf(),
    })
}

impl Episode {
    /// Parse an episode from file content.
    ///
    /// `series` and `source` are left empty; the loader fills them in.
    ///
    /// # Errors
    ///
    /// Returns a front matter error naming `path` if the delimiters are
    /// missing or the YAML does not describe an episode.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let (front_matter, body) = split_front_matter(path, content)?;
        let mut episode: Episode =
            serde_yaml::from_str(front_matter).map_err(|source| Error::FrontMatterInvalid {
                path: path.to_path_buf(),
                source,
            })?;
        episode.body = body.to_string();
        Ok(episode)
    }

    /// Read and parse an episode file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
        let mut episode = Self::parse(path, &content)?;
        episode.source = path.to_path_buf();
        Ok(episode)
    }

    /// The effective slug.
    ///
    /// Uses the explicit `slug` when non-empty, then the stem of a dated
    /// source file name, then the slugified title.
    #[must_use]
    pub fn slug(&self) -> String {
        if let Some(slug) = self.slug.as_deref().filter(|s| !s.trim().is_empty()) {
            return slug.to_string();
        }
        if let Some(name) = DatedName::from_path(&self.source) {
            return name.stem;
        }
        slugify(&self.title)
    }

    /// The dated name of the source file, if it follows the convention.
    #[must_use]
    pub fn dated_name(&self) -> Option<DatedName> {
        DatedName::from_path(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &str = "---\ntitle: Interview with Ferris\ndate: 2024-05-01T18:00:00Z\nslug: ferris\nfile: https://cdn.example.org/ep42.mp3\nduration: \"01:02:03\"\nlength: \"59612345\"\nreddit: https://reddit.com/r/x/1\n---\nShow notes.\n";

    fn path() -> PathBuf {
        PathBuf::from("_episodes/main/2024-05-01-interview-with-ferris.md")
    }

    #[test]
    fn test_split_front_matter() {
        let (front, body) = split_front_matter(&path(), "---\na: 1\n---\nbody\n").unwrap();
        assert_eq!(front, "a: 1\n");
        assert_eq!(body, "body\n");
    }

    #[test]
    fn test_split_front_matter_crlf() {
        let (front, body) = split_front_matter(&path(), "---\r\na: 1\r\n---\r\nbody").unwrap();
        assert_eq!(front, "a: 1\r\n");
        assert_eq!(body, "body");
    }

    #[test]
    fn test_split_front_matter_closing_at_eof() {
        let (front, body) = split_front_matter(&path(), "---\na: 1\n---").unwrap();
        assert_eq!(front, "a: 1\n");
        assert_eq!(body, "");
    }

    #[test]
    fn test_split_front_matter_ignores_inline_dashes() {
        let content = "---\ntitle: before---after\n---\nbody";
        let (front, body) = split_front_matter(&path(), content).unwrap();
        assert_eq!(front, "title: before---after\n");
        assert_eq!(body, "body");
    }

    #[test]
    fn test_split_front_matter_missing() {
        let err = split_front_matter(&path(), "title: x\n---\n").unwrap_err();
        assert!(matches!(err, Error::FrontMatterMissing { .. }));
    }

    #[test]
    fn test_split_front_matter_unterminated() {
        let err = split_front_matter(&path(), "---\ntitle: x\n").unwrap_err();
        assert!(matches!(err, Error::FrontMatterUnterminated { .. }));
    }

    #[test]
    fn test_parse_episode() {
        let episode = Episode::parse(&path(), SAMPLE).unwrap();

        assert_eq!(episode.title, "Interview with Ferris");
        assert_eq!(
            episode.date,
            Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap()
        );
        assert_eq!(episode.slug.as_deref(), Some("ferris"));
        assert_eq!(episode.duration, "01:02:03");
        assert_eq!(episode.length, "59612345");
        assert_eq!(episode.body, "Show notes.\n");
        assert!(episode.series.is_empty());
    }

    #[test]
    fn test_parse_optional_fields_absent() {
        let content = "---\ntitle: T\ndate: 2020-01-01T00:00:00Z\nfile: a.mp3\nduration: \"1\"\nlength: \"2\"\n---\n";
        let episode = Episode::parse(&path(), content).unwrap();
        assert!(episode.slug.is_none());
        assert!(episode.reddit.is_none());
        assert!(episode.body.is_empty());
    }

    #[test]
    fn test_parse_missing_required_field() {
        let content = "---\ntitle: T\ndate: 2020-01-01T00:00:00Z\n---\n";
        let err = Episode::parse(&path(), content).unwrap_err();
        assert!(matches!(err, Error::FrontMatterInvalid { .. }));
        assert!(err.to_string().contains("2024-05-01-interview-with-ferris.md"));
    }

    #[test]
    fn test_parse_bad_date() {
        let content = "---\ntitle: T\ndate: yesterday\nfile: a\nduration: \"1\"\nlength: \"2\"\n---\n";
        let err = Episode::parse(&path(), content).unwrap_err();
        assert!(err.is_front_matter_error());
    }

    #[test]
    fn test_slug_prefers_explicit() {
        let episode = Episode::parse(&path(), SAMPLE).unwrap();
        assert_eq!(episode.slug(), "ferris");
    }

    #[test]
    fn test_slug_falls_back_to_file_name() {
        let mut episode = Episode::parse(&path(), SAMPLE).unwrap();
        episode.slug = Some("  ".to_string());
        episode.source = path();
        assert_eq!(episode.slug(), "interview-with-ferris");
    }

    #[test]
    fn test_slug_falls_back_to_title() {
        let mut episode = Episode::parse(&path(), SAMPLE).unwrap();
        episode.slug = None;
        episode.source = PathBuf::from("_episodes/main/notes.md");
        assert_eq!(episode.slug(), "interview-with-ferris");
    }

    #[test]
    fn test_serialize_skips_absent_options() {
        let mut episode = Episode::parse(&path(), SAMPLE).unwrap();
        episode.reddit = None;
        let json = serde_json::to_value(&episode).unwrap();
        assert!(json.get("reddit").is_none());
        assert_eq!(json["slug"], "ferris");
    }
}
