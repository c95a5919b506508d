//! Dated file naming conventions.
//!
//! Episode entries and templates share one scheme: `YYYY-MM-DD-<stem>.md`.
//! A template is the special case whose stem is `template`; an episode's
//! stem is the slug of its title.

use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{Error, Result};

/// Stem reserved for episode templates.
pub const TEMPLATE_STEM: &str = "template";

fn dated_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4}-\d{2}-\d{2})-([a-z0-9][a-z0-9-]*)\.md$").expect("valid regex")
    })
}

fn non_slug_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"))
}

/// A file name following the `YYYY-MM-DD-<stem>.md` convention.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatedName {
    /// The date prefix.
    pub date: NaiveDate,
    /// Everything between the date and the `.md` extension.
    pub stem: String,
}

impl DatedName {
    /// Parse a bare file name. Returns `None` if it does not follow the
    /// convention or the date is not a real calendar date.
    #[must_use]
    pub fn parse(file_name: &str) -> Option<Self> {
        let caps = dated_name_regex().captures(file_name)?;
        let date = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()?;
        Some(Self {
            date,
            stem: caps[2].to_string(),
        })
    }

    /// Parse the file name component of a path.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(Self::parse)
    }

    /// Whether this names an episode template.
    #[must_use]
    pub fn is_template(&self) -> bool {
        self.stem == TEMPLATE_STEM
    }

    /// Format back into a file name.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DatedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}.md", self.date.format("%Y-%m-%d"), self.stem)
    }
}

/// Reduce free text to a URL-safe slug.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single `-`, and trims leading and trailing dashes.
#[must_use]
pub fn slugify(text: &str) -> String {
    let lowered = text.to_ascii_lowercase();
    non_slug_regex()
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Build the file name for a new episode entry.
///
/// # Errors
///
/// Returns [`Error::EmptySlug`] if the title has no slug-able characters,
/// or [`Error::ReservedSlug`] if it would name a template.
pub fn episode_file_name(date: NaiveDate, title: &str) -> Result<DatedName> {
    let stem = slugify(title);
    if stem.is_empty() {
        return Err(Error::EmptySlug {
            title: title.to_string(),
        });
    }
    if stem == TEMPLATE_STEM {
        return Err(Error::ReservedSlug {
            title: title.to_string(),
        });
    }
    Ok(DatedName { date, stem })
}
