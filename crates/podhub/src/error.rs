//! Error types for podhub.
//!
//! This module defines all error types used throughout the podhub crate,
//! carrying the offending path wherever one exists so that a contributor can
//! find the file that needs fixing.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for podhub operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Front Matter Errors ===
    /// The file does not open with a `---` line.
    #[error("{path} does not start with a '---' front matter line")]
    FrontMatterMissing {
        /// Path to the episode file.
        path: PathBuf,
    },

    /// The opening `---` line is never closed.
    #[error("{path} has no closing '---' line ending its front matter")]
    FrontMatterUnterminated {
        /// Path to the episode file.
        path: PathBuf,
    },

    /// The front matter is not valid YAML for the expected fields.
    #[error("failed to parse front matter in {path}: {source}")]
    FrontMatterInvalid {
        /// Path to the episode file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_yaml::Error,
    },

    // === Loading Errors ===
    /// A file inside a series directory is not Markdown.
    #[error("not a markdown file: {path}")]
    NotMarkdown {
        /// Path to the offending file.
        path: PathBuf,
    },

    /// A directory could not be listed.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        /// Path to the directory.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A file could not be read.
    #[error("failed to read {path}: {source}")]
    FileRead {
        /// Path to the file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Naming Errors ===
    /// A title produced an empty slug.
    #[error("cannot derive a file name from title {title:?}")]
    EmptySlug {
        /// The title that was slugified.
        title: String,
    },

    /// A title produced the slug reserved for templates.
    #[error("title {title:?} would name a template file; choose another title or slug")]
    ReservedSlug {
        /// The title that was slugified.
        title: String,
    },

    // === Template Errors ===
    /// No `YYYY-MM-DD-template.md` file was found.
    #[error("no dated template (YYYY-MM-DD-template.md) found in {dir}")]
    TemplateNotFound {
        /// Directory that was searched.
        dir: PathBuf,
    },

    /// The template front matter is not a YAML mapping.
    #[error("template {path} front matter must be a mapping")]
    TemplateShape {
        /// Path to the template.
        path: PathBuf,
    },

    /// A series name is not a plain directory name.
    #[error("invalid series name {name:?}")]
    InvalidSeries {
        /// The rejected name.
        name: String,
    },

    /// Refusing to overwrite an existing episode file.
    #[error("episode file already exists: {path} (use --force to overwrite)")]
    EpisodeExists {
        /// Path to the existing file.
        path: PathBuf,
    },

    /// Writing a generated file failed.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        /// Path to the file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Site Errors ===
    /// A configured static asset does not exist.
    #[error("static file not found: {path}")]
    StaticFileMissing {
        /// Path to the missing asset.
        path: PathBuf,
    },

    /// Copying a file into the output directory failed.
    #[error("failed to copy {from} to {to}: {source}")]
    FileCopy {
        /// Source path.
        from: PathBuf,
        /// Target path.
        to: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A specialized Result type for podhub operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a configuration validation error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create a file read error for the given path.
    #[must_use]
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Create a directory read error for the given path.
    #[must_use]
    pub fn directory_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryRead {
            path: path.into(),
            source,
        }
    }

    /// Check if this error comes from a malformed episode file.
    #[must_use]
    pub fn is_front_matter_error(&self) -> bool {
        matches!(
            self,
            Self::FrontMatterMissing { .. }
                | Self::FrontMatterUnterminated { .. }
                | Self::FrontMatterInvalid { .. }
        )
    }
}
