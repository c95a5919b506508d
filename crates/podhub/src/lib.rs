//! `podhub` - Episode tooling for a podcast documentation hub
//!
//! The hub itself is Markdown: a README with the recording and editing
//! recipe, and dated episode templates that contributors copy into
//! `_episodes/<series>/YYYY-MM-DD-<slug>.md`. This library reads those
//! entries, checks them and assembles the static site directory.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod check;
pub mod cli;
pub mod config;
pub mod episode;
pub mod error;
pub mod loader;
pub mod logging;
pub mod naming;
pub mod site;
pub mod template;

pub use check::{check_repository, CheckReport, Finding, Severity};
pub use config::Config;
pub use episode::Episode;
pub use error::{Error, Result};
pub use loader::load_episodes;
pub use logging::init_logging;
pub use site::{build_site, BuildReport};
pub use template::{create_episode, NewEpisode};
