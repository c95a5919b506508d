//! Configuration management for podhub.
//!
//! Configuration is layered with figment: built-in defaults, a per-user TOML
//! file, a per-project TOML file and finally environment variables.

use std::path::{Component, Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Per-user configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Per-user configuration directory name.
const CONFIG_DIR_NAME: &str = "podhub";

/// Per-project configuration file, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "podhub.toml";

/// Prefix for environment overrides, e.g. `PODHUB_PATHS__OUTPUT_DIR`.
const ENV_PREFIX: &str = "PODHUB_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `PODHUB_`, `__` separates sections)
/// 2. Project config file (`./podhub.toml` or `--config`)
/// 3. User config file at `~/.config/podhub/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Repository layout.
    pub paths: PathsConfig,
    /// Static site output.
    pub site: SiteConfig,
    /// Repository checks.
    pub check: CheckConfig,
}

/// Where things live inside the hub repository.
///
/// Every relative path is resolved against `root`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Repository root.
    pub root: PathBuf,
    /// Directory holding one subdirectory per series.
    pub episodes_dir: PathBuf,
    /// Directory the site is built into.
    pub output_dir: PathBuf,
    /// The README that must exist and be non-empty.
    pub readme: PathBuf,
    /// Directory holding the dated episode templates.
    pub template_dir: PathBuf,
}

/// Static site configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Files copied verbatim from the root into the output directory.
    pub static_files: Vec<PathBuf>,
    /// File name of the episode manifest written into the output directory.
    pub manifest_name: String,
    /// Leave outputs untouched when their content hash has not changed.
    pub skip_unchanged: bool,
}

/// Which optional findings `check` reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Warn when an episode has no explicit `slug`.
    pub warn_missing_slug: bool,
    /// Warn when an episode has no `reddit` discussion link.
    pub warn_missing_reddit: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            episodes_dir: PathBuf::from("_episodes"),
            output_dir: PathBuf::from("_site"),
            readme: PathBuf::from("README.md"),
            template_dir: PathBuf::from("."),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            static_files: ["style.css", "404.html", "robots.txt"]
                .into_iter()
                .map(PathBuf::from)
                .collect(),
            manifest_name: "episodes.json".to_string(),
            skip_unchanged: true,
        }
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            warn_missing_slug: true,
            warn_missing_reddit: false,
        }
    }
}

impl Config {
    /// Load configuration from all sources with the default file locations.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom project config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let project = config_path.unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));
        Self::load_layers(Some(&Self::user_config_path()), &project)
    }

    /// Load configuration from explicit file layers.
    ///
    /// Missing files are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_layers(user_config: Option<&Path>, project_config: &Path) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if let Some(user) = user_config {
            figment = figment.merge(Toml::file(user));
        }
        let figment = figment
            .merge(Toml::file(project_config))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the per-user configuration file path.
    #[must_use]
    pub fn user_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.paths.episodes_dir.as_os_str().is_empty() {
            return Err(Error::config("paths.episodes_dir must not be empty"));
        }

        let output = self.output_dir();
        if output == self.paths.root {
            return Err(Error::config(
                "paths.output_dir must not be the repository root",
            ));
        }
        if output == self.episodes_dir() {
            return Err(Error::config(
                "paths.output_dir must not be the episodes directory",
            ));
        }

        for file in &self.site.static_files {
            let plain = !file.as_os_str().is_empty()
                && file
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)));
            if !plain {
                return Err(Error::config(format!(
                    "site.static_files entries must be relative paths inside the root, got {}",
                    file.display()
                )));
            }
        }

        let manifest = &self.site.manifest_name;
        if manifest.is_empty() || manifest.contains(['/', '\\']) {
            return Err(Error::config(format!(
                "site.manifest_name must be a plain file name, got {manifest:?}"
            )));
        }

        Ok(())
    }

    /// Resolve a repository-relative path against the root.
    #[must_use]
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.paths.root.join(path)
    }

    /// The episodes directory, resolved.
    #[must_use]
    pub fn episodes_dir(&self) -> PathBuf {
        self.resolve(&self.paths.episodes_dir)
    }

    /// The site output directory, resolved.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.paths.output_dir)
    }

    /// The README path, resolved.
    #[must_use]
    pub fn readme_path(&self) -> PathBuf {
        self.resolve(&self.paths.readme)
    }

    /// The template directory, resolved.
    #[must_use]
    pub fn template_dir(&self) -> PathBuf {
        self.resolve(&self.paths.template_dir)
    }

    /// The manifest path inside the output directory.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir().join(&self.site.manifest_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_paths() {
        let paths = PathsConfig::default();

        assert_eq!(paths.root, PathBuf::from("."));
        assert_eq!(paths.episodes_dir, PathBuf::from("_episodes"));
        assert_eq!(paths.output_dir, PathBuf::from("_site"));
        assert_eq!(paths.readme, PathBuf::from("README.md"));
    }

    #[test]
    fn test_default_site() {
        let site = SiteConfig::default();

        assert_eq!(site.static_files.len(), 3);
        assert!(site.static_files.contains(&PathBuf::from("robots.txt")));
        assert_eq!(site.manifest_name, "episodes.json");
        assert!(site.skip_unchanged);
    }

    #[test]
    fn test_default_check() {
        let check = CheckConfig::default();

        assert!(check.warn_missing_slug);
        assert!(!check.warn_missing_reddit);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_episodes_dir() {
        let mut config = Config::default();
        config.paths.episodes_dir = PathBuf::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("episodes_dir"));
    }

    #[test]
    fn test_validate_output_is_root() {
        let mut config = Config::default();
        config.paths.output_dir = PathBuf::from(".");

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("repository root"));
    }

    #[test]
    fn test_validate_output_is_episodes_dir() {
        let mut config = Config::default();
        config.paths.output_dir = PathBuf::from("_episodes");

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("episodes directory"));
    }

    #[test]
    fn test_validate_manifest_name_with_separator() {
        let mut config = Config::default();
        config.site.manifest_name = "data/episodes.json".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("manifest_name"));
    }

    #[test]
    fn test_resolved_paths() {
        let mut config = Config::default();
        config.paths.root = PathBuf::from("/hub");

        assert_eq!(config.episodes_dir(), PathBuf::from("/hub/_episodes"));
        assert_eq!(config.output_dir(), PathBuf::from("/hub/_site"));
        assert_eq!(config.readme_path(), PathBuf::from("/hub/README.md"));
        assert_eq!(config.template_dir(), PathBuf::from("/hub"));
        assert_eq!(
            config.manifest_path(),
            PathBuf::from("/hub/_site/episodes.json")
        );
    }

    #[test]
    fn test_absolute_path_ignores_root() {
        let mut config = Config::default();
        config.paths.root = PathBuf::from("/hub");
        config.paths.output_dir = PathBuf::from("/var/www");

        assert_eq!(config.output_dir(), PathBuf::from("/var/www"));
    }

    #[test]
    fn test_user_config_path() {
        let path = Config::user_config_path();
        assert!(path.ends_with("podhub/config.toml"));
    }

    #[test]
    fn test_validate_static_file_outside_root() {
        for bad in ["/etc/passwd", "../style.css", "assets/../../x.css", "./style.css", ""] {
            let mut config = Config::default();
            config.site.static_files = vec![PathBuf::from(bad)];

            let err = config.validate().unwrap_err().to_string();
            assert!(err.contains("static_files"), "{bad:?}: {err}");
        }
    }

    #[test]
    fn test_validate_nested_static_file() {
        let mut config = Config::default();
        config.site.static_files.push(PathBuf::from("assets/logo.svg"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_nonexistent_layers() {
        Jail::expect_with(|_jail| {
            let config = Config::load_layers(None, Path::new("missing.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "podhub.toml",
                r#"
[paths]
output_dir = "public"

[site]
static_files = ["style.css"]

[check]
warn_missing_reddit = true
"#,
            )?;

            let config = Config::load_layers(None, Path::new("podhub.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.paths.output_dir, PathBuf::from("public"));
            assert_eq!(config.paths.episodes_dir, PathBuf::from("_episodes"));
            assert_eq!(config.site.static_files, vec![PathBuf::from("style.css")]);
            assert!(config.check.warn_missing_reddit);
            Ok(())
        });
    }

    #[test]
    fn test_project_file_overrides_user_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "user.toml",
                "[site]\nmanifest_name = \"user.json\"\nskip_unchanged = false\n",
            )?;
            jail.create_file("project.toml", "[site]\nmanifest_name = \"project.json\"\n")?;

            let config = Config::load_layers(Some(Path::new("user.toml")), Path::new("project.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.site.manifest_name, "project.json");
            assert!(!config.site.skip_unchanged);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "podhub.toml",
                "[paths]\noutput_dir = \"public\"\n\n[site]\nskip_unchanged = true\n",
            )?;
            jail.set_env("PODHUB_PATHS__OUTPUT_DIR", "from-env");
            jail.set_env("PODHUB_SITE__SKIP_UNCHANGED", "false");
            jail.set_env("PODHUB_CHECK__WARN_MISSING_REDDIT", "true");

            let config = Config::load_layers(None, Path::new("podhub.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.paths.output_dir, PathBuf::from("from-env"));
            assert!(!config.site.skip_unchanged);
            assert!(config.check.warn_missing_reddit);
            assert_eq!(config.paths.episodes_dir, PathBuf::from("_episodes"));
            Ok(())
        });
    }

    #[test]
    fn test_env_override_is_validated() {
        Jail::expect_with(|jail| {
            jail.set_env("PODHUB_PATHS__OUTPUT_DIR", "_episodes");

            let result = Config::load_layers(None, Path::new("podhub.toml"));
            assert!(matches!(result, Err(Error::ConfigValidation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        Jail::expect_with(|jail| {
            jail.create_file("podhub.toml", "[paths]\noutput_dir = \"_episodes\"\n")?;

            let result = Config::load_layers(None, Path::new("podhub.toml"));
            assert!(matches!(result, Err(Error::ConfigValidation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("episodes_dir"));
        assert!(json.contains("manifest_name"));
    }
}
