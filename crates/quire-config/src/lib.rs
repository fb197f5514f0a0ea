//! Configuration for quire.
//!
//! Reads `quire.toml`, found either at an explicit path or by walking up
//! from the current directory. Without a file, defaults apply relative to
//! the current directory. [`CliSettings`] take precedence over file values.
//!
//! ```toml
//! [docs]
//! source_dir = "docs"
//! extensions = ["md", "mdx"]
//! exclude = ["**/drafts"]
//!
//! [metadata]
//! category_file = "_category_.yml"
//!
//! [links]
//! check_anchors = false
//! check_assets = true
//! ```
//!
//! ## Environment Variables
//!
//! `docs.source_dir` may reference the environment as `${VAR}` (error when
//! unset) or `${VAR:-fallback}`.

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Name of the configuration file.
const CONFIG_FILENAME: &str = "quire.toml";

/// Command-line overrides. `None` keeps the configured value.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub source_dir: Option<PathBuf>,
    pub check_anchors: Option<bool>,
}

/// Loaded configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `[docs]` as written; relative, unexpanded.
    #[serde(rename = "docs")]
    docs_raw: DocsSection,
    pub metadata: MetadataConfig,
    pub links: LinksConfig,

    /// `[docs]` after env expansion and path resolution.
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// File the configuration was read from, if any.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsSection {
    source_dir: Option<String>,
    extensions: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
}

/// Where and what to scan.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Absolute (or cwd-relative) documentation root.
    pub source_dir: PathBuf,
    /// Content-file extensions, without dots.
    pub extensions: Vec<String>,
    /// Glob patterns relative to `source_dir`.
    pub exclude: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_owned(), "mdx".to_owned()]
}

/// `[metadata]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Name of the per-directory category sidecar.
    pub category_file: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            category_file: "_category_.yml".to_owned(),
        }
    }
}

/// `[links]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Warn when a `#fragment` matches no heading of the target.
    pub check_anchors: bool,
    /// Require linked images and other files to exist.
    pub check_assets: bool,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            check_anchors: false,
            check_assets: true,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Explicit config path does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of range or malformed.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// `${VAR}` reference to an unset variable.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Dotted field name (e.g., "`docs.source_dir`").
        field: String,
        message: String,
    },
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation(message.into())
}

impl Config {
    /// Load configuration and apply `cli_settings` on top.
    ///
    /// `config_path` must exist when given; otherwise `quire.toml` is looked
    /// up from the current directory upwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, malformed or
    /// fails validation.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let found = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| find_config(&cwd)),
        };

        let mut config = match found {
            Some(path) => Self::from_file(&path)?,
            None => Self::with_base(&std::env::current_dir().unwrap_or_default()),
        };

        if let Some(settings) = cli_settings {
            config.override_with(settings);
        }
        Ok(config)
    }

    fn override_with(&mut self, settings: &CliSettings) {
        if let Some(dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(dir);
        }
        if let Some(check) = settings.check_anchors {
            self.links.check_anchors = check;
        }
    }

    /// Defaults with the docs directory under `base`.
    fn with_base(base: &Path) -> Self {
        Self {
            docs_raw: DocsSection::default(),
            metadata: MetadataConfig::default(),
            links: LinksConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                extensions: default_extensions(),
                exclude: Vec::new(),
            },
            config_path: None,
        }
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(&std::fs::read_to_string(path)?)?;
        config.resolve(path.parent().unwrap_or(Path::new(".")))?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;
        Ok(config)
    }

    /// Expand env references in `[docs]` and anchor paths at `config_dir`.
    fn resolve(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let source_dir = match &self.docs_raw.source_dir {
            Some(raw) => expand::expand_env(raw, "docs.source_dir")?,
            None => "docs".to_owned(),
        };

        self.docs_resolved = DocsConfig {
            source_dir: config_dir.join(source_dir),
            extensions: self
                .docs_raw
                .extensions
                .clone()
                .unwrap_or_else(default_extensions),
            exclude: self.docs_raw.exclude.clone().unwrap_or_default(),
        };
        Ok(())
    }

    /// Check resolved values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let docs = &self.docs_resolved;
        if docs.extensions.is_empty() {
            return Err(invalid("docs.extensions cannot be empty"));
        }
        if let Some(ext) = docs
            .extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(invalid(format!(
                "docs.extensions entry `{ext}` must be a non-empty name without a leading dot"
            )));
        }
        for pattern in &docs.exclude {
            if let Err(e) = glob::Pattern::new(pattern) {
                return Err(invalid(format!(
                    "docs.exclude pattern `{pattern}` is invalid: {e}"
                )));
            }
        }

        let category_file = &self.metadata.category_file;
        if category_file.is_empty() {
            return Err(invalid("metadata.category_file cannot be empty"));
        }
        if category_file.contains('/') {
            return Err(invalid(
                "metadata.category_file must be a file name, not a path",
            ));
        }
        Ok(())
    }
}

/// Nearest `quire.toml` in `start` or one of its ancestors.
fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(toml: &str) -> Config {
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(Path::new("/project")).unwrap();
        config
    }

    #[test]
    fn test_defaults() {
        let config = Config::with_base(Path::new("/site"));
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/site/docs"));
        assert_eq!(config.docs_resolved.extensions, vec!["md", "mdx"]);
        assert!(config.docs_resolved.exclude.is_empty());
        assert_eq!(config.metadata.category_file, "_category_.yml");
        assert!(!config.links.check_anchors);
        assert!(config.links.check_assets);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse("");
        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/docs")
        );
        assert_eq!(config.docs_resolved.extensions, vec!["md", "mdx"]);
        assert!(config.links.check_assets);
    }

    #[test]
    fn test_all_sections() {
        let config = parse(
            r#"
[docs]
source_dir = "site/docs"
extensions = ["md"]
exclude = ["**/drafts", "*.tmp.md"]

[metadata]
category_file = "_section.yml"

[links]
check_anchors = true
check_assets = false
"#,
        );

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/site/docs")
        );
        assert_eq!(config.docs_resolved.extensions, vec!["md"]);
        assert_eq!(config.docs_resolved.exclude, vec!["**/drafts", "*.tmp.md"]);
        assert_eq!(config.metadata.category_file, "_section.yml");
        assert!(config.links.check_anchors);
        assert!(!config.links.check_assets);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::with_base(Path::new("/project"));
        config.override_with(&CliSettings {
            source_dir: Some(PathBuf::from("/elsewhere")),
            check_anchors: Some(true),
        });
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/elsewhere"));
        assert!(config.links.check_anchors);
    }

    #[test]
    fn test_empty_cli_settings_change_nothing() {
        let mut config = Config::with_base(Path::new("/project"));
        config.override_with(&CliSettings::default());
        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/docs")
        );
        assert!(!config.links.check_anchors);
    }

    #[test]
    fn test_source_dir_env_expansion() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("QUIRE_TEST_CONTENT", "content");
        }
        let config = parse("[docs]\nsource_dir = \"${QUIRE_TEST_CONTENT}/docs\"\n");
        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/content/docs")
        );
        unsafe {
            std::env::remove_var("QUIRE_TEST_CONTENT");
        }
    }

    #[test]
    fn test_source_dir_env_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("QUIRE_TEST_UNSET");
        }
        let mut config: Config =
            toml::from_str("[docs]\nsource_dir = \"${QUIRE_TEST_UNSET}\"\n").unwrap();
        let err = config.resolve(Path::new("/project")).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "docs.source_dir"));
    }

    #[test]
    fn test_rejects_empty_extensions() {
        let mut config = Config::with_base(Path::new("/x"));
        config.docs_resolved.extensions.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("docs.extensions cannot be empty"));
    }

    #[test]
    fn test_rejects_dotted_extension() {
        let mut config = Config::with_base(Path::new("/x"));
        config.docs_resolved.extensions = vec!["md".to_owned(), ".mdx".to_owned()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("`.mdx`"));
    }

    #[test]
    fn test_rejects_bad_glob() {
        let mut config = Config::with_base(Path::new("/x"));
        config.docs_resolved.exclude = vec!["[".to_owned()];
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("docs.exclude"));
    }

    #[test]
    fn test_rejects_bad_category_file() {
        let mut config = Config::with_base(Path::new("/x"));
        config.metadata.category_file = String::new();
        assert!(config.validate().is_err());

        config.metadata.category_file = "meta/_category_.yml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("not a path"));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/quire.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_resolves_relative_to_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("quire.toml");
        std::fs::write(&path, "[docs]\nsource_dir = \"content\"\n").unwrap();

        let settings = CliSettings {
            check_anchors: Some(true),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.docs_resolved.source_dir, temp_dir.path().join("content"));
        assert_eq!(config.config_path, Some(path));
        assert!(config.links.check_anchors);
    }

    #[test]
    fn test_load_reports_parse_and_validation_errors() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("quire.toml");

        std::fs::write(&path, "[docs\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Parse(_))
        ));

        std::fs::write(&path, "[docs]\nextensions = []\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_find_config_walks_up() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp_dir.path().join("a/quire.toml"), "").unwrap();

        assert_eq!(
            find_config(&nested),
            Some(temp_dir.path().join("a/quire.toml"))
        );
    }
}
