//! Site configuration management for `gitrss.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                         |
//! |-------------|-------------------------------------------------|
//! | `[site]`    | Site metadata (name, url, author, copyright)    |
//! | `[build]`   | Docs and output directories, URL style          |
//! | `[feed]`    | Feed plugin options (length, ttl, template...)  |
//!
//! # Example
//!
//! ```toml
//! [site]
//! name = "Project Docs"
//! url = "https://example.com/docs"
//!
//! [build]
//! docs_dir = "docs"
//! site_dir = "site"
//!
//! [feed]
//! length = 10
//! exclude_files = ["drafts/"]
//! ```

mod build;
pub mod defaults;
mod error;
mod feed;
mod site;

pub use build::BuildSection;
pub use error::ConfigError;
pub use feed::{DateFromMeta, FeedOptions};
pub use site::SiteSection;

use crate::cli::{BuildArgs, Cli};
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing gitrss.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Site metadata
    #[serde(default)]
    pub site: SiteSection,

    /// Build paths
    #[serde(default)]
    pub build: BuildSection,

    /// Feed plugin options
    #[serde(default)]
    pub feed: FeedOptions,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = Self::normalize_path(path);
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());

        if let Some(args) = cli.build_args() {
            self.apply_build_args(args);
        }

        self.update_path_with_root(&root);
    }

    fn apply_build_args(&mut self, args: &BuildArgs) {
        Self::update_option(&mut self.build.site_dir, args.site_dir.as_ref());
        Self::update_option(&mut self.feed.length, args.length.as_ref());
        if let Some(url) = &args.base_url {
            self.site.url = Some(url.clone());
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Make every configured path absolute, relative to `root`.
    pub fn update_path_with_root(&mut self, root: &Path) {
        let root = Self::normalize_path(root);
        self.set_root(&root);

        self.build.docs_dir = Self::normalize_path(&root.join(&self.build.docs_dir));
        self.build.site_dir = Self::normalize_path(&root.join(&self.build.site_dir));

        // Template path gets tilde expansion, like a shell would do
        if let Some(template) = &self.feed.template {
            let expanded = shellexpand::tilde(&template.to_string_lossy()).into_owned();
            let path = PathBuf::from(expanded);
            self.feed.template = Some(if path.is_relative() {
                Self::normalize_path(&root.join(path))
            } else {
                Self::normalize_path(&path)
            });
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration values.
    ///
    /// The template file is checked later, by the feed's configure hook.
    pub fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.site.url
            && !base_url.starts_with("http")
        {
            bail!(ConfigError::Validation(
                "[site.url] must start with http:// or https://".into()
            ));
        }

        if !self.build.docs_dir.is_dir() {
            bail!(ConfigError::Validation(format!(
                "[build.docs_dir] `{}` is not a directory",
                self.build.docs_dir.display()
            )));
        }

        self.feed.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_from_str() {
        let config = SiteConfig::from_str(
            r#"
            [site]
            name = "Docs"

            [feed]
            length = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.site.name.as_deref(), Some("Docs"));
        assert_eq!(config.feed.length, 3);
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let err = SiteConfig::from_str("[site\nname = 1").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_from_path_missing() {
        let err = SiteConfig::from_path(Path::new("/nonexistent/gitrss.toml")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Io(..))
        ));
    }

    #[test]
    fn test_unknown_top_level_section_rejection() {
        assert!(SiteConfig::from_str("[plugins]\nrss = true").is_err());
    }

    #[test]
    fn test_get_root_default() {
        let config = SiteConfig::default();
        assert_eq!(config.get_root(), Path::new("./"));
    }

    #[test]
    fn test_update_path_with_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("docs")).unwrap();
        let mut config =
            SiteConfig::from_str("[feed]\ntemplate = \"theme/feed.xml.j2\"").unwrap();

        config.update_path_with_root(dir.path());

        let root = dir.path().canonicalize().unwrap();
        assert_eq!(config.get_root(), root.as_path());
        assert_eq!(config.build.docs_dir, root.join("docs"));
        assert_eq!(config.build.site_dir, root.join("site"));
        assert_eq!(config.feed.template, Some(root.join("theme/feed.xml.j2")));
    }

    #[test]
    fn test_update_with_cli_overrides() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_string_lossy().into_owned();
        let cli = Cli::parse_from([
            "gitrss",
            "--root",
            root.as_str(),
            "build",
            "--site-dir",
            "public",
            "--length",
            "5",
            "--base-url",
            "https://ci.example.com",
        ]);
        let mut config = SiteConfig::default();

        config.update_with_cli(&cli);

        let root = dir.path().canonicalize().unwrap();
        assert_eq!(config.build.site_dir, root.join("public"));
        assert_eq!(config.feed.length, 5);
        assert_eq!(config.site.url.as_deref(), Some("https://ci.example.com"));
    }

    #[test]
    fn test_validate_url_scheme() {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig::from_str("[site]\nurl = \"example.com\"").unwrap();
        config.build.docs_dir = dir.path().to_path_buf();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[site.url]"));
    }

    #[test]
    fn test_validate_missing_docs_dir() {
        let mut config = SiteConfig::default();
        config.build.docs_dir = PathBuf::from("/nonexistent/docs");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ok() {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig::from_str("[site]\nurl = \"https://example.com\"").unwrap();
        config.build.docs_dir = dir.path().to_path_buf();
        assert!(config.validate().is_ok());
    }
}
