//! `[feed]` section configuration.
//!
//! Options of the feed plugin itself. Names and defaults are those of
//! the plugin's documented option table.

use super::{defaults, error::ConfigError};
use anyhow::{Result, bail};
use educe::Educe;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[feed]` section in gitrss.toml.
///
/// # Example
/// ```toml
/// [feed]
/// abstract_chars_count = 150
/// category = "docs"
/// exclude_files = ["drafts/", "*.draft.md"]
/// feed_ttl = 1440
/// length = 20
/// output_feed_filepath = "feed.xml"
/// template = "theme/feed.xml.j2"
/// match_path = "^blog/"
///
/// [feed.date_from_meta]
/// as_creation = "date"
/// as_update = "updated"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct FeedOptions {
    /// Max characters of an auto-extracted abstract; `<= 0` disables it.
    #[serde(default = "defaults::feed::abstract_chars_count")]
    #[educe(Default = defaults::feed::abstract_chars_count())]
    pub abstract_chars_count: i64,

    /// Feed-wide `<category>`.
    pub category: Option<String>,

    /// Gitignore-style patterns, relative to the docs dir.
    pub exclude_files: Vec<String>,

    /// Minutes a reader may cache the feed.
    #[serde(default = "defaults::feed::feed_ttl")]
    #[educe(Default = defaults::feed::feed_ttl())]
    pub feed_ttl: i64,

    /// Max number of items; `<= 0` means unlimited.
    #[serde(default = "defaults::feed::length")]
    #[educe(Default = defaults::feed::length())]
    pub length: i64,

    /// Output path, relative to `[build].site_dir` unless absolute.
    #[serde(default = "defaults::feed::output_feed_filepath")]
    #[educe(Default = defaults::feed::output_feed_filepath())]
    pub output_feed_filepath: PathBuf,

    /// Custom template; the bundled rss 2.0 template when unset.
    pub template: Option<PathBuf>,

    /// Only pages whose docs-relative path matches are collected.
    #[serde(default = "defaults::feed::match_path")]
    #[educe(Default = defaults::feed::match_path())]
    pub match_path: String,

    /// Read dates from front matter instead of git, when present.
    pub date_from_meta: Option<DateFromMeta>,
}

/// `[feed.date_from_meta]`: front-matter keys holding page dates.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct DateFromMeta {
    #[serde(default = "defaults::feed::date_from_meta::as_creation")]
    #[educe(Default = defaults::feed::date_from_meta::as_creation())]
    pub as_creation: String,

    #[serde(default = "defaults::feed::date_from_meta::as_update")]
    #[educe(Default = defaults::feed::date_from_meta::as_update())]
    pub as_update: String,
}

impl FeedOptions {
    /// Check option values that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.feed_ttl < 0 {
            bail!(ConfigError::Validation(format!(
                "[feed.feed_ttl] must be >= 0, got {}",
                self.feed_ttl
            )));
        }

        if self.output_feed_filepath.as_os_str().is_empty() {
            bail!(ConfigError::Validation(
                "[feed.output_feed_filepath] must not be empty".into()
            ));
        }

        self.match_regex()?;
        Ok(())
    }

    /// Compile `match_path`.
    pub fn match_regex(&self) -> Result<Regex> {
        Regex::new(&self.match_path).map_err(|err| {
            ConfigError::Validation(format!("[feed.match_path] is not a valid regex: {err}"))
                .into()
        })
    }

    /// Item cap, `None` when unlimited.
    pub fn cap(&self) -> Option<usize> {
        usize::try_from(self.length).ok().filter(|&n| n > 0)
    }

    /// Abstract budget, `0` when disabled.
    pub fn abstract_budget(&self) -> usize {
        usize::try_from(self.abstract_chars_count).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use super::*;

    fn parse(feed: &str) -> FeedOptions {
        let config: SiteConfig = toml::from_str(&format!("[feed]\n{feed}")).unwrap();
        config.feed
    }

    #[test]
    fn test_feed_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();
        let feed = config.feed;

        assert_eq!(feed.abstract_chars_count, 150);
        assert!(feed.category.is_none());
        assert!(feed.exclude_files.is_empty());
        assert_eq!(feed.feed_ttl, 1440);
        assert_eq!(feed.length, 20);
        assert_eq!(feed.output_feed_filepath, PathBuf::from("feed.xml"));
        assert!(feed.template.is_none());
        assert_eq!(feed.match_path, ".*");
        assert!(feed.date_from_meta.is_none());
    }

    #[test]
    fn test_feed_custom() {
        let feed = parse(
            r#"
            abstract_chars_count = 80
            category = "docs"
            exclude_files = ["drafts/", "*.tmp.md"]
            feed_ttl = 60
            length = 5
            output_feed_filepath = "rss/feed.xml"
            template = "theme/feed.xml.j2"
            "#,
        );

        assert_eq!(feed.abstract_chars_count, 80);
        assert_eq!(feed.category.as_deref(), Some("docs"));
        assert_eq!(feed.exclude_files, vec!["drafts/", "*.tmp.md"]);
        assert_eq!(feed.feed_ttl, 60);
        assert_eq!(feed.length, 5);
        assert_eq!(feed.output_feed_filepath, PathBuf::from("rss/feed.xml"));
        assert_eq!(feed.template, Some(PathBuf::from("theme/feed.xml.j2")));
    }

    #[test]
    fn test_feed_date_from_meta_defaults() {
        let feed = parse("[feed.date_from_meta]");
        let dates = feed.date_from_meta.unwrap();

        assert_eq!(dates.as_creation, "date");
        assert_eq!(dates.as_update, "updated");
    }

    #[test]
    fn test_feed_wrong_type_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[feed]\nlength = \"twenty\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_cap() {
        assert_eq!(parse("length = 3").cap(), Some(3));
        assert_eq!(parse("length = 0").cap(), None);
        assert_eq!(parse("length = -1").cap(), None);
    }

    #[test]
    fn test_abstract_budget() {
        assert_eq!(parse("abstract_chars_count = 10").abstract_budget(), 10);
        assert_eq!(parse("abstract_chars_count = 0").abstract_budget(), 0);
        assert_eq!(parse("abstract_chars_count = -5").abstract_budget(), 0);
    }

    #[test]
    fn test_validate_negative_ttl() {
        let err = parse("feed_ttl = -1").validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_bad_regex() {
        let err = parse("match_path = \"(unclosed\"").validate().unwrap_err();
        assert!(err.to_string().contains("match_path"));
    }

    #[test]
    fn test_validate_empty_output_path() {
        assert!(parse("output_feed_filepath = \"\"").validate().is_err());
    }

    #[test]
    fn test_validate_ok() {
        assert!(FeedOptions::default().validate().is_ok());
    }
}
