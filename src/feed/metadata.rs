//! Channel-level feed metadata, assembled from configuration alone.

use super::render::EntryView;
use crate::{
    config::{ConfigError, FeedOptions, SiteSection},
    utils::date::to_rfc2822,
};
use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Generator identity written into `<generator>`.
pub const GENERATOR: &str = concat!(env!("CARGO_PKG_NAME"), " - v", env!("CARGO_PKG_VERSION"));

/// Everything a feed template receives.
#[derive(Debug, Clone, Serialize)]
pub struct FeedMetadata {
    pub author: Option<String>,
    /// RFC 2822
    pub build_date: String,
    pub copyright: Option<String>,
    pub description: Option<String>,
    pub generator: String,
    pub html_url: Option<String>,
    pub repo_url: Option<String>,
    pub title: Option<String>,
    /// Minutes
    pub ttl: i64,
    /// Canonical URL of the feed itself
    pub rss_url: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    /// Filled once, after the page pass
    pub entries: Vec<EntryView>,
}

impl FeedMetadata {
    /// Build the channel fields. No page data is involved.
    ///
    /// Fails with [`ConfigError::TemplateNotFound`] when a template is
    /// configured but is not a file.
    pub fn assemble(
        site: &SiteSection,
        options: &FeedOptions,
        build_time: DateTime<Utc>,
    ) -> Result<Self> {
        if let Some(template) = &options.template
            && !template.is_file()
        {
            bail!(ConfigError::TemplateNotFound(template.clone()));
        }

        // An absolute output path has no place under the site URL
        let output = &options.output_feed_filepath;
        let rss_url = site
            .base_url()
            .filter(|_| !output.is_absolute())
            .map(|base| {
                let path = output.to_string_lossy().replace('\\', "/");
                format!("{base}/{}", path.trim_start_matches('/'))
            });

        Ok(Self {
            author: site.author.clone(),
            build_date: to_rfc2822(&build_time),
            copyright: site.copyright.clone(),
            description: site.description.clone(),
            generator: GENERATOR.to_owned(),
            html_url: site.url.clone(),
            repo_url: site.repo_url.clone().or_else(|| site.url.clone()),
            title: site.name.clone(),
            ttl: options.feed_ttl,
            rss_url,
            category: options.category.clone(),
            language: site.language.clone(),
            entries: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::PathBuf};
    use tempfile::TempDir;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn site(url: Option<&str>) -> SiteSection {
        SiteSection {
            name: Some("Docs".into()),
            url: url.map(str::to_owned),
            author: Some("Alice".into()),
            copyright: Some("2026 Alice".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_assemble_defaults() {
        let meta = FeedMetadata::assemble(
            &site(Some("https://example.com/docs/")),
            &FeedOptions::default(),
            at(1_705_314_645),
        )
        .unwrap();

        assert_eq!(meta.title.as_deref(), Some("Docs"));
        assert_eq!(meta.ttl, 1440);
        assert_eq!(meta.build_date, "Mon, 15 Jan 2024 10:30:45 +0000");
        assert_eq!(meta.generator, format!("gitrss - v{}", env!("CARGO_PKG_VERSION")));
        assert_eq!(meta.rss_url.as_deref(), Some("https://example.com/docs/feed.xml"));
        assert_eq!(meta.repo_url, meta.html_url);
        assert!(meta.entries.is_empty());
    }

    #[test]
    fn test_no_site_url_no_rss_url() {
        let meta = FeedMetadata::assemble(&site(None), &FeedOptions::default(), at(0)).unwrap();
        assert!(meta.rss_url.is_none());
        assert!(meta.html_url.is_none());
    }

    #[test]
    fn test_rss_url_nested_output() {
        let options = FeedOptions {
            output_feed_filepath: PathBuf::from("rss/updated.xml"),
            ..Default::default()
        };
        let meta =
            FeedMetadata::assemble(&site(Some("https://example.com")), &options, at(0)).unwrap();
        assert_eq!(meta.rss_url.as_deref(), Some("https://example.com/rss/updated.xml"));
    }

    #[test]
    fn test_absolute_output_no_rss_url() {
        let options = FeedOptions {
            output_feed_filepath: PathBuf::from("/var/www/feed.xml"),
            ..Default::default()
        };
        let meta =
            FeedMetadata::assemble(&site(Some("https://example.com")), &options, at(0)).unwrap();
        assert!(meta.rss_url.is_none());
        assert_eq!(meta.html_url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_explicit_repo_url() {
        let mut site = site(Some("https://example.com"));
        site.repo_url = Some("https://github.com/alice/docs".into());

        let meta = FeedMetadata::assemble(&site, &FeedOptions::default(), at(0)).unwrap();
        assert_eq!(meta.repo_url.as_deref(), Some("https://github.com/alice/docs"));
    }

    #[test]
    fn test_missing_template_fails() {
        let options = FeedOptions {
            template: Some(PathBuf::from("/nonexistent/feed.xml.j2")),
            ..Default::default()
        };
        let err = FeedMetadata::assemble(&site(None), &options, at(0)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::TemplateNotFound(_))
        ));
    }

    #[test]
    fn test_existing_template_accepted() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("feed.xml.j2");
        fs::write(&template, "<rss/>").unwrap();
        let options = FeedOptions {
            template: Some(template),
            ..Default::default()
        };

        assert!(FeedMetadata::assemble(&site(None), &options, at(0)).is_ok());
    }

    #[test]
    fn test_template_directory_rejected() {
        let dir = TempDir::new().unwrap();
        let options = FeedOptions {
            template: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        assert!(FeedMetadata::assemble(&site(None), &options, at(0)).is_err());
    }
}
