//! `[site]` section configuration.
//!
//! Global site metadata, as the host pipeline knows it. The feed channel
//! fields are derived from here.

use serde::{Deserialize, Serialize};

/// `[site]` section in gitrss.toml - site-wide metadata.
///
/// # Example
/// ```toml
/// [site]
/// name = "Project Docs"
/// url = "https://example.com/docs"
/// author = "Alice"
/// description = "User guide and reference"
/// copyright = "2026 Alice"
/// repo_url = "https://github.com/alice/project"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Site name, used as the feed title.
    pub name: Option<String>,

    /// Base URL the site is published under.
    /// Canonical page URLs and the feed's own URL are derived from it.
    pub url: Option<String>,

    pub author: Option<String>,

    pub description: Option<String>,

    pub copyright: Option<String>,

    /// Source repository URL. Falls back to `url` in the feed.
    pub repo_url: Option<String>,

    /// Feed language code (e.g. "en", "fr-FR").
    pub language: Option<String>,
}

impl SiteSection {
    /// Site URL without trailing slashes, for joining.
    pub fn base_url(&self) -> Option<&str> {
        self.url.as_deref().map(|url| url.trim_end_matches('/'))
    }
}
