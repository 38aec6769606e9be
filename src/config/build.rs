//! `[build]` section configuration.
//!
//! Where pages are read from and where the feed is written to.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in gitrss.toml - host pipeline paths.
///
/// # Example
/// ```toml
/// [build]
/// docs_dir = "docs"            # Markdown sources
/// site_dir = "site"            # Output root
/// use_directory_urls = true    # guide/setup.md -> guide/setup/
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSection {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Markdown source directory.
    #[serde(default = "defaults::build::docs_dir")]
    #[educe(Default = defaults::build::docs_dir())]
    pub docs_dir: PathBuf,

    /// Output directory; a relative feed path is written below it.
    #[serde(default = "defaults::build::site_dir")]
    #[educe(Default = defaults::build::site_dir())]
    pub site_dir: PathBuf,

    /// Map `a/b.md` to `a/b/` instead of `a/b.html`.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = defaults::r#true())]
    pub use_directory_urls: bool,
}
