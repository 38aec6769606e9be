//! Minimal static-site host: loads pages and drives plugin lifecycle hooks.
//!
//! # Lifecycle
//!
//! ```text
//! Builder::run()
//!     │
//!     ├── configure()   once per plugin, before any page is read
//!     │
//!     ├── load_pages()  docs_dir/**/*.md
//!     │
//!     ├── collect()     once per page and plugin, in parallel (rayon)
//!     │       ... barrier: the parallel pass joins here ...
//!     │
//!     └── finalize()    once per plugin
//! ```

mod page;

pub use page::{Page, PageMeta, load_pages, url_path};

use crate::{config::SiteConfig, config::SiteSection, log, utils::date::build_timestamp};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::path::PathBuf;

/// Build-scoped values shared by every hook.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub site: SiteSection,
    pub docs_dir: PathBuf,
    pub site_dir: PathBuf,
    pub use_directory_urls: bool,
    /// Fallback date for pages without history
    pub build_time: DateTime<Utc>,
}

impl BuildContext {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            site: config.site.clone(),
            docs_dir: config.build.docs_dir.clone(),
            site_dir: config.build.site_dir.clone(),
            use_directory_urls: config.build.use_directory_urls,
            build_time: build_timestamp(),
        }
    }
}

/// Hooks a plugin receives from the host.
///
/// `collect` takes `&self`: the host may call it from several threads at once.
pub trait BuildPlugin: Send + Sync {
    fn name(&self) -> &'static str;

    /// Runs once, before any page is loaded.
    fn configure(&mut self, ctx: &BuildContext) -> Result<()>;

    /// Runs once per page. Page content is never modified.
    fn collect(&self, page: &Page, ctx: &BuildContext) -> Result<()>;

    /// Runs once, after every `collect` call has returned.
    fn finalize(&mut self, ctx: &BuildContext) -> Result<()>;

    /// Dev-server extension point.
    fn serve(&self, _ctx: &BuildContext) {}
}

/// Drives a set of plugins through one build.
pub struct Builder {
    ctx: BuildContext,
    plugins: Vec<Box<dyn BuildPlugin>>,
}

impl Builder {
    pub fn new(ctx: BuildContext) -> Self {
        Self {
            ctx,
            plugins: Vec::new(),
        }
    }

    pub fn plugin(mut self, plugin: impl BuildPlugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Run only the configuration hooks.
    pub fn configure(&mut self) -> Result<()> {
        for plugin in &mut self.plugins {
            plugin
                .configure(&self.ctx)
                .with_context(|| format!("plugin `{}` failed to configure", plugin.name()))?;
        }
        Ok(())
    }

    /// Full build: configure, collect every page, finalize.
    pub fn run(mut self) -> Result<BuildContext> {
        self.configure()?;

        let pages = load_pages(
            &self.ctx.docs_dir,
            self.ctx.site.base_url(),
            self.ctx.use_directory_urls,
        )?;
        log!("pages"; "{} pages in {}", pages.len(), self.ctx.docs_dir.display());

        let ctx = &self.ctx;
        let plugins = &self.plugins;
        pages.par_iter().try_for_each(|page| {
            plugins.iter().try_for_each(|plugin| {
                plugin
                    .collect(page, ctx)
                    .with_context(|| format!("plugin `{}` failed on `{}`", plugin.name(), page.src_uri))
            })
        })?;

        for plugin in &mut self.plugins {
            plugin
                .finalize(&self.ctx)
                .with_context(|| format!("plugin `{}` failed to finalize", plugin.name()))?;
        }

        Ok(self.ctx)
    }
}
