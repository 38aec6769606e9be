//! RSS feed plugin.
//!
//! # Lifecycle
//!
//! ```text
//! configure()  ── FeedMetadata::assemble (template checked here)
//!     │           pick TimestampSource + Renderer, compile filters
//!     ▼
//! collect()    ── per page, possibly concurrent:
//!     │           exclude_files / match_path ─► resolve dates ─► extract description
//!     │           ─► EntryCollector::add
//!     ▼
//! finalize()   ── select ─► project ─► render_feed ─► write_feed
//! ```
//!
//! Each hook checks the plugin [`Stage`]; a hook called out of order is a
//! [`FeedError::OutOfOrder`] rather than a silently empty feed.

mod description;
mod entry;
mod error;
mod metadata;
mod render;
mod timestamp;

pub use description::{abstract_of, extract};
pub use entry::{EntryCollector, PageInformation};
pub use error::FeedError;
pub use metadata::{FeedMetadata, GENERATOR};
pub use render::{
    DEFAULT_TEMPLATE, EntryView, Renderer, TemplateRenderer, project, render_feed, select,
    write_feed,
};
pub use timestamp::{GitTimestamps, History, PageDates, StaticTimestamps, TimestampSource, resolve};

use crate::{
    config::FeedOptions,
    host::{BuildContext, BuildPlugin, Page},
    log,
    utils::{date::parse_date, git::ExcludeMatcher},
};
use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use regex::Regex;
use std::{fmt, path::PathBuf};

/// Where the plugin is in its build lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Unconfigured,
    Configured,
    Collecting,
    Rendered,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unconfigured => "unconfigured",
            Self::Configured => "configured",
            Self::Collecting => "collecting",
            Self::Rendered => "rendered",
        })
    }
}

/// The feed plugin. One instance serves exactly one build.
pub struct FeedPlugin {
    options: FeedOptions,
    timestamps: Option<Box<dyn TimestampSource>>,
    renderer: Option<Box<dyn Renderer>>,
    feed: Option<FeedMetadata>,
    collector: EntryCollector,
    stage: Mutex<Stage>,
    exclude: ExcludeMatcher,
    match_path: Option<Regex>,
}

impl FeedPlugin {
    pub fn new(options: FeedOptions) -> Self {
        Self {
            options,
            timestamps: None,
            renderer: None,
            feed: None,
            collector: EntryCollector::new(),
            stage: Mutex::new(Stage::Unconfigured),
            exclude: ExcludeMatcher::default(),
            match_path: None,
        }
    }

    /// Use `source` instead of discovering a git repository.
    pub fn with_timestamps(mut self, source: impl TimestampSource + 'static) -> Self {
        self.timestamps = Some(Box::new(source));
        self
    }

    /// Use `renderer` instead of the configured template.
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn stage(&self) -> Stage {
        *self.stage.lock()
    }

    /// Channel metadata, once configured.
    pub fn feed(&self) -> Option<&FeedMetadata> {
        self.feed.as_ref()
    }

    /// Feed file location: relative paths land in the site dir.
    pub fn output_path(&self, ctx: &BuildContext) -> PathBuf {
        let path = &self.options.output_feed_filepath;
        if path.is_absolute() {
            path.clone()
        } else {
            ctx.site_dir.join(path)
        }
    }

    /// Whether `page` goes into the feed at all.
    fn is_wanted(&self, page: &Page) -> bool {
        if self.exclude.is_excluded(&page.src_uri) {
            return false;
        }
        self.match_path
            .as_ref()
            .is_none_or(|re| re.is_match(&page.src_uri))
    }

    /// Front-matter dates override history, key by key.
    fn dates_from_meta(&self, page: &Page, history: PageDates) -> PageDates {
        let Some(keys) = &self.options.date_from_meta else {
            return history;
        };
        let created = meta_date(page, &keys.as_creation).unwrap_or(history.created);
        let updated = meta_date(page, &keys.as_update).unwrap_or(history.updated);
        PageDates::new(created, updated)
    }

    fn enter_collecting(&self) -> Result<()> {
        let mut stage = self.stage.lock();
        match *stage {
            Stage::Configured => *stage = Stage::Collecting,
            Stage::Collecting => {}
            other => bail!(FeedError::OutOfOrder {
                hook: "collect",
                stage: other,
            }),
        }
        Ok(())
    }
}

fn meta_date(page: &Page, key: &str) -> Option<DateTime<Utc>> {
    let raw = page.meta.get_str(key)?;
    let date = parse_date(&raw);
    if date.is_none() {
        log!("warn"; "{}: cannot parse `{key}: {raw}`, using git date", page.src_uri);
    }
    date
}

impl BuildPlugin for FeedPlugin {
    fn name(&self) -> &'static str {
        "feed"
    }

    fn configure(&mut self, ctx: &BuildContext) -> Result<()> {
        let stage = *self.stage.get_mut();
        if stage != Stage::Unconfigured {
            bail!(FeedError::OutOfOrder {
                hook: "configure",
                stage,
            });
        }

        self.options.validate()?;
        let feed = FeedMetadata::assemble(&ctx.site, &self.options, ctx.build_time)?;

        if self.renderer.is_none() {
            let renderer = match &self.options.template {
                Some(path) => TemplateRenderer::from_path(path)?,
                None => TemplateRenderer::bundled()?,
            };
            self.renderer = Some(Box::new(renderer));
        }

        if self.timestamps.is_none() {
            let source: Box<dyn TimestampSource> = match GitTimestamps::discover(&ctx.docs_dir) {
                Ok(git) => {
                    log!("git"; "history from {}", git.root().display());
                    Box::new(git)
                }
                Err(err) => {
                    log!("warn"; "no git repository for {} ({err}), pages dated at build time", ctx.docs_dir.display());
                    Box::new(StaticTimestamps::new())
                }
            };
            self.timestamps = Some(source);
        }

        self.exclude = ExcludeMatcher::from_patterns(&self.options.exclude_files);
        self.match_path = Some(self.options.match_regex()?);

        log!("feed"; "{}", feed.rss_url.as_deref().unwrap_or("no site url, feed url unknown"));
        self.feed = Some(feed);
        *self.stage.get_mut() = Stage::Configured;
        Ok(())
    }

    fn collect(&self, page: &Page, ctx: &BuildContext) -> Result<()> {
        self.enter_collecting()?;

        if !self.is_wanted(page) {
            return Ok(());
        }

        let Some(source) = self.timestamps.as_deref() else {
            bail!(FeedError::OutOfOrder {
                hook: "collect",
                stage: Stage::Unconfigured,
            });
        };
        let dates = resolve(source, &page.abs_src_path, ctx.build_time)?;
        let dates = self.dates_from_meta(page, dates);

        let entry = PageInformation {
            abs_path: page.abs_src_path.clone(),
            created: dates.created,
            updated: dates.updated,
            title: page.title.clone().unwrap_or_default(),
            description: extract(page, self.options.abstract_budget()),
            url_full: page.canonical_url.clone(),
            categories: page.meta.categories(),
            src_uri: page.src_uri.clone(),
        };

        if !self.collector.add(entry) {
            log!("warn"; "{} collected twice, keeping the first", page.src_uri);
        }
        Ok(())
    }

    fn finalize(&mut self, ctx: &BuildContext) -> Result<()> {
        let stage = *self.stage.get_mut();
        if !matches!(stage, Stage::Configured | Stage::Collecting) {
            bail!(FeedError::OutOfOrder {
                hook: "finalize",
                stage,
            });
        }
        let path = self.output_path(ctx);
        let (Some(feed), Some(renderer)) = (self.feed.as_mut(), self.renderer.as_deref()) else {
            bail!(FeedError::OutOfOrder {
                hook: "finalize",
                stage: Stage::Unconfigured,
            });
        };

        // Entries stay collected until the feed is on disk, so a failed
        // finalize can be retried with the same pages
        let entries = self.collector.snapshot();
        let collected = entries.len();
        feed.entries = select(entries, self.options.cap())
            .iter()
            .map(project)
            .collect();

        let doc = render_feed(renderer, feed)?;
        write_feed(&path, &doc)?;
        self.collector = EntryCollector::new();

        log!("feed"; "{} of {} pages -> {}", feed.entries.len(), collected, path.display());
        *self.stage.get_mut() = Stage::Rendered;
        Ok(())
    }
}
