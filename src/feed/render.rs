//! Entry selection, template rendering and the final feed write.
//!
//! # Pipeline
//!
//! ```text
//! Vec<PageInformation> ──select()──► sorted, capped
//!                      ──project()─► Vec<EntryView>  ──► FeedMetadata.entries
//!                                                         │
//!                      render_feed(&dyn Renderer) ◄───────┘
//!                                 │  template, then well-formedness check
//!                                 ▼
//!                      write_feed()  <path>.tmp ──rename──► <path>
//! ```

use super::{entry::PageInformation, error::FeedError, metadata::FeedMetadata};
use crate::{
    config::ConfigError,
    utils::{
        date::to_rfc2822,
        xml::{check_well_formed, escape_text},
    },
};
use anyhow::Result;
use minijinja::{Environment, Output, State, UndefinedBehavior, Value};
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Template used when none is configured.
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/rss.xml.j2");

/// One item as templates see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    pub title: String,
    pub description: String,
    pub link: Option<String>,
    /// Canonical URL, or the source path when the site has no URL
    pub guid: String,
    /// RFC 2822 of the update date
    pub pub_date: String,
    /// RFC 2822 of the creation date
    pub created: String,
    pub categories: Vec<String>,
}

/// Order entries newest-update first and keep at most `cap` of them.
///
/// Ties on `updated` go to the newer `created`, then to the title, then
/// to the source path, so the order never depends on arrival order.
pub fn select(mut entries: Vec<PageInformation>, cap: Option<usize>) -> Vec<PageInformation> {
    entries.sort_by(|a, b| {
        b.updated
            .cmp(&a.updated)
            .then_with(|| b.created.cmp(&a.created))
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.abs_path.cmp(&b.abs_path))
    });
    if let Some(cap) = cap {
        entries.truncate(cap);
    }
    entries
}

pub fn project(entry: &PageInformation) -> EntryView {
    EntryView {
        title: entry.title.clone(),
        description: entry.description.clone(),
        link: entry.url_full.clone(),
        guid: entry
            .url_full
            .clone()
            .unwrap_or_else(|| entry.src_uri.clone()),
        pub_date: to_rfc2822(&entry.updated),
        created: to_rfc2822(&entry.created),
        categories: entry.categories.clone(),
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Turns feed metadata into a document.
pub trait Renderer: Send + Sync {
    fn render(&self, feed: &FeedMetadata) -> Result<String>;
}

/// Jinja-style template renderer.
///
/// Every printed value is XML-escaped unless marked `|safe`. Referencing
/// an undefined variable is an error.
pub struct TemplateRenderer {
    env: Environment<'static>,
    name: String,
}

impl TemplateRenderer {
    /// The bundled RSS 2.0 template.
    pub fn bundled() -> Result<Self> {
        Self::from_source("rss.xml.j2", DEFAULT_TEMPLATE)
    }

    /// Load a template file. Sibling files in its directory are available
    /// to `{% include %}`, `{% extends %}` and `{% import %}`.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            anyhow::bail!(ConfigError::TemplateNotFound(path.to_path_buf()));
        }
        let source =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        let mut env = Self::environment();
        if let Some(dir) = path.parent() {
            env.set_loader(minijinja::path_loader(dir));
        }
        Self::compile(env, &name, source.into())
    }

    /// Compile `source`; syntax errors surface here rather than at render time.
    pub fn from_source(name: &str, source: impl Into<String>) -> Result<Self> {
        Self::compile(Self::environment(), name, source.into())
    }

    fn environment() -> Environment<'static> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_formatter(xml_formatter);
        env
    }

    fn compile(mut env: Environment<'static>, name: &str, source: String) -> Result<Self> {
        env.add_template_owned(name.to_owned(), source)
            .map_err(|err| FeedError::Render(format!("{err:#}")))?;

        Ok(Self {
            env,
            name: name.to_owned(),
        })
    }
}

impl Renderer for TemplateRenderer {
    fn render(&self, feed: &FeedMetadata) -> Result<String> {
        let doc = self
            .env
            .get_template(&self.name)
            .and_then(|template| template.render(feed))
            .map_err(|err| FeedError::Render(format!("{err:#}")))?;
        Ok(doc)
    }
}

/// Escape printed values for XML; `none` prints nothing.
fn xml_formatter(
    out: &mut Output<'_>,
    _state: &State<'_, '_>,
    value: &Value,
) -> Result<(), minijinja::Error> {
    if value.is_none() || value.is_undefined() {
        return Ok(());
    }
    if value.is_safe() {
        write!(out, "{value}")?;
    } else {
        write!(out, "{}", escape_text(&value.to_string()))?;
    }
    Ok(())
}

/// Render `feed` and make sure the result is well-formed XML.
pub fn render_feed(renderer: &dyn Renderer, feed: &FeedMetadata) -> Result<String> {
    let doc = renderer.render(feed)?;
    check_well_formed(&doc).map_err(|err| FeedError::Render(format!("{err:#}")))?;
    Ok(doc)
}

/// Replace `path` with `doc`.
///
/// Written to `<path>.tmp` first, then renamed over the target, so an
/// interrupted build leaves the previous feed intact.
pub fn write_feed(path: &Path, doc: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|err| FeedError::Io(parent.to_path_buf(), err))?;
    }

    let tmp = tmp_path(path);
    fs::write(&tmp, doc).map_err(|err| FeedError::Io(tmp.clone(), err))?;
    fs::rename(&tmp, path).map_err(|err| FeedError::Io(path.to_path_buf(), err))?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
