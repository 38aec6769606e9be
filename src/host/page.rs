//! Markdown pages as the host hands them to plugins.
//!
//! # Front matter
//!
//! Two forms are recognized at the very top of a page:
//!
//! ```text
//! ---                          +++
//! title: Setup                 title = "Setup"
//! tags: install, linux         tags = ["install", "linux"]
//! ---                          +++
//! ```
//!
//! YAML-like blocks are read line by line (`key: value`, inline `[a, b]`
//! lists, comma lists and `- item` lists); TOML blocks go through `toml`.
//! Both end up in the same [`PageMeta`] table.

use anyhow::{Context, Result, anyhow};
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};
use toml::{Table, Value};
use walkdir::WalkDir;

/// Front-matter metadata of a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMeta {
    table: Table,
}

impl PageMeta {
    pub fn from_table(table: Table) -> Self {
        Self { table }
    }

    /// String value of `key`; TOML dates are returned in their text form.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.table.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Datetime(dt) => Some(dt.to_string()),
            Value::Integer(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn title(&self) -> Option<String> {
        self.get_str("title").filter(|s| !s.trim().is_empty())
    }

    /// Explicit description, `summary` being accepted as an alias.
    pub fn description(&self) -> Option<String> {
        self.get_str("description")
            .or_else(|| self.get_str("summary"))
            .filter(|s| !s.trim().is_empty())
    }

    /// Union of `categories` and `tags`, in declaration order, deduplicated.
    pub fn categories(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for key in ["categories", "tags"] {
            let values = match self.table.get(key) {
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_owned))
                    .collect(),
                Some(Value::String(s)) => split_list(s),
                _ => Vec::new(),
            };
            for value in values {
                if !value.is_empty() && !out.contains(&value) {
                    out.push(value);
                }
            }
        }
        out
    }
}

/// One source page.
#[derive(Debug, Clone)]
pub struct Page {
    /// Absolute path of the Markdown source
    pub abs_src_path: PathBuf,
    /// Path relative to the docs dir, `/`-separated
    pub src_uri: String,
    pub meta: PageMeta,
    /// Markdown body, front matter stripped
    pub markdown: String,
    /// Front-matter title, else the first `# heading`
    pub title: Option<String>,
    /// Absolute URL, when the site URL is known
    pub canonical_url: Option<String>,
}

impl Page {
    /// Build a page from its raw source text.
    pub fn from_source(
        abs_src_path: PathBuf,
        src_uri: String,
        source: &str,
        base_url: Option<&str>,
        use_directory_urls: bool,
    ) -> Result<Self> {
        let (meta, markdown) = split_front_matter(source)
            .with_context(|| format!("invalid front matter in `{src_uri}`"))?;
        let title = meta.title().or_else(|| first_heading(markdown));
        let canonical_url = base_url.map(|base| {
            format!(
                "{}/{}",
                base.trim_end_matches('/'),
                url_path(&src_uri, use_directory_urls)
            )
        });

        Ok(Self {
            abs_src_path,
            src_uri,
            meta,
            markdown: markdown.to_owned(),
            title,
            canonical_url,
        })
    }
}

/// Read every Markdown page under `docs_dir`, sorted by relative path.
pub fn load_pages(
    docs_dir: &Path,
    base_url: Option<&str>,
    use_directory_urls: bool,
) -> Result<Vec<Page>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(docs_dir).follow_links(true) {
        let entry = entry.with_context(|| format!("failed to walk `{}`", docs_dir.display()))?;
        if entry.file_type().is_file() && is_markdown(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    files
        .into_par_iter()
        .map(|path| {
            let src_uri = path
                .strip_prefix(docs_dir)
                .map_err(|_| anyhow!("page outside docs dir: {}", path.display()))?
                .to_string_lossy()
                .replace('\\', "/");
            let source = fs::read_to_string(&path)
                .with_context(|| format!("failed to read `{}`", path.display()))?;
            Page::from_source(path, src_uri, &source, base_url, use_directory_urls)
        })
        .collect()
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext, "md" | "markdown"))
}

/// Site-relative URL of a page, without leading slash.
///
/// | source              | directory urls  | plain               |
/// |---------------------|-----------------|---------------------|
/// | `index.md`          | ``              | `index.html`        |
/// | `guide/index.md`    | `guide/`        | `guide/index.html`  |
/// | `guide/README.md`   | `guide/`        | `guide/index.html`  |
/// | `guide/setup.md`    | `guide/setup/`  | `guide/setup.html`  |
pub fn url_path(src_uri: &str, use_directory_urls: bool) -> String {
    let (dir, file) = match src_uri.rsplit_once('/') {
        Some((dir, file)) => (format!("{dir}/"), file),
        None => (String::new(), src_uri),
    };
    let stem = file
        .rsplit_once('.')
        .map_or(file, |(stem, _)| stem);
    let is_index = stem.eq_ignore_ascii_case("index") || stem.eq_ignore_ascii_case("readme");

    match (is_index, use_directory_urls) {
        (true, true) => dir,
        (true, false) => format!("{dir}index.html"),
        (false, true) => format!("{dir}{stem}/"),
        (false, false) => format!("{dir}{stem}.html"),
    }
}

/// Text of the first level-1 heading.
fn first_heading(markdown: &str) -> Option<String> {
    let mut heading: Option<String> = None;
    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => heading = Some(String::new()),
            Event::Text(text) | Event::Code(text) => {
                if let Some(h) = heading.as_mut() {
                    h.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                return heading.map(|h| h.trim().to_owned()).filter(|h| !h.is_empty());
            }
            _ => {}
        }
    }
    None
}

/// Split a page into front matter and body.
fn split_front_matter(content: &str) -> Result<(PageMeta, &str)> {
    let trimmed = content.trim_start_matches('\u{feff}');

    for (fence, is_toml) in [("---", false), ("+++", true)] {
        let Some(rest) = trimmed.strip_prefix(fence) else {
            continue;
        };
        if !rest.starts_with('\n') && !rest.starts_with("\r\n") {
            continue;
        }
        let Some(end) = rest.find(&format!("\n{fence}")) else {
            continue;
        };

        let block = &rest[..end];
        let body = rest[end + 1 + fence.len()..].trim_start_matches(['\r', '\n']);
        let table = if is_toml {
            toml::from_str::<Table>(block)?
        } else {
            parse_yaml_like(block)
        };
        return Ok((PageMeta::from_table(table), body));
    }

    Ok((PageMeta::default(), trimmed))
}

/// Parse simple YAML-like front matter (`key: value`).
fn parse_yaml_like(block: &str) -> Table {
    let mut table = Table::new();
    let mut list_key: Option<String> = None;

    for line in block.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // `- item` continuation of a block list
        if let Some(item) = trimmed.strip_prefix("- ")
            && let Some(key) = &list_key
        {
            if let Some(Value::Array(items)) = table.get_mut(key) {
                items.push(Value::String(unquote(item).to_owned()));
            }
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let key = key.trim().to_owned();
        let value = value.trim();

        if value.is_empty() {
            table.insert(key.clone(), Value::Array(Vec::new()));
            list_key = Some(key);
            continue;
        }
        list_key = None;

        let value = match value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
            Some(inner) => Value::Array(split_list(inner).into_iter().map(Value::String).collect()),
            None => Value::String(unquote(value).to_owned()),
        };
        table.insert(key, value);
    }

    table
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|item| unquote(item.trim()).to_owned())
        .filter(|item| !item.is_empty())
        .collect()
}

fn unquote(s: &str) -> &str {
    let s = s.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|s| s.strip_suffix(quote)) {
            return inner;
        }
    }
    s
}
