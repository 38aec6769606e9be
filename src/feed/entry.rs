//! Per-page feed entries and the build-scoped collector.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use std::path::PathBuf;

/// Everything the feed needs to know about one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInformation {
    pub abs_path: PathBuf,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    /// Empty when the page has no title
    pub title: String,
    pub description: String,
    /// Absent only when no site URL is configured
    pub url_full: Option<String>,
    pub categories: Vec<String>,
    /// Docs-relative source path, `/`-separated
    pub src_uri: String,
}

#[derive(Debug, Default)]
struct Entries {
    items: Vec<PageInformation>,
    seen: FxHashSet<PathBuf>,
}

/// Append-only entry list shared by concurrent page hooks.
#[derive(Debug, Default)]
pub struct EntryCollector {
    inner: Mutex<Entries>,
}

impl EntryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry`. Returns `false`, dropping it, when its path was
    /// already collected.
    pub fn add(&self, entry: PageInformation) -> bool {
        let mut inner = self.inner.lock();
        if !inner.seen.insert(entry.abs_path.clone()) {
            return false;
        }
        inner.items.push(entry);
        true
    }

    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the entries collected so far, in arrival order.
    pub fn snapshot(&self) -> Vec<PageInformation> {
        self.inner.lock().items.clone()
    }

    /// Collected entries, in arrival order.
    pub fn into_entries(self) -> Vec<PageInformation> {
        self.inner.into_inner().items
    }
}
