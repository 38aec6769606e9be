//! Page creation/update dates.
//!
//! Dates come from a [`TimestampSource`]. Pages without history fall back
//! to the build time, so `resolve` only fails when the source file itself
//! is missing.

use super::error::FeedError;
use crate::{
    log,
    utils::{
        date::from_unix_seconds,
        git::{discover_repo, file_history, get_repo_root, relative_to_root},
    },
};
use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Utc};
use gix::ThreadSafeRepository;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

/// Oldest and newest recorded change of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct History {
    pub first: DateTime<Utc>,
    pub last: DateTime<Utc>,
}

/// Resolved dates of one page. `created <= updated` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDates {
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl PageDates {
    pub fn new(a: DateTime<Utc>, b: DateTime<Utc>) -> Self {
        Self {
            created: a.min(b),
            updated: a.max(b),
        }
    }

    pub fn single(at: DateTime<Utc>) -> Self {
        Self::new(at, at)
    }
}

/// Where page history comes from.
pub trait TimestampSource: Send + Sync {
    /// `Ok(None)` when there is no record of `path` at all.
    fn history(&self, path: &Path) -> Result<Option<History>>;
}

/// Resolve the dates of `path`.
///
/// Missing history, and history that cannot be read, both degrade to
/// `fallback` for both dates.
pub fn resolve(
    source: &dyn TimestampSource,
    path: &Path,
    fallback: DateTime<Utc>,
) -> Result<PageDates> {
    if !path.exists() {
        bail!(FeedError::PathResolution(path.to_path_buf()));
    }

    match source.history(path) {
        Ok(Some(history)) => Ok(PageDates::new(history.first, history.last)),
        Ok(None) => Ok(PageDates::single(fallback)),
        Err(err) => {
            log!("warn"; "git history unavailable for {}: {err}", path.display());
            Ok(PageDates::single(fallback))
        }
    }
}

// ============================================================================
// Git
// ============================================================================

/// Dates from the commits that touched each file.
pub struct GitTimestamps {
    repo: ThreadSafeRepository,
    root: PathBuf,
}

impl GitTimestamps {
    /// Find the repository containing `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        let repo = discover_repo(dir)?;
        let root = get_repo_root(&repo.to_thread_local())?.to_path_buf();
        Ok(Self { repo, root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TimestampSource for GitTimestamps {
    fn history(&self, path: &Path) -> Result<Option<History>> {
        let Some(rel_path) = relative_to_root(&self.root, path) else {
            return Ok(None);
        };

        let repo = self.repo.to_thread_local();
        let Some(span) = file_history(&repo, &rel_path)? else {
            return Ok(None);
        };

        let first = from_unix_seconds(span.first)
            .ok_or_else(|| anyhow!("commit time out of range: {}", span.first))?;
        let last = from_unix_seconds(span.last)
            .ok_or_else(|| anyhow!("commit time out of range: {}", span.last))?;
        Ok(Some(History { first, last }))
    }
}

// ============================================================================
// Static
// ============================================================================

/// Fixed dates per path; every other path has no history.
///
/// Used when the docs are not in a git work tree, and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticTimestamps {
    dates: FxHashMap<PathBuf, History>,
}

impl StaticTimestamps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<PathBuf>, first: DateTime<Utc>, last: DateTime<Utc>) -> Self {
        self.dates.insert(path.into(), History { first, last });
        self
    }
}

impl TimestampSource for StaticTimestamps {
    fn history(&self, path: &Path) -> Result<Option<History>> {
        Ok(self.dates.get(path).copied())
    }
}
