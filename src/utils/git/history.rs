//! Per-file commit history lookup.

use anyhow::Result;
use gix::{Commit, ObjectId, Repository};
use std::path::Path;

/// Oldest and newest commit times (unix seconds) that touched a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitSpan {
    pub first: i64,
    pub last: i64,
}

impl CommitSpan {
    fn include(span: Option<Self>, seconds: i64) -> Self {
        match span {
            Some(Self { first, last }) => Self {
                first: first.min(seconds),
                last: last.max(seconds),
            },
            None => Self {
                first: seconds,
                last: seconds,
            },
        }
    }
}

/// Walk the ancestors of `HEAD` and collect the commits that changed `rel_path`.
///
/// A commit changed the file when the blob at `rel_path` differs from the one
/// in its first parent, or when it is a root commit containing the file.
///
/// Returns `Ok(None)` for an unborn `HEAD` or a file no commit ever touched.
/// In a shallow clone the oldest fetched commits stand in for roots.
pub fn file_history(repo: &Repository, rel_path: &Path) -> Result<Option<CommitSpan>> {
    let Ok(head) = repo.head_id() else {
        return Ok(None);
    };

    let mut span = None;
    for info in head.ancestors().all()? {
        let commit = info?.object()?;
        let Some(blob) = blob_at(&commit, rel_path)? else {
            continue;
        };

        // A parent missing from the object database is the edge of a
        // shallow clone: the commit counts as a root there
        let parent = match commit.parent_ids().next() {
            Some(id) => id.try_object()?.map(|obj| obj.try_into_commit()).transpose()?,
            None => None,
        };
        let changed = match parent {
            Some(parent) => blob_at(&parent, rel_path)? != Some(blob),
            None => true,
        };

        if changed {
            span = Some(CommitSpan::include(span, commit.time()?.seconds));
        }
    }

    Ok(span)
}

/// Blob id of `rel_path` in the tree of `commit`.
fn blob_at(commit: &Commit<'_>, rel_path: &Path) -> Result<Option<ObjectId>> {
    let tree = commit.tree()?;
    let entry = tree.lookup_entry_by_path(rel_path)?;
    Ok(entry.map(|entry| entry.object_id()))
}


#[cfg(test)]
mod tests {
    use super::fixture::{Repo, git_available};
    use super::*;

    fn history(repo: &Repo, rel: &str) -> Option<CommitSpan> {
        let local = gix::open(repo.root()).unwrap();
        file_history(&local, Path::new(rel)).unwrap()
    }

    #[test]
    fn test_span_include() {
        let span = CommitSpan::include(None, 10);
        assert_eq!(span, CommitSpan { first: 10, last: 10 });

        let span = CommitSpan::include(Some(span), 5);
        let span = CommitSpan::include(Some(span), 20);
        assert_eq!(span, CommitSpan { first: 5, last: 20 });
    }

    #[test]
    fn test_single_commit() {
        if !git_available() {
            return;
        }
        let repo = Repo::init();
        repo.write("docs/index.md", "# Home");
        repo.commit("add index", 1_700_000_000);

        let span = history(&repo, "docs/index.md").unwrap();
        assert_eq!(span.first, 1_700_000_000);
        assert_eq!(span.last, 1_700_000_000);
    }

    #[test]
    fn test_created_and_updated() {
        if !git_available() {
            return;
        }
        let repo = Repo::init();
        repo.write("page.md", "v1");
        repo.commit("create", 1_600_000_000);
        repo.write("other.md", "unrelated");
        repo.commit("unrelated change", 1_650_000_000);
        repo.write("page.md", "v2");
        repo.commit("update", 1_700_000_000);

        let span = history(&repo, "page.md").unwrap();
        assert_eq!(span.first, 1_600_000_000);
        assert_eq!(span.last, 1_700_000_000);

        let other = history(&repo, "other.md").unwrap();
        assert_eq!(other, CommitSpan { first: 1_650_000_000, last: 1_650_000_000 });
    }

    #[test]
    fn test_shallow_clone_boundary() {
        if !git_available() {
            return;
        }
        let repo = Repo::init();
        repo.write("page.md", "v1");
        repo.commit("create", 1_600_000_000);
        repo.write("other.md", "unrelated");
        repo.commit("unrelated change", 1_650_000_000);
        repo.write("page.md", "v2");
        repo.commit("update", 1_700_000_000);

        let shallow = repo.shallow_clone(2);

        // The creating commit is not fetched; the oldest fetched one stands in
        let span = history(&shallow, "page.md").unwrap();
        assert_eq!(span.first, 1_650_000_000);
        assert_eq!(span.last, 1_700_000_000);

        let other = history(&shallow, "other.md").unwrap();
        assert_eq!(other, CommitSpan { first: 1_650_000_000, last: 1_650_000_000 });
    }

    #[test]
    fn test_untracked_file_has_no_history() {
        if !git_available() {
            return;
        }
        let repo = Repo::init();
        repo.write("tracked.md", "a");
        repo.commit("init", 1_700_000_000);
        repo.write("untracked.md", "b");

        assert!(history(&repo, "untracked.md").is_none());
    }

    #[test]
    fn test_unborn_head() {
        if !git_available() {
            return;
        }
        let repo = Repo::init();
        repo.write("a.md", "a");

        assert!(history(&repo, "a.md").is_none());
    }
}
