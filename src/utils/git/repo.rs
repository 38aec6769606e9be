use anyhow::{Result, anyhow};
use gix::{Repository, ThreadSafeRepository};
use std::path::{Path, PathBuf};

/// Find the repository containing `path`, walking up parent directories.
pub fn discover_repo(path: &Path) -> Result<ThreadSafeRepository> {
    let repo = gix::discover(path)?;
    Ok(repo.into_sync())
}

/// Get repository root path (the work tree)
pub fn get_repo_root(repo: &Repository) -> Result<&Path> {
    repo.path()
        .parent()
        .ok_or_else(|| anyhow!("Invalid repository path"))
}

/// Path of `file` relative to the work tree at `root`, with `/` separators.
///
/// Returns `None` for files outside the work tree.
pub fn relative_to_root(root: &Path, file: &Path) -> Option<PathBuf> {
    let root = root.canonicalize().ok()?;
    let file = file.canonicalize().ok()?;
    file.strip_prefix(&root).ok().map(Path::to_path_buf)
}
