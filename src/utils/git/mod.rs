//! Git access for the feed: repository discovery, per-file history,
//! and gitignore-style path patterns.

mod history;
mod ignore;
mod repo;

#[cfg(test)]
pub use history::fixture;
pub use history::{CommitSpan, file_history};
pub use ignore::ExcludeMatcher;
pub use repo::{discover_repo, get_repo_root, relative_to_root};
