//! Feed error types.

use std::path::PathBuf;
use thiserror::Error;

use super::Stage;

/// Failures of the feed plugin outside configuration.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("page source `{0}` does not exist")]
    PathResolution(PathBuf),

    #[error("feed rendering failed: {0}")]
    Render(String),

    #[error("IO error when writing `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("`{hook}` called out of order (plugin is {stage})")]
    OutOfOrder { hook: &'static str, stage: Stage },
}
