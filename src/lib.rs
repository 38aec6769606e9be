//! gitrss - rss feeds for documentation sites, dated by git history.
//!
//! The feed itself is a [`feed::FeedPlugin`] driven through the
//! [`host::BuildPlugin`] hooks; [`host::Builder`] is the minimal pipeline
//! that loads pages and calls them.

pub mod cli;
pub mod config;
pub mod feed;
pub mod host;
pub mod utils;

pub use config::SiteConfig;
pub use feed::FeedPlugin;
pub use host::{BuildContext, BuildPlugin, Builder};
