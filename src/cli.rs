//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gitrss - rss feeds for documentation sites, dated by git history
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name, relative to the root
    #[arg(short = 'C', long, default_value = "gitrss.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments of the `build` command
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Output directory (relative to project root)
    #[arg(short, long)]
    pub site_dir: Option<PathBuf>,

    /// Override `[feed].length`; 0 keeps every page
    #[arg(short, long)]
    pub length: Option<i64>,

    /// Override the site base URL.
    ///
    /// Useful in CI, where the production URL differs from local development.
    #[arg(long = "base-url")]
    pub base_url: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Collect every page and write the feed
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Validate the config and the feed template without reading pages
    Check,
}

impl Cli {
    pub const fn build_args(&self) -> Option<&BuildArgs> {
        match &self.command {
            Commands::Build { build_args } => Some(build_args),
            Commands::Check => None,
        }
    }
}
