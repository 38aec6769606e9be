//! gitrss - rss feeds for documentation sites, dated by git history.

use anyhow::{Result, bail};
use clap::Parser;
use gitrss::{
    BuildPlugin, Builder, FeedPlugin, SiteConfig,
    cli::{Cli, Commands},
    host::BuildContext,
    log,
};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Build { .. } => build_feed(&config),
        Commands::Check => check_feed(&config),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    if !config_path.exists() {
        bail!("Config file `{}` not found.", config_path.display());
    }

    let mut config = SiteConfig::from_path(&config_path)?;
    config.update_with_cli(cli);
    config.validate()?;

    log!("config"; "{}", config.config_path.display());
    Ok(config)
}

/// Collect every page and write the feed.
fn build_feed(config: &SiteConfig) -> Result<()> {
    let plugin = FeedPlugin::new(config.feed.clone());
    Builder::new(BuildContext::from_config(config))
        .plugin(plugin)
        .run()?;
    Ok(())
}

/// Run the configuration hook only.
fn check_feed(config: &SiteConfig) -> Result<()> {
    let ctx = BuildContext::from_config(config);
    let mut plugin = FeedPlugin::new(config.feed.clone());
    plugin.configure(&ctx)?;

    if let Some(feed) = plugin.feed() {
        log!("check"; "feed url: {}", feed.rss_url.as_deref().unwrap_or("(no site url)"));
    }
    log!("check"; "output: {}", plugin.output_path(&ctx).display());
    Ok(())
}
