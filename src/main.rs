//! Canopy main entry point
//!
//! Command-line interface for the canopy category crawler.

use anyhow::Context;
use canopy_crawl::config::load_config_with_hash;
use canopy_crawl::crawler::run_crawl;
use canopy_crawl::storage::{SqliteStateStore, StateStore};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Canopy: a resumable crawler for hierarchically-categorized sites
///
/// Canopy discovers a site's category tree with per-level CSS selectors,
/// then visits every leaf category's content pages in a fixed order,
/// persisting its progress so an interrupted crawl picks up where it
/// stopped.
#[derive(Parser, Debug)]
#[command(name = "canopy")]
#[command(version)]
#[command(about = "A resumable category-tree crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Resume an interrupted crawl (default behavior)
    #[arg(long, conflicts_with = "fresh")]
    resume: bool,

    /// Start a fresh crawl, discarding previous state
    #[arg(long, conflicts_with = "resume")]
    fresh: bool,

    /// Validate config and describe what would be crawled, then exit
    #[arg(long, conflicts_with = "show_structure")]
    dry_run: bool,

    /// Print the persisted category tree and exit
    #[arg(long, conflicts_with = "dry_run")]
    show_structure: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    if cli.show_structure {
        handle_show_structure(&config)?;
        return Ok(());
    }

    run_crawl(config, &config_hash, cli.fresh)
        .await
        .context("crawl failed")?;
    Ok(())
}

/// Configures the tracing subscriber from verbosity flags
///
/// RUST_LOG overrides the flag-derived level when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("canopy_crawl={},canopy={}", default_level, default_level)));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn handle_dry_run(config: &canopy_crawl::Config) {
    println!("Site:        {} ({})", config.site.name, config.site.start_url);
    println!("Levels:      {}", config.levels.len());
    for (index, level) in config.levels.iter().enumerate() {
        println!("  level {}:   {}", index, level.link_selector);
    }
    println!("Items:       {}", config.page.item_selector);
    println!("Next page:   {}", config.page.next_page_selector);
    println!("Database:    {}", config.output.database_path);
}

fn handle_show_structure(config: &canopy_crawl::Config) -> anyhow::Result<()> {
    let store = SqliteStateStore::new(Path::new(&config.output.database_path))
        .context("failed to open state database")?;
    match store.load().context("failed to load crawl state")? {
        Some(state) => {
            print!("{}", state.site_structure);
            match (&state.current_leaf_path, &state.current_page_url) {
                (Some(leaf), Some(page)) => println!("cursor: {} @ {}", leaf, page),
                _ => println!("cursor: none"),
            }
        }
        None => println!("No persisted crawl state at {}", config.output.database_path),
    }
    Ok(())
}
