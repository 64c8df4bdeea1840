//! Catalog-Crawler main entry point
//!
//! This is the command-line interface for the Catalog-Crawler listing site
//! crawler.

use anyhow::Context;
use catalog_crawler::config::{load_config_with_hash, Config};
use catalog_crawler::crawler::{crawl, parse_limit, RunLimits};
use catalog_crawler::output::{load_statistics, print_statistics};
use catalog_crawler::storage::open_storage;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Catalog-Crawler: a resumable listing site crawler
///
/// Catalog-Crawler walks a listing site from its categories down to the
/// final download links of every item, checkpointing as it goes so an
/// interrupted run picks up where it stopped.
#[derive(Parser, Debug)]
#[command(name = "catalog-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A resumable listing site crawler", long_about = None)]
struct Cli {
    /// Visit at most this many categories (0 or non-numeric: all)
    #[arg(value_name = "MAX_CATEGORIES", allow_hyphen_values = true)]
    max_categories: Option<String>,

    /// Visit at most this many movies per category (0 or non-numeric: all)
    #[arg(value_name = "MAX_MOVIES", allow_hyphen_values = true)]
    max_movies: Option<String>,

    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the output directory
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Start a fresh crawl, ignoring the progress checkpoint
    #[arg(long, conflicts_with = "stats")]
    fresh: bool,

    /// Show statistics from the completion file and exit
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.display().to_string();
    }

    if cli.stats {
        return handle_stats(&config);
    }

    let limits = RunLimits::new(
        parse_limit(cli.max_categories.as_deref()),
        parse_limit(cli.max_movies.as_deref()),
    );
    handle_crawl(config, limits, cli.fresh).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_crawler=info,warn"),
            1 => EnvFilter::new("catalog_crawler=debug,info"),
            2 => EnvFilter::new("catalog_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --stats mode: summarizes the completion file
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let store = open_storage(Path::new(&config.output.directory));
    let path = store.path_for(&config.output.final_file);
    println!("Catalog: {}\n", path.display());

    match load_statistics(&store, &config.output.final_file)
        .with_context(|| format!("Failed to read {}", path.display()))?
    {
        Some(stats) => print_statistics(&stats),
        None => println!("No catalog found. Run a crawl first."),
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, limits: RunLimits, fresh: bool) -> anyhow::Result<()> {
    tracing::info!(
        "Starting crawl of {} (categories: {}, movies per category: {})",
        config.site.base_url,
        describe_limit(limits.max_categories),
        describe_limit(limits.max_movies_per_category)
    );

    let final_path = Path::new(&config.output.directory).join(&config.output.final_file);

    let report = crawl(config, limits, fresh)
        .await
        .context("Crawl failed")?;

    tracing::info!(
        "Categories: {} found, {} visited, {} failed",
        report.categories_found,
        report.categories_visited,
        report.categories_failed
    );
    tracing::info!(
        "Movies: {} extracted, {} failed, {} already done",
        report.movies_extracted,
        report.movies_failed,
        report.movies_skipped
    );

    println!("\nDone! Scraped {} movies", report.total_movies);
    println!("Download links: {}", report.total_links);
    println!("Saved to: {}", final_path.display());

    Ok(())
}

fn describe_limit(limit: Option<usize>) -> String {
    match limit {
        Some(limit) => limit.to_string(),
        None => "all".to_string(),
    }
}
