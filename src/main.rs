//! objcrawler main entry point
//!
//! This is the command-line interface for the objcrawler 3D model crawler.

use anyhow::Context;
use clap::Parser;
use objcrawler::config::{load_config, Config};
use objcrawler::crawler::Coordinator;
use objcrawler::output::{load_statistics, print_crawl_summary, print_statistics};
use objcrawler::seed::{load_seed_file, seed_frontier, seeds_from_config, Seed};
use objcrawler::storage::{open_storage, Frontier, SqliteStorage};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// objcrawler: crawls the web for downloadable 3D models
///
/// objcrawler walks pages from a persistent frontier while respecting
/// robots.txt, and saves every Blender file it finds, whether raw or
/// inside a zip archive, to the configured output folder.
#[derive(Parser, Debug)]
#[command(name = "objcrawler")]
#[command(version)]
#[command(about = "A crawler for downloadable 3D models", long_about = None)]
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

    /// Extra seed file, one `url [priority]` per line
    #[arg(long, value_name = "FILE")]
    seed_file: Option<PathBuf>,

    /// Validate config and seeds and show what would be crawled without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show frontier statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    let mut seeds = seeds_from_config(&config);
    if let Some(path) = &cli.seed_file {
        let from_file = load_seed_file(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        tracing::info!("Loaded {} seeds from {}", from_file.len(), path.display());
        seeds.extend(from_file);
    }

    if cli.dry_run {
        handle_dry_run(&config, &seeds)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_crawl(config, &seeds).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("objcrawler=info,warn"),
            1 => EnvFilter::new("objcrawler=debug,info"),
            2 => EnvFilter::new("objcrawler=trace,debug"),
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

/// Handles the --dry-run mode: seeds an in-memory frontier and reports its pop order
fn handle_dry_run(config: &Config, seeds: &[Seed]) -> anyhow::Result<()> {
    println!("=== objcrawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Crawler workers: {}", config.crawler.crawler_workers);
    println!("  Extraction workers: {}", config.crawler.extraction_workers);
    println!(
        "  robots.txt cache capacity: {}",
        config.crawler.robots_cache_capacity
    );
    match config.crawler.request_timeout_secs {
        Some(secs) => println!("  Request timeout: {}s", secs),
        None => println!("  Request timeout: transport default"),
    }

    println!("\nUser Agent:");
    println!(
        "  {}",
        objcrawler::crawler::user_agent_string(&config.user_agent)
    );

    println!("\nStorage:");
    println!("  Database: {}", config.storage.database_path);

    println!("\nExtraction:");
    println!("  Output folder: {}", config.extraction.output_folder);
    println!(
        "  Archive ceiling: {} bytes",
        config.extraction.max_archive_bytes
    );

    let frontier = Frontier::new(SqliteStorage::new_in_memory()?);
    let accepted = seed_frontier(&frontier, seeds)?;

    println!("\nSeeds ({} given, {} accepted):", seeds.len(), accepted);
    while let Some(url) = frontier.pop_next()? {
        let priority = frontier
            .get_record(&url)?
            .map(|record| record.priority)
            .unwrap_or_default();
        println!("  p{}  {}", priority, url);
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.storage.database_path);

    let storage = open_storage(Path::new(&config.storage.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, seeds: &[Seed]) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config)?;
    coordinator.seed(seeds)?;

    match coordinator.run().await {
        Ok(summary) => {
            print_crawl_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
