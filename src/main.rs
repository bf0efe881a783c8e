//! Sumi-Lens main entry point
//!
//! This is the command-line interface for the Sumi-Lens search engine.

use clap::Parser;
use std::path::PathBuf;
use sumi_lens::config::{load_config_with_hash, validate, Config, Seed, TraversalOrder};
use sumi_lens::index::{IndexBuilder, InvertedIndex, QueryProcessor};
use sumi_lens::output::{
    generate_markdown_summary, log_statistics, print_statistics, write_counts, write_index,
    write_results, CrawlStatistics, SummaryContext,
};
use sumi_lens::Coordinator;
use tracing_subscriber::EnvFilter;

/// Sumi-Lens: a small crawling search engine
///
/// Sumi-Lens builds an inverted index from a local tree of text files or from
/// pages crawled from a seed URL, then answers exact or prefix queries against
/// it and writes the index, word counts and ranked results as JSON.
#[derive(Parser, Debug)]
#[command(name = "sumi-lens")]
#[command(version)]
#[command(about = "A small crawling search engine", long_about = None)]
struct Cli {
    /// File, directory or http(s) URL to index
    #[arg(value_name = "SEED")]
    seed: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of pages to crawl
    #[arg(long, value_name = "N")]
    pages: Option<usize>,

    /// Maximum redirects followed per fetch
    #[arg(long, value_name = "N")]
    max_redirects: Option<u32>,

    /// Concurrent fetches or file readers
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Visit discovered links breadth-first instead of depth-first
    #[arg(long)]
    breadth_first: bool,

    /// Write the inverted index as JSON
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "index.json")]
    index: Option<PathBuf>,

    /// Write per-location word counts as JSON
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "counts.json")]
    counts: Option<PathBuf>,

    /// Query file, one query per line
    #[arg(long, value_name = "FILE")]
    queries: Option<PathBuf>,

    /// Match query words as prefixes
    #[arg(long)]
    partial: bool,

    /// Write ranked query results as JSON
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "results.json")]
    results: Option<PathBuf>,

    /// Write a markdown crawl summary
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "summary.md")]
    summary: Option<PathBuf>,

    /// Print crawl statistics to stdout when done
    #[arg(long)]
    stats: bool,

    /// Validate configuration and seed, show the plan and exit
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    (cfg, Some(hash))
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => (Config::default(), None),
    };

    apply_overrides(&mut config, &cli);
    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    let seed = match Seed::parse(&cli.seed) {
        Ok(seed) => seed,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &seed);
        return Ok(());
    }

    let mut index = InvertedIndex::new();
    let stats = match &seed {
        Seed::Web(url) => {
            let coordinator = Coordinator::from_config(&config)?;
            let stats = coordinator.crawl(url.clone(), &mut index).await;
            log_statistics(&stats);
            if cli.stats {
                print_statistics(&stats);
            }
            Some(stats)
        }
        Seed::Path(path) => {
            let builder = IndexBuilder::new(config.crawler.max_concurrent_fetches);
            builder.build_path(path, &mut index).await?;
            None
        }
    };
    tracing::info!("Index holds {}", index);

    let failures = write_outputs(&config, &index, stats.as_ref(), config_hash);
    if failures > 0 {
        return Err(format!("{} output step(s) failed", failures).into());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_lens=info,warn"),
            1 => EnvFilter::new("sumi_lens=debug,info"),
            2 => EnvFilter::new("sumi_lens=trace,debug"),
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

/// Folds command-line flags over the file configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(pages) = cli.pages {
        config.crawler.max_pages = pages;
    }
    if let Some(max_redirects) = cli.max_redirects {
        config.crawler.max_redirects = max_redirects;
    }
    if let Some(workers) = cli.workers {
        config.crawler.max_concurrent_fetches = workers;
    }
    if cli.breadth_first {
        config.crawler.traversal = TraversalOrder::BreadthFirst;
    }

    if cli.index.is_some() {
        config.output.index_path = cli.index.clone();
    }
    if cli.counts.is_some() {
        config.output.counts_path = cli.counts.clone();
    }
    if cli.results.is_some() {
        config.output.results_path = cli.results.clone();
    }
    if cli.summary.is_some() {
        config.output.summary_path = cli.summary.clone();
    }

    if cli.queries.is_some() {
        config.search.queries_path = cli.queries.clone();
    }
    if cli.partial {
        config.search.partial = true;
    }
}

/// Handles the --dry-run mode: shows what would be indexed
fn handle_dry_run(config: &Config, seed: &Seed) {
    println!("=== Sumi-Lens Dry Run ===\n");

    println!("Seed: {}", seed);

    println!("\nCrawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Max redirects: {}", config.crawler.max_redirects);
    println!("  Workers: {}", config.crawler.max_concurrent_fetches);
    println!("  Traversal: {:?}", config.crawler.traversal);
    println!("  Connect timeout: {}ms", config.crawler.connect_timeout_ms);
    println!("  Read timeout: {}ms", config.crawler.read_timeout_ms);
    println!("  Max body: {} bytes", config.crawler.max_body_bytes);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    let show = |path: &Option<PathBuf>| {
        path.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    println!("\nSearch:");
    println!("  Queries: {}", show(&config.search.queries_path));
    println!("  Partial: {}", config.search.partial);

    println!("\nOutput:");
    println!("  Index: {}", show(&config.output.index_path));
    println!("  Counts: {}", show(&config.output.counts_path));
    println!("  Results: {}", show(&config.output.results_path));
    println!("  Summary: {}", show(&config.output.summary_path));

    println!("\n✓ Configuration is valid");
}

/// Runs queries and writes every requested output
///
/// A failing step is logged and counted; the remaining steps still run.
fn write_outputs(
    config: &Config,
    index: &InvertedIndex,
    stats: Option<&CrawlStatistics>,
    config_hash: Option<String>,
) -> usize {
    let mut failures = 0;

    if let Some(path) = &config.output.index_path {
        if let Err(e) = write_index(index, path) {
            tracing::warn!("Unable to write index to {}: {}", path.display(), e);
            failures += 1;
        }
    }

    if let Some(path) = &config.output.counts_path {
        if let Err(e) = write_counts(index, path) {
            tracing::warn!("Unable to write counts to {}: {}", path.display(), e);
            failures += 1;
        }
    }

    let mut processor = QueryProcessor::new(config.search.partial);
    if let Some(path) = &config.search.queries_path {
        if let Err(e) = processor.process_file(index, path) {
            tracing::warn!("Unable to process queries from {}: {}", path.display(), e);
            failures += 1;
        }
    }

    if let Some(path) = &config.output.results_path {
        if let Err(e) = write_results(processor.results(), path) {
            tracing::warn!("Unable to write results to {}: {}", path.display(), e);
            failures += 1;
        }
    }

    if let Some(path) = &config.output.summary_path {
        match stats {
            Some(stats) => {
                let context = SummaryContext {
                    config_hash,
                    traversal: Some(format!("{:?}", config.crawler.traversal)),
                };
                if let Err(e) = generate_markdown_summary(stats, index, &context, path) {
                    tracing::warn!("Unable to write summary to {}: {}", path.display(), e);
                    failures += 1;
                }
            }
            None => tracing::warn!("No crawl ran; skipping summary {}", path.display()),
        }
    }

    failures
}
