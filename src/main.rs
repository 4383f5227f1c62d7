//! Snare main entry point
//!
//! This is the command-line interface for the Snare focused crawler.

use anyhow::Context;
use clap::Parser;
use snare_crawler::config::{load_config_with_hash, Config};
use snare_crawler::corpus::DirectoryCorpus;
use snare_crawler::crawler::CrawlEngine;
use snare_crawler::output::{print_statistics, write_report, CrawlStatistics};
use snare_crawler::policy::{UrlValidator, Verdict};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Snare: a focused crawler that steps around traps
///
/// Snare crawls a static page corpus from a set of seeds, follows only
/// links inside the target domains, records crawler traps it detects, and
/// writes an analytics report at the end.
#[derive(Parser, Debug)]
#[command(name = "snare-crawler")]
#[command(version)]
#[command(about = "A focused crawler with crawler-trap detection", long_about = None)]
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

    /// Resume a persisted frontier (default behavior)
    #[arg(long, conflicts_with = "fresh")]
    resume: bool,

    /// Discard a persisted frontier and start from the seeds
    #[arg(long, conflicts_with = "resume")]
    fresh: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "check")]
    dry_run: bool,

    /// Run the link policy on the given URLs and exit
    #[arg(long, value_name = "URL", num_args = 1..)]
    check: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if !cli.check.is_empty() {
        handle_check(&config, &cli.check)?;
    } else {
        handle_crawl(&config, cli.fresh).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("snare_crawler=info,warn"),
            1 => EnvFilter::new("snare_crawler=debug,info"),
            2 => EnvFilter::new("snare_crawler=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Snare Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Workers: {}", config.crawler.workers);
    match config.crawler.max_pages {
        Some(max) => println!("  Max pages: {}", max),
        None => println!("  Max pages: unlimited"),
    }
    match config.crawler.time_limit_secs {
        Some(secs) => println!("  Time limit: {}s", secs),
        None => println!("  Time limit: none"),
    }

    println!("\nPolicy:");
    println!("  Target domains: {}", config.policy.target_domains.join(", "));
    println!("  Max query visits per path: {}", config.policy.max_query_visits);
    println!(
        "  Max query component length: {}",
        config.policy.max_query_component_length
    );
    println!(
        "  Denied extensions: {}",
        config.policy.denied_extensions.len()
    );

    println!("\nCorpus:");
    println!("  Path: {}", config.corpus.path);
    println!("  Index: {}", config.corpus.index_file);

    println!("\nFrontier:");
    match &config.frontier.database_path {
        Some(path) => println!("  Database: {}", path),
        None => println!("  In memory"),
    }
    println!("  Seeds ({}):", config.frontier.seeds.len());
    for seed in &config.frontier.seeds {
        println!("    * {}", seed);
    }

    println!("\nOutput:");
    println!("  Analytics: {}", config.output.analytics_path);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling with {} seed URLs",
        config.frontier.seeds.len()
    );
}

/// Handles --check: prints the policy verdict for each URL
fn handle_check(config: &Config, urls: &[String]) -> anyhow::Result<()> {
    let corpus = DirectoryCorpus::open(&config.corpus.path, &config.corpus.index_file)
        .context("failed to open corpus")?;
    let mut validator = UrlValidator::new(&config.policy);

    for url in urls {
        let verdict = validator.validate(url, &corpus);
        match verdict {
            Verdict::Accept => println!("ACCEPT  {}", url),
            Verdict::Reject(rejection) => match verdict.trap() {
                Some(category) => println!("TRAP    {}  ({})", url, category),
                None => println!("REJECT  {}  ({:?})", url, rejection),
            },
        }
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, fresh: bool) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring previous state)");
    } else {
        tracing::info!("Starting crawl (will resume a persisted frontier)");
    }

    tracing::info!(
        "Target domains: {}, seed URLs: {}",
        config.policy.target_domains.len(),
        config.frontier.seeds.len()
    );

    let engine = CrawlEngine::from_config(config, fresh)?;

    let stop = engine.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, finishing in-flight pages");
            stop.stop();
        }
    });

    let state = match engine.run().await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    write_report(&state, Path::new(&config.output.analytics_path))
        .context("failed to write analytics report")?;

    let remaining = engine.frontier_size().await?;
    print_statistics(&CrawlStatistics::from_state(&state, remaining));

    Ok(())
}
