//! Site-Harvest main entry point
//!
//! This is the command-line interface for the Site-Harvest company-site harvester.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use site_harvest::config::{load_config_with_hash, validate, Config};
use site_harvest::output::{print_statistics, write_corpus};
use site_harvest::{normalize_url, Harvester};
use tracing_subscriber::EnvFilter;

/// Site-Harvest: A polite company-site content harvester
///
/// Site-Harvest discovers the about, news, careers, and contact pages of a
/// company website, preferring the site's sitemap and respecting robots.txt,
/// and writes their boilerplate-free text to a corpus file.
#[derive(Parser, Debug)]
#[command(name = "site-harvest")]
#[command(version)]
#[command(about = "A polite company-site content harvester", long_about = None)]
struct Cli {
    /// Seed URL of the site to harvest
    #[arg(value_name = "SEED_URL")]
    seed: String,

    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Corpus output path (overrides output.corpus-path)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Ignore robots.txt and rotate browser user agents
    #[arg(long)]
    impolite: bool,
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
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            let config = Config::default();
            validate(&config).context("Default configuration is invalid")?;
            config
        }
    };

    if cli.impolite {
        tracing::warn!("Politeness disabled: robots.txt will be ignored");
        config.crawler.politeness = false;
    }
    if let Some(output) = &cli.output {
        config.output.corpus_path = output.display().to_string();
    }

    let seed = normalize_url(&cli.seed).with_context(|| format!("Invalid seed URL: {}", cli.seed))?;

    if cli.dry_run {
        handle_dry_run(&config, &seed);
        return Ok(());
    }

    handle_harvest(config, seed, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_harvest=info,warn"),
            1 => EnvFilter::new("site_harvest=debug,info"),
            2 => EnvFilter::new("site_harvest=trace,debug"),
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
fn handle_dry_run(config: &Config, seed: &url::Url) {
    println!("=== Site-Harvest Dry Run ===\n");

    println!("Seed: {}\n", seed);

    println!("Crawler Configuration:");
    println!("  Max workers: {}", config.crawler.max_workers);
    println!("  Depth limit: {}", config.crawler.depth_limit);
    println!("  Politeness: {}", config.crawler.politeness);
    println!("  Sitemap strategy: {:?}", config.crawler.sitemap_strategy);
    if config.crawler.session_timeout_secs > 0 {
        println!("  Session timeout: {}s", config.crawler.session_timeout_secs);
    }
    if !config.crawler.allowed_domains.is_empty() {
        println!("  Allowed domains: {}", config.crawler.allowed_domains.join(", "));
    }

    println!("\nUser Agent:");
    println!("  Identity: {}", config.user_agent.identity);

    println!("\nHarvest ({} categories):", config.harvest.categories.len());
    for category in &config.harvest.categories {
        println!("  - {}", category);
    }
    println!("  Max per category: {}", config.harvest.max_per_category);
    println!("  Extraction workers: {}", config.harvest.extraction_workers);
    println!("  Dedupe threshold: {}", config.harvest.dedupe_threshold);

    println!("\nOutput:");
    println!("  Corpus: {}", config.output.corpus_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, seed: url::Url, quiet: bool) -> anyhow::Result<()> {
    let corpus_path = PathBuf::from(&config.output.corpus_path);
    let harvester = Harvester::new(config);

    // Ctrl-C stops new fetches; in-flight ones drain
    let guard = harvester.guard().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing in-flight requests");
            guard.abort();
        }
    });

    tracing::info!("Starting harvest of {}", seed);
    let report = match harvester.harvest(&seed).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    write_corpus(&report, &corpus_path)?;

    if !quiet {
        print_statistics(&report);
        println!("\n✓ Corpus written to: {}", corpus_path.display());
    }

    Ok(())
}
