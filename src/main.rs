//! Docsweep command-line interface

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use docsweep::config::load_config;
use docsweep::events::CrawlEvent;
use docsweep::output::render_report;
use docsweep::{Config, Crawler, EventSink};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "docsweep",
    version,
    about = "Crawl a site and discover verified document links"
)]
struct Cli {
    /// Seed URL to start crawling from (scheme optional)
    seed_url: String,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum crawl depth from the seed
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Maximum number of pages to fetch
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    max_pages: Option<u64>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=300))]
    timeout: Option<u64>,

    /// Delay between requests to the same host, in milliseconds
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(0..=60_000))]
    polite_delay: Option<u64>,

    /// Whether subdomains of the seed host are in scope
    #[arg(long, value_name = "BOOL")]
    allow_subdomains: Option<bool>,

    /// Disable the low-priority catch-all classifier rule
    #[arg(long)]
    no_fallback: bool,

    /// Skip robots.txt checks
    #[arg(long)]
    ignore_robots: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors and suppress progress output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("docsweep={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Folds CLI overrides into the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(depth) = cli.max_depth {
        config.crawler.max_depth = depth;
    }
    if let Some(pages) = cli.max_pages {
        config.crawler.max_pages = pages as usize;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.timeout_secs = timeout;
    }
    if let Some(delay) = cli.polite_delay {
        config.crawler.polite_delay_ms = delay;
    }
    if let Some(allow) = cli.allow_subdomains {
        config.crawler.allow_subdomains = allow;
    }
    if cli.no_fallback {
        config.classifier.enable_fallback = false;
    }
    if cli.ignore_robots {
        config.crawler.respect_robots = false;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    apply_overrides(&mut config, &cli);

    let (sink, mut rx) = EventSink::channel();
    let mut crawler = Crawler::new(config)?.with_events(sink);

    let stop = crawler.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current request");
            stop.store(true, Ordering::Relaxed);
        }
    });

    let quiet = cli.quiet;
    let progress = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if quiet {
                continue;
            }
            match event {
                CrawlEvent::CandidateFound { url, priority } => {
                    println!("candidate [{}] {}", priority, url);
                }
                CrawlEvent::CandidateVerified { url, method } => {
                    println!("verified  [{}] {}", method, url);
                }
                _ => {}
            }
        }
    });

    if !quiet {
        println!(
            "docsweep run started {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
    }

    let report = crawler.crawl(&cli.seed_url).await?;
    drop(crawler);
    let _ = progress.await;

    println!();
    print!("{}", render_report(&report));

    Ok(())
}
