//! Docs-Discovery main entry point
//!
//! This is the command-line interface for sitemap discovery. A normal run
//! prints exactly one JSON line on stdout; logs go to stderr.

use clap::Parser;
use docs_discovery::config::{compute_config_hash, resolve_config, Config};
use docs_discovery::runner::{self, FailureRecord};
use docs_discovery::storage::{open_storage, QueueStorage, RunStorage};
use docs_discovery::Result;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Docs-Discovery: sitemap-first URL discovery
///
/// Walks the sitemap trees of the configured documentation sources and
/// merges every discovered page into the SQLite crawl queue.
#[derive(Parser, Debug)]
#[command(name = "docs-discovery")]
#[command(version)]
#[command(about = "Sitemap-first URL discovery for documentation sites", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the queue database path
    #[arg(long, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the configured sources without fetching
    #[arg(long, conflicts_with_all = ["stats", "pending"])]
    dry_run: bool,

    /// Show queue counts from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "pending"])]
    stats: bool,

    /// Show the N oldest pending queue entries and exit
    #[arg(long, value_name = "N", conflicts_with_all = ["dry_run", "stats"])]
    pending: Option<usize>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Discovery failed: {:?}", e);
            eprintln!("{}", FailureRecord::from(&e).to_json_line());
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let mut config = resolve_config(cli.config.as_deref())?;
    if let Some(database) = &cli.database {
        config.output.database_path = database.to_string_lossy().into_owned();
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }
    if cli.stats {
        return handle_stats(&config);
    }
    if let Some(limit) = cli.pending {
        return handle_pending(&config, limit);
    }

    let summary = runner::run(&config).await?;
    let line = serde_json::to_string(&summary).map_err(std::io::Error::from)?;
    println!("{}", line);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docs_discovery=info,warn"),
            1 => EnvFilter::new("docs_discovery=debug,info"),
            2 => EnvFilter::new("docs_discovery=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Docs-Discovery Dry Run ===\n");

    println!("Fetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Timeout: {}s", config.fetcher.timeout_secs);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\nSources ({}):", config.sources.len());
    for entry in &config.sources {
        println!("  - {}: {}", entry.source, entry.sitemap_url);
    }

    println!("\n✓ Configuration is valid (hash: {})", compute_config_hash(config));
}

/// Handles the --stats mode: shows queue counts and the latest run
fn handle_stats(config: &Config) -> Result<()> {
    let storage = open_storage(Path::new(&config.output.database_path))?;

    println!("Database: {}\n", config.output.database_path);

    let counts = storage.counts_by_source_and_type()?;
    let total: u64 = counts.iter().map(|c| c.count).sum();
    println!("Queue entries: {}", total);
    for count in &counts {
        println!(
            "  {:<16} {:<10} {}",
            count.source.to_db_string(),
            count.doc_type.to_db_string(),
            count.count
        );
    }

    match storage.get_latest_run()? {
        Some(run) => {
            println!("\nLatest run #{} ({}):", run.id, run.status.to_db_string());
            println!("  Started: {}", run.started_at.to_rfc3339());
            if let Some(finished) = run.finished_at {
                println!("  Finished: {}", finished.to_rfc3339());
            }
            if let Some(candidates) = run.candidate_count {
                println!("  Candidates: {}", candidates);
            }
            if let Some(error) = &run.error {
                println!("  Error: {}", error);
            }
        }
        None => println!("\nNo discovery runs recorded"),
    }

    Ok(())
}

/// Handles the --pending mode: lists the oldest pending entries
fn handle_pending(config: &Config, limit: usize) -> Result<()> {
    let storage = open_storage(Path::new(&config.output.database_path))?;

    for entry in storage.list_pending(limit)? {
        println!(
            "{}\t{}\t{}\t{}",
            entry.discovered_at.to_rfc3339(),
            entry.source,
            entry.doc_type,
            entry.url
        );
    }

    Ok(())
}
