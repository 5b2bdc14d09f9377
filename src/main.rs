//! Railsnap main entry point
//!
//! Command-line interface for the transit-arrival ingestor. One
//! invocation performs one ingestion run and exits; scheduling is the
//! caller's job (cron or equivalent).
//!
//! Exit codes: 0 run complete, 1 fatal error, 2 budget exhausted,
//! 3 partial failure (some windows errored, completed work committed).

use chrono::Utc;
use clap::Parser;
use railsnap::budget::{plan_windows, Plan};
use railsnap::config::{load_config, parse_timezone, Continuation};
use railsnap::provider::HttpProvider;
use railsnap::runner::run_snapshot;
use railsnap::storage::{open_storage, Storage};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Railsnap: an append-only ingestor for real-time transit arrivals
///
/// Pulls paginated arrival records from an upstream open-data API,
/// stores them losslessly keyed by content hash, and enforces a daily
/// call-volume budget against an append-only call ledger.
#[derive(Parser, Debug)]
#[command(name = "railsnap")]
#[command(version = "1.0.0")]
#[command(about = "Append-only transit-arrival ingestor with a daily call budget", long_about = None)]
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

    /// Show today's plan without calling the upstream
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_run(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("railsnap=info,warn"),
            1 => EnvFilter::new("railsnap=debug,info"),
            2 => EnvFilter::new("railsnap=trace,debug"),
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

/// Handles the --dry-run mode: shows today's plan without calling upstream
fn handle_dry_run(config: &railsnap::Config) -> Result<(), Box<dyn std::error::Error>> {
    let tz = parse_timezone(&config.time.timezone)?;
    let today = Utc::now().with_timezone(&tz).date_naive();

    let storage = open_storage(Path::new(&config.output.database_path))?;
    let used_today = storage.used_calls(today)?;
    let done_windows = match config.budget.continuation {
        Continuation::Resume => storage.called_windows(today)?,
        Continuation::Restart => Vec::new(),
    };

    println!("=== Railsnap Dry Run ===\n");
    println!("Budget:");
    println!("  Daily cap: {}", config.budget.daily_cap);
    println!("  Window size: {}", config.budget.window_size);
    println!("  Total range: {}", config.budget.total_range);
    println!("  Continuation: {:?}", config.budget.continuation);
    println!("\nToday ({}, {}):", today, config.time.timezone);
    println!("  Calls used: {}", used_today);
    println!(
        "  Calls remaining: {}",
        config.budget.daily_cap.saturating_sub(used_today)
    );

    let plan = plan_windows(
        config.budget.daily_cap,
        config.budget.window_size,
        config.budget.total_range,
        used_today,
        &done_windows,
    )?;

    match plan {
        Plan::Exhausted => {
            println!("\n✓ Budget exhausted: a run right now would make no calls");
        }
        Plan::Windows(windows) => {
            println!("\nPlanned windows ({}):", windows.len());
            for window in &windows {
                println!("  - {}", window);
            }
        }
    }

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &railsnap::Config) -> Result<(), Box<dyn std::error::Error>> {
    let tz = parse_timezone(&config.time.timezone)?;
    let today = Utc::now().with_timezone(&tz).date_naive();

    let storage = open_storage(Path::new(&config.output.database_path))?;

    println!("Database: {}\n", config.output.database_path);
    println!("Raw records: {}", storage.count_raw_records()?);
    println!("Snapshots: {}", storage.count_snapshots()?);
    if let Some(snapshot_id) = storage.latest_snapshot_id()? {
        println!(
            "Latest snapshot: {} ({} records)",
            snapshot_id,
            storage.count_raw_for_snapshot(&snapshot_id)?
        );
    }
    let used_today = storage.used_calls(today)?;
    println!(
        "Calls today ({}): {} used, {} remaining of {}",
        today,
        used_today,
        config.budget.daily_cap.saturating_sub(used_today),
        config.budget.daily_cap
    );

    Ok(())
}

/// Handles the default mode: one ingestion run
async fn handle_run(config: &railsnap::Config) -> Result<(), Box<dyn std::error::Error>> {
    let tz = parse_timezone(&config.time.timezone)?;
    let mut storage = open_storage(Path::new(&config.output.database_path))?;
    let provider = HttpProvider::new(&config.provider)?;

    let summary = run_snapshot(&config.budget, &mut storage, &provider, || {
        Utc::now().with_timezone(&tz)
    })
    .await?;

    println!(
        "Run {} finished: {} ({} windows attempted, {} failed, {} rows stored, {} deduplicated)",
        summary.snapshot_id,
        summary.status.as_str(),
        summary.windows_attempted,
        summary.windows_failed,
        summary.rows_stored,
        summary.rows_deduplicated
    );

    let code = summary.status.exit_code();
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}
