//! # Journal Harvest
//!
//! Scrapes paper metadata (title, authors, abstract, volume/issue) from the
//! issue listings of academic journals and merges it into a deduplicated
//! CSV dataset.
//!
//! ## Features
//!
//! - Eight publisher families (Elsevier, Wiley, Oxford, Springer, AEA,
//!   JSTOR, Econometrica and UChicago), each with its own selector profile
//! - Rescans only the most recent volumes of each journal, or backfills
//!   explicitly named volumes and issues
//! - Per-journal and aggregate CSV files that never gain duplicate rows
//! - A dated JSON dump of every run's raw records
//!
//! ## Usage
//!
//! ```sh
//! journal_harvest --config journals.yaml --data-dir ./data --trailing-volumes 2
//! journal_harvest --publisher jstor --journal jeconlite --volumes 58 --issues 4
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture, one journal at a time:
//! 1. **Issue pages**: computed from a URL template or read from an index page
//! 2. **Links**: paper URLs collected from each issue page
//! 3. **Records**: metadata extracted and normalized from each paper page
//! 4. **Store**: run JSON written, then merged into the CSV files

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod collect;
mod config;
mod discover;
mod enumerate;
mod error;
mod extract;
mod fetch;
mod models;
mod normalize;
mod pipeline;
mod profiles;
mod publishers;
mod store;
mod utils;

use cli::Cli;
use config::JournalsConfig;
use fetch::HttpFetcher;
use pipeline::{RunSettings, run_batch};
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("journal_harvest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = JournalsConfig::load(&args.config)?;
    let jobs = config.jobs(args.publisher, args.journal.as_deref())?;
    if jobs.is_empty() {
        warn!(config = %args.config.display(), "No journals selected; nothing to do");
        return Ok(());
    }

    // Early check: a run that cannot write its results is not worth starting
    if let Err(e) = ensure_writable_dir(&args.data_dir).await {
        error!(
            path = %args.data_dir.display(),
            error = %e,
            "Data directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let fetcher = HttpFetcher::new(
        &config.http.user_agent,
        Duration::from_secs(config.http.timeout_secs),
    )?;
    let settings = RunSettings {
        data_dir: args.data_dir.clone(),
        selection: args.selection(),
        settle_delay: Duration::from_secs(args.settle_delay_secs),
        concurrency: args.concurrency,
        run_date: Local::now().date_naive(),
    };
    info!(
        journals = jobs.len(),
        selection = ?settings.selection,
        concurrency = settings.concurrency,
        "Starting harvest"
    );

    let report = run_batch(&jobs, &fetcher, &settings).await;

    for journal in &report.completed {
        info!(
            journal = %journal.journal,
            issue_pages = journal.issue_pages,
            links = journal.links,
            records = journal.records,
            dropped = journal.extraction_failures,
            added = journal.store.journal.added,
            "Journal summary"
        );
    }
    for skipped in &report.skipped {
        warn!(
            journal = %skipped.journal,
            unsupported = skipped.unsupported,
            reason = %skipped.reason,
            "Journal skipped"
        );
    }

    let added: usize = report.completed.iter().map(|j| j.store.journal.added).sum();
    let elapsed = start_time.elapsed();
    info!(
        completed = report.completed.len(),
        skipped = report.skipped.len(),
        rows_added = added,
        elapsed_secs = elapsed.as_secs(),
        "Harvest finished"
    );

    Ok(())
}
