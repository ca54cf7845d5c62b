//! Ingestion entry point for the cmdledger pipeline.
//!
//! Reads server-activity log files deposited in the configured directory,
//! extracts "player issued server command" events, normalizes command
//! spellings into canonical labels, and persists them in SQLite under a
//! `(TIME, PLAYER)` uniqueness key. Re-running over the same directory is
//! idempotent: fully ingested files are skipped via the processed-file
//! ledger, and any events re-read from a partially ingested file are
//! rejected as duplicates.
//!
//! # Architecture
//!
//! ```text
//! FileDiscovery --> LineParser --> CommandNormalizer --> IngestionStore
//!      (ledger-filtered)                                  (per-file tx)
//! ```
//!
//! Fetching and decompressing remote log archives is a collaborator's
//! job; this binary expects plain `YYYY-MM-DD<suffix>.log` files.

mod config;
mod discover;
mod error;
mod grammar;
mod normalize;
mod pipeline;

use tracing::info;
use tracing_subscriber::EnvFilter;

use cmdledger_db::{SqliteConfig, SqliteDb};

use crate::config::IngestConfig;

/// Application entry point.
///
/// Initializes logging, loads configuration from environment variables,
/// opens the database and bootstraps the schema, then runs one ingestion
/// pass over the log directory.
///
/// # Errors
///
/// Returns an error if the store cannot be opened at all or the log
/// directory cannot be read; per-file failures are contained inside the
/// pipeline and reported in the summary.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("cmdledger-ingest starting");

    // Load configuration from environment
    let config = IngestConfig::from_env()?;
    info!(
        database = %config.database_path.display(),
        log_dir = %config.log_dir.display(),
        "configuration loaded"
    );

    // Open the store; failure here aborts the run
    let db = SqliteDb::connect(&SqliteConfig::new(&config.database_path)).await?;
    db.ensure_schema().await?;

    let summary = pipeline::run(&config, &db).await?;
    info!(
        files_ingested = summary.files_ingested,
        files_failed = summary.files_failed,
        events_inserted = summary.events_inserted,
        duplicates_ignored = summary.duplicates_ignored,
        "ingestion run complete"
    );

    db.close().await;
    Ok(())
}
