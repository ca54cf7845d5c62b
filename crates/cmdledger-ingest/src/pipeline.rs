//! The extraction-normalization-ingestion pipeline.
//!
//! One sequential pass: discovery yields unprocessed files, each file's
//! lines flow through the line grammar and the normalizer into a single
//! per-file store transaction, and the processed-file marker commits with
//! the file's events as one unit of work.
//!
//! Failure containment follows the error taxonomy: grammar mismatches and
//! unresolved compound arguments silently drop the unit, duplicate keys
//! are logged and ignored, and an I/O or storage failure abandons the
//! current file -- leaving it unmarked for wholesale retry -- while the
//! run continues with the next one.

use cmdledger_db::{DbError, ProcessedFileLedger, SqliteDb, UsageStore};
use cmdledger_types::CommandEvent;
use tokio::io::AsyncBufReadExt;
use tracing::{debug, error, info};

use crate::config::IngestConfig;
use crate::discover::{discover_unprocessed, DiscoveredLog};
use crate::error::IngestError;
use crate::grammar::{FileNamePattern, LineParser};
use crate::normalize::CommandNormalizer;

/// Counters for one ingestion run, logged when the run completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files fully ingested and recorded in the ledger this run.
    pub files_ingested: u64,
    /// Files abandoned on an I/O or storage error, left for retry.
    pub files_failed: u64,
    /// Command events newly inserted.
    pub events_inserted: u64,
    /// Events rejected by the `(TIME, PLAYER)` uniqueness key.
    pub duplicates_ignored: u64,
}

/// Per-file insert counters.
#[derive(Debug, Default)]
struct FileOutcome {
    inserted: u64,
    duplicates: u64,
}

/// Run the full pipeline once: discover, parse, normalize, persist.
///
/// # Errors
///
/// Returns an error only for run-level failures: an unreadable log
/// directory, a ledger lookup failure during discovery, or a grammar that
/// fails to compile. Per-file failures are contained and counted in the
/// summary instead.
pub async fn run(config: &IngestConfig, db: &SqliteDb) -> Result<RunSummary, IngestError> {
    let parser = LineParser::new()?;
    let file_names = FileNamePattern::new()?;
    let normalizer = CommandNormalizer::new()?;
    let ledger = ProcessedFileLedger::new(db.pool());
    let store = UsageStore::new(db.pool());

    let files = discover_unprocessed(&config.log_dir, &file_names, &ledger).await?;
    info!(count = files.len(), "Discovered unprocessed log files");

    let mut summary = RunSummary::default();
    for file in &files {
        match ingest_file(file, &parser, &normalizer, &store).await {
            Ok(outcome) => {
                summary.files_ingested = summary.files_ingested.saturating_add(1);
                summary.events_inserted = summary.events_inserted.saturating_add(outcome.inserted);
                summary.duplicates_ignored =
                    summary.duplicates_ignored.saturating_add(outcome.duplicates);
            }
            Err(e) => {
                error!(
                    file_name = file.file_name.as_str(),
                    error = %e,
                    "Failed to ingest file, leaving it unmarked for retry"
                );
                summary.files_failed = summary.files_failed.saturating_add(1);
            }
        }
    }

    Ok(summary)
}

/// Ingest one file inside one store transaction.
///
/// Every line is offered to the grammar; matches are normalized and
/// inserted. After the last line the processed-file marker commits
/// together with the inserts. Any error here abandons the transaction,
/// rolling the whole file back.
async fn ingest_file(
    file: &DiscoveredLog,
    parser: &LineParser,
    normalizer: &CommandNormalizer,
    store: &UsageStore<'_>,
) -> Result<FileOutcome, IngestError> {
    info!(file_name = file.file_name.as_str(), "Processing file");

    let handle = tokio::fs::File::open(&file.path)
        .await
        .map_err(|e| IngestError::io(&file.path, e))?;
    let mut lines = tokio::io::BufReader::new(handle).lines();

    let mut batch = store.begin_file().await?;
    let mut outcome = FileOutcome::default();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(IngestError::io(&file.path, e)),
        };

        let Some(parsed) = parser.parse(&line, file.date) else {
            continue;
        };

        let Some(label) = normalizer.normalize(&parsed.command, &line) else {
            debug!(
                command = parsed.command.as_str(),
                player = parsed.player.as_str(),
                "Compound command with unrecognized argument, dropped"
            );
            continue;
        };

        let event = CommandEvent::new(parsed.timestamp, parsed.player, label);
        match batch.insert_event(&event).await {
            Ok(()) => outcome.inserted = outcome.inserted.saturating_add(1),
            Err(DbError::DuplicateEvent { player, timestamp }) => {
                info!(
                    player = player.as_str(),
                    timestamp = %timestamp,
                    "Duplicate (timestamp, player) key, event ignored"
                );
                outcome.duplicates = outcome.duplicates.saturating_add(1);
            }
            Err(e) => return Err(e.into()),
        }
    }

    batch.commit(&file.file_name).await?;
    Ok(outcome)
}

// Tests use expect for brevity -- panicking on failure is the correct
// behavior in test code.
#[cfg(test)]
#[allow(clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::Path;

    async fn fresh_db() -> SqliteDb {
        let db = SqliteDb::connect_in_memory()
            .await
            .expect("in-memory SQLite opens");
        db.ensure_schema().await.expect("schema bootstraps");
        db
    }

    fn config_for(dir: &Path) -> IngestConfig {
        IngestConfig {
            database_path: dir.join("unused.db"),
            log_dir: dir.to_path_buf(),
        }
    }

    #[tokio::test]
    async fn single_line_end_to_end() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("2024-05-01-1.log"),
            "[13:05:22] [Server thread/INFO]: Alice issued server command: /gamemode creative\n",
        )
        .expect("write");

        let db = fresh_db().await;
        let summary = run(&config_for(dir.path()), &db).await.expect("run succeeds");

        assert_eq!(summary.files_ingested, 1);
        assert_eq!(summary.events_inserted, 1);
        assert_eq!(summary.duplicates_ignored, 0);
        assert_eq!(summary.files_failed, 0);

        let rows = UsageStore::new(db.pool())
            .all_events()
            .await
            .expect("query succeeds");
        assert_eq!(rows.len(), 1);
        assert_eq!(
            Some(rows[0].time),
            NaiveDate::from_ymd_opt(2024, 5, 1).and_then(|d| d.and_hms_opt(13, 5, 22))
        );
        assert_eq!(rows[0].player, "Alice");
        assert_eq!(rows[0].command, "creative");

        let ledger = ProcessedFileLedger::new(db.pool());
        assert!(ledger
            .contains("2024-05-01-1.log")
            .await
            .expect("ledger lookup succeeds"));
    }

    #[tokio::test]
    async fn rerun_over_the_same_directory_changes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("2024-05-01-1.log"),
            "[13:05:22] [Server thread/INFO]: Alice issued server command: /gamemode creative\n",
        )
        .expect("write");

        let db = fresh_db().await;
        let config = config_for(dir.path());

        let first = run(&config, &db).await.expect("first run succeeds");
        assert_eq!(first.events_inserted, 1);

        let second = run(&config, &db).await.expect("second run succeeds");
        assert_eq!(second.files_ingested, 0);
        assert_eq!(second.events_inserted, 0);
        assert_eq!(second.duplicates_ignored, 0);

        let rows = UsageStore::new(db.pool())
            .all_events()
            .await
            .expect("query succeeds");
        assert_eq!(rows.len(), 1);
        let ledger_rows = ProcessedFileLedger::new(db.pool())
            .all()
            .await
            .expect("ledger query succeeds");
        assert_eq!(ledger_rows.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_lines_across_files_converge() {
        // Two distinct files carrying the same (timestamp, player) line:
        // the second insert is rejected, both files still commit. This is
        // the same mechanism that makes re-ingestion after an interrupted
        // run idempotent.
        let dir = tempfile::tempdir().expect("tempdir");
        let line =
            "[13:05:22] [Server thread/INFO]: Alice issued server command: /gamemode creative\n";
        std::fs::write(dir.path().join("2024-05-01-1.log"), line).expect("write");
        std::fs::write(dir.path().join("2024-05-01-2.log"), line).expect("write");

        let db = fresh_db().await;
        let summary = run(&config_for(dir.path()), &db).await.expect("run succeeds");

        assert_eq!(summary.files_ingested, 2);
        assert_eq!(summary.events_inserted, 1);
        assert_eq!(summary.duplicates_ignored, 1);

        let rows = UsageStore::new(db.pool())
            .all_events()
            .await
            .expect("query succeeds");
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn mixed_file_keeps_only_recognized_events() {
        let dir = tempfile::tempdir().expect("tempdir");
        let content = concat!(
            "[06:00:00] [Server thread/INFO]: Server started\n",
            "[13:05:22] [Server thread/INFO]: Alice issued server command: /gamemode creative\n",
            "[13:06:01] [Server thread/INFO]: Bob joined the game\n",
            "[13:07:44] [Server thread/INFO]: Bob issued server command: /kit unknownthing\n",
            "[13:08:15] [Server thread/INFO]: Bob issued server command: /kit rulebook\n",
            "[13:09:00] [Server thread/INFO]: Carol issued server command: /tp Alice\n",
            "not a log line at all\n",
        );
        std::fs::write(dir.path().join("2024-05-01-1.log"), content).expect("write");

        let db = fresh_db().await;
        let summary = run(&config_for(dir.path()), &db).await.expect("run succeeds");
        assert_eq!(summary.events_inserted, 3);

        let rows = UsageStore::new(db.pool())
            .all_events()
            .await
            .expect("query succeeds");
        let labels: Vec<&str> = rows.iter().map(|r| r.command.as_str()).collect();
        assert_eq!(labels, ["creative", "rulebook", "tp"]);
    }

    #[tokio::test]
    async fn empty_directory_is_a_clean_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = fresh_db().await;
        let summary = run(&config_for(dir.path()), &db).await.expect("run succeeds");
        assert_eq!(summary, RunSummary::default());
    }
}
