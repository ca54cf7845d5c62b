//! Log file discovery.
//!
//! Enumerates plain files directly under the configured log directory,
//! keeps the ones whose name matches the filename grammar, and filters
//! out files the processed-file ledger already records. Enumeration order
//! is whatever the filesystem yields; nothing downstream depends on
//! cross-file ordering.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use cmdledger_db::ProcessedFileLedger;
use tracing::info;

use crate::error::IngestError;
use crate::grammar::FileNamePattern;

/// A candidate log file with its embedded calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLog {
    /// Full path of the file on disk.
    pub path: PathBuf,
    /// The bare file name, the identity stored in the processed ledger.
    pub file_name: String,
    /// The calendar date embedded in the file name.
    pub date: NaiveDate,
}

/// List the log files in `log_dir` that are not yet in the ledger.
///
/// Files whose names do not match the filename grammar are skipped
/// without error, as are directory entries that cannot be inspected.
/// Already-processed files are skipped with an info-level log.
///
/// # Errors
///
/// Returns [`IngestError::Io`] if the directory itself cannot be read
/// (there is no work to do without it), or [`IngestError::Db`] if the
/// ledger lookup fails.
pub async fn discover_unprocessed(
    log_dir: &Path,
    file_names: &FileNamePattern,
    ledger: &ProcessedFileLedger<'_>,
) -> Result<Vec<DiscoveredLog>, IngestError> {
    let mut entries = tokio::fs::read_dir(log_dir)
        .await
        .map_err(|e| IngestError::io(log_dir, e))?;

    let mut found = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => return Err(IngestError::io(log_dir, e)),
        };

        let is_file = entry
            .file_type()
            .await
            .is_ok_and(|file_type| file_type.is_file());
        if !is_file {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        let Some(date) = file_names.embedded_date(&file_name) else {
            continue;
        };

        if ledger.contains(&file_name).await? {
            info!(file_name = file_name.as_str(), "File already processed, skipping");
            continue;
        }

        found.push(DiscoveredLog {
            path: entry.path(),
            file_name,
            date,
        });
    }

    Ok(found)
}

// Tests use expect for brevity -- panicking on failure is the correct
// behavior in test code.
#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use cmdledger_db::SqliteDb;

    async fn empty_db() -> SqliteDb {
        let db = SqliteDb::connect_in_memory()
            .await
            .expect("in-memory SQLite opens");
        db.ensure_schema().await.expect("schema bootstraps");
        db
    }

    fn pattern() -> FileNamePattern {
        FileNamePattern::new().expect("filename pattern compiles")
    }

    #[tokio::test]
    async fn finds_matching_files_and_skips_the_rest() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("2024-05-01-1.log"), "").expect("write");
        std::fs::write(dir.path().join("2024-05-02-1.log"), "").expect("write");
        std::fs::write(dir.path().join("latest.log"), "").expect("write");
        std::fs::write(dir.path().join("2024-05-03-1.log.gz"), "").expect("write");
        std::fs::create_dir(dir.path().join("2024-05-04-1.log")).expect("mkdir");

        let db = empty_db().await;
        let ledger = ProcessedFileLedger::new(db.pool());
        let mut found = discover_unprocessed(dir.path(), &pattern(), &ledger)
            .await
            .expect("discovery succeeds");
        found.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        let names: Vec<&str> = found.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, ["2024-05-01-1.log", "2024-05-02-1.log"]);
        assert_eq!(
            found.first().map(|f| f.date),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
    }

    #[tokio::test]
    async fn skips_files_already_in_the_ledger() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("2024-05-01-1.log"), "").expect("write");
        std::fs::write(dir.path().join("2024-05-02-1.log"), "").expect("write");

        let db = empty_db().await;
        let store = cmdledger_db::UsageStore::new(db.pool());
        let batch = store.begin_file().await.expect("begin");
        batch.commit("2024-05-01-1.log").await.expect("commit");

        let ledger = ProcessedFileLedger::new(db.pool());
        let found = discover_unprocessed(dir.path(), &pattern(), &ledger)
            .await
            .expect("discovery succeeds");

        let names: Vec<&str> = found.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, ["2024-05-02-1.log"]);
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let db = empty_db().await;
        let ledger = ProcessedFileLedger::new(db.pool());
        let result =
            discover_unprocessed(Path::new("/nonexistent/cmdledger-logs"), &pattern(), &ledger)
                .await;
        assert!(matches!(result, Err(IngestError::Io { .. })));
    }
}
