//! Processed-file ledger queries.
//!
//! The `LOG_FILES` table is an append-only record of file names whose
//! lines have been fully committed. Discovery consults it to skip
//! completed work; a file missing from the ledger is (re)processed in
//! full, and the usage table's uniqueness key absorbs any events a
//! previous interrupted attempt already wrote.

use sqlx::SqlitePool;

use crate::error::DbError;

/// Counts ledger entries with an exact file-name match.
const COUNT_FILENAME_SQL: &str = r"SELECT COUNT(*) FROM LOG_FILES WHERE FILENAME = ?1";

/// Reads back the ledger in insertion order.
const SELECT_ALL_FILES_SQL: &str =
    r"SELECT ID AS id, FILENAME AS filename FROM LOG_FILES ORDER BY ID";

/// Operations on the `LOG_FILES` table.
pub struct ProcessedFileLedger<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProcessedFileLedger<'a> {
    /// Create a new ledger handle bound to a connection pool.
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Whether a file name has already been recorded as processed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn contains(&self, file_name: &str) -> Result<bool, DbError> {
        let count: i64 = sqlx::query_scalar(COUNT_FILENAME_SQL)
            .bind(file_name)
            .fetch_one(self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Query every ledger entry in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn all(&self) -> Result<Vec<ProcessedFileRow>, DbError> {
        let rows = sqlx::query_as::<_, ProcessedFileRow>(SELECT_ALL_FILES_SQL)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }
}

/// A row from the `LOG_FILES` ledger.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ProcessedFileRow {
    /// Auto-incremented ledger entry ID.
    pub id: i64,
    /// The processed file's name.
    pub filename: String,
}
