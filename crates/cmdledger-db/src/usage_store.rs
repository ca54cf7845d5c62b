//! Command-event persistence with per-file transactional batches.
//!
//! One log file becomes one [`FileBatch`]: every event insert and the
//! final processed-file marker ride the same transaction. Either the whole
//! file commits -- events plus ledger row -- or nothing does.

use cmdledger_types::CommandEvent;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::DbError;

/// Inserts one command event. The `(TIME, PLAYER)` primary key turns
/// repeated inserts into unique-constraint violations.
const INSERT_EVENT_SQL: &str =
    r"INSERT INTO COMMAND_USAGE (TIME, PLAYER, COMMAND) VALUES (?1, ?2, ?3)";

/// Appends a processed-file marker to the ledger.
const INSERT_LOG_FILE_SQL: &str = r"INSERT INTO LOG_FILES (FILENAME) VALUES (?1)";

/// Reads back every stored event in key order.
const SELECT_ALL_EVENTS_SQL: &str =
    r"SELECT TIME AS time, PLAYER AS player, COMMAND AS command
      FROM COMMAND_USAGE
      ORDER BY TIME, PLAYER";

/// Operations on the `COMMAND_USAGE` table.
pub struct UsageStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UsageStore<'a> {
    /// Create a new usage store bound to a connection pool.
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Begin the unit of work for one log file.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if a transaction cannot be started.
    pub async fn begin_file(&self) -> Result<FileBatch, DbError> {
        let tx = self.pool.begin().await?;
        Ok(FileBatch { tx })
    }

    /// Query every stored event, ordered by the `(TIME, PLAYER)` key.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn all_events(&self) -> Result<Vec<UsageRow>, DbError> {
        let rows = sqlx::query_as::<_, UsageRow>(SELECT_ALL_EVENTS_SQL)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }
}

/// The in-flight unit of work for a single log file.
///
/// Holds an open transaction. Dropping the batch without calling
/// [`FileBatch::commit`] rolls back every insert made through it, leaving
/// the file unmarked so the next run retries it wholesale.
pub struct FileBatch {
    tx: Transaction<'static, Sqlite>,
}

impl FileBatch {
    /// Insert one command event with bound parameters.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::DuplicateEvent`] when the `(TIME, PLAYER)` key
    /// already exists; the transaction stays usable and the caller should
    /// continue with the file's remaining lines. Any other failure returns
    /// [`DbError::Sqlite`] and aborts the file.
    pub async fn insert_event(&mut self, event: &CommandEvent) -> Result<(), DbError> {
        let result = sqlx::query(INSERT_EVENT_SQL)
            .bind(event.timestamp)
            .bind(&event.player)
            .bind(&event.command)
            .execute(&mut *self.tx)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(DbError::DuplicateEvent {
                    player: event.player.clone(),
                    timestamp: event.timestamp,
                })
            }
            Err(e) => Err(DbError::Sqlite(e)),
        }
    }

    /// Mark the file processed and commit the whole batch.
    ///
    /// Appends `file_name` to the `LOG_FILES` ledger inside the same
    /// transaction as the file's event inserts, then commits. Only after
    /// this returns is the file considered processed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the marker insert or the commit
    /// fails; nothing from this batch is persisted in that case.
    pub async fn commit(mut self, file_name: &str) -> Result<(), DbError> {
        sqlx::query(INSERT_LOG_FILE_SQL)
            .bind(file_name)
            .execute(&mut *self.tx)
            .await?;
        self.tx.commit().await?;
        tracing::debug!(file_name, "File batch committed");
        Ok(())
    }
}

/// A row from the `COMMAND_USAGE` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UsageRow {
    /// When the command was issued.
    pub time: chrono::NaiveDateTime,
    /// The player who issued it.
    pub player: String,
    /// The canonical command label.
    pub command: String,
}
