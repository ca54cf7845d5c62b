//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`] which wraps the underlying
//! [`sqlx`] errors. Duplicate-key violations get their own variant because
//! the pipeline treats them as expected, non-fatal events under idempotent
//! re-ingestion.

use chrono::NaiveDateTime;

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// An SQLite operation failed.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    /// An insert collided with the `(TIME, PLAYER)` uniqueness key.
    ///
    /// Expected whenever a file is re-ingested after an interrupted run:
    /// events persisted by the aborted attempt are rejected here and the
    /// caller continues with the rest of the file.
    #[error("duplicate event for player {player} at {timestamp}")]
    DuplicateEvent {
        /// The player whose event already exists.
        player: String,
        /// The second-granularity timestamp that collided.
        timestamp: NaiveDateTime,
    },
}

impl DbError {
    /// Whether this error is a duplicate-key rejection rather than a
    /// storage failure.
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateEvent { .. })
    }
}
