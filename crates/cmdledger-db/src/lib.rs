//! SQLite data layer for the cmdledger ingestion pipeline.
//!
//! The store owns all persisted state: the `COMMAND_USAGE` table holding
//! normalized command events under a `(TIME, PLAYER)` primary key, and the
//! `LOG_FILES` ledger recording which files have been fully ingested.
//!
//! Ingestion of one log file is one unit of work: a [`FileBatch`]
//! transaction collects the file's event inserts and the processed-file
//! marker, and commits them together. A batch dropped before commit rolls
//! everything back, so an interrupted run leaves no partial state and the
//! file is reprocessed wholesale on the next run.
//!
//! Uses [`sqlx`] with runtime query construction (not compile-time checked)
//! to avoid requiring a live database at build time. All queries are
//! parameterized to prevent SQL injection.
//!
//! # Modules
//!
//! - [`sqlite`] -- connection pool, configuration, and schema bootstrap
//! - [`usage_store`] -- command-event inserts and queries
//! - [`ledger`] -- processed-file ledger queries
//! - [`error`] -- shared error types

pub mod error;
pub mod ledger;
pub mod sqlite;
pub mod usage_store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use ledger::{ProcessedFileLedger, ProcessedFileRow};
pub use sqlite::{SqliteConfig, SqliteDb};
pub use usage_store::{FileBatch, UsageRow, UsageStore};
