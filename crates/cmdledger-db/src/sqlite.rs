//! SQLite connection pool, configuration, and schema bootstrap.
//!
//! The database is a single local file supplied by configuration. The two
//! tables are created on startup with `CREATE TABLE IF NOT EXISTS`, so a
//! fresh deployment needs no separate migration step and an existing
//! database is left untouched.

use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::DbError;

/// Default maximum number of connections in the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Creates the command-usage table.
///
/// `(TIME, PLAYER)` is the primary key: a player's second command within
/// the same second is indistinguishable and rejected as a duplicate.
const CREATE_COMMAND_USAGE_SQL: &str = r"CREATE TABLE IF NOT EXISTS COMMAND_USAGE(
    TIME    DATETIME NOT NULL,
    PLAYER  VARCHAR  NOT NULL,
    COMMAND VARCHAR  NOT NULL,
    PRIMARY KEY(TIME, PLAYER)
)";

/// Creates the processed-file ledger table.
const CREATE_LOG_FILES_SQL: &str = r"CREATE TABLE IF NOT EXISTS LOG_FILES(
    ID       INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    FILENAME VARCHAR NOT NULL
)";

/// Configuration for the SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path of the database file on disk.
    pub path: PathBuf,
    /// Create the database file if it does not exist.
    pub create_if_missing: bool,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
}

impl SqliteConfig {
    /// Create a new configuration for a database file path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            create_if_missing: true,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Set whether a missing database file is created on connect.
    #[must_use]
    pub const fn with_create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Set the maximum number of connections.
    #[must_use]
    pub const fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// Connection pool handle to the SQLite database.
///
/// Wraps a [`sqlx::SqlitePool`] and provides access to the usage store and
/// the processed-file ledger.
#[derive(Clone)]
pub struct SqliteDb {
    pool: SqlitePool,
}

impl SqliteDb {
    /// Open the database file described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the database cannot be opened. This
    /// is the one run-aborting storage condition: without a store there is
    /// nothing to ingest into.
    pub async fn connect(config: &SqliteConfig) -> Result<Self, DbError> {
        let connect_options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(config.create_if_missing);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(connect_options)
            .await?;

        tracing::info!(
            path = %config.path.display(),
            max_connections = config.max_connections,
            "Connected to SQLite"
        );

        Ok(Self { pool })
    }

    /// Open an in-memory database.
    ///
    /// Used by tests. The pool is capped at a single connection because
    /// every SQLite connection gets its own private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the connection fails.
    pub async fn connect_in_memory() -> Result<Self, DbError> {
        let connect_options = SqliteConnectOptions::new().in_memory(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_options)
            .await?;

        Ok(Self { pool })
    }

    /// Create the `COMMAND_USAGE` and `LOG_FILES` tables if absent.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if either statement fails.
    pub async fn ensure_schema(&self) -> Result<(), DbError> {
        sqlx::query(CREATE_COMMAND_USAGE_SQL)
            .execute(&self.pool)
            .await?;
        sqlx::query(CREATE_LOG_FILES_SQL).execute(&self.pool).await?;
        tracing::info!("Database schema ensured");
        Ok(())
    }

    /// Return a reference to the underlying [`SqlitePool`].
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all connections in the pool gracefully.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("SQLite pool closed");
    }
}
