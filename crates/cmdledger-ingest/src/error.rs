//! Error types for the ingestion binary.
//!
//! Uses `thiserror` for typed errors that surface through the pipeline:
//! grammar compilation, file I/O, and data-layer failures. Per-file I/O
//! and storage errors are fatal for that file only; the run continues with
//! the next file.

use std::path::{Path, PathBuf};

use cmdledger_db::DbError;

/// Errors that can occur during an ingestion run.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// A grammar pattern failed to compile.
    #[error("grammar error: {0}")]
    Grammar(#[from] regex::Error),

    /// Reading a log directory or file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A data-layer operation failed.
    #[error("database error: {0}")]
    Db(#[from] DbError),

    /// Configuration is invalid.
    #[error("config error: {0}")]
    Config(String),
}

impl IngestError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
