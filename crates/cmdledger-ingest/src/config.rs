//! Configuration for the ingestion binary.
//!
//! All configuration is loaded from environment variables with defaults,
//! so the binary runs without any setup in a directory that has a `logs/`
//! folder. Only the two recognized options affect behavior.

use std::path::PathBuf;

use crate::error::IngestError;

/// Default path of the SQLite database file.
const DEFAULT_DATABASE_PATH: &str = "command_usage.db";

/// Default directory scanned for log files.
const DEFAULT_LOG_DIR: &str = "logs";

/// Complete ingestion configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Path of the SQLite database file the events are written to.
    pub database_path: PathBuf,
    /// Directory scanned for `YYYY-MM-DD<suffix>.log` files.
    pub log_dir: PathBuf,
}

impl IngestConfig {
    /// Load configuration from environment variables.
    ///
    /// Recognized variables, both optional:
    /// - `CMDLEDGER_DATABASE` -- database file path (default
    ///   `command_usage.db`)
    /// - `CMDLEDGER_LOG_DIR` -- log directory (default `logs`)
    pub fn from_env() -> Result<Self, IngestError> {
        Ok(Self {
            database_path: env_or("CMDLEDGER_DATABASE", DEFAULT_DATABASE_PATH)?.into(),
            log_dir: env_or("CMDLEDGER_LOG_DIR", DEFAULT_LOG_DIR)?.into(),
        })
    }
}

/// Read an optional environment variable, falling back to a default.
fn env_or(name: &str, default: &str) -> Result<String, IngestError> {
    match std::env::var(name) {
        Ok(value) => Ok(value),
        Err(std::env::VarError::NotPresent) => Ok(default.to_owned()),
        Err(e) => Err(IngestError::Config(format!("invalid {name}: {e}"))),
    }
}
