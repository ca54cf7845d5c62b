//! The canonical command event persisted by the data layer.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single "player issued server command" occurrence.
///
/// The timestamp is the log file's embedded calendar date combined with
/// the line's time-of-day; server logs carry no zone information, so the
/// value is naive wall-clock time.
///
/// The pair `(timestamp, player)` is the store's uniqueness key. Two
/// different commands by the same player within the same second cannot be
/// distinguished and the second insert is rejected as a duplicate -- a
/// known limitation inherited from the persisted schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEvent {
    /// When the command was issued (file date + line time-of-day).
    pub timestamp: NaiveDateTime,
    /// The player who issued the command, verbatim from the log line.
    pub player: String,
    /// The canonical command label after normalization.
    pub command: String,
}

impl CommandEvent {
    /// Create a new command event.
    pub const fn new(timestamp: NaiveDateTime, player: String, command: String) -> Self {
        Self {
            timestamp,
            player,
            command,
        }
    }
}
