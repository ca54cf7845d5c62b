//! The fixed line and filename grammars.
//!
//! Both grammars are exposed as named pattern constants with documented
//! capture semantics so they can be unit-tested independently of the
//! pipeline. Non-matching input is the common case, not an error: server
//! logs are mostly chatter, and log directories contain files this
//! pipeline does not own.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::error::IngestError;

/// Matches a "player issued server command" log line, anchored at the
/// start of the line.
///
/// Shape: `[HH:MM:SS] [Server thread/INFO]: <Player> issued server
/// command: /<Command>` with HH, MM, SS each exactly two digits.
///
/// Captures:
/// 1. hour, 2. minute, 3. second -- two-digit time-of-day fields
/// 4. player -- one or more ASCII letters, taken verbatim
/// 5. command -- the ASCII-letter run after the slash; trailing arguments
///    are deliberately not captured (see the compound sub-grammars)
pub const COMMAND_LINE_PATTERN: &str =
    r"^\[(\d{2}):(\d{2}):(\d{2})\] \[Server thread/INFO\]: ([A-Za-z]+) issued server command: /([A-Za-z]+)";

/// Matches an ingestible log file name.
///
/// Shape: `YYYY-MM-DD<arbitrary-suffix>.log`. The archived collaborator
/// side names its files `YYYY-MM-DD-<digits>.log.gz`; after download and
/// decompression they land here without the `.gz`.
///
/// Captures:
/// 1. year, 2. month, 3. day -- the embedded calendar date
/// 4. suffix -- unconstrained, only part of the deduplication identity
pub const LOG_FILENAME_PATTERN: &str = r"^(\d{4})-(\d{2})-(\d{2})(.*)\.log$";

/// A tentative command occurrence extracted from one log line.
///
/// The command here is the lower-cased *root* token; it still has to pass
/// through normalization before it is a storable label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// The file's embedded date combined with the line's time-of-day.
    pub timestamp: NaiveDateTime,
    /// The player token, verbatim.
    pub player: String,
    /// The lower-cased root command token.
    pub command: String,
}

/// Matches raw log lines against [`COMMAND_LINE_PATTERN`].
pub struct LineParser {
    pattern: Regex,
}

impl LineParser {
    /// Compile the line grammar.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Grammar`] if the pattern fails to compile.
    pub fn new() -> Result<Self, IngestError> {
        Ok(Self {
            pattern: Regex::new(COMMAND_LINE_PATTERN)?,
        })
    }

    /// Parse one raw line against the grammar.
    ///
    /// Returns `None` for every line that does not match, including lines
    /// whose time-of-day digits do not form a valid wall-clock time.
    /// Silently skipping such lines is normal operation.
    pub fn parse(&self, line: &str, file_date: NaiveDate) -> Option<ParsedCommand> {
        let caps = self.pattern.captures(line)?;

        let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
        let second: u32 = caps.get(3)?.as_str().parse().ok()?;
        let time = NaiveTime::from_hms_opt(hour, minute, second)?;

        let player = caps.get(4)?.as_str().to_owned();
        let command = caps.get(5)?.as_str().to_lowercase();

        Some(ParsedCommand {
            timestamp: file_date.and_time(time),
            player,
            command,
        })
    }
}

/// Matches file names against [`LOG_FILENAME_PATTERN`].
pub struct FileNamePattern {
    pattern: Regex,
}

impl FileNamePattern {
    /// Compile the filename grammar.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Grammar`] if the pattern fails to compile.
    pub fn new() -> Result<Self, IngestError> {
        Ok(Self {
            pattern: Regex::new(LOG_FILENAME_PATTERN)?,
        })
    }

    /// Extract the embedded calendar date from a file name.
    ///
    /// Returns `None` when the name does not match the grammar or the
    /// digits do not form a real calendar date; such files are skipped
    /// without error.
    pub fn embedded_date(&self, file_name: &str) -> Option<NaiveDate> {
        let caps = self.pattern.captures(file_name)?;

        let year: i32 = caps.get(1)?.as_str().parse().ok()?;
        let month: u32 = caps.get(2)?.as_str().parse().ok()?;
        let day: u32 = caps.get(3)?.as_str().parse().ok()?;

        NaiveDate::from_ymd_opt(year, month, day)
    }
}
