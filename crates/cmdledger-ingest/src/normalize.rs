//! Command normalization: compound resolution, then alias canonicalization.
//!
//! The base line grammar stops at the root command token, so `/gamemode
//! creative` and `/gamemode survival` both arrive here as `gamemode`. For
//! the declared compound roots the full line is re-scanned with a
//! per-command sub-grammar that captures the trailing argument; a compound
//! command whose argument is not in the closed set is dropped entirely
//! rather than recorded under a misleading generic label. The resolved
//! compound then collapses to its canonical alias, and every other command
//! passes through verbatim.
//!
//! Normalization is deterministic and side-effect free given its two
//! inputs.

use cmdledger_types::CompoundRoot;
use regex::Regex;

use crate::error::IngestError;

/// Sub-grammar for `/gamemode`. Capture 1: the mode argument.
pub const GAMEMODE_ARGUMENT_PATTERN: &str = r"gamemode (survival|creative|adventure|spectator)";

/// Sub-grammar for `/gm`. Capture 1: the mode argument.
pub const GM_ARGUMENT_PATTERN: &str = r"gm (survival|creative|adventure|spectator)";

/// Sub-grammar for `/kit`. Capture 1: the kit argument.
pub const KIT_ARGUMENT_PATTERN: &str = r"kit (commandbook|rulebook)";

/// Resolves compound commands and applies the canonical alias table.
pub struct CommandNormalizer {
    gamemode: Regex,
    gm: Regex,
    kit: Regex,
}

impl CommandNormalizer {
    /// Compile the compound sub-grammars.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Grammar`] if a pattern fails to compile.
    pub fn new() -> Result<Self, IngestError> {
        Ok(Self {
            gamemode: Regex::new(GAMEMODE_ARGUMENT_PATTERN)?,
            gm: Regex::new(GM_ARGUMENT_PATTERN)?,
            kit: Regex::new(KIT_ARGUMENT_PATTERN)?,
        })
    }

    /// Produce the final command label for a parsed root command.
    ///
    /// `root_command` is the lower-cased token the line grammar captured;
    /// `line` is the full original line, re-scanned when the root is
    /// compound. Returns `None` only for a compound root whose argument
    /// is missing or outside the closed enumeration -- the event must be
    /// dropped in that case.
    pub fn normalize(&self, root_command: &str, line: &str) -> Option<String> {
        // Stage 1: compound resolution.
        let Some(root) = CompoundRoot::from_command(root_command) else {
            // Non-compound commands have no alias entries; pass through.
            return Some(root_command.to_owned());
        };

        let argument = self.sub_grammar(root).captures(line)?.get(1)?.as_str();
        let resolved = root.resolve(argument)?;

        // Stage 2: alias canonicalization.
        Some(resolved.canonical_label().to_owned())
    }

    /// The compiled sub-grammar for a compound root.
    const fn sub_grammar(&self, root: CompoundRoot) -> &Regex {
        match root {
            CompoundRoot::Gamemode => &self.gamemode,
            CompoundRoot::Gm => &self.gm,
            CompoundRoot::Kit => &self.kit,
        }
    }
}
