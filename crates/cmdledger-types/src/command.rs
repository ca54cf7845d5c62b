//! Compound-command roots, their argument enumerations, and canonical labels.
//!
//! A *compound* command is a root whose meaning depends on a trailing
//! argument the base line grammar does not capture (`/gamemode creative`
//! means something different from `/gamemode survival`). The valid
//! arguments form closed enumerations, and the mapping from a resolved
//! compound to its final human-facing label is a method on the enum, so a
//! missing or misnamed alias is a compile-time hole in a `match` rather
//! than a silent fall-through at runtime.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Argument enumerations
// ---------------------------------------------------------------------------

/// The game mode selected by the `/gamemode` and `/gm` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Standard play with health and resource gathering.
    Survival,
    /// Unlimited resources and flight.
    Creative,
    /// Exploration without block breaking.
    Adventure,
    /// Free-flying observation without interaction.
    Spectator,
}

impl GameMode {
    /// Parse a sub-grammar argument token into a game mode.
    pub fn parse(argument: &str) -> Option<Self> {
        match argument {
            "survival" => Some(Self::Survival),
            "creative" => Some(Self::Creative),
            "adventure" => Some(Self::Adventure),
            "spectator" => Some(Self::Spectator),
            _ => None,
        }
    }

    /// The argument's spelling in the log line, also its canonical label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Survival => "survival",
            Self::Creative => "creative",
            Self::Adventure => "adventure",
            Self::Spectator => "spectator",
        }
    }
}

/// The kit selected by the `/kit` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KitName {
    /// The starter kit containing the command reference book.
    CommandBook,
    /// The starter kit containing the server rule book.
    RuleBook,
}

impl KitName {
    /// Parse a sub-grammar argument token into a kit name.
    pub fn parse(argument: &str) -> Option<Self> {
        match argument {
            "commandbook" => Some(Self::CommandBook),
            "rulebook" => Some(Self::RuleBook),
            _ => None,
        }
    }

    /// The argument's spelling in the log line, also its canonical label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CommandBook => "commandbook",
            Self::RuleBook => "rulebook",
        }
    }
}

// ---------------------------------------------------------------------------
// Compound roots and resolution
// ---------------------------------------------------------------------------

/// A root command declared compound: its meaning requires the trailing
/// argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompoundRoot {
    /// `/gamemode <mode>` -- the full game-mode switch.
    Gamemode,
    /// `/gm <mode>` -- the abbreviated game-mode switch.
    Gm,
    /// `/kit <name>` -- the kit selector.
    Kit,
}

impl CompoundRoot {
    /// Look up a lower-cased root command in the compound set.
    ///
    /// Returns `None` for every non-compound command, which then passes
    /// through normalization unchanged.
    pub fn from_command(command: &str) -> Option<Self> {
        match command {
            "gamemode" => Some(Self::Gamemode),
            "gm" => Some(Self::Gm),
            "kit" => Some(Self::Kit),
            _ => None,
        }
    }

    /// The root's spelling in the log line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gamemode => "gamemode",
            Self::Gm => "gm",
            Self::Kit => "kit",
        }
    }

    /// Resolve a captured argument token against this root's enumeration.
    ///
    /// Returns `None` when the argument is not in the closed set; the
    /// caller must drop the event rather than record it under a
    /// misleading generic label.
    pub fn resolve(self, argument: &str) -> Option<ResolvedCompound> {
        match self {
            Self::Gamemode => GameMode::parse(argument).map(ResolvedCompound::Gamemode),
            Self::Gm => GameMode::parse(argument).map(ResolvedCompound::Gm),
            Self::Kit => KitName::parse(argument).map(ResolvedCompound::Kit),
        }
    }
}

/// A compound command whose argument resolved against its enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolvedCompound {
    /// `/gamemode <mode>` with a recognized mode.
    Gamemode(GameMode),
    /// `/gm <mode>` with a recognized mode.
    Gm(GameMode),
    /// `/kit <name>` with a recognized kit.
    Kit(KitName),
}

impl ResolvedCompound {
    /// The resolved "root argument" spelling, e.g. `"gamemode creative"`.
    pub fn resolved_spelling(self) -> String {
        let (root, argument) = match self {
            Self::Gamemode(mode) => (CompoundRoot::Gamemode.as_str(), mode.as_str()),
            Self::Gm(mode) => (CompoundRoot::Gm.as_str(), mode.as_str()),
            Self::Kit(kit) => (CompoundRoot::Kit.as_str(), kit.as_str()),
        };
        format!("{root} {argument}")
    }

    /// The final canonical label stored for this compound.
    ///
    /// This is the alias table: `gamemode creative` and `gm creative`
    /// both collapse to `creative`, kit selections collapse to the kit
    /// name.
    pub const fn canonical_label(self) -> &'static str {
        match self {
            Self::Gamemode(mode) | Self::Gm(mode) => mode.as_str(),
            Self::Kit(kit) => kit.as_str(),
        }
    }
}
