//! Shared type definitions for the cmdledger ingestion pipeline.
//!
//! Everything that crosses a crate boundary lives here: the canonical
//! [`CommandEvent`] persisted by the data layer, and the closed
//! enumerations describing compound commands and their canonical labels.
//!
//! # Modules
//!
//! - [`event`] -- the persisted command event
//! - [`command`] -- compound-command roots, arguments, and canonical labels

pub mod command;
pub mod event;

// Re-export primary types at crate root for convenience.
pub use command::{CompoundRoot, GameMode, KitName, ResolvedCompound};
pub use event::CommandEvent;
