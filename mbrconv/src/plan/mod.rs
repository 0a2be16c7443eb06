//! MBR layout planning
//!
//! The [`Ledger`] holds one [`PartitionRecord`] per source partition. Its raw
//! setters never check legality, so the legalizer can pass through illegal
//! intermediate states. Anything outside the legalizer should go through
//! [`Ledger::change_type`] or [`Ledger::apply`], which validate and roll back.

mod editor;
mod error;
mod ledger;
mod legalize;
mod oracle;
mod record;

pub use editor::*;
pub use error::*;
pub use ledger::*;
pub use oracle::*;
pub use record::*;

/// Top-level MBR slots
pub const MAX_TOP_LEVEL_SLOTS: usize = 4;
