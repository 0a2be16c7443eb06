//! Planner error and diagnostic types
//!
//! Same shape as the ISO and FAT32 error enums: plain `Copy` values with a
//! fixed human-readable description.

use core::fmt;

/// Result type for planner operations
pub type Result<T> = core::result::Result<T, PlanError>;

/// Errors returned by planner operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    /// The ledger holds no records
    EmptyLedger,
    /// The layout violates MBR rules (and could not be, or was not, fixed)
    IllegalLayout,
    /// Refused to assign an extended-container type code to a partition
    ReservedTypeCode(u8),
}

impl PlanError {
    /// Get a human-readable description of the error
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyLedger => "No partitions to convert",
            Self::IllegalLayout => "Partition layout is not a legal MBR layout",
            Self::ReservedTypeCode(_) => {
                "Refusing to set MBR type code to one used for an extended partition"
            }
        }
    }
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReservedTypeCode(code) => write!(f, "{} (0x{:02X})", self.as_str(), code),
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Why a requested change was reverted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A logical partition needs a free sector before it for its EBR
    MissingFreeSector,
    /// The change left the logical partitions in more than one run
    NonContiguousLogicals,
    /// Primaries plus the extended partition exceed four slots
    TooManyPrimaries,
    /// The change split the logical partitions into several groups
    MultipleExtendedGroups,
    /// The type code is reserved for extended partitions
    ReservedTypeCode(u8),
}

impl Rejection {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingFreeSector => {
                "At least one free sector must exist before each logical partition"
            }
            Self::NonContiguousLogicals => "All logical partitions must be contiguous",
            Self::TooManyPrimaries => {
                "You can have only four primary partitions (all logical partitions count as one primary partition)"
            }
            Self::MultipleExtendedGroups => {
                "Logical partitions must form a single contiguous group"
            }
            Self::ReservedTypeCode(_) => PlanError::ReservedTypeCode(0).as_str(),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReservedTypeCode(code) => write!(f, "{} (0x{:02X})", self.as_str(), code),
            _ => f.write_str(self.as_str()),
        }
    }
}
