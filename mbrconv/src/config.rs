//! Planner configuration

/// Entries in a default GPT partition entry array
pub const DEFAULT_TABLE_SIZE: usize = 128;

/// Default sector size in bytes
pub const DEFAULT_SECTOR_SIZE: u32 = 512;

/// Settings a ledger is created with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanConfig {
    /// Sector size of the source disk, used for size display only
    pub sector_size: u32,
    /// Number of entries in the source partition table
    pub original_table_size: usize,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            sector_size: DEFAULT_SECTOR_SIZE,
            original_table_size: DEFAULT_TABLE_SIZE,
        }
    }
}

impl PlanConfig {
    /// Default table size on a disk with `sector_size`-byte sectors
    pub const fn for_sector_size(sector_size: u32) -> Self {
        Self {
            sector_size,
            original_table_size: DEFAULT_TABLE_SIZE,
        }
    }

    /// Same config with a different table size
    pub const fn with_table_size(self, original_table_size: usize) -> Self {
        Self {
            sector_size: self.sector_size,
            original_table_size,
        }
    }
}
