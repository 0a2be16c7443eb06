// Partition records and MBR role assignment

/// `original_index` of a record that stands for an unused MBR slot
pub const EMPTY_SLOT: i32 = -2;

/// `original_index` reported by getters on an empty ledger
pub const NO_RECORD: i32 = -1;

/// MBR extended partition type codes (CHS, LBA, Linux)
pub const EXTENDED_TYPE_CODES: [u8; 3] = [0x05, 0x0F, 0x85];

/// Protective type code used for empty-slot records
pub const PROTECTIVE_TYPE_CODE: u8 = 0xEE;

/// MBR active flag byte for a bootable entry
pub const ACTIVE_FLAG: u8 = 0x80;

/// How a partition is carried into the MBR
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Role {
    /// One of the four top-level slots
    Primary,
    /// Entry in the extended partition's EBR chain
    Logical,
    /// Left out of the MBR
    #[default]
    Excluded,
}

impl Role {
    /// Whether the partition appears in the MBR at all
    pub const fn is_retained(&self) -> bool {
        matches!(self, Role::Primary | Role::Logical)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Role::Primary => "primary",
            Role::Logical => "logical",
            Role::Excluded => "omitted",
        }
    }
}

/// True for the type codes that mark an extended container
pub fn is_extended_type_code(code: u8) -> bool {
    EXTENDED_TYPE_CODES.contains(&code)
}

/// One source partition under consideration for the MBR
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PartitionRecord {
    pub original_index: i32,
    pub role: Role,
    pub type_code: u8,
    pub bootable: bool,
    /// At least one unallocated sector precedes the partition
    pub free_sector_before: bool,
    pub first_sector: u64,
    pub last_sector: u64,
}

impl PartitionRecord {
    pub const fn new(original_index: i32, first_sector: u64, last_sector: u64) -> Self {
        Self {
            original_index,
            role: Role::Excluded,
            type_code: 0x83,
            bootable: false,
            free_sector_before: false,
            first_sector,
            last_sector,
        }
    }

    /// Placeholder for an unused slot: protective type, never converted
    pub const fn empty_slot() -> Self {
        Self {
            original_index: EMPTY_SLOT,
            role: Role::Excluded,
            type_code: PROTECTIVE_TYPE_CODE,
            bootable: false,
            free_sector_before: false,
            first_sector: 0,
            last_sector: 0,
        }
    }

    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub const fn with_type_code(mut self, type_code: u8) -> Self {
        self.type_code = type_code;
        self
    }

    pub const fn with_bootable(mut self, bootable: bool) -> Self {
        self.bootable = bootable;
        self
    }

    pub const fn with_free_sector_before(mut self, free_sector_before: bool) -> Self {
        self.free_sector_before = free_sector_before;
        self
    }

    pub const fn is_empty_slot(&self) -> bool {
        self.original_index == EMPTY_SLOT
    }

    /// Same on-disk extent as `other`
    pub const fn same_extent(&self, other: &PartitionRecord) -> bool {
        self.first_sector == other.first_sector && self.last_sector == other.last_sector
    }

    /// MBR status byte: 0x80 when bootable, 0x00 otherwise
    pub const fn active_flag(&self) -> u8 {
        if self.bootable {
            ACTIVE_FLAG
        } else {
            0x00
        }
    }

    pub fn size_sectors(&self) -> u64 {
        self.last_sector.saturating_sub(self.first_sector) + 1
    }

    pub fn size_mb(&self, sector_size: u32) -> u64 {
        (self.size_sectors() * sector_size as u64) / (1024 * 1024)
    }
}
