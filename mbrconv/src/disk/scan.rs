// GPT scan - fill a ledger with one record per used GPT entry

use super::partition::PartitionType;
use crate::plan::{Ledger, PartitionRecord, Role};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use gpt_disk_io::{BlockIo, Disk};

/// GPT attribute bit 2: legacy BIOS bootable
const LEGACY_BIOS_BOOTABLE: u64 = 1 << 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// Block I/O failed while reading the table
    IoError,
    /// No valid primary GPT header
    InvalidHeader,
}

impl ScanError {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::IoError => "Block I/O operation failed",
            Self::InvalidHeader => "Invalid or missing GPT header",
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Used GPT entry, copied out of the on-disk array
#[derive(Copy, Clone, Debug)]
struct UsedEntry {
    slot: u32,
    partition_type: PartitionType,
    start_lba: u64,
    end_lba: u64,
    bootable: bool,
}

/// Read the primary GPT through `block_io` and append a record for every
/// used entry, in table order. The ledger is cleared first.
///
/// Partitions with a free sector in front of them start out as logicals,
/// the rest as primaries; run [`Ledger::legalize`] afterwards.
///
/// Returns the number of records added.
pub fn scan_gpt<B: BlockIo>(block_io: B, ledger: &mut Ledger) -> Result<usize, ScanError> {
    ledger.clear();

    let block_size = block_io.block_size().to_u32();
    let mut disk = Disk::new(block_io).map_err(|_| ScanError::IoError)?;
    let mut block_buf = vec![0u8; block_size as usize];

    let header = disk
        .read_primary_gpt_header(&mut block_buf)
        .map_err(|_| ScanError::IoError)?;
    if !header.is_signature_valid() {
        crate::log_info!("scan_gpt() - no GPT signature");
        return Err(ScanError::InvalidHeader);
    }

    let first_usable = header.first_usable_lba.to_u64();
    let last_usable = header.last_usable_lba.to_u64();

    let layout = header
        .get_partition_entry_array_layout()
        .map_err(|_| ScanError::InvalidHeader)?;
    let table_size = layout.num_entries as usize;

    let iter = disk
        .gpt_partition_entry_array_iter(layout, &mut block_buf)
        .map_err(|_| ScanError::IoError)?;

    let mut used: Vec<UsedEntry> = Vec::new();
    for (slot, entry_result) in iter.enumerate() {
        let entry = entry_result.map_err(|_| ScanError::IoError)?;

        if !entry.is_used() {
            continue;
        }

        // Copy the guid to avoid unaligned reference
        let guid = entry.partition_type_guid;
        used.push(UsedEntry {
            slot: slot as u32,
            partition_type: PartitionType::from_gpt_guid(&guid),
            start_lba: entry.starting_lba.to_u64(),
            end_lba: entry.ending_lba.to_u64(),
            bootable: (entry.attributes.0.to_u64() & LEGACY_BIOS_BOOTABLE) != 0,
        });
    }

    ledger.set_sector_size(block_size);
    ledger.set_original_table_size(table_size);

    for entry in &used {
        let free_before = has_free_sector_before(entry.start_lba, first_usable, last_usable, &used);
        let role = if free_before {
            Role::Logical
        } else {
            Role::Primary
        };

        ledger.append_record(
            PartitionRecord::new(entry.slot as i32, entry.start_lba, entry.end_lba)
                .with_role(role)
                .with_type_code(entry.partition_type.mbr_type_code())
                .with_bootable(entry.bootable)
                .with_free_sector_before(free_before),
        );
    }

    crate::log_info!("scan_gpt() - ledger populated from GPT");
    Ok(used.len())
}

/// The sector just before `start_lba` is usable and belongs to no partition
fn has_free_sector_before(
    start_lba: u64,
    first_usable: u64,
    last_usable: u64,
    used: &[UsedEntry],
) -> bool {
    let Some(before) = start_lba.checked_sub(1) else {
        return false;
    };
    if before < first_usable || before > last_usable {
        return false;
    }
    !used
        .iter()
        .any(|e| e.start_lba <= before && before <= e.end_lba)
}
