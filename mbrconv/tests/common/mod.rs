//! Common test utilities: ledgers built from role lists and an in-memory
//! GPT disk

#![allow(dead_code)]

use gpt_disk_io::{BlockIo, Disk};
use gpt_disk_types::{
    guid, BlockSize, GptHeader, GptPartitionAttributes, GptPartitionEntryArray, Lba, LbaLe,
    U32Le, U64Le,
};
use morpheus_mbrconv::disk::partition::PartitionType;
use morpheus_mbrconv::plan::{Ledger, PartitionRecord, Role};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;

/// Spacing between generated partitions; leaves a gap before each one
pub const STRIDE: u64 = 8192;

/// Ledger with one record per role, every record eligible for logical
pub fn ledger_with_roles(roles: &[Role]) -> Ledger {
    let layout: Vec<(Role, bool)> = roles.iter().map(|r| (*r, true)).collect();
    ledger_with(&layout)
}

/// Ledger from `(role, free_sector_before)` pairs, laid out in disk order
pub fn ledger_with(layout: &[(Role, bool)]) -> Ledger {
    let mut ledger = Ledger::new();
    for (i, (role, free)) in layout.iter().enumerate() {
        let start = 2048 + i as u64 * STRIDE;
        ledger.append_record(
            PartitionRecord::new(i as i32, start, start + STRIDE / 2 - 1)
                .with_role(*role)
                .with_free_sector_before(*free),
        );
    }
    ledger
}

pub fn roles_of(ledger: &Ledger) -> Vec<Role> {
    ledger.iter().map(|(_, rec)| rec.role).collect()
}

pub fn snapshot(ledger: &Ledger) -> Vec<PartitionRecord> {
    ledger.iter().map(|(_, rec)| rec).collect()
}

/// Small deterministic generator for layout sweeps
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    pub fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    pub fn role(&mut self) -> Role {
        match self.below(3) {
            0 => Role::Primary,
            1 => Role::Logical,
            _ => Role::Excluded,
        }
    }
}

/// Random ledger of up to `max_len` records
pub fn random_ledger(rng: &mut Lcg, max_len: u64) -> Ledger {
    let len = 1 + rng.below(max_len);
    let layout: Vec<(Role, bool)> = (0..len)
        .map(|_| (rng.role(), rng.below(4) != 0))
        .collect();
    ledger_with(&layout)
}

/// In-memory block device; clones share the same storage
#[derive(Debug, Clone)]
pub struct MemoryBlockDevice {
    pub data: Rc<RefCell<Vec<u8>>>,
    pub block_size: usize,
}

impl MemoryBlockDevice {
    pub fn new(num_blocks: u64, block_size: usize) -> Self {
        Self {
            data: Rc::new(RefCell::new(vec![0u8; num_blocks as usize * block_size])),
            block_size,
        }
    }
}

impl BlockIo for MemoryBlockDevice {
    type Error = io::Error;

    fn block_size(&self) -> BlockSize {
        BlockSize::new(self.block_size as u32).expect("valid block size")
    }

    fn num_blocks(&mut self) -> Result<u64, Self::Error> {
        Ok((self.data.borrow().len() / self.block_size) as u64)
    }

    fn read_blocks(&mut self, start_lba: Lba, dst: &mut [u8]) -> Result<(), Self::Error> {
        let data = self.data.borrow();
        let offset = start_lba.0 as usize * self.block_size;
        if offset + dst.len() > data.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "read beyond end of device",
            ));
        }
        dst.copy_from_slice(&data[offset..offset + dst.len()]);
        Ok(())
    }

    fn write_blocks(&mut self, start_lba: Lba, src: &[u8]) -> Result<(), Self::Error> {
        let mut data = self.data.borrow_mut();
        let offset = start_lba.0 as usize * self.block_size;
        if offset + src.len() > data.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "write beyond end of device",
            ));
        }
        data[offset..offset + src.len()].copy_from_slice(src);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

struct PlannedPartition {
    slot: u32,
    partition_type: PartitionType,
    start_lba: u64,
    end_lba: u64,
    bootable: bool,
}

/// Writes a protective MBR, primary GPT header and entry array onto a
/// 512-byte-sector memory device
pub struct GptDiskBuilder {
    num_blocks: u64,
    partitions: Vec<PlannedPartition>,
}

impl GptDiskBuilder {
    pub fn new(num_blocks: u64) -> Self {
        Self {
            num_blocks,
            partitions: Vec::new(),
        }
    }

    pub fn partition(
        mut self,
        slot: u32,
        partition_type: PartitionType,
        start_lba: u64,
        end_lba: u64,
    ) -> Self {
        self.partitions.push(PlannedPartition {
            slot,
            partition_type,
            start_lba,
            end_lba,
            bootable: false,
        });
        self
    }

    /// Mark the most recently added partition legacy-BIOS bootable
    pub fn bootable(mut self) -> Self {
        if let Some(last) = self.partitions.last_mut() {
            last.bootable = true;
        }
        self
    }

    pub fn build(self) -> MemoryBlockDevice {
        let device = MemoryBlockDevice::new(self.num_blocks, 512);
        let mut disk = Disk::new(device.clone()).unwrap_or_else(|_| panic!("disk handle"));

        let mut header = GptHeader {
            my_lba: LbaLe::from_u64(1),
            alternate_lba: LbaLe::from_u64(self.num_blocks - 1),
            first_usable_lba: LbaLe::from_u64(34),
            last_usable_lba: LbaLe::from_u64(self.num_blocks - 34),
            disk_guid: guid!("12345678-1234-1234-1234-123456789012"),
            partition_entry_lba: LbaLe::from_u64(2),
            number_of_partition_entries: U32Le::from_u32(128),
            ..Default::default()
        };

        disk.write_protective_mbr(&mut [0u8; 512])
            .unwrap_or_else(|_| panic!("protective MBR write"));

        let layout = header
            .get_partition_entry_array_layout()
            .unwrap_or_else(|_| panic!("entry array layout"));

        let mut entry_buf = vec![0u8; 16384];
        let mut entry_array = GptPartitionEntryArray::new(layout, BlockSize::BS_512, &mut entry_buf)
            .unwrap_or_else(|_| panic!("entry array buffer"));

        for part in &self.partitions {
            let entry = entry_array
                .get_partition_entry_mut(part.slot)
                .expect("slot within entry array");
            entry.partition_type_guid = part.partition_type.to_gpt_guid();
            entry.unique_partition_guid = guid!("12345678-1234-5678-1234-567812345678");
            entry.starting_lba = LbaLe::from_u64(part.start_lba);
            entry.ending_lba = LbaLe::from_u64(part.end_lba);
            let bits = if part.bootable { 1u64 << 2 } else { 0 };
            entry.attributes = GptPartitionAttributes(U64Le::from_u64(bits));
        }

        header.partition_entry_array_crc32 = entry_array.calculate_crc32();
        header.update_header_crc32();

        disk.write_primary_gpt_header(&header, &mut [0u8; 512])
            .unwrap_or_else(|_| panic!("GPT header write"));
        disk.write_gpt_partition_entry_array(&entry_array)
            .unwrap_or_else(|_| panic!("entry array write"));
        disk.flush().unwrap_or_else(|_| panic!("flush"));

        device
    }
}
