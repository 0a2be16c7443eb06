// Partition ledger - ordered records with unchecked positional access

use super::record::{is_extended_type_code, PartitionRecord, Role, NO_RECORD};
use super::{PlanError, Result};
use crate::config::PlanConfig;
use alloc::vec::Vec;
use core::iter::Enumerate;
use core::slice;

/// Map a caller-supplied position onto a valid record index.
///
/// Zero or negative positions select the first record, positions at or past
/// the end select the last one. `None` only for an empty ledger.
pub fn clamp_index(len: usize, index: isize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    if index <= 0 {
        Some(0)
    } else {
        Some((index as usize).min(len - 1))
    }
}

/// Ordered collection of partition records, in the order the scanner
/// supplied them.
///
/// Setters here never check MBR legality. Use [`Ledger::change_type`] for
/// validated edits.
#[derive(Debug, Clone)]
pub struct Ledger {
    pub(crate) records: Vec<PartitionRecord>,
    cursor: usize,
    original_table_size: usize,
    sector_size: u32,
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_config(PlanConfig::default())
    }

    pub fn with_config(config: PlanConfig) -> Self {
        Self {
            records: Vec::new(),
            cursor: 0,
            original_table_size: config.original_table_size,
            sector_size: config.sector_size,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record and reset the cursor
    pub fn clear(&mut self) {
        self.records.clear();
        self.cursor = 0;
    }

    pub fn original_table_size(&self) -> usize {
        self.original_table_size
    }

    pub fn set_original_table_size(&mut self, size: usize) {
        self.original_table_size = size;
    }

    pub fn sector_size(&self) -> u32 {
        self.sector_size
    }

    pub fn set_sector_size(&mut self, sector_size: u32) {
        self.sector_size = sector_size;
    }

    // ------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------

    pub fn append_record(&mut self, record: PartitionRecord) {
        self.records.push(record);
    }

    pub fn prepend_record(&mut self, record: PartitionRecord) {
        self.records.insert(0, record);
        if self.cursor > 0 {
            self.cursor += 1;
        }
    }

    // ------------------------------------------------------------------
    // Positional setters (clamped, unchecked)
    // ------------------------------------------------------------------

    fn slot_mut(&mut self, index: isize) -> Option<&mut PartitionRecord> {
        let i = clamp_index(self.records.len(), index)?;
        self.records.get_mut(i)
    }

    fn slot(&self, index: isize) -> Option<&PartitionRecord> {
        let i = clamp_index(self.records.len(), index)?;
        self.records.get(i)
    }

    pub fn set_role(&mut self, index: isize, role: Role) {
        if let Some(rec) = self.slot_mut(index) {
            rec.role = role;
        }
    }

    pub fn set_bootable(&mut self, index: isize, bootable: bool) {
        if let Some(rec) = self.slot_mut(index) {
            rec.bootable = bootable;
        }
    }

    pub fn toggle_bootable(&mut self, index: isize) {
        if let Some(rec) = self.slot_mut(index) {
            rec.bootable = !rec.bootable;
        }
    }

    /// Set the MBR type code. Extended-container codes are refused and the
    /// old code is kept.
    pub fn set_type_code(&mut self, index: isize, code: u8) -> Result<()> {
        if is_extended_type_code(code) {
            crate::log_info!("Ledger::set_type_code() - refused extended partition code");
            return Err(PlanError::ReservedTypeCode(code));
        }
        if let Some(rec) = self.slot_mut(index) {
            rec.type_code = code;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Positional getters (clamped, sentinel on empty)
    // ------------------------------------------------------------------

    /// Copy of the record at the clamped position
    pub fn record(&self, index: isize) -> Option<PartitionRecord> {
        self.slot(index).copied()
    }

    pub fn role(&self, index: isize) -> Role {
        self.slot(index).map_or(Role::Excluded, |r| r.role)
    }

    pub fn type_code(&self, index: isize) -> u8 {
        self.slot(index).map_or(0x00, |r| r.type_code)
    }

    pub fn original_index(&self, index: isize) -> i32 {
        self.slot(index).map_or(NO_RECORD, |r| r.original_index)
    }

    pub fn bootable(&self, index: isize) -> bool {
        self.slot(index).is_some_and(|r| r.bootable)
    }

    /// Whether the record could hold an EBR in front of it, ignoring the
    /// rest of the layout
    pub fn can_be_logical(&self, index: isize) -> bool {
        self.slot(index).is_some_and(|r| r.free_sector_before)
    }

    // ------------------------------------------------------------------
    // Sequential access
    // ------------------------------------------------------------------

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Copy of the record under the cursor and its position, then advance.
    /// `None` once every record has been returned.
    pub fn next_record(&mut self) -> Option<(usize, PartitionRecord)> {
        let rec = *self.records.get(self.cursor)?;
        let pos = self.cursor;
        self.cursor += 1;
        Some((pos, rec))
    }

    /// Borrowing iterator over `(position, record)`; leaves the cursor alone
    pub fn iter(&self) -> Records<'_> {
        Records {
            inner: self.records.iter().enumerate(),
        }
    }

    // ------------------------------------------------------------------
    // Cleanup
    // ------------------------------------------------------------------

    /// Delete every record whose extent repeats an earlier record's.
    /// Returns how many were removed.
    pub fn remove_exact_duplicates(&mut self) -> usize {
        let before = self.records.len();
        let mut kept: Vec<PartitionRecord> = Vec::with_capacity(before);

        for rec in self.records.drain(..) {
            if !kept.iter().any(|k| k.same_extent(&rec)) {
                kept.push(rec);
            }
        }

        self.records = kept;
        let removed = before - self.records.len();
        if removed > 0 {
            self.cursor = self.cursor.min(self.records.len());
            crate::log_info!("Ledger::remove_exact_duplicates() - dropped duplicate extents");
        }
        removed
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = (usize, PartitionRecord);
    type IntoIter = Records<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`Ledger::iter`]
pub struct Records<'a> {
    inner: Enumerate<slice::Iter<'a, PartitionRecord>>,
}

impl Iterator for Records<'_> {
    type Item = (usize, PartitionRecord);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(pos, rec)| (pos, *rec))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Records<'_> {}
