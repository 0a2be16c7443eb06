// Legality queries over the ledger. Nothing in here mutates.

use super::ledger::Ledger;
use super::record::Role;
use super::MAX_TOP_LEVEL_SLOTS;
use alloc::vec::Vec;
use core::fmt;

/// One maximal run of consecutive logical records, i.e. one extended
/// partition's worth of EBR chain
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExtendedGroup {
    pub start: usize,
    pub len: usize,
}

impl ExtendedGroup {
    /// Position one past the last record of the group
    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    pub const fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end()
    }
}

impl Ledger {
    fn count_role(&self, role: Role) -> usize {
        self.records.iter().filter(|r| r.role == role).count()
    }

    /// Records that will appear in the MBR (primary or logical)
    pub fn count_retained(&self) -> usize {
        self.records.iter().filter(|r| r.role.is_retained()).count()
    }

    /// May exceed four while the layout is illegal
    pub fn count_primary(&self) -> usize {
        self.count_role(Role::Primary)
    }

    pub fn count_logical(&self) -> usize {
        self.count_role(Role::Logical)
    }

    pub fn count_excluded(&self) -> usize {
        self.count_role(Role::Excluded)
    }

    /// Number of extended partitions the current logicals would need.
    /// Anything above one is illegal.
    pub fn count_extended_groups(&self) -> usize {
        let mut groups = 0;
        let mut in_run = false;

        for rec in &self.records {
            let logical = rec.role == Role::Logical;
            if logical && !in_run {
                groups += 1;
            }
            in_run = logical;
        }
        groups
    }

    /// Find the first run of logicals at or after `*start`.
    ///
    /// On return `*start` holds the position of the run's first record and
    /// the run length is returned. When no logical record remains, returns 0
    /// and leaves `*start` at `len()`.
    pub fn find_extended_group(&self, start: &mut usize) -> usize {
        let first = (*start..self.records.len())
            .find(|&i| self.records[i].role == Role::Logical)
            .unwrap_or(self.records.len());
        *start = first;

        self.records[first..]
            .iter()
            .take_while(|r| r.role == Role::Logical)
            .count()
    }

    /// Every extended group, head to tail
    pub fn extended_groups(&self) -> Vec<ExtendedGroup> {
        let mut groups = Vec::new();
        let mut next = 0;

        loop {
            let mut start = next;
            let len = self.find_extended_group(&mut start);
            if len == 0 {
                break;
            }
            groups.push(ExtendedGroup { start, len });
            next = start + len;
        }
        groups
    }

    /// Logicals that have no room for their EBR
    fn logicals_lack_free_space(&self) -> bool {
        self.records
            .iter()
            .any(|r| r.role == Role::Logical && !r.free_sector_before)
    }

    /// Whether the records form a legal MBR: at most four primaries counting
    /// the extended partition as one, at most one extended partition, and a
    /// free sector before every logical. An empty ledger is legal.
    pub fn is_legal(&self) -> bool {
        let primaries = self.count_primary();
        let extended = self.count_extended_groups();

        primaries + extended <= MAX_TOP_LEVEL_SLOTS
            && extended <= 1
            && !self.logicals_lack_free_space()
    }

    pub fn summary(&self) -> LayoutSummary {
        LayoutSummary {
            total: self.records.len(),
            primary: self.count_primary(),
            logical: self.count_logical(),
            excluded: self.count_excluded(),
            extended_groups: self.count_extended_groups(),
            legal: self.is_legal(),
        }
    }
}

/// Counts describing the planned MBR
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LayoutSummary {
    pub total: usize,
    pub primary: usize,
    pub logical: usize,
    pub excluded: usize,
    pub extended_groups: usize,
    pub legal: bool,
}

impl LayoutSummary {
    /// MBR slots taken: primaries plus one per extended partition
    pub const fn slots_used(&self) -> usize {
        self.primary + self.extended_groups
    }
}

impl fmt::Display for LayoutSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} partitions converted: {} primary, {} logical in {} extended, {} omitted ({})",
            self.primary + self.logical,
            self.total,
            self.primary,
            self.logical,
            self.extended_groups,
            self.excluded,
            if self.legal { "legal" } else { "NOT legal" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PartitionRecord;

    fn ledger_with_roles(roles: &[Role]) -> Ledger {
        let mut ledger = Ledger::new();
        for (i, role) in roles.iter().enumerate() {
            let start = 2048 + i as u64 * 8192;
            ledger.append_record(
                PartitionRecord::new(i as i32, start, start + 4095)
                    .with_role(*role)
                    .with_free_sector_before(true),
            );
        }
        ledger
    }

    #[test]
    fn test_counts() {
        use Role::*;
        let ledger = ledger_with_roles(&[Primary, Logical, Excluded, Logical, Primary]);
        assert_eq!(ledger.count_primary(), 2);
        assert_eq!(ledger.count_logical(), 2);
        assert_eq!(ledger.count_excluded(), 1);
        assert_eq!(ledger.count_retained(), 4);
    }

    #[test]
    fn test_excluded_breaks_run() {
        use Role::*;
        let ledger = ledger_with_roles(&[Logical, Excluded, Logical]);
        assert_eq!(ledger.count_extended_groups(), 2);
        assert!(!ledger.is_legal());
    }

    #[test]
    fn test_find_extended_group_includes_tail() {
        use Role::*;
        let ledger = ledger_with_roles(&[Primary, Logical, Logical]);

        let mut start = 0;
        assert_eq!(ledger.find_extended_group(&mut start), 2);
        assert_eq!(start, 1);

        let mut past = 3;
        assert_eq!(ledger.find_extended_group(&mut past), 0);
        assert_eq!(past, 3);
    }

    #[test]
    fn test_extended_groups_chain() {
        use Role::*;
        let ledger = ledger_with_roles(&[Logical, Logical, Primary, Excluded, Logical]);
        let groups = ledger.extended_groups();
        assert_eq!(
            groups,
            alloc::vec![
                ExtendedGroup { start: 0, len: 2 },
                ExtendedGroup { start: 4, len: 1 },
            ]
        );
        assert_eq!(groups.len(), ledger.count_extended_groups());
        assert!(groups[1].contains(4));
        assert!(!groups[0].contains(2));
    }

    #[test]
    fn test_legal_limits() {
        use Role::*;
        assert!(ledger_with_roles(&[Primary, Primary, Primary, Logical, Logical]).is_legal());
        assert!(!ledger_with_roles(&[Primary, Primary, Primary, Primary, Logical]).is_legal());
        assert!(!ledger_with_roles(&[Primary; 5]).is_legal());
        assert!(Ledger::new().is_legal());
    }

    #[test]
    fn test_logical_without_free_space_is_illegal() {
        let mut ledger = Ledger::new();
        ledger.append_record(PartitionRecord::new(0, 34, 2047).with_role(Role::Logical));
        assert!(!ledger.is_legal());
        ledger.set_role(0, Role::Primary);
        assert!(ledger.is_legal());
    }

    #[test]
    fn test_summary() {
        use Role::*;
        let summary = ledger_with_roles(&[Primary, Logical, Logical, Excluded]).summary();
        assert_eq!(summary.slots_used(), 2);
        assert!(summary.legal);
        assert_eq!(summary.total, 4);
    }

    #[test]
    fn test_summary_display() {
        use Role::*;
        let legal = ledger_with_roles(&[Primary, Logical, Logical, Excluded]).summary();
        assert_eq!(
            format!("{}", legal),
            "3 of 4 partitions converted: 1 primary, 2 logical in 1 extended, 1 omitted (legal)"
        );

        let illegal = ledger_with_roles(&[Primary; 5]).summary();
        assert!(format!("{}", illegal).ends_with("(NOT legal)"));
    }
}
