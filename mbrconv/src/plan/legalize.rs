// Legalizer - turn an arbitrary role assignment into a legal MBR layout
//
// Greedy and deterministic. Extra extended groups are folded away smallest
// first, then primaries are dropped from the tail until the layout fits.
// Afterwards roles are promoted back to primary where slots allow.

use super::ledger::Ledger;
use super::oracle::ExtendedGroup;
use super::record::Role;
use super::{PlanError, Result, MAX_TOP_LEVEL_SLOTS};

/// Demoted logicals become primaries only while fewer than this many exist,
/// which keeps a slot free for the surviving extended partition
const PRIMARY_LIMIT_WITH_EXTENDED: usize = MAX_TOP_LEVEL_SLOTS - 1;

impl Ledger {
    /// Rework roles until the ledger is a legal MBR layout, keeping as many
    /// partitions as the heuristics manage.
    ///
    /// Fails with [`PlanError::EmptyLedger`] when there is nothing to
    /// convert, even though an empty ledger counts as legal, and with
    /// [`PlanError::IllegalLayout`] if the result is still not legal.
    pub fn legalize(&mut self) -> Result<()> {
        if self.is_empty() {
            crate::log_info!("Ledger::legalize() - no partitions");
            return Err(PlanError::EmptyLedger);
        }

        self.remove_exact_duplicates();

        if !self.is_legal() {
            crate::log_info!("Ledger::legalize() - layout isn't legal, fixing");

            while self.count_extended_groups() > 1 {
                if self.trim_smallest_extended_group().is_none() {
                    break;
                }
            }

            while !self.is_legal() {
                match self.last_primary() {
                    Some(i) => {
                        crate::log_trace!("Ledger::legalize() - dropping last primary");
                        self.records[i].role = Role::Excluded;
                    }
                    None => break,
                }
            }
        }

        // Everything fits in the four primary slots, no extended needed
        if self.count_primary() + self.count_logical() <= MAX_TOP_LEVEL_SLOTS {
            for rec in self.records.iter_mut().filter(|r| r.role == Role::Logical) {
                rec.role = Role::Primary;
            }
        }

        if self.count_extended_groups() + self.count_primary() < MAX_TOP_LEVEL_SLOTS {
            self.promote_earliest_partition();
        }

        if self.is_legal() {
            Ok(())
        } else {
            crate::log_info!("Ledger::legalize() - could not reach a legal layout");
            Err(PlanError::IllegalLayout)
        }
    }

    /// Fold the shortest extended group (first found wins ties) back into
    /// primaries while fewer than three primaries exist, excluding the rest
    /// of its records. Returns the group that was trimmed.
    pub fn trim_smallest_extended_group(&mut self) -> Option<ExtendedGroup> {
        let bound = self.original_table_size().max(self.len()) + 1;

        let mut shortest: Option<ExtendedGroup> = None;
        let mut shortest_len = bound;
        for group in self.extended_groups() {
            if group.len < shortest_len {
                shortest_len = group.len;
                shortest = Some(group);
            }
        }

        let group = shortest?;
        crate::log_trace!("Ledger::trim_smallest_extended_group() - trimming");

        for i in group.start..group.end() {
            let role = if self.count_primary() < PRIMARY_LIMIT_WITH_EXTENDED {
                Role::Primary
            } else {
                Role::Excluded
            };
            self.records[i].role = role;
        }
        Some(group)
    }

    fn last_primary(&self) -> Option<usize> {
        self.records.iter().rposition(|r| r.role == Role::Primary)
    }

    /// Make the partition that starts earliest on disk a primary, if it has
    /// a free sector in front of it. Not undone when this splits a logical
    /// run; the final legality check reports that.
    fn promote_earliest_partition(&mut self) {
        let mut earliest: Option<usize> = None;
        for (i, rec) in self.records.iter().enumerate() {
            if rec.role == Role::Excluded {
                continue;
            }
            match earliest {
                Some(e) if self.records[e].first_sector <= rec.first_sector => {}
                _ => earliest = Some(i),
            }
        }

        let Some(i) = earliest else {
            return;
        };
        if self.records[i].free_sector_before {
            crate::log_trace!("Ledger::promote_earliest_partition() - promoting");
            self.records[i].role = Role::Primary;
        }
    }
}
