// Validated single-change edits on a legal ledger

use super::ledger::{clamp_index, Ledger};
use super::record::{is_extended_type_code, Role};
use super::{PlanError, Rejection, Result, MAX_TOP_LEVEL_SLOTS};
use alloc::vec;
use alloc::vec::Vec;

/// Result of a validated edit
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The change was kept
    Applied,
    /// The change broke the layout and was rolled back
    Reverted(Vec<Rejection>),
}

impl ChangeOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ChangeOutcome::Applied)
    }

    /// Reasons for the rollback, empty when applied
    pub fn rejections(&self) -> &[Rejection] {
        match self {
            ChangeOutcome::Applied => &[],
            ChangeOutcome::Reverted(reasons) => reasons,
        }
    }
}

/// An edit a user can request on one partition
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChangeRequest {
    ToggleBootable,
    /// Leave the partition out of the MBR
    Drop,
    MakePrimary,
    MakeLogical,
    SetTypeCode(u8),
}

impl ChangeRequest {
    /// Requests that make sense for a partition currently in `role`.
    /// `SetTypeCode` is listed with a zero placeholder code.
    pub fn available_for(role: Role) -> &'static [ChangeRequest] {
        use ChangeRequest::*;
        match role {
            Role::Primary => &[ToggleBootable, Drop, MakeLogical, SetTypeCode(0)],
            Role::Logical => &[ToggleBootable, Drop, MakePrimary, SetTypeCode(0)],
            Role::Excluded => &[ToggleBootable, MakePrimary, MakeLogical, SetTypeCode(0)],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChangeRequest::ToggleBootable => "toggle active flag",
            ChangeRequest::Drop => "drop partition from MBR",
            ChangeRequest::MakePrimary => "make partition primary",
            ChangeRequest::MakeLogical => "make partition logical",
            ChangeRequest::SetTypeCode(_) => "change MBR type code",
        }
    }
}

impl Ledger {
    /// Move the record at `index` (clamped) to `new_role` if the layout stays
    /// legal, otherwise put the old role back and report why.
    ///
    /// Only a ledger that is empty or already illegal is an error. A
    /// rolled-back change still returns `Ok`, the ledger being legal either
    /// way.
    pub fn change_type(&mut self, index: isize, new_role: Role) -> Result<ChangeOutcome> {
        let Some(i) = clamp_index(self.len(), index) else {
            return Err(PlanError::EmptyLedger);
        };
        if !self.is_legal() {
            return Err(PlanError::IllegalLayout);
        }

        let original = self.records[i].role;
        self.records[i].role = new_role;

        if self.is_legal() {
            return Ok(ChangeOutcome::Applied);
        }

        let reasons = self.diagnose(i, new_role);
        crate::log_info!("Ledger::change_type() - requested change is not possible, reverting");
        for reason in &reasons {
            crate::log_info!(reason.as_str());
        }

        self.records[i].role = original;
        Ok(ChangeOutcome::Reverted(reasons))
    }

    /// Work out which rules the just-applied role broke
    fn diagnose(&self, i: usize, new_role: Role) -> Vec<Rejection> {
        let mut reasons = Vec::new();
        let groups = self.count_extended_groups();

        if new_role == Role::Logical && !self.records[i].free_sector_before {
            reasons.push(Rejection::MissingFreeSector);
        }
        if groups > 1 {
            reasons.push(if new_role == Role::Logical {
                Rejection::NonContiguousLogicals
            } else {
                Rejection::MultipleExtendedGroups
            });
        }
        if self.count_primary() + groups > MAX_TOP_LEVEL_SLOTS {
            reasons.push(Rejection::TooManyPrimaries);
        }
        reasons
    }

    /// Carry out a user request on the record at `index` (clamped).
    /// Role changes go through [`Ledger::change_type`].
    pub fn apply(&mut self, index: isize, request: ChangeRequest) -> Result<ChangeOutcome> {
        if self.is_empty() {
            return Err(PlanError::EmptyLedger);
        }

        match request {
            ChangeRequest::ToggleBootable => {
                self.toggle_bootable(index);
                Ok(ChangeOutcome::Applied)
            }
            ChangeRequest::Drop => self.change_type(index, Role::Excluded),
            ChangeRequest::MakePrimary => self.change_type(index, Role::Primary),
            ChangeRequest::MakeLogical => self.change_type(index, Role::Logical),
            ChangeRequest::SetTypeCode(code) if is_extended_type_code(code) => {
                crate::log_info!("Ledger::apply() - refused extended partition code");
                Ok(ChangeOutcome::Reverted(vec![Rejection::ReservedTypeCode(code)]))
            }
            ChangeRequest::SetTypeCode(code) => {
                self.set_type_code(index, code)?;
                Ok(ChangeOutcome::Applied)
            }
        }
    }
}
