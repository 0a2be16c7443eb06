//! Disk-side collaborators of the planner: GPT type mapping and the scan that
//! populates a [`Ledger`](crate::plan::Ledger).

pub mod partition;
pub mod scan;
