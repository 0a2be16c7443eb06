//! Morpheus MBR Conversion Planner
//!
//! Decides how an arbitrary GPT partition set is represented in a legacy
//! MBR: which partitions become primaries, which go into the single
//! extended container as logicals, and which are left out.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Conversion Planner                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  ┌────────────┐   ┌────────────┐   ┌────────────┐            │
//! │  │   Ledger   │──▶│   Oracle   │◀──│ Legalizer  │            │
//! │  │            │   │            │   │            │            │
//! │  │ records    │   │ counts     │   │ dedup      │            │
//! │  │ setters    │   │ groups     │   │ trim       │            │
//! │  │ cursor     │   │ is_legal   │   │ promote    │            │
//! │  └────────────┘   └────────────┘   └────────────┘            │
//! │        ▲                ▲                                    │
//! │        │          ┌────────────┐                             │
//! │  disk::scan       │   Editor   │  change_type / apply        │
//! │  (GPT → ledger)   └────────────┘                             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use morpheus_mbrconv::disk::scan::scan_gpt;
//! use morpheus_mbrconv::plan::{Ledger, Role};
//!
//! let mut ledger = Ledger::new();
//! scan_gpt(&mut block_io, &mut ledger)?;
//! ledger.legalize()?;
//!
//! // User asks for partition 2 to become a logical
//! let outcome = ledger.change_type(2, Role::Logical)?;
//!
//! ledger.rewind();
//! while let Some((slot, record)) = ledger.next_record() {
//!     // ... emit MBR / EBR entry ...
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![allow(clippy::new_without_default)]

extern crate alloc;

pub mod config;
pub mod disk;
pub mod logger;
pub mod plan;
