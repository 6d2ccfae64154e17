//! # candor-audit
//!
//! Immutable, append-only, SHA-256 hash-chained ledger of deception
//! analyses.
//!
//! ## Overview
//!
//! Every analysis the detection engine produces can be recorded in a
//! `LedgerEntry` that links to the previous entry via its SHA-256 hash.
//! Tampering with any entry — even a single byte — breaks the chain and is
//! detected by `verify_chain`. The sealed export is the audit evidence for
//! an agent's scoring history.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use candor_audit::{EvidenceLedger, LedgerEntry};
//!
//! let ledger = EvidenceLedger::new("agent-7");
//! ledger.record(&analysis)?;
//!
//! assert!(ledger.verify_integrity());
//! let export = ledger.export_log();
//! ```

pub mod chain;
pub mod entry;
pub mod ledger;

pub use chain::{hash_entry, verify_chain};
pub use entry::{LedgerEntry, LedgerExport};
pub use ledger::EvidenceLedger;
