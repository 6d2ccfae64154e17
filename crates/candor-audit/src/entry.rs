//! Ledger entry and export types.
//!
//! `LedgerEntry` is a single link in the hash chain — it wraps one
//! `DeceptionAnalysis` with sequence numbering and the SHA-256 hashes that
//! make tampering detectable. `LedgerExport` is the sealed record produced
//! when an agent's ledger is exported for audit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use candor_contracts::analysis::DeceptionAnalysis;

/// A single entry in the SHA-256 hash chain for one agent's ledger.
///
/// Each entry commits to the previous entry via `prev_hash`, forming an
/// append-only chain. Modifying any field — including those of the embedded
/// analysis — invalidates `this_hash` and every subsequent `prev_hash`,
/// which `verify_chain` detects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Monotonically increasing position in the chain, starting at 0.
    pub sequence: u64,

    /// The agent whose analyses this ledger records.
    pub agent_id: String,

    /// The immutable analysis produced by the detection engine.
    pub analysis: DeceptionAnalysis,

    /// SHA-256 hash (hex) of the previous entry, or `GENESIS_HASH` for the
    /// first entry.
    pub prev_hash: String,

    /// SHA-256 hash (hex) of this entry's canonical content.
    pub this_hash: String,
}

impl LedgerEntry {
    /// The sentinel `prev_hash` used for the first entry in every chain.
    ///
    /// 64 hex zeros — a value that can never be the SHA-256 of real data,
    /// making genesis detection unambiguous.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// A sealed, exported ledger for a single agent.
///
/// The `terminal_hash` is the `this_hash` of the last entry and can be used
/// as a compact commitment to the entire ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerExport {
    /// The agent whose analyses are recorded here.
    pub agent_id: String,

    /// All entries in chain order (sequence 0 first).
    pub entries: Vec<LedgerEntry>,

    /// Wall-clock time (UTC) the ledger was exported.
    pub finalized_at: DateTime<Utc>,

    /// The `this_hash` of the last entry. Empty string if the ledger is
    /// empty.
    pub terminal_hash: String,
}
