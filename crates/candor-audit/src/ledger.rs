//! In-memory evidence ledger.
//!
//! `EvidenceLedger` keeps one agent's analyses in an append-only hash chain
//! behind a `Mutex`, safe to share across threads with the detection engine.
//! Use `export_log()` to obtain a sealed `LedgerExport` for audit, and
//! `verify_integrity()` at any time to confirm the chain has not been
//! tampered with in memory.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::info;

use candor_contracts::analysis::DeceptionAnalysis;
use candor_contracts::error::{CandorError, CandorResult};

use crate::chain::{hash_entry, verify_chain};
use crate::entry::{LedgerEntry, LedgerExport};

// ── Internal mutable state ────────────────────────────────────────────────────

/// The mutable interior of an `EvidenceLedger`.
pub(crate) struct LedgerState {
    /// All entries written so far, in append order.
    pub(crate) entries: Vec<LedgerEntry>,

    /// The next sequence number to assign (starts at 0).
    pub(crate) sequence: u64,

    /// The `this_hash` of the last written entry, or `GENESIS_HASH` before
    /// any entry has been written.
    pub(crate) last_hash: String,
}

// ── Public ledger ─────────────────────────────────────────────────────────────

/// An append-only, SHA-256 hash-chained ledger of one agent's analyses.
///
/// # Thread safety
///
/// `record()` and `export_log()` both acquire a `Mutex` internally.
pub struct EvidenceLedger {
    agent_id: String,
    pub(crate) state: Arc<Mutex<LedgerState>>,
}

impl EvidenceLedger {
    /// Create a new ledger for the given agent.
    ///
    /// The internal `last_hash` is initialized to `LedgerEntry::GENESIS_HASH`
    /// so the first entry's `prev_hash` is automatically correct.
    pub fn new(agent_id: impl Into<String>) -> Self {
        let state = LedgerState {
            entries: Vec::new(),
            sequence: 0,
            last_hash: LedgerEntry::GENESIS_HASH.to_string(),
        };
        Self {
            agent_id: agent_id.into(),
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Append one analysis to the hash chain.
    ///
    /// Computes `this_hash` from (agent_id, sequence, prev_hash, analysis),
    /// wraps the analysis in a `LedgerEntry`, appends it, then advances the
    /// sequence counter and `last_hash`.
    ///
    /// Returns `Err(LedgerWriteFailed)` only if the internal mutex is
    /// poisoned, which cannot happen under normal operation.
    pub fn record(&self, analysis: &DeceptionAnalysis) -> CandorResult<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| CandorError::LedgerWriteFailed {
                reason: format!("ledger state lock poisoned: {}", e),
            })?;

        let prev_hash = state.last_hash.clone();
        let sequence = state.sequence;

        let this_hash = hash_entry(&self.agent_id, sequence, analysis, &prev_hash);

        let entry = LedgerEntry {
            sequence,
            agent_id: self.agent_id.clone(),
            analysis: analysis.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        };

        state.entries.push(entry);
        state.sequence += 1;
        state.last_hash = this_hash;

        Ok(())
    }

    /// Export a sealed `LedgerExport` containing all entries written so far.
    ///
    /// The `terminal_hash` is the `this_hash` of the last entry, or an empty
    /// string when no entries have been written.
    pub fn export_log(&self) -> LedgerExport {
        let state = self.state.lock().expect("ledger state lock poisoned");
        let terminal_hash = state
            .entries
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default();

        info!(
            agent_id = %self.agent_id,
            entry_count = state.entries.len(),
            terminal_hash = %terminal_hash,
            "evidence ledger exported"
        );

        LedgerExport {
            agent_id: self.agent_id.clone(),
            entries: state.entries.clone(),
            finalized_at: Utc::now(),
            terminal_hash,
        }
    }

    /// Verify that the in-memory chain has not been tampered with.
    pub fn verify_integrity(&self) -> bool {
        let state = self.state.lock().expect("ledger state lock poisoned");
        verify_chain(&state.entries)
    }
}
