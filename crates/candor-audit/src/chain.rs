//! Hash-chain primitives: hashing and chain integrity verification.
//!
//! Every field that contributes to an entry's hash is listed explicitly so
//! nothing is accidentally omitted.
//!
//! Hash input layout (bytes, in order):
//!   1. agent_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. canonical JSON of the analysis (serde_json with no pretty-printing)

use sha2::{Digest, Sha256};

use candor_contracts::analysis::DeceptionAnalysis;

use crate::entry::LedgerEntry;

/// Compute the SHA-256 hash for a single ledger entry.
///
/// The hash commits to the entry's position (`sequence`), the agent it
/// belongs to (`agent_id`), its link to the previous entry (`prev_hash`),
/// and the full analysis.
///
/// Returns a lowercase 64-character hex string.
///
/// # Panics
///
/// Panics if `analysis` cannot be serialized to JSON — which cannot happen
/// for the well-formed `DeceptionAnalysis` type.
pub fn hash_entry(
    agent_id: &str,
    sequence: u64,
    analysis: &DeceptionAnalysis,
    prev_hash: &str,
) -> String {
    let analysis_json = serde_json::to_vec(analysis)
        .expect("DeceptionAnalysis must always be serializable to JSON");

    let mut hasher = Sha256::new();
    hasher.update(agent_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&analysis_json);

    hex::encode(hasher.finalize())
}

/// Verify the integrity of a ledger chain.
///
/// Returns `true` when the chain is valid according to both rules:
///
/// 1. **Prev-hash linkage** — each entry's `prev_hash` equals the
///    `this_hash` of the preceding entry (or `GENESIS_HASH` for entry 0).
/// 2. **Hash correctness** — each entry's `this_hash` matches the value
///    recomputed from its own fields.
///
/// Returns `false` the moment any mismatch is detected. An empty chain is
/// defined as valid.
pub fn verify_chain(entries: &[LedgerEntry]) -> bool {
    let mut expected_prev = LedgerEntry::GENESIS_HASH.to_string();

    for entry in entries {
        if entry.prev_hash != expected_prev {
            return false;
        }

        let recomputed = hash_entry(
            &entry.agent_id,
            entry.sequence,
            &entry.analysis,
            &entry.prev_hash,
        );
        if entry.this_hash != recomputed {
            return false;
        }

        expected_prev = entry.this_hash.clone();
    }

    true
}
