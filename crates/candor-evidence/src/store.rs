//! The evidence store contract and its in-memory reference implementation.
//!
//! The store is a key/value + nearest-neighbor collaborator: a namespaced
//! string key maps to a fixed-length feature vector plus an arbitrary
//! metadata payload. Implementations inject three bookkeeping fields into
//! the metadata on store — `_type` (the key's namespace), `_storedAt`
//! (epoch ms), and `_version` (the storage schema version) — and return the
//! augmented payload on `get` and `search`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;

use candor_contracts::error::{CandorError, CandorResult};

use crate::vector::FEATURE_DIM;

/// Storage schema version injected as `_version`.
pub const STORE_VERSION: u64 = 1;

/// Aggregate statistics reported by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of vectors currently stored.
    pub vector_count: usize,
}

/// Options for a nearest-neighbor search.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Maximum number of results to return.
    pub k: usize,
    /// When set, only entries whose injected `_type` equals this value are
    /// considered.
    pub filter_type: Option<String>,
}

impl SearchOptions {
    /// Search for the `k` nearest entries with no type filter.
    pub fn top(k: usize) -> Self {
        Self {
            k,
            filter_type: None,
        }
    }

    /// Restrict the search to entries of the given `_type`.
    pub fn with_type(mut self, filter_type: impl Into<String>) -> Self {
        self.filter_type = Some(filter_type.into());
        self
    }
}

/// The persistence collaborator consumed by the verification subsystem.
///
/// Implementations are external; `InMemoryEvidenceStore` is the reference
/// used in tests and single-process deployments. All failures surface as
/// `CandorError::StoreError` — callers that must not fail wrap the store in
/// an `EvidenceArchive`, which degrades instead of propagating.
pub trait EvidenceStore: Send + Sync {
    /// Store `vector` and `metadata` under `key`, replacing any previous
    /// entry. The stored metadata gains `_type`, `_storedAt`, `_version`.
    fn store(&self, key: &str, vector: &[f32], metadata: Value) -> CandorResult<()>;

    /// The stored metadata for `key`, or `None` when absent.
    fn get(&self, key: &str) -> CandorResult<Option<Value>>;

    /// Remove the entry for `key`. Returns whether an entry was removed.
    fn delete(&self, key: &str) -> CandorResult<bool>;

    /// The metadata of the `k` entries nearest to `vector` by cosine
    /// similarity, best first.
    fn search(&self, vector: &[f32], options: &SearchOptions) -> CandorResult<Vec<Value>>;

    /// Aggregate statistics.
    fn stats(&self) -> CandorResult<StoreStats>;
}

// ── In-memory reference implementation ────────────────────────────────────────

struct StoredEntry {
    vector: Vec<f32>,
    metadata: Value,
}

/// The in-memory reference `EvidenceStore`.
///
/// Linear-scan cosine search — adequate for test corpora and single-process
/// use; production deployments substitute an indexed implementation behind
/// the same trait.
#[derive(Clone, Default)]
pub struct InMemoryEvidenceStore {
    entries: Arc<Mutex<HashMap<String, StoredEntry>>>,
}

impl InMemoryEvidenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn namespace_of(key: &str) -> &str {
        key.split(':').next().unwrap_or(key)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let mag_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}

impl EvidenceStore for InMemoryEvidenceStore {
    fn store(&self, key: &str, vector: &[f32], metadata: Value) -> CandorResult<()> {
        if vector.len() != FEATURE_DIM {
            return Err(CandorError::StoreError {
                reason: format!(
                    "vector length {} does not match dimension {}",
                    vector.len(),
                    FEATURE_DIM
                ),
            });
        }

        let mut metadata = match metadata {
            Value::Object(map) => map,
            other => {
                return Err(CandorError::StoreError {
                    reason: format!("metadata must be a JSON object, got {}", other),
                })
            }
        };
        metadata.insert("_type".to_string(), json!(Self::namespace_of(key)));
        metadata.insert(
            "_storedAt".to_string(),
            json!(Utc::now().timestamp_millis()),
        );
        metadata.insert("_version".to_string(), json!(STORE_VERSION));

        let mut entries = self.entries.lock().expect("evidence store lock poisoned");
        debug!(key, "evidence vector stored");
        entries.insert(
            key.to_string(),
            StoredEntry {
                vector: vector.to_vec(),
                metadata: Value::Object(metadata),
            },
        );
        Ok(())
    }

    fn get(&self, key: &str) -> CandorResult<Option<Value>> {
        let entries = self.entries.lock().expect("evidence store lock poisoned");
        Ok(entries.get(key).map(|e| e.metadata.clone()))
    }

    fn delete(&self, key: &str) -> CandorResult<bool> {
        let mut entries = self.entries.lock().expect("evidence store lock poisoned");
        Ok(entries.remove(key).is_some())
    }

    fn search(&self, vector: &[f32], options: &SearchOptions) -> CandorResult<Vec<Value>> {
        let entries = self.entries.lock().expect("evidence store lock poisoned");

        let mut scored: Vec<(f64, &StoredEntry)> = entries
            .values()
            .filter(|entry| match &options.filter_type {
                Some(wanted) => entry
                    .metadata
                    .get("_type")
                    .and_then(Value::as_str)
                    .is_some_and(|t| t == wanted),
                None => true,
            })
            .map(|entry| (cosine_similarity(vector, &entry.vector), entry))
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        Ok(scored
            .into_iter()
            .take(options.k)
            .map(|(_, entry)| entry.metadata.clone())
            .collect())
    }

    fn stats(&self) -> CandorResult<StoreStats> {
        let entries = self.entries.lock().expect("evidence store lock poisoned");
        Ok(StoreStats {
            vector_count: entries.len(),
        })
    }
}
