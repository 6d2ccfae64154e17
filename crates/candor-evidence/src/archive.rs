//! Degrading wrapper around an `EvidenceStore`.
//!
//! Persistence failures must never propagate into the analysis core:
//! detection and scoring always complete. `EvidenceArchive` catches every
//! store error, logs it, and returns `false` / `None` / empty instead.

use serde_json::Value;
use tracing::warn;

use crate::store::{EvidenceStore, SearchOptions};
use crate::vector::{encode_features, snapshot_key, truth_key, EvidenceRecord};

/// A store wrapper that degrades on failure instead of erroring.
pub struct EvidenceArchive<S: EvidenceStore> {
    store: S,
}

impl<S: EvidenceStore> EvidenceArchive<S> {
    /// Wrap `store` in degrading semantics.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The wrapped store, for callers that want failure details.
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Encode and store a task's truth evaluation. Returns whether the
    /// write succeeded.
    pub fn store_truth(&self, record: &EvidenceRecord) -> bool {
        self.put_record(&truth_key(&record.task_id), record)
    }

    /// Encode and store one snapshot of a task. Returns whether the write
    /// succeeded.
    pub fn store_snapshot(&self, record: &EvidenceRecord) -> bool {
        self.put_record(&snapshot_key(&record.task_id, &record.snapshot_id), record)
    }

    /// The stored metadata for `key`, or `None` on miss or failure.
    pub fn fetch(&self, key: &str) -> Option<Value> {
        match self.store.get(key) {
            Ok(found) => found,
            Err(e) => {
                warn!(key, error = %e, "evidence fetch failed; degrading to None");
                None
            }
        }
    }

    /// Remove the entry for `key`. Returns false on miss or failure.
    pub fn remove(&self, key: &str) -> bool {
        match self.store.delete(key) {
            Ok(removed) => removed,
            Err(e) => {
                warn!(key, error = %e, "evidence delete failed; degrading to false");
                false
            }
        }
    }

    /// The metadata of the nearest stored records, empty on failure.
    pub fn similar(&self, record: &EvidenceRecord, options: &SearchOptions) -> Vec<Value> {
        match self.store.search(&encode_features(record), options) {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "evidence search failed; degrading to empty");
                Vec::new()
            }
        }
    }

    /// Number of stored vectors, 0 on failure.
    pub fn vector_count(&self) -> usize {
        match self.store.stats() {
            Ok(stats) => stats.vector_count,
            Err(e) => {
                warn!(error = %e, "evidence stats failed; degrading to 0");
                0
            }
        }
    }

    fn put_record(&self, key: &str, record: &EvidenceRecord) -> bool {
        let metadata = match serde_json::to_value(record) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "evidence record serialization failed");
                return false;
            }
        };
        match self.store.store(key, &encode_features(record), metadata) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "evidence store failed; degrading to false");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use candor_contracts::error::{CandorError, CandorResult};

    use crate::store::{InMemoryEvidenceStore, StoreStats};
    use crate::vector::{truth_key, TaskPhase};

    use super::*;

    fn make_record(task: &str) -> EvidenceRecord {
        EvidenceRecord {
            task_id: task.to_string(),
            session_id: "session-1".to_string(),
            snapshot_id: "snap-1".to_string(),
            accuracy: 0.8,
            confidence: 0.9,
            passed: true,
            phase: TaskPhase::Complete,
            timestamp: 1_767_609_000_000,
        }
    }

    /// A store whose every operation fails, for degradation tests.
    struct BrokenStore;

    impl EvidenceStore for BrokenStore {
        fn store(&self, _: &str, _: &[f32], _: Value) -> CandorResult<()> {
            Err(CandorError::StoreError {
                reason: "connection refused".to_string(),
            })
        }
        fn get(&self, _: &str) -> CandorResult<Option<Value>> {
            Err(CandorError::StoreError {
                reason: "connection refused".to_string(),
            })
        }
        fn delete(&self, _: &str) -> CandorResult<bool> {
            Err(CandorError::StoreError {
                reason: "connection refused".to_string(),
            })
        }
        fn search(&self, _: &[f32], _: &SearchOptions) -> CandorResult<Vec<Value>> {
            Err(CandorError::StoreError {
                reason: "connection refused".to_string(),
            })
        }
        fn stats(&self) -> CandorResult<StoreStats> {
            Err(CandorError::StoreError {
                reason: "connection refused".to_string(),
            })
        }
    }

    /// The happy path stores, fetches, searches, and removes through the
    /// wrapper.
    #[test]
    fn archive_round_trip() {
        let archive = EvidenceArchive::new(InMemoryEvidenceStore::new());
        let record = make_record("task-1");

        assert!(archive.store_truth(&record));
        assert!(archive.store_snapshot(&record));
        assert_eq!(archive.vector_count(), 2);

        let fetched = archive.fetch(&truth_key("task-1")).expect("stored truth");
        assert_eq!(fetched["taskId"], json!("task-1"));
        assert_eq!(fetched["_type"], json!("truth"));

        let neighbors = archive.similar(&record, &SearchOptions::top(5));
        assert_eq!(neighbors.len(), 2);

        assert!(archive.remove(&truth_key("task-1")));
        assert_eq!(archive.vector_count(), 1);
    }

    /// Every operation degrades instead of erroring when the store is down.
    #[test]
    fn archive_degrades_on_store_failure() {
        let archive = EvidenceArchive::new(BrokenStore);
        let record = make_record("task-1");

        assert!(!archive.store_truth(&record));
        assert!(!archive.store_snapshot(&record));
        assert!(archive.fetch(&truth_key("task-1")).is_none());
        assert!(!archive.remove(&truth_key("task-1")));
        assert!(archive.similar(&record, &SearchOptions::top(5)).is_empty());
        assert_eq!(archive.vector_count(), 0);
    }
}
