//! Per-agent analysis history.
//!
//! `AnalysisStore` is the one piece of shared mutable state in the
//! subsystem: a process-wide map from agent ID to the ordered list of
//! analyses produced for that agent. It is injected into the engine and the
//! risk aggregator rather than living as a global — lifecycle belongs to
//! the caller.
//!
//! Append order is chronological order. The store grows unbounded for the
//! lifetime of the process; no eviction policy is defined.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use candor_contracts::analysis::DeceptionAnalysis;

/// A cloneable handle to the shared per-agent history.
///
/// # Thread safety
///
/// All operations acquire an internal `Mutex`, which serializes appends for
/// the same agent — two concurrent analyses over overlapping report sets
/// cannot lose updates. Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct AnalysisStore {
    inner: Arc<Mutex<HashMap<String, Vec<DeceptionAnalysis>>>>,
}

impl AnalysisStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one analysis to its agent's history.
    pub fn append(&self, analysis: DeceptionAnalysis) {
        let mut map = self.inner.lock().expect("history lock poisoned");
        debug!(
            agent_id = %analysis.agent_id,
            deception_detected = analysis.deception_detected,
            truth_score = analysis.truth_score,
            "analysis appended to history"
        );
        map.entry(analysis.agent_id.clone()).or_default().push(analysis);
    }

    /// All analyses stored for `agent_id`, in append order.
    ///
    /// Returns an owned copy so callers never hold the lock.
    pub fn for_agent(&self, agent_id: &str) -> Vec<DeceptionAnalysis> {
        let map = self.inner.lock().expect("history lock poisoned");
        map.get(agent_id).cloned().unwrap_or_default()
    }

    /// Number of agents with at least one stored analysis.
    pub fn agent_count(&self) -> usize {
        let map = self.inner.lock().expect("history lock poisoned");
        map.len()
    }
}

#[cfg(test)]
mod tests {
    use candor_contracts::analysis::DeceptionAnalysis;

    use super::*;

    fn make_analysis(agent: &str, truth_score: f64) -> DeceptionAnalysis {
        let mut analysis = DeceptionAnalysis::neutral(agent);
        analysis.truth_score = truth_score;
        analysis
    }

    /// Appends for one agent preserve order.
    #[test]
    fn appends_preserve_order() {
        let store = AnalysisStore::new();
        store.append(make_analysis("agent-a", 0.9));
        store.append(make_analysis("agent-a", 0.5));
        store.append(make_analysis("agent-a", 0.1));

        let history = store.for_agent("agent-a");
        let scores: Vec<f64> = history.iter().map(|a| a.truth_score).collect();
        assert_eq!(scores, vec![0.9, 0.5, 0.1]);
    }

    /// Agents are tracked independently.
    #[test]
    fn agents_are_independent() {
        let store = AnalysisStore::new();
        store.append(make_analysis("agent-a", 1.0));
        store.append(make_analysis("agent-b", 1.0));
        store.append(make_analysis("agent-b", 0.5));

        assert_eq!(store.for_agent("agent-a").len(), 1);
        assert_eq!(store.for_agent("agent-b").len(), 2);
        assert_eq!(store.agent_count(), 2);
        assert!(store.for_agent("agent-c").is_empty());
    }

    /// Clones share the same underlying history.
    #[test]
    fn clones_share_state() {
        let store = AnalysisStore::new();
        let clone = store.clone();

        clone.append(make_analysis("agent-a", 0.7));
        assert_eq!(store.for_agent("agent-a").len(), 1);
    }

    /// Concurrent appends for the same agent are all retained.
    #[test]
    fn concurrent_appends_are_not_lost() {
        let store = AnalysisStore::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        store.append(make_analysis("agent-a", 1.0));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.for_agent("agent-a").len(), 400);
    }
}
