//! Agent self-report types.
//!
//! A `Report` is one agent's claim about one task outcome, supplied by the
//! orchestration platform and immutable once created. Reports arrive as JSON
//! with camelCase field names; every field decodes with a safe default so the
//! analyzers can run over noisy real-world report logs without erroring.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One agent's self-description of a task outcome.
///
/// Many reports may share a `task_id` (multiple agents reporting on the same
/// task) — that overlap is the basis for cross-agent and collusion analysis.
/// `agent_id` is immutable: a report belongs to exactly one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Opaque identifier, unique per report.
    pub id: String,

    /// The reporting agent.
    pub agent_id: String,

    /// The task this report concerns.
    pub task_id: String,

    /// The structured claim the agent makes about the outcome.
    #[serde(default)]
    pub claimed_outcome: ClaimedOutcome,

    /// Free-form supporting data. May be sparse or empty — absence of
    /// evidence is itself a signal. Structurally significant keys the
    /// analyzers read: `duration` (ms), `otherAgentQuality` (0..1).
    #[serde(default)]
    pub evidence: Map<String, Value>,

    /// Submission time, epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,

    /// Conflict descriptions already attached by upstream verification steps.
    #[serde(default)]
    pub conflicts: Vec<String>,

    /// Set by an external verifier; never mutated by this subsystem.
    #[serde(default)]
    pub verified: bool,
}

impl Report {
    /// Read a numeric evidence field, tolerating absent or non-numeric values.
    pub fn evidence_number(&self, key: &str) -> Option<f64> {
        self.evidence.get(key).and_then(Value::as_f64)
    }
}

/// The structured outcome claim inside a `Report`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimedOutcome {
    /// The agent claims the task succeeded.
    #[serde(default)]
    pub success: bool,

    /// The agent claims all tests passed.
    #[serde(default)]
    pub tests_pass: bool,

    /// The agent claims the run produced no errors.
    #[serde(default)]
    pub no_errors: bool,

    /// Claimed performance outcome.
    #[serde(default)]
    pub performance: Performance,

    /// Claimed quality assessment.
    #[serde(default)]
    pub quality: Quality,
}

/// Claimed performance figures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    /// Fractional improvement claim (0.35 = 35%).
    #[serde(default)]
    pub improvement: f64,

    /// Named measurements backing the claim. Reporting only 1–3 metrics is
    /// treated as incomplete by the cherry-picking check.
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

/// Claimed quality assessment, each dimension in [0, 1].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quality {
    #[serde(default)]
    pub code_quality: f64,
    #[serde(default)]
    pub documentation: f64,
    #[serde(default)]
    pub maintainability: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// A sparse report decodes with safe defaults: missing numerics become 0,
    /// missing booleans become false, missing collections become empty.
    #[test]
    fn sparse_report_decodes_with_defaults() {
        let report: Report = serde_json::from_value(json!({
            "id": "r-1",
            "agentId": "agent-a",
            "taskId": "task-1"
        }))
        .unwrap();

        assert!(!report.claimed_outcome.success);
        assert!(!report.claimed_outcome.tests_pass);
        assert!(!report.claimed_outcome.no_errors);
        assert_eq!(report.claimed_outcome.performance.improvement, 0.0);
        assert!(report.claimed_outcome.performance.metrics.is_empty());
        assert_eq!(report.claimed_outcome.quality.code_quality, 0.0);
        assert!(report.evidence.is_empty());
        assert_eq!(report.timestamp, 0);
        assert!(report.conflicts.is_empty());
        assert!(!report.verified);
    }

    /// Field names on the wire are camelCase.
    #[test]
    fn report_serializes_camel_case() {
        let report: Report = serde_json::from_value(json!({
            "id": "r-2",
            "agentId": "agent-b",
            "taskId": "task-2",
            "claimedOutcome": {
                "success": true,
                "testsPass": true,
                "noErrors": false,
                "performance": { "improvement": 0.2, "metrics": { "latency": 12.0 } },
                "quality": { "codeQuality": 0.8, "documentation": 0.5, "maintainability": 0.6 }
            }
        }))
        .unwrap();

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["agentId"], "agent-b");
        assert_eq!(value["claimedOutcome"]["testsPass"], true);
        assert_eq!(value["claimedOutcome"]["quality"]["codeQuality"], 0.8);
    }

    /// `evidence_number` tolerates absent and non-numeric values.
    #[test]
    fn evidence_number_reads_numerics_only() {
        let report: Report = serde_json::from_value(json!({
            "id": "r-3",
            "agentId": "agent-c",
            "taskId": "task-3",
            "evidence": { "duration": 450, "note": "fast run" }
        }))
        .unwrap();

        assert_eq!(report.evidence_number("duration"), Some(450.0));
        assert_eq!(report.evidence_number("note"), None);
        assert_eq!(report.evidence_number("missing"), None);
    }
}
