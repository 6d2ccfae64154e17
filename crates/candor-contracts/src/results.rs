//! Result contracts for the standalone detectors and the risk aggregator.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::analysis::DeceptionType;

/// Outcome of the single-report fabrication analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FabricationResult {
    /// True when the accumulated indicator score exceeds the fabrication bar.
    pub is_fabricated: bool,
    /// Accumulated indicator score, clamped to [0, 1].
    pub confidence: f64,
    /// Labels of every indicator that fired, in check order.
    pub indicators: Vec<String>,
}

/// Outcome of the cross-agent contradiction analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaslightingResult {
    /// True when the report contradicts other agents' same-task claims at
    /// least twice.
    pub is_gaslighting: bool,
    /// Scales with the contradiction count, clamped to [0, 1].
    pub confidence: f64,
    /// Textual description of each recorded contradiction.
    pub contradictions: Vec<String>,
    /// Total contradictions recorded against other agents' reports.
    pub contradictions_with_other_agents: usize,
    /// True when the agent contradicts essentially every same-task report.
    pub systematic_disagreement: bool,
}

/// Outcome of the selective-reporting detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectiveReportResult {
    /// True when a selective-reporting pattern fired.
    pub is_selective: bool,
    /// Fixed confidence of the fired pattern, 0.0 when none fired.
    pub confidence: f64,
    /// Diagnostics: the fired pattern name and the observed rate.
    pub evidence: Map<String, Value>,
}

/// Outcome of the corpus-wide collusion detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollusionResult {
    /// True when identical-claim or synchronized-submission signals fired.
    pub is_collusion: bool,
    /// Scales with the total signal count, clamped to [0, 1].
    pub confidence: f64,
    /// Diagnostic breakdown of the fired signals.
    pub evidence: CollusionEvidence,
}

/// Diagnostic breakdown carried by a `CollusionResult`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollusionEvidence {
    /// Multiple same-task report groups were submitted near-simultaneously.
    pub synchronized_reporting: bool,
    /// Number of task groups whose members made suspiciously identical claims.
    pub identical_false_claims: usize,
}

/// Bucketed summary of an agent's longitudinal deception risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Outcome of the risk aggregator for one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResult {
    /// Rolling risk score in [0, 1], 0.0 for an agent with no history.
    pub risk_score: f64,
    /// Bucketed view of `risk_score`.
    pub risk_level: RiskLevel,
    /// Unique labels across the agent's most recent analyses, in
    /// first-occurrence order.
    pub recent_patterns: Vec<DeceptionType>,
}
