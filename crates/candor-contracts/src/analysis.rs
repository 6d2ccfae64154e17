//! Deception analysis output types.
//!
//! A `DeceptionAnalysis` is the immutable record one pattern-analysis call
//! produces: a calibrated truth score, the set of deception labels that
//! fired, the diagnostic evidence for each, and deterministic remediation
//! recommendations.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unique identifier stamped on every produced analysis.
///
/// Appears in the per-agent history, the evidence ledger, and any exported
/// audit record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisId(pub uuid::Uuid);

impl AnalysisId {
    /// Create a new, unique analysis ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::new()
    }
}

/// The closed taxonomy of deception patterns.
///
/// Wire strings are fixed for compatibility with stored analyses — the
/// taxonomy mixes hyphenated and underscored labels and that spelling is
/// load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeceptionType {
    /// Success-claim rate far above the realistic baseline.
    #[serde(rename = "overconfidence")]
    Overconfidence,

    /// Mean claimed performance improvement well above baseline.
    #[serde(rename = "exaggeration")]
    Exaggeration,

    /// Claimed performance gains beyond the plausible range.
    #[serde(rename = "impossible_claims")]
    ImpossibleClaims,

    /// Self-assessed quality consistently above the realistic baseline.
    #[serde(rename = "quality-inflation")]
    QualityInflation,

    /// High variance in claimed improvements across tasks.
    #[serde(rename = "inconsistency")]
    Inconsistency,

    /// Error-free claims at a rate implying suppressed issues.
    #[serde(rename = "issue_hiding")]
    IssueHiding,

    /// Uniformly glowing reports backed by incomplete metric sets.
    #[serde(rename = "cherry_picking")]
    CherryPicking,

    /// Claims about the same task that flip over time.
    #[serde(rename = "contradictory_statements")]
    ContradictoryStatements,

    /// Recurring implausibility indicators across the report history.
    #[serde(rename = "fabrication")]
    Fabrication,

    /// Disparaging other agents' work while inflating one's own.
    #[serde(rename = "gaslighting")]
    Gaslighting,

    /// Systematic disagreement with or discrediting of peer agents.
    #[serde(rename = "discrediting_others")]
    DiscreditingOthers,
}

impl DeceptionType {
    /// The exact wire label for this pattern.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overconfidence => "overconfidence",
            Self::Exaggeration => "exaggeration",
            Self::ImpossibleClaims => "impossible_claims",
            Self::QualityInflation => "quality-inflation",
            Self::Inconsistency => "inconsistency",
            Self::IssueHiding => "issue_hiding",
            Self::CherryPicking => "cherry_picking",
            Self::ContradictoryStatements => "contradictory_statements",
            Self::Fabrication => "fabrication",
            Self::Gaslighting => "gaslighting",
            Self::DiscreditingOthers => "discrediting_others",
        }
    }
}

impl fmt::Display for DeceptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The immutable result of analyzing one agent's report history.
///
/// Invariants (enforced by the pattern analyzer):
/// - `truth_score` and `confidence` are clamped to [0, 1].
/// - `deception_types` is duplicate-free; insertion order is detection order.
/// - `truth_score` is derived solely from `deception_types` membership,
///   never directly from `confidence`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeceptionAnalysis {
    /// Unique identifier for this analysis record.
    pub analysis_id: AnalysisId,

    /// The agent whose reports were analyzed.
    pub agent_id: String,

    /// Set when the analysis originated from a single-report call.
    pub report_id: Option<String>,

    /// Aggregate trust estimate: 1.0 = fully trustworthy.
    pub truth_score: f64,

    /// True when at least one deception check fired.
    pub deception_detected: bool,

    /// Labels of every fired check, in detection order.
    pub deception_types: Vec<DeceptionType>,

    /// Strength of evidence that deception was correctly detected.
    pub confidence: f64,

    /// Named diagnostic values recording why each label fired
    /// (discrepancy magnitudes, counts, flags).
    pub evidence: Map<String, Value>,

    /// Human-readable remediation steps, deterministic given the fired
    /// label set and confidence.
    pub recommendations: Vec<String>,

    /// Wall-clock time (UTC) the analysis was produced.
    pub analyzed_at: DateTime<Utc>,
}

impl DeceptionAnalysis {
    /// The neutral analysis for an agent with zero reports: fully trusted,
    /// nothing detected, no evidence, no recommendations.
    pub fn neutral(agent_id: impl Into<String>) -> Self {
        Self {
            analysis_id: AnalysisId::new(),
            agent_id: agent_id.into(),
            report_id: None,
            truth_score: 1.0,
            deception_detected: false,
            deception_types: Vec::new(),
            confidence: 0.0,
            evidence: Map::new(),
            recommendations: Vec::new(),
            analyzed_at: Utc::now(),
        }
    }
}
