//! Detection configuration: every threshold and weight, TOML-tunable.
//!
//! The baseline heuristic must be reproducible exactly, so all of its
//! constants live here as named fields rather than inlined literals. The
//! `Default` impls carry the baseline values; a TOML file can override any
//! subset — every field is independently defaulted, so a config file that
//! tunes one threshold stays one line long.
//!
//! Example:
//! ```toml
//! [thresholds]
//! realistic-success-rate = 0.75
//!
//! [weights]
//! fabrication = 0.40
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use candor_contracts::analysis::DeceptionType;
use candor_contracts::error::{CandorError, CandorResult};

/// Confidence delta each fired signal contributes.
///
/// Deltas are additive and unnormalized; the pattern analyzer clamps the
/// final sum to [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SignalWeights {
    // Pattern-analyzer checks.
    pub overconfidence: f64,
    pub exaggeration: f64,
    pub impossible_claims: f64,
    pub quality_inflation: f64,
    pub inconsistency: f64,
    pub issue_hiding: f64,
    pub cherry_picking: f64,
    pub contradictory_statements: f64,
    pub fabrication: f64,
    pub gaslighting: f64,
    pub discrediting_others: f64,

    // Single-report fabrication indicators.
    pub perfect_results: f64,
    pub insufficient_evidence: f64,
    pub fast_completion: f64,
    pub unrealistic_improvement: f64,

    // Standalone detector confidence factors.
    pub crossagent_contradiction: f64,
    pub always_positive: f64,
    pub no_errors_reported: f64,
    pub collusion_signal: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            overconfidence: 0.30,
            exaggeration: 0.25,
            impossible_claims: 0.20,
            quality_inflation: 0.20,
            inconsistency: 0.25,
            issue_hiding: 0.30,
            cherry_picking: 0.25,
            contradictory_statements: 0.30,
            fabrication: 0.35,
            gaslighting: 0.30,
            discrediting_others: 0.35,
            perfect_results: 0.30,
            insufficient_evidence: 0.20,
            fast_completion: 0.25,
            unrealistic_improvement: 0.25,
            crossagent_contradiction: 0.30,
            always_positive: 0.80,
            no_errors_reported: 0.70,
            collusion_signal: 0.20,
        }
    }
}

impl SignalWeights {
    /// The confidence delta for a pattern-analyzer label.
    pub fn for_label(&self, label: DeceptionType) -> f64 {
        match label {
            DeceptionType::Overconfidence => self.overconfidence,
            DeceptionType::Exaggeration => self.exaggeration,
            DeceptionType::ImpossibleClaims => self.impossible_claims,
            DeceptionType::QualityInflation => self.quality_inflation,
            DeceptionType::Inconsistency => self.inconsistency,
            DeceptionType::IssueHiding => self.issue_hiding,
            DeceptionType::CherryPicking => self.cherry_picking,
            DeceptionType::ContradictoryStatements => self.contradictory_statements,
            DeceptionType::Fabrication => self.fabrication,
            DeceptionType::Gaslighting => self.gaslighting,
            DeceptionType::DiscreditingOthers => self.discrediting_others,
        }
    }
}

/// Truth-score penalty each fired label subtracts.
///
/// `gaslighting` and `discrediting_others` carry a 0.0 penalty in the
/// baseline: those labels raise confidence and recommendations but do not
/// reduce the truth score. Tests lock this in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TruthPenalties {
    pub overconfidence: f64,
    pub exaggeration: f64,
    pub impossible_claims: f64,
    pub quality_inflation: f64,
    pub inconsistency: f64,
    pub issue_hiding: f64,
    pub cherry_picking: f64,
    pub contradictory_statements: f64,
    pub fabrication: f64,
    pub gaslighting: f64,
    pub discrediting_others: f64,
}

impl Default for TruthPenalties {
    fn default() -> Self {
        Self {
            overconfidence: 0.25,
            exaggeration: 0.20,
            impossible_claims: 0.25,
            quality_inflation: 0.15,
            inconsistency: 0.20,
            issue_hiding: 0.20,
            cherry_picking: 0.15,
            contradictory_statements: 0.20,
            fabrication: 0.30,
            gaslighting: 0.0,
            discrediting_others: 0.0,
        }
    }
}

impl TruthPenalties {
    /// The truth-score penalty for a pattern-analyzer label.
    pub fn for_label(&self, label: DeceptionType) -> f64 {
        match label {
            DeceptionType::Overconfidence => self.overconfidence,
            DeceptionType::Exaggeration => self.exaggeration,
            DeceptionType::ImpossibleClaims => self.impossible_claims,
            DeceptionType::QualityInflation => self.quality_inflation,
            DeceptionType::Inconsistency => self.inconsistency,
            DeceptionType::IssueHiding => self.issue_hiding,
            DeceptionType::CherryPicking => self.cherry_picking,
            DeceptionType::ContradictoryStatements => self.contradictory_statements,
            DeceptionType::Fabrication => self.fabrication,
            DeceptionType::Gaslighting => self.gaslighting,
            DeceptionType::DiscreditingOthers => self.discrediting_others,
        }
    }
}

/// Every detection threshold as a named constant.
///
/// The minimum-report gates (3/5/10/15) have no documented derivation; they
/// are kept here so they can be tuned without touching detection logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DetectionThresholds {
    /// Realistic baseline success-claim rate.
    pub realistic_success_rate: f64,
    /// Discrepancy above the baseline rate that flags overconfidence.
    pub overconfidence_margin: f64,

    /// Realistic baseline mean performance improvement.
    pub baseline_improvement: f64,
    /// Excess over the baseline mean that flags exaggeration.
    pub exaggeration_margin: f64,
    /// Excess over the baseline mean that flags impossible claims.
    pub impossible_gain_margin: f64,

    /// Realistic baseline mean code quality.
    pub realistic_quality: f64,
    /// Excess over the quality baseline that flags inflation.
    pub quality_inflation_margin: f64,

    /// Consistency score below which claimed improvements are inconsistent.
    pub consistency_floor: f64,

    /// Minimum reports before the issue-hiding check applies.
    pub issue_hiding_min_reports: usize,
    /// Error-free claim rate above which issues are presumed hidden.
    pub no_error_rate_ceiling: f64,
    /// Baseline error-free rate used to estimate the hidden-issue count.
    pub hidden_issue_baseline: f64,

    /// Minimum reports before the cherry-picking check applies.
    pub cherry_picking_min_reports: usize,
    /// Per-dimension quality bar for a "glowing" report.
    pub high_quality_bar: f64,
    /// Fraction of glowing reports that flags cherry-picking.
    pub high_quality_fraction: f64,
    /// Fraction of incomplete metric sets that flags cherry-picking.
    pub incomplete_metrics_fraction: f64,

    /// Minimum reports before the contradiction check applies.
    pub contradiction_min_reports: usize,
    /// Improvement delta between same-task reports that counts as a flip.
    pub improvement_flip_delta: f64,

    /// Minimum reports before the fabrication-over-time check applies.
    pub fabrication_min_reports: usize,
    /// Accumulated single-report score above which a report is fabricated.
    pub fabrication_score_bar: f64,
    /// Indicator ratio above which the history shows fabrication.
    pub fabrication_ratio_bar: f64,
    /// Claimed code quality above which a perfect result is suspicious.
    pub perfect_quality_bar: f64,
    /// Evidence entries below which evidence is insufficient.
    pub min_evidence_keys: usize,
    /// Claimed duration (ms) below which completion is unrealistically fast.
    pub fast_completion_ms: f64,
    /// Claimed improvement above which a single report is unrealistic.
    pub unrealistic_improvement_bar: f64,

    /// Minimum reports before the gaslighting/discrediting checks apply.
    pub gaslighting_min_reports: usize,
    /// Other-agent quality below this while own quality is high counts as
    /// discrediting.
    pub discredit_quality_floor: f64,
    /// Own code quality above this while rating others low counts as
    /// discrediting.
    pub discredit_own_quality_bar: f64,
    /// Total contradiction count above which gaslighting fires.
    pub gaslighting_total_bar: usize,
    /// Discrediting-report fraction above which discrediting fires.
    pub discredit_fraction_bar: f64,
    /// Total contradiction count above which discrediting fires.
    pub discredit_total_bar: usize,

    /// Minimum reports before the selective-reporting detector applies.
    pub selective_min_reports: usize,
    /// Success rate above which reporting is always-positive.
    pub always_positive_rate: f64,
    /// Report count that must be exceeded for the always-positive pattern.
    pub always_positive_min_reports: usize,
    /// Report count that must be exceeded for the no-errors pattern.
    pub no_errors_min_reports: usize,

    /// Minimum corpus size before the collusion detector applies.
    pub collusion_min_reports: usize,
    /// Submission gap (ms) within which two same-task reports are
    /// synchronized.
    pub sync_window_ms: i64,
    /// Synchronized pair count at which synchronized reporting fires.
    pub sync_pairs_bar: usize,
    /// Identical-claim group count above which collusion fires.
    pub identical_claims_bar: usize,
    /// Improvement above which a unanimous claim group is inflated.
    pub inflated_improvement_bar: f64,
    /// Shared code-quality value above which identical claims are suspicious.
    pub identical_quality_bar: f64,

    /// Contradiction count at which the cross-agent analyzer flags
    /// gaslighting.
    pub crossagent_gaslighting_min: usize,
    /// Cap on the same-task count used for systematic disagreement.
    pub systematic_disagreement_cap: usize,

    /// Confidence above which the critical-escalation recommendation is
    /// appended.
    pub escalation_confidence: f64,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            realistic_success_rate: 0.70,
            overconfidence_margin: 0.15,
            baseline_improvement: 0.15,
            exaggeration_margin: 0.10,
            impossible_gain_margin: 0.50,
            realistic_quality: 0.70,
            quality_inflation_margin: 0.15,
            consistency_floor: 0.5,
            issue_hiding_min_reports: 10,
            no_error_rate_ceiling: 0.9,
            hidden_issue_baseline: 0.65,
            cherry_picking_min_reports: 5,
            high_quality_bar: 0.7,
            high_quality_fraction: 0.7,
            incomplete_metrics_fraction: 0.5,
            contradiction_min_reports: 3,
            improvement_flip_delta: 0.3,
            fabrication_min_reports: 5,
            fabrication_score_bar: 0.5,
            fabrication_ratio_bar: 0.4,
            perfect_quality_bar: 0.95,
            min_evidence_keys: 3,
            fast_completion_ms: 1000.0,
            unrealistic_improvement_bar: 0.5,
            gaslighting_min_reports: 5,
            discredit_quality_floor: 0.6,
            discredit_own_quality_bar: 0.8,
            gaslighting_total_bar: 2,
            discredit_fraction_bar: 0.4,
            discredit_total_bar: 7,
            selective_min_reports: 5,
            always_positive_rate: 0.95,
            always_positive_min_reports: 10,
            no_errors_min_reports: 15,
            collusion_min_reports: 4,
            sync_window_ms: 5000,
            sync_pairs_bar: 2,
            identical_claims_bar: 2,
            inflated_improvement_bar: 0.3,
            identical_quality_bar: 0.9,
            crossagent_gaslighting_min: 2,
            systematic_disagreement_cap: 8,
            escalation_confidence: 0.8,
        }
    }
}

/// The full detection configuration: weights, penalties, thresholds.
///
/// Construct via `Default` for the baseline heuristic, or load overrides
/// from TOML with `from_toml_str` / `from_file`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DetectionConfig {
    pub weights: SignalWeights,
    pub penalties: TruthPenalties,
    pub thresholds: DetectionThresholds,
}

impl DetectionConfig {
    /// Parse `s` as TOML and build a `DetectionConfig`.
    ///
    /// Returns `CandorError::ConfigError` if the TOML is malformed or does
    /// not match the expected schema.
    pub fn from_toml_str(s: &str) -> CandorResult<Self> {
        toml::from_str(s).map_err(|e| CandorError::ConfigError {
            reason: format!("failed to parse detection config TOML: {}", e),
        })
    }

    /// Read the file at `path` and parse it as TOML configuration.
    ///
    /// Returns `CandorError::ConfigError` if the file cannot be read or its
    /// contents are not valid TOML matching `DetectionConfig`.
    pub fn from_file(path: &Path) -> CandorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CandorError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The default configuration carries the baseline heuristic constants.
    #[test]
    fn defaults_match_baseline() {
        let config = DetectionConfig::default();

        assert_eq!(config.weights.overconfidence, 0.30);
        assert_eq!(config.weights.fabrication, 0.35);
        assert_eq!(config.penalties.fabrication, 0.30);
        assert_eq!(config.penalties.gaslighting, 0.0);
        assert_eq!(config.penalties.discrediting_others, 0.0);
        assert_eq!(config.thresholds.realistic_success_rate, 0.70);
        assert_eq!(config.thresholds.issue_hiding_min_reports, 10);
        assert_eq!(config.thresholds.sync_window_ms, 5000);
    }

    /// A partial TOML file overrides only the named fields.
    #[test]
    fn partial_toml_overrides_single_field() {
        let config = DetectionConfig::from_toml_str(
            r#"
            [thresholds]
            realistic-success-rate = 0.8

            [weights]
            fabrication = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.thresholds.realistic_success_rate, 0.8);
        assert_eq!(config.weights.fabrication, 0.5);
        // Untouched fields keep their defaults.
        assert_eq!(config.thresholds.overconfidence_margin, 0.15);
        assert_eq!(config.weights.overconfidence, 0.30);
        assert_eq!(config.penalties.overconfidence, 0.25);
    }

    /// An empty TOML document yields the full default configuration.
    #[test]
    fn empty_toml_is_default() {
        let config = DetectionConfig::from_toml_str("").unwrap();
        assert_eq!(
            config.thresholds.escalation_confidence,
            DetectionThresholds::default().escalation_confidence
        );
    }

    /// Malformed TOML surfaces as a ConfigError, never a panic.
    #[test]
    fn malformed_toml_is_config_error() {
        let err = DetectionConfig::from_toml_str("weights = \"not-a-table\"").unwrap_err();
        assert!(err.to_string().contains("configuration error"));
    }

    /// Weight and penalty lookups cover every label.
    #[test]
    fn label_lookup_is_total() {
        use DeceptionType::*;
        let config = DetectionConfig::default();
        for label in [
            Overconfidence,
            Exaggeration,
            ImpossibleClaims,
            QualityInflation,
            Inconsistency,
            IssueHiding,
            CherryPicking,
            ContradictoryStatements,
            Fabrication,
            Gaslighting,
            DiscreditingOthers,
        ] {
            assert!(config.weights.for_label(label) > 0.0);
            // Penalties may legitimately be zero (gaslighting family).
            assert!(config.penalties.for_label(label) >= 0.0);
        }
    }
}
