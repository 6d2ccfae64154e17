//! Single-report fabrication analyzer.
//!
//! Examines one report in isolation for implausibility signals. Four
//! indicator checks each append a label and add a fixed score delta; the
//! deltas are additive, not normalized per-check. A report is fabricated
//! only when the accumulated score strictly exceeds the fabrication bar —
//! a score of exactly 0.5 does not trigger.

use tracing::debug;

use candor_contracts::report::Report;
use candor_contracts::results::FabricationResult;

use crate::config::DetectionConfig;

/// Number of indicator checks the analyzer runs per report.
///
/// The pattern analyzer's fabrication-over-time ratio divides by this.
pub const INDICATOR_CHECKS: usize = 4;

/// All tests green, success claimed, and near-perfect self-assessed quality.
pub(crate) fn is_suspiciously_perfect(report: &Report, config: &DetectionConfig) -> bool {
    let outcome = &report.claimed_outcome;
    outcome.tests_pass
        && outcome.no_errors
        && outcome.success
        && outcome.quality.code_quality > config.thresholds.perfect_quality_bar
}

/// The evidence map is missing or carries fewer entries than the minimum.
pub(crate) fn has_insufficient_evidence(report: &Report, config: &DetectionConfig) -> bool {
    report.evidence.len() < config.thresholds.min_evidence_keys
}

/// A claimed duration below the plausible completion floor.
pub(crate) fn is_unrealistically_fast(report: &Report, config: &DetectionConfig) -> bool {
    match report.evidence_number("duration") {
        Some(duration) => duration < config.thresholds.fast_completion_ms,
        None => false,
    }
}

/// A claimed performance improvement beyond the plausible single-task range.
pub(crate) fn has_unrealistic_improvement(report: &Report, config: &DetectionConfig) -> bool {
    report.claimed_outcome.performance.improvement > config.thresholds.unrealistic_improvement_bar
}

/// Count how many of the four indicators fire, one point each, unweighted.
///
/// Used by the pattern analyzer's fabrication-over-time ratio.
pub(crate) fn indicator_count(report: &Report, config: &DetectionConfig) -> usize {
    [
        is_suspiciously_perfect(report, config),
        has_insufficient_evidence(report, config),
        is_unrealistically_fast(report, config),
        has_unrealistic_improvement(report, config),
    ]
    .iter()
    .filter(|fired| **fired)
    .count()
}

/// Analyze a single report for fabrication signals.
///
/// Each fired indicator appends its label and adds its configured score
/// delta. `is_fabricated` requires the accumulated score to strictly exceed
/// `fabrication_score_bar`; `confidence` is the score clamped to 1.0.
pub fn detect_fabrication(report: &Report, config: &DetectionConfig) -> FabricationResult {
    let weights = &config.weights;
    let mut score = 0.0;
    let mut indicators = Vec::new();

    if is_suspiciously_perfect(report, config) {
        indicators.push("suspiciously-perfect-results".to_string());
        score += weights.perfect_results;
    }

    if has_insufficient_evidence(report, config) {
        indicators.push("insufficient-evidence".to_string());
        score += weights.insufficient_evidence;
    }

    if is_unrealistically_fast(report, config) {
        indicators.push("unrealistically-fast-completion".to_string());
        score += weights.fast_completion;
    }

    if has_unrealistic_improvement(report, config) {
        indicators.push("unrealistic-performance-improvement".to_string());
        score += weights.unrealistic_improvement;
    }

    let is_fabricated = score > config.thresholds.fabrication_score_bar;

    debug!(
        report_id = %report.id,
        agent_id = %report.agent_id,
        score,
        is_fabricated,
        indicator_count = indicators.len(),
        "fabrication analysis complete"
    );

    FabricationResult {
        is_fabricated,
        confidence: score.min(1.0),
        indicators,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn make_report(value: serde_json::Value) -> Report {
        serde_json::from_value(value).unwrap()
    }

    /// Perfect results plus missing evidence lands exactly on the 0.5
    /// boundary, which must NOT count as fabricated — the bar is strict.
    #[test]
    fn exact_boundary_score_is_not_fabricated() {
        let report = make_report(json!({
            "id": "r-boundary",
            "agentId": "agent-a",
            "taskId": "task-1",
            "claimedOutcome": {
                "success": true,
                "testsPass": true,
                "noErrors": true,
                "quality": { "codeQuality": 0.99, "documentation": 0.9, "maintainability": 0.9 }
            }
        }));

        let result = detect_fabrication(&report, &DetectionConfig::default());

        assert_eq!(
            result.indicators,
            vec!["suspiciously-perfect-results", "insufficient-evidence"]
        );
        assert_eq!(result.confidence, 0.5);
        assert!(!result.is_fabricated, "score of exactly 0.5 must not trigger");
    }

    /// Three fired indicators push the score past the bar.
    #[test]
    fn three_indicators_trigger_fabrication() {
        let report = make_report(json!({
            "id": "r-fab",
            "agentId": "agent-a",
            "taskId": "task-1",
            "claimedOutcome": {
                "success": true,
                "testsPass": true,
                "noErrors": true,
                "performance": { "improvement": 0.8 },
                "quality": { "codeQuality": 0.99 }
            },
            "evidence": { "duration": 400 }
        }));

        let result = detect_fabrication(&report, &DetectionConfig::default());

        // perfect 0.30 + insufficient 0.20 + fast 0.25 + improvement 0.25
        assert!(result.is_fabricated);
        assert_eq!(result.confidence, 1.0, "confidence clamps at 1.0");
        assert_eq!(result.indicators.len(), 4);
    }

    /// A modest report with ample evidence fires nothing.
    #[test]
    fn plausible_report_is_clean() {
        let report = make_report(json!({
            "id": "r-clean",
            "agentId": "agent-a",
            "taskId": "task-1",
            "claimedOutcome": {
                "success": true,
                "testsPass": true,
                "noErrors": false,
                "performance": { "improvement": 0.1 },
                "quality": { "codeQuality": 0.7 }
            },
            "evidence": { "duration": 45000, "testsRun": 120, "logLines": 2400 }
        }));

        let result = detect_fabrication(&report, &DetectionConfig::default());

        assert!(!result.is_fabricated);
        assert_eq!(result.confidence, 0.0);
        assert!(result.indicators.is_empty());
    }

    /// A duration at the floor is not "unrealistically fast" — the check is
    /// strictly below the floor.
    #[test]
    fn duration_at_floor_does_not_fire() {
        let report = make_report(json!({
            "id": "r-floor",
            "agentId": "agent-a",
            "taskId": "task-1",
            "evidence": { "duration": 1000, "testsRun": 5, "logLines": 10 }
        }));

        let result = detect_fabrication(&report, &DetectionConfig::default());
        assert!(result.indicators.is_empty());
    }

    /// A missing duration key cannot fire the fast-completion indicator.
    #[test]
    fn missing_duration_does_not_fire() {
        let report = make_report(json!({
            "id": "r-nodur",
            "agentId": "agent-a",
            "taskId": "task-1",
            "evidence": { "testsRun": 5, "logLines": 10, "summary": "ok" }
        }));

        let result = detect_fabrication(&report, &DetectionConfig::default());
        assert!(!result
            .indicators
            .iter()
            .any(|i| i == "unrealistically-fast-completion"));
    }

    /// The unweighted indicator count matches the weighted analyzer's fired set.
    #[test]
    fn indicator_count_matches_fired_indicators() {
        let report = make_report(json!({
            "id": "r-count",
            "agentId": "agent-a",
            "taskId": "task-1",
            "claimedOutcome": { "performance": { "improvement": 0.9 } }
        }));

        let config = DetectionConfig::default();
        let result = detect_fabrication(&report, &config);
        assert_eq!(indicator_count(&report, &config), result.indicators.len());
    }
}
