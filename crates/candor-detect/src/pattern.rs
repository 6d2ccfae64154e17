//! The pattern analyzer: folds the rule table into one `DeceptionAnalysis`.
//!
//! Runs every check in `PATTERN_CHECKS` against the full report history of
//! one agent. Each fired check appends its label (detection order, no
//! duplicates — a check contributes its label at most once), merges its
//! evidence fields, and adds its confidence delta. The truth score starts at
//! 1.0 and subtracts each fired label's penalty; both scores are clamped to
//! [0, 1]. An empty history short-circuits to the neutral analysis without
//! invoking any check.

use serde_json::Map;
use tracing::{debug, warn};

use candor_contracts::analysis::{DeceptionAnalysis, DeceptionType};
use candor_contracts::report::Report;

use crate::config::DetectionConfig;
use crate::rules::PATTERN_CHECKS;

/// Appended to the recommendation list when confidence crosses the
/// escalation bar.
const CRITICAL_ESCALATION: &str = "CRITICAL: deception confidence is high; \
     route this agent's reports to a human operator before trusting further claims";

/// The fixed remediation template for one fired label.
fn recommendation_for(label: DeceptionType) -> &'static str {
    match label {
        DeceptionType::Overconfidence => {
            "Require independent verification of success claims before accepting reported outcomes"
        }
        DeceptionType::Exaggeration => {
            "Re-measure reported performance improvements against a neutral benchmark"
        }
        DeceptionType::ImpossibleClaims => {
            "Reject performance gains above the plausible range until independently reproduced"
        }
        DeceptionType::QualityInflation => {
            "Sample reported artifacts for independent quality review"
        }
        DeceptionType::Inconsistency => {
            "Investigate the variance in reported performance across this agent's tasks"
        }
        DeceptionType::IssueHiding => {
            "Audit recent task logs for suppressed errors and warnings"
        }
        DeceptionType::CherryPicking => {
            "Require complete metric sets in every report from this agent"
        }
        DeceptionType::ContradictoryStatements => {
            "Reconcile contradictory reports submitted for the same task"
        }
        DeceptionType::Fabrication => {
            "Quarantine this agent's reports until claims are re-verified from raw evidence"
        }
        DeceptionType::Gaslighting => {
            "Cross-check this agent's accounts of other agents' work against neutral records"
        }
        DeceptionType::DiscreditingOthers => {
            "Review this agent's assessments of peer agents for systematic bias"
        }
    }
}

/// Analyze one agent's report history for deception patterns.
///
/// Pure with respect to the inputs: repeated calls over the same report list
/// produce identical label sets, scores, evidence, and recommendations.
/// History persistence is the caller's concern (see `DeceptionEngine`).
pub fn analyze_pattern(
    agent_id: &str,
    reports: &[Report],
    config: &DetectionConfig,
) -> DeceptionAnalysis {
    if reports.is_empty() {
        debug!(agent_id, "no reports to analyze; returning neutral analysis");
        return DeceptionAnalysis::neutral(agent_id);
    }

    debug!(agent_id, report_count = reports.len(), "pattern analysis starting");

    let mut analysis = DeceptionAnalysis::neutral(agent_id);
    let mut confidence = 0.0;
    let mut penalty_total = 0.0;
    let mut evidence = Map::new();

    for check in PATTERN_CHECKS {
        let Some(signal) = check(reports, config) else {
            continue;
        };

        warn!(
            agent_id,
            label = %signal.label,
            confidence_delta = signal.confidence_delta,
            "deception signal fired"
        );

        analysis.deception_types.push(signal.label);
        confidence += signal.confidence_delta;
        penalty_total += signal.truth_penalty;
        for (key, value) in signal.evidence {
            evidence.insert(key.to_string(), value);
        }
    }

    analysis.deception_detected = !analysis.deception_types.is_empty();
    analysis.confidence = confidence.min(1.0);
    analysis.truth_score = (1.0 - penalty_total).clamp(0.0, 1.0);
    analysis.evidence = evidence;

    analysis.recommendations = analysis
        .deception_types
        .iter()
        .map(|label| recommendation_for(*label).to_string())
        .collect();
    if analysis.confidence > config.thresholds.escalation_confidence {
        analysis.recommendations.push(CRITICAL_ESCALATION.to_string());
    }

    debug!(
        agent_id,
        truth_score = analysis.truth_score,
        confidence = analysis.confidence,
        fired = analysis.deception_types.len(),
        "pattern analysis complete"
    );

    analysis
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use candor_contracts::analysis::DeceptionType;
    use candor_contracts::report::Report;

    use super::*;

    fn make_report(id: usize, value: serde_json::Value) -> Report {
        let mut object = value;
        object["id"] = json!(format!("r-{id}"));
        if object.get("agentId").is_none() {
            object["agentId"] = json!("agent-a");
        }
        if object.get("taskId").is_none() {
            object["taskId"] = json!(format!("task-{id}"));
        }
        serde_json::from_value(object).unwrap()
    }

    /// A report history designed to fire many checks at once.
    fn implausible_history(count: usize) -> Vec<Report> {
        (0..count)
            .map(|i| {
                make_report(
                    i,
                    json!({
                        "claimedOutcome": {
                            "success": true,
                            "testsPass": true,
                            "noErrors": true,
                            "performance": { "improvement": 0.9, "metrics": { "speedup": 9.0 } },
                            "quality": { "codeQuality": 0.99, "documentation": 0.95, "maintainability": 0.97 }
                        }
                    }),
                )
            })
            .collect()
    }

    /// Zero reports produce the neutral analysis without firing anything.
    #[test]
    fn empty_history_is_neutral() {
        let analysis = analyze_pattern("agent-a", &[], &DetectionConfig::default());

        assert_eq!(analysis.truth_score, 1.0);
        assert!(!analysis.deception_detected);
        assert_eq!(analysis.confidence, 0.0);
        assert!(analysis.deception_types.is_empty());
        assert!(analysis.evidence.is_empty());
        assert!(analysis.recommendations.is_empty());
    }

    /// Clamping holds even when many checks fire: confidence caps at 1.0 and
    /// the truth score floors at 0.0.
    #[test]
    fn scores_stay_clamped_under_many_signals() {
        let analysis =
            analyze_pattern("agent-a", &implausible_history(12), &DetectionConfig::default());

        assert!(analysis.deception_detected);
        assert!(analysis.deception_types.len() >= 5);
        assert_eq!(analysis.confidence, 1.0);
        assert!((0.0..=1.0).contains(&analysis.truth_score));
    }

    /// Labels appear in detection order with no duplicates.
    #[test]
    fn labels_follow_detection_order() {
        let analysis =
            analyze_pattern("agent-a", &implausible_history(12), &DetectionConfig::default());

        let expected_prefix = [
            DeceptionType::Overconfidence,
            DeceptionType::Exaggeration,
            DeceptionType::ImpossibleClaims,
            DeceptionType::QualityInflation,
        ];
        assert_eq!(&analysis.deception_types[..4], &expected_prefix);

        let mut seen = std::collections::HashSet::new();
        for label in &analysis.deception_types {
            assert!(seen.insert(*label), "duplicate label {label}");
        }
    }

    /// Identical inputs produce identical label sets and scores.
    #[test]
    fn analysis_is_idempotent() {
        let reports = implausible_history(10);
        let config = DetectionConfig::default();

        let first = analyze_pattern("agent-a", &reports, &config);
        let second = analyze_pattern("agent-a", &reports, &config);

        assert_eq!(first.deception_types, second.deception_types);
        assert_eq!(first.truth_score, second.truth_score);
        assert_eq!(first.confidence, second.confidence);
        assert_eq!(first.evidence, second.evidence);
        assert_eq!(first.recommendations, second.recommendations);
    }

    /// One recommendation per fired label, plus the escalation entry once
    /// confidence crosses the bar.
    #[test]
    fn recommendations_track_fired_labels() {
        let analysis =
            analyze_pattern("agent-a", &implausible_history(12), &DetectionConfig::default());

        assert_eq!(
            analysis.recommendations.len(),
            analysis.deception_types.len() + 1,
            "high confidence must append the escalation recommendation"
        );
        assert!(analysis
            .recommendations
            .last()
            .unwrap()
            .starts_with("CRITICAL"));
    }

    /// A single overconfident-only history stays below the escalation bar
    /// and reduces the truth score by exactly that label's penalty.
    #[test]
    fn single_signal_applies_single_penalty() {
        // All succeed, nothing else suspicious: low improvement, modest
        // quality, ample evidence, errors admitted.
        let reports: Vec<Report> = (0..8)
            .map(|i| {
                make_report(
                    i,
                    json!({
                        "claimedOutcome": {
                            "success": true,
                            "noErrors": false,
                            "performance": { "improvement": 0.1, "metrics": { "a": 1.0, "b": 2.0, "c": 3.0, "d": 4.0 } },
                            "quality": { "codeQuality": 0.7 }
                        },
                        "evidence": { "duration": 60000, "testsRun": 40, "logLines": 900 }
                    }),
                )
            })
            .collect();

        let analysis = analyze_pattern("agent-a", &reports, &DetectionConfig::default());

        assert_eq!(analysis.deception_types, vec![DeceptionType::Overconfidence]);
        assert!((analysis.truth_score - 0.75).abs() < 1e-9);
        assert!((analysis.confidence - 0.30).abs() < 1e-9);
        assert_eq!(analysis.recommendations.len(), 1);
        assert!(analysis.evidence.contains_key("successRateDiscrepancy"));
    }

    /// The truth score is driven by label membership, not confidence:
    /// gaslighting-family labels carry no penalty in the baseline.
    #[test]
    fn gaslighting_labels_do_not_reduce_truth_score() {
        // Five reports that only trigger the gaslighting/discrediting pair:
        // modest claims, rich evidence, but a heavy upstream conflict load
        // (eight attached conflicts exceed both the gaslighting bar of 2 and
        // the discrediting bar of 7).
        let reports: Vec<Report> = (0..5)
            .map(|i| {
                let conflicts: Vec<String> = if i < 4 {
                    vec![format!("conflict-{i}-a"), format!("conflict-{i}-b")]
                } else {
                    Vec::new()
                };
                make_report(
                    i,
                    json!({
                        "claimedOutcome": {
                            "success": i % 2 == 0,
                            "noErrors": false,
                            "performance": { "improvement": 0.1, "metrics": { "a": 1.0, "b": 2.0, "c": 3.0, "d": 4.0 } },
                            "quality": { "codeQuality": 0.7 }
                        },
                        "evidence": { "duration": 30000, "testsRun": 12, "logLines": 400 },
                        "conflicts": conflicts
                    }),
                )
            })
            .collect();

        let analysis = analyze_pattern("agent-a", &reports, &DetectionConfig::default());

        assert_eq!(
            analysis.deception_types,
            vec![DeceptionType::Gaslighting, DeceptionType::DiscreditingOthers]
        );
        assert_eq!(
            analysis.truth_score, 1.0,
            "baseline applies no truth penalty for the gaslighting family"
        );
        assert!(analysis.deception_detected);
        assert!((analysis.confidence - 0.65).abs() < 1e-9);
    }
}
