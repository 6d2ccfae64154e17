//! The pattern-analyzer rule table.
//!
//! Each deception check is an independent rule: a function from a report
//! history and configuration to an optional `PatternSignal`. The analyzer
//! evaluates every rule uniformly and folds the fired signals into one
//! analysis — keeping the thresholds and weights centralized in
//! `DetectionConfig` and each firing condition testable in isolation.

use std::collections::HashMap;

use serde_json::{json, Value};

use candor_contracts::analysis::DeceptionType;
use candor_contracts::report::Report;

use crate::config::DetectionConfig;
use crate::fabrication::{indicator_count, INDICATOR_CHECKS};

/// One fired deception signal: its label, confidence contribution,
/// truth-score penalty, and evidence entries.
#[derive(Debug, Clone)]
pub struct PatternSignal {
    pub label: DeceptionType,
    pub confidence_delta: f64,
    pub truth_penalty: f64,
    pub evidence: Vec<(&'static str, Value)>,
}

impl PatternSignal {
    fn new(label: DeceptionType, config: &DetectionConfig) -> Self {
        Self {
            label,
            confidence_delta: config.weights.for_label(label),
            truth_penalty: config.penalties.for_label(label),
            evidence: Vec::new(),
        }
    }

    fn with_evidence(mut self, key: &'static str, value: Value) -> Self {
        self.evidence.push((key, value));
        self
    }
}

/// A single pattern-analyzer check.
pub type PatternCheck = fn(&[Report], &DetectionConfig) -> Option<PatternSignal>;

/// All checks in detection order. The order is part of the contract: the
/// fired labels appear in a `DeceptionAnalysis` in this sequence.
pub const PATTERN_CHECKS: &[PatternCheck] = &[
    overconfidence,
    exaggeration,
    impossible_claims,
    quality_inflation,
    inconsistency,
    issue_hiding,
    cherry_picking,
    contradictory_statements,
    fabrication_over_time,
    gaslighting,
    discrediting_others,
];

// ── Shared statistics helpers ─────────────────────────────────────────────────

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Population standard deviation.
fn stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values.iter().copied());
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn rate(reports: &[Report], predicate: impl Fn(&Report) -> bool) -> f64 {
    if reports.is_empty() {
        return 0.0;
    }
    reports.iter().filter(|r| predicate(r)).count() as f64 / reports.len() as f64
}

fn improvements(reports: &[Report]) -> Vec<f64> {
    reports
        .iter()
        .map(|r| r.claimed_outcome.performance.improvement)
        .collect()
}

/// One shared pass for the gaslighting and discrediting checks: the number
/// of reports that rate another agent low while rating themselves high, and
/// the total contradiction count (those reports plus every attached
/// conflict description).
fn discredit_counts(reports: &[Report], config: &DetectionConfig) -> (usize, usize) {
    let thresholds = &config.thresholds;
    let discrediting_reports = reports
        .iter()
        .filter(|r| {
            matches!(
                r.evidence_number("otherAgentQuality"),
                Some(other) if other < thresholds.discredit_quality_floor
            ) && r.claimed_outcome.quality.code_quality > thresholds.discredit_own_quality_bar
        })
        .count();

    let conflict_total: usize = reports.iter().map(|r| r.conflicts.len()).sum();

    (discrediting_reports, discrediting_reports + conflict_total)
}

// ── Rule implementations ──────────────────────────────────────────────────────

/// Success-claim rate far above the realistic baseline.
fn overconfidence(reports: &[Report], config: &DetectionConfig) -> Option<PatternSignal> {
    let thresholds = &config.thresholds;
    let success_rate = rate(reports, |r| r.claimed_outcome.success);
    let discrepancy = success_rate - thresholds.realistic_success_rate;

    (discrepancy > thresholds.overconfidence_margin).then(|| {
        PatternSignal::new(DeceptionType::Overconfidence, config)
            .with_evidence("successRateDiscrepancy", json!(discrepancy))
    })
}

/// Mean claimed improvement well above the baseline.
fn exaggeration(reports: &[Report], config: &DetectionConfig) -> Option<PatternSignal> {
    let thresholds = &config.thresholds;
    let avg = mean(improvements(reports).into_iter());
    let excess = avg - thresholds.baseline_improvement;

    (excess > thresholds.exaggeration_margin).then(|| {
        PatternSignal::new(DeceptionType::Exaggeration, config)
            .with_evidence("performanceExaggeration", json!(excess))
    })
}

/// The same excess metric, past the plausible range entirely.
fn impossible_claims(reports: &[Report], config: &DetectionConfig) -> Option<PatternSignal> {
    let thresholds = &config.thresholds;
    let excess = mean(improvements(reports).into_iter()) - thresholds.baseline_improvement;

    (excess > thresholds.impossible_gain_margin).then(|| {
        PatternSignal::new(DeceptionType::ImpossibleClaims, config)
            .with_evidence("impossiblePerformanceGains", json!(true))
    })
}

/// Self-assessed code quality consistently above the realistic baseline.
fn quality_inflation(reports: &[Report], config: &DetectionConfig) -> Option<PatternSignal> {
    let thresholds = &config.thresholds;
    let avg = mean(
        reports
            .iter()
            .map(|r| r.claimed_outcome.quality.code_quality),
    );
    let inflation = avg - thresholds.realistic_quality;

    (inflation > thresholds.quality_inflation_margin).then(|| {
        PatternSignal::new(DeceptionType::QualityInflation, config)
            .with_evidence("qualityInflation", json!(inflation))
    })
}

/// High variance in claimed improvements across the history.
fn inconsistency(reports: &[Report], config: &DetectionConfig) -> Option<PatternSignal> {
    let spread = stddev(&improvements(reports));
    let consistency = (1.0 - 2.0 * spread).max(0.0);

    (consistency < config.thresholds.consistency_floor).then(|| {
        PatternSignal::new(DeceptionType::Inconsistency, config)
            .with_evidence("inconsistencyScore", json!(1.0 - consistency))
    })
}

/// Error-free claims at a rate implying suppressed issues.
fn issue_hiding(reports: &[Report], config: &DetectionConfig) -> Option<PatternSignal> {
    let thresholds = &config.thresholds;
    if reports.len() < thresholds.issue_hiding_min_reports {
        return None;
    }

    let no_error_rate = rate(reports, |r| r.claimed_outcome.no_errors);
    (no_error_rate > thresholds.no_error_rate_ceiling).then(|| {
        let hidden = ((no_error_rate - thresholds.hidden_issue_baseline)
            * reports.len() as f64)
            .round() as i64;
        PatternSignal::new(DeceptionType::IssueHiding, config)
            .with_evidence("hiddenIssuesCount", json!(hidden))
    })
}

/// Uniformly glowing reports backed by incomplete metric sets.
fn cherry_picking(reports: &[Report], config: &DetectionConfig) -> Option<PatternSignal> {
    let thresholds = &config.thresholds;
    if reports.len() < thresholds.cherry_picking_min_reports {
        return None;
    }

    let glowing = rate(reports, |r| {
        let quality = &r.claimed_outcome.quality;
        quality.code_quality > thresholds.high_quality_bar
            && quality.documentation > thresholds.high_quality_bar
            && quality.maintainability > thresholds.high_quality_bar
            && r.claimed_outcome.tests_pass
    });

    let incomplete = rate(reports, |r| {
        let metric_count = r.claimed_outcome.performance.metrics.len();
        (1..=3).contains(&metric_count)
    });

    (glowing > thresholds.high_quality_fraction
        && incomplete > thresholds.incomplete_metrics_fraction)
        .then(|| {
            PatternSignal::new(DeceptionType::CherryPicking, config)
                .with_evidence("incompleteMetricsReporting", json!(true))
        })
}

/// Claims about the same task that flip over time.
fn contradictory_statements(reports: &[Report], config: &DetectionConfig) -> Option<PatternSignal> {
    let thresholds = &config.thresholds;
    if reports.len() < thresholds.contradiction_min_reports {
        return None;
    }

    let mut by_task: HashMap<&str, Vec<&Report>> = HashMap::new();
    for report in reports {
        by_task.entry(report.task_id.as_str()).or_default().push(report);
    }

    let mut contradiction_count = 0usize;
    for group in by_task.values_mut() {
        group.sort_by_key(|r| r.timestamp);
        for pair in group.windows(2) {
            let (earlier, later) = (&pair[0], &pair[1]);
            let success_flipped =
                earlier.claimed_outcome.success != later.claimed_outcome.success;
            let improvement_jumped = (earlier.claimed_outcome.performance.improvement
                - later.claimed_outcome.performance.improvement)
                .abs()
                > thresholds.improvement_flip_delta;
            if success_flipped || improvement_jumped {
                contradiction_count += 1;
            }
        }
    }

    (contradiction_count > 0).then(|| {
        PatternSignal::new(DeceptionType::ContradictoryStatements, config)
            .with_evidence("contradictionCount", json!(contradiction_count))
    })
}

/// Recurring implausibility indicators across the history.
///
/// Runs the four single-report indicator checks over every report, one
/// unweighted point each, and fires when the fired fraction of all checks
/// exceeds the ratio bar.
fn fabrication_over_time(reports: &[Report], config: &DetectionConfig) -> Option<PatternSignal> {
    let thresholds = &config.thresholds;
    if reports.len() < thresholds.fabrication_min_reports {
        return None;
    }

    let fired: usize = reports.iter().map(|r| indicator_count(r, config)).sum();
    let ratio = fired as f64 / (INDICATOR_CHECKS * reports.len()) as f64;

    (ratio > thresholds.fabrication_ratio_bar).then(|| {
        PatternSignal::new(DeceptionType::Fabrication, config)
            .with_evidence("unrealisticResults", json!(true))
            .with_evidence("evidenceInconsistency", json!(ratio))
    })
}

/// Disparaging other agents' work while inflating one's own.
fn gaslighting(reports: &[Report], config: &DetectionConfig) -> Option<PatternSignal> {
    let thresholds = &config.thresholds;
    if reports.len() < thresholds.gaslighting_min_reports {
        return None;
    }

    let (_, total) = discredit_counts(reports, config);
    (total > thresholds.gaslighting_total_bar).then(|| {
        PatternSignal::new(DeceptionType::Gaslighting, config)
            .with_evidence("contradictionsWithOtherAgents", json!(total))
    })
}

/// Systematic disagreement with or discrediting of peer agents.
fn discrediting_others(reports: &[Report], config: &DetectionConfig) -> Option<PatternSignal> {
    let thresholds = &config.thresholds;
    if reports.len() < thresholds.gaslighting_min_reports {
        return None;
    }

    let (discrediting_reports, total) = discredit_counts(reports, config);
    let discredit_fraction = discrediting_reports as f64 / reports.len() as f64;

    (discredit_fraction > thresholds.discredit_fraction_bar
        || total > thresholds.discredit_total_bar)
        .then(|| {
            PatternSignal::new(DeceptionType::DiscreditingOthers, config)
                .with_evidence("systematicDisagreement", json!(true))
        })
}
