//! Selective-reporting detector.
//!
//! Flags agents whose report stream is implausibly one-sided: success rates
//! no real workload sustains, or a complete absence of admitted errors over
//! a long history. Patterns are checked in priority order — always-positive
//! first, then no-errors-reported.

use tracing::debug;

use serde_json::json;

use candor_contracts::report::Report;
use candor_contracts::results::SelectiveReportResult;

use crate::config::DetectionConfig;

/// Examine one agent's reports for selective-reporting patterns.
pub fn detect_selective_reporting(
    reports: &[Report],
    config: &DetectionConfig,
) -> SelectiveReportResult {
    let thresholds = &config.thresholds;

    let mut result = SelectiveReportResult {
        is_selective: false,
        confidence: 0.0,
        evidence: serde_json::Map::new(),
    };

    if reports.len() < thresholds.selective_min_reports {
        return result;
    }

    let n = reports.len();
    let success_rate = reports
        .iter()
        .filter(|r| r.claimed_outcome.success)
        .count() as f64
        / n as f64;

    if success_rate > thresholds.always_positive_rate && n > thresholds.always_positive_min_reports
    {
        debug!(success_rate, report_count = n, "always-positive reporting pattern");
        result.is_selective = true;
        result.confidence = config.weights.always_positive;
        result
            .evidence
            .insert("pattern".to_string(), json!("always-positive"));
        result
            .evidence
            .insert("successRate".to_string(), json!(success_rate));
        return result;
    }

    let admitted_errors = reports
        .iter()
        .filter(|r| !r.claimed_outcome.no_errors)
        .count();

    if admitted_errors == 0 && n > thresholds.no_errors_min_reports {
        debug!(report_count = n, "no-errors-reported pattern");
        result.is_selective = true;
        result.confidence = config.weights.no_errors_reported;
        result
            .evidence
            .insert("pattern".to_string(), json!("no-errors-reported"));
        result
            .evidence
            .insert("reportCount".to_string(), json!(n));
    }

    result
}
