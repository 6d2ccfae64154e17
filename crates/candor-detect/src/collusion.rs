//! Collusion detector.
//!
//! Operates over the full multi-agent report corpus. Groups reports by task
//! and looks for two coordination signals: near-simultaneous submissions
//! (adjacent sorted timestamps within the sync window) and suspiciously
//! identical claims — every member of a group claiming the same inflated
//! outcome, or every member reporting the exact same high code-quality
//! value.

use std::collections::HashMap;

use tracing::debug;

use candor_contracts::report::Report;
use candor_contracts::results::{CollusionEvidence, CollusionResult};

use crate::config::DetectionConfig;

/// Examine the full report corpus for coordinated false reporting.
pub fn detect_collusion(all_reports: &[Report], config: &DetectionConfig) -> CollusionResult {
    let thresholds = &config.thresholds;

    if all_reports.len() < thresholds.collusion_min_reports {
        return CollusionResult {
            is_collusion: false,
            confidence: 0.0,
            evidence: CollusionEvidence {
                synchronized_reporting: false,
                identical_false_claims: 0,
            },
        };
    }

    let mut by_task: HashMap<&str, Vec<&Report>> = HashMap::new();
    for report in all_reports {
        by_task.entry(report.task_id.as_str()).or_default().push(report);
    }

    let mut synchronized_pairs = 0usize;
    let mut identical_claims = 0usize;

    for group in by_task.values_mut() {
        if group.len() < 2 {
            continue;
        }

        group.sort_by_key(|r| r.timestamp);
        for pair in group.windows(2) {
            if pair[1].timestamp - pair[0].timestamp <= thresholds.sync_window_ms {
                synchronized_pairs += 1;
            }
        }

        let all_inflated = group.iter().all(|r| {
            let outcome = &r.claimed_outcome;
            outcome.success
                && outcome.no_errors
                && outcome.performance.improvement > thresholds.inflated_improvement_bar
        });
        if all_inflated {
            identical_claims += 1;
        }

        let first_quality = group[0].claimed_outcome.quality.code_quality;
        let all_identical_quality = first_quality > thresholds.identical_quality_bar
            && group
                .iter()
                .all(|r| r.claimed_outcome.quality.code_quality == first_quality);
        if all_identical_quality {
            identical_claims += 1;
        }
    }

    let synchronized_reporting = synchronized_pairs >= thresholds.sync_pairs_bar;
    let is_collusion = identical_claims > thresholds.identical_claims_bar || synchronized_reporting;

    debug!(
        corpus_size = all_reports.len(),
        task_groups = by_task.len(),
        synchronized_pairs,
        identical_claims,
        is_collusion,
        "collusion analysis complete"
    );

    CollusionResult {
        is_collusion,
        confidence: ((identical_claims + synchronized_pairs) as f64
            * config.weights.collusion_signal)
            .min(1.0),
        evidence: CollusionEvidence {
            synchronized_reporting,
            identical_false_claims: identical_claims,
        },
    }
}
