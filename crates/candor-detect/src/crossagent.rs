//! Cross-agent contradiction analyzer.
//!
//! Compares one agent's report against other agents' reports on the same
//! task. Each comparison can record up to three contradictions: a success
//! mismatch, a large improvement delta, and a high-own/low-other quality
//! split. Two or more contradictions flag gaslighting; contradicting
//! essentially every same-task report flags systematic disagreement.

use tracing::debug;

use candor_contracts::report::Report;
use candor_contracts::results::GaslightingResult;

use crate::config::DetectionConfig;

/// Compare `report` against all other agents' same-task reports.
pub fn detect_gaslighting(
    report: &Report,
    other_reports: &[Report],
    config: &DetectionConfig,
) -> GaslightingResult {
    let thresholds = &config.thresholds;
    let own = &report.claimed_outcome;

    let same_task: Vec<&Report> = other_reports
        .iter()
        .filter(|other| other.task_id == report.task_id && other.agent_id != report.agent_id)
        .collect();

    let mut contradictions = Vec::new();
    for other in &same_task {
        let theirs = &other.claimed_outcome;

        if own.success != theirs.success {
            contradictions.push(format!(
                "agent '{}' claims success={} on task '{}' but agent '{}' claims success={}",
                report.agent_id, own.success, report.task_id, other.agent_id, theirs.success
            ));
        }

        let improvement_delta =
            (own.performance.improvement - theirs.performance.improvement).abs();
        if improvement_delta > thresholds.improvement_flip_delta {
            contradictions.push(format!(
                "agent '{}' claims {:.0}% improvement on task '{}' but agent '{}' claims {:.0}%",
                report.agent_id,
                own.performance.improvement * 100.0,
                report.task_id,
                other.agent_id,
                theirs.performance.improvement * 100.0
            ));
        }

        if own.quality.code_quality > thresholds.discredit_own_quality_bar
            && theirs.quality.code_quality < thresholds.discredit_quality_floor
        {
            contradictions.push(format!(
                "agent '{}' rates its work {:.2} on task '{}' while agent '{}' reports {:.2}",
                report.agent_id,
                own.quality.code_quality,
                report.task_id,
                other.agent_id,
                theirs.quality.code_quality
            ));
        }
    }

    let count = contradictions.len();
    let is_gaslighting = count >= thresholds.crossagent_gaslighting_min;
    let systematic_disagreement =
        count >= same_task.len().min(thresholds.systematic_disagreement_cap) && !same_task.is_empty();

    debug!(
        report_id = %report.id,
        agent_id = %report.agent_id,
        task_id = %report.task_id,
        same_task_reports = same_task.len(),
        contradictions = count,
        is_gaslighting,
        "cross-agent contradiction analysis complete"
    );

    GaslightingResult {
        is_gaslighting,
        confidence: (count as f64 * config.weights.crossagent_contradiction).min(1.0),
        contradictions,
        contradictions_with_other_agents: count,
        systematic_disagreement,
    }
}
