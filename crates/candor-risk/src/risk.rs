//! Rolling risk aggregation over stored analyses.
//!
//! The aggregator only reads from the history store — it never writes
//! analyses itself. The risk score blends three longitudinal signals:
//! lost trust (40%), detection confidence (30%), and detection frequency
//! (30%).

use tracing::debug;

use candor_contracts::analysis::DeceptionType;
use candor_contracts::results::{RiskLevel, RiskResult};

use crate::history::AnalysisStore;

/// How many of the most recent analyses contribute to `recent_patterns`.
const RECENT_WINDOW: usize = 5;

/// Weight of the lost-trust component (1 − mean truth score).
const TRUST_WEIGHT: f64 = 0.4;
/// Weight of the mean detection confidence component.
const CONFIDENCE_WEIGHT: f64 = 0.3;
/// Weight of the detection-frequency component.
const FREQUENCY_WEIGHT: f64 = 0.3;

/// Bucket a risk score into its level.
fn level_for(score: f64) -> RiskLevel {
    if score < 0.3 {
        RiskLevel::Low
    } else if score < 0.5 {
        RiskLevel::Medium
    } else if score < 0.7 {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

/// Derives per-agent risk summaries from the shared history store.
pub struct RiskAggregator {
    store: AnalysisStore,
}

impl RiskAggregator {
    /// Create an aggregator reading from `store`.
    pub fn new(store: AnalysisStore) -> Self {
        Self { store }
    }

    /// The agent's rolling risk score, level, and recent pattern summary.
    ///
    /// An agent with no stored analyses carries zero risk.
    pub fn risk_score(&self, agent_id: &str) -> RiskResult {
        let history = self.store.for_agent(agent_id);
        if history.is_empty() {
            return RiskResult {
                risk_score: 0.0,
                risk_level: RiskLevel::Low,
                recent_patterns: Vec::new(),
            };
        }

        let n = history.len() as f64;
        let mean_truth = history.iter().map(|a| a.truth_score).sum::<f64>() / n;
        let mean_confidence = history.iter().map(|a| a.confidence).sum::<f64>() / n;
        let detected = history.iter().filter(|a| a.deception_detected).count() as f64;

        let risk_score = TRUST_WEIGHT * (1.0 - mean_truth)
            + CONFIDENCE_WEIGHT * mean_confidence
            + FREQUENCY_WEIGHT * (detected / n);

        let mut recent_patterns: Vec<DeceptionType> = Vec::new();
        let recent_start = history.len().saturating_sub(RECENT_WINDOW);
        for analysis in &history[recent_start..] {
            for label in &analysis.deception_types {
                if !recent_patterns.contains(label) {
                    recent_patterns.push(*label);
                }
            }
        }

        let risk_level = level_for(risk_score);
        debug!(
            agent_id,
            risk_score,
            risk_level = %risk_level,
            analyses = history.len(),
            "risk aggregation complete"
        );

        RiskResult {
            risk_score,
            risk_level,
            recent_patterns,
        }
    }
}
