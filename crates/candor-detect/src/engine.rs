//! The deception engine: the library facade over all detectors.
//!
//! Owns the detection configuration and an injected `AnalysisStore`. The
//! only side effect anywhere in the engine is the history append performed
//! by the pattern-analysis entry points; every other method is a pure
//! computation over the supplied reports.

use candor_contracts::analysis::DeceptionAnalysis;
use candor_contracts::report::Report;
use candor_contracts::results::{
    CollusionResult, FabricationResult, GaslightingResult, RiskResult, SelectiveReportResult,
};
use candor_risk::history::AnalysisStore;
use candor_risk::risk::RiskAggregator;

use crate::collusion;
use crate::config::DetectionConfig;
use crate::crossagent;
use crate::fabrication;
use crate::pattern;
use crate::selective;

/// The multi-signal deception detection engine.
///
/// Analyses for different agents are independent; the shared `AnalysisStore`
/// serializes same-agent appends internally, so one engine may be used from
/// multiple threads.
pub struct DeceptionEngine {
    config: DetectionConfig,
    history: AnalysisStore,
}

impl DeceptionEngine {
    /// Create an engine with the given configuration and history store.
    ///
    /// The store is owned by the caller and may be shared with other
    /// consumers (risk dashboards, ledger writers).
    pub fn new(config: DetectionConfig, history: AnalysisStore) -> Self {
        Self { config, history }
    }

    /// The active detection configuration.
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Analyze an agent's full report history for deception patterns.
    ///
    /// The produced analysis is appended to the per-agent history before it
    /// is returned — this is the engine's only side effect.
    pub fn analyze_agent_pattern(&self, agent_id: &str, reports: &[Report]) -> DeceptionAnalysis {
        self.run_pattern_analysis(agent_id, reports, None)
    }

    /// Analyze one new report in the context of the agent's history.
    ///
    /// Concatenates `historical_reports` and `report`, delegates to the
    /// pattern analyzer, and stamps the originating report's ID on the
    /// resulting analysis (including the copy stored in history).
    pub fn analyze_single_report(
        &self,
        report: &Report,
        historical_reports: &[Report],
    ) -> DeceptionAnalysis {
        let mut combined = historical_reports.to_vec();
        combined.push(report.clone());
        self.run_pattern_analysis(&report.agent_id, &combined, Some(report.id.clone()))
    }

    /// Examine a single report in isolation for fabrication signals.
    pub fn detect_fabrication(&self, report: &Report) -> FabricationResult {
        fabrication::detect_fabrication(report, &self.config)
    }

    /// Examine one agent's reports for selective-reporting patterns.
    pub fn detect_selective_reporting(&self, reports: &[Report]) -> SelectiveReportResult {
        selective::detect_selective_reporting(reports, &self.config)
    }

    /// Compare a report against other agents' same-task reports.
    pub fn detect_gaslighting(
        &self,
        report: &Report,
        other_reports: &[Report],
    ) -> GaslightingResult {
        crossagent::detect_gaslighting(report, other_reports, &self.config)
    }

    /// Examine the full multi-agent corpus for coordinated false reporting.
    pub fn detect_collusion(&self, all_reports: &[Report]) -> CollusionResult {
        collusion::detect_collusion(all_reports, &self.config)
    }

    /// All stored analyses for an agent, in chronological (append) order.
    pub fn agent_history(&self, agent_id: &str) -> Vec<DeceptionAnalysis> {
        self.history.for_agent(agent_id)
    }

    /// Derive the agent's rolling risk score from its stored history.
    pub fn risk_score(&self, agent_id: &str) -> RiskResult {
        RiskAggregator::new(self.history.clone()).risk_score(agent_id)
    }

    fn run_pattern_analysis(
        &self,
        agent_id: &str,
        reports: &[Report],
        report_id: Option<String>,
    ) -> DeceptionAnalysis {
        let mut analysis = pattern::analyze_pattern(agent_id, reports, &self.config);
        analysis.report_id = report_id;
        self.history.append(analysis.clone());
        analysis
    }
}

impl Default for DeceptionEngine {
    fn default() -> Self {
        Self::new(DetectionConfig::default(), AnalysisStore::new())
    }
}
