//! # candor-risk
//!
//! Per-agent analysis history and rolling risk aggregation.
//!
//! This crate provides:
//! - `AnalysisStore` — the injected, thread-safe per-agent history
//! - `RiskAggregator` — read-only risk scoring over stored analyses
//!
//! ## Usage
//!
//! ```rust,ignore
//! use candor_risk::{AnalysisStore, RiskAggregator};
//!
//! let store = AnalysisStore::new();
//! // ... the detection engine appends analyses as it runs ...
//! let risk = RiskAggregator::new(store.clone()).risk_score("agent-7");
//! println!("{}: {:.2}", risk.risk_level, risk.risk_score);
//! ```

pub mod history;
pub mod risk;

pub use history::AnalysisStore;
pub use risk::RiskAggregator;
