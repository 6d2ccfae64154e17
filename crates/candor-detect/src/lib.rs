//! # candor-detect
//!
//! The multi-signal deception detection engine for agent self-reports.
//!
//! This crate provides:
//! - `DeceptionEngine` — the library facade over all detectors
//! - `DetectionConfig` — every threshold and weight, TOML-tunable
//! - The individual analyzers (fabrication, pattern rule table, cross-agent
//!   contradiction, selective reporting, collusion), each exposed as a free
//!   function for callers that bring their own configuration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use candor_detect::{DeceptionEngine, DetectionConfig};
//! use candor_risk::history::AnalysisStore;
//!
//! let engine = DeceptionEngine::new(DetectionConfig::default(), AnalysisStore::new());
//! let analysis = engine.analyze_agent_pattern("agent-7", &reports);
//! if analysis.deception_detected {
//!     println!("truth score {:.2}", analysis.truth_score);
//! }
//! ```

pub mod collusion;
pub mod config;
pub mod crossagent;
pub mod engine;
pub mod fabrication;
pub mod pattern;
pub mod rules;
pub mod selective;

pub use collusion::detect_collusion;
pub use config::{DetectionConfig, DetectionThresholds, SignalWeights, TruthPenalties};
pub use crossagent::detect_gaslighting;
pub use engine::DeceptionEngine;
pub use fabrication::detect_fabrication;
pub use pattern::analyze_pattern;
pub use selective::detect_selective_reporting;
