//! # candor-contracts
//!
//! Shared types, result contracts, and error types for the CANDOR
//! truth-scoring subsystem.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod analysis;
pub mod error;
pub mod report;
pub mod results;
