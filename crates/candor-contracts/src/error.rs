//! Error types for the CANDOR subsystem.
//!
//! The analysis core is pure computation and cannot fail on valid input —
//! malformed report data degrades via default substitution instead of
//! erroring. The only fallible operations are configuration loading and the
//! persistence collaborators (evidence store, ledger), and those failures
//! must never propagate into detection: callers wrapping persistence catch
//! and degrade so scoring always completes.

use thiserror::Error;

/// The unified error type for the CANDOR crates.
#[derive(Debug, Error)]
pub enum CandorError {
    /// A detection configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The evidence store rejected or failed an operation.
    #[error("evidence store error: {reason}")]
    StoreError { reason: String },

    /// The evidence ledger could not persist an analysis record.
    #[error("ledger write failed: {reason}")]
    LedgerWriteFailed { reason: String },

    /// A contract type could not be serialized for storage.
    #[error("serialization error: {reason}")]
    SerializationError { reason: String },
}

/// Convenience alias used throughout the CANDOR crates.
pub type CandorResult<T> = Result<T, CandorError>;
