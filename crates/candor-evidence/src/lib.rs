//! # candor-evidence
//!
//! Feature-vector encoding and the evidence store contract for
//! verification records.
//!
//! This crate provides:
//! - `encode_features` — the fixed 128-dimension encoding of an
//!   `EvidenceRecord`
//! - `EvidenceStore` — the key/value + nearest-neighbor persistence
//!   contract, with `InMemoryEvidenceStore` as the reference implementation
//! - `EvidenceArchive` — the degrading wrapper that keeps persistence
//!   failures out of the analysis core
//!
//! ## Usage
//!
//! ```rust,ignore
//! use candor_evidence::{EvidenceArchive, InMemoryEvidenceStore};
//!
//! let archive = EvidenceArchive::new(InMemoryEvidenceStore::new());
//! archive.store_truth(&record); // false on failure, never an error
//! ```

pub mod archive;
pub mod store;
pub mod vector;

pub use archive::EvidenceArchive;
pub use store::{EvidenceStore, InMemoryEvidenceStore, SearchOptions, StoreStats};
pub use vector::{
    encode_features, snapshot_key, string_hash, truth_key, EvidenceRecord, TaskPhase, FEATURE_DIM,
};
