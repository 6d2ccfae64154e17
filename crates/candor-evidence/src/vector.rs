//! Feature-vector encoding for verification records.
//!
//! Records are encoded into a fixed 128-dimension vector with dimensions
//! assigned by fixed offsets. The layout is part of the stored-data
//! contract — it must stay stable across releases so existing vectors keep
//! matching:
//!
//! | dims     | content                                              |
//! |----------|------------------------------------------------------|
//! | 0        | accuracy                                             |
//! | 1        | confidence                                           |
//! | 2        | passed flag (1.0 / 0.0)                              |
//! | 16..19   | time-of-day features (hour, minute, weekday)         |
//! | 32..38   | one-hot task phase                                   |
//! | 48..64   | sign-bit expansion of hash(task_id)                  |
//! | 64..80   | sign-bit expansion of hash(session_id)               |
//! | 80..96   | sign-bit expansion of hash(snapshot_id)              |
//!
//! The string hash is the classic 32-bit multiply-add (`h = h·31 + byte`,
//! wrapping); bit *i* of the hash selects +1.0 or −1.0 for dimension
//! `base + i`. Unused dimensions stay 0.0.

use chrono::{DateTime, Datelike, Timelike};
use serde::{Deserialize, Serialize};

/// Length of every stored feature vector.
pub const FEATURE_DIM: usize = 128;

/// Dimension offsets. Fixed by the storage contract.
const ACCURACY_DIM: usize = 0;
const CONFIDENCE_DIM: usize = 1;
const PASSED_DIM: usize = 2;
const TIME_BASE: usize = 16;
const PHASE_BASE: usize = 32;
const TASK_HASH_BASE: usize = 48;
const SESSION_HASH_BASE: usize = 64;
const SNAPSHOT_HASH_BASE: usize = 80;
const HASH_SPAN: usize = 16;

/// The six known task lifecycle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPhase {
    Plan,
    Implement,
    Test,
    Review,
    Verify,
    Complete,
}

impl TaskPhase {
    /// All phases in one-hot dimension order.
    pub const ALL: [TaskPhase; 6] = [
        Self::Plan,
        Self::Implement,
        Self::Test,
        Self::Review,
        Self::Verify,
        Self::Complete,
    ];

    /// The phase's one-hot dimension index within the phase block.
    pub fn index(&self) -> usize {
        match self {
            Self::Plan => 0,
            Self::Implement => 1,
            Self::Test => 2,
            Self::Review => 3,
            Self::Verify => 4,
            Self::Complete => 5,
        }
    }
}

/// The verification document encoded for nearest-neighbor retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceRecord {
    pub task_id: String,
    pub session_id: String,
    pub snapshot_id: String,
    /// Verified accuracy of the outcome, [0, 1].
    pub accuracy: f64,
    /// Verifier confidence, [0, 1].
    pub confidence: f64,
    /// Whether verification passed.
    pub passed: bool,
    /// Lifecycle phase the record was captured in.
    pub phase: TaskPhase,
    /// Capture time, epoch milliseconds.
    pub timestamp: i64,
}

/// The classic 32-bit multiply-add string hash (`h = h·31 + byte`, wrapping).
pub fn string_hash(s: &str) -> i32 {
    s.bytes()
        .fold(0i32, |h, b| h.wrapping_mul(31).wrapping_add(b as i32))
}

/// Expand a 32-bit hash into `HASH_SPAN` sign dimensions starting at `base`:
/// bit *i* set → +1.0, clear → −1.0.
fn write_sign_bits(vector: &mut [f32; FEATURE_DIM], base: usize, hash: i32) {
    let bits = hash as u32;
    for i in 0..HASH_SPAN {
        vector[base + i] = if (bits >> i) & 1 == 1 { 1.0 } else { -1.0 };
    }
}

/// Encode a record into its 128-dimension feature vector.
///
/// Deterministic: the same record always produces the same vector.
pub fn encode_features(record: &EvidenceRecord) -> [f32; FEATURE_DIM] {
    let mut vector = [0.0f32; FEATURE_DIM];

    vector[ACCURACY_DIM] = record.accuracy as f32;
    vector[CONFIDENCE_DIM] = record.confidence as f32;
    vector[PASSED_DIM] = if record.passed { 1.0 } else { 0.0 };

    // Time-of-day features from the UTC timestamp. A timestamp before the
    // epoch range falls back to the epoch itself.
    let when: DateTime<chrono::Utc> =
        DateTime::from_timestamp_millis(record.timestamp).unwrap_or_default();
    vector[TIME_BASE] = when.hour() as f32 / 24.0;
    vector[TIME_BASE + 1] = when.minute() as f32 / 60.0;
    vector[TIME_BASE + 2] = when.weekday().num_days_from_monday() as f32 / 7.0;

    vector[PHASE_BASE + record.phase.index()] = 1.0;

    write_sign_bits(&mut vector, TASK_HASH_BASE, string_hash(&record.task_id));
    write_sign_bits(
        &mut vector,
        SESSION_HASH_BASE,
        string_hash(&record.session_id),
    );
    write_sign_bits(
        &mut vector,
        SNAPSHOT_HASH_BASE,
        string_hash(&record.snapshot_id),
    );

    vector
}

/// The storage key for a task's truth evaluation.
pub fn truth_key(task_id: &str) -> String {
    format!("truth:{task_id}")
}

/// The storage key for one snapshot of a task.
pub fn snapshot_key(task_id: &str, snapshot_id: &str) -> String {
    format!("snapshot:{task_id}:{snapshot_id}")
}
