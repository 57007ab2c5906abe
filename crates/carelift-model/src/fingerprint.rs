use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::ColumnProfile;
use crate::source::{OriginSystem, SourceKind};

/// Cosine similarity at or above which a stored fingerprint is treated as
/// "a source shape we have seen before".
pub const SIMILARITY_RECOGNIZED: f64 = 0.7;

/// Structural DNA of a tabular source.
///
/// Two sources with the same column names and dominant patterns produce the
/// same structural hash and identical signature vectors regardless of the
/// literal cell values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFingerprint {
    /// Stable id derived from the structural hash.
    pub id: String,
    pub kind: SourceKind,
    /// Best-effort vendor detection from naming conventions.
    pub origin: Option<OriginSystem>,
    /// Column profiles in source order.
    pub columns: Vec<ColumnProfile>,
    /// SHA-256 over the sorted `normalized-name:dominant-pattern` pairs.
    pub structural_hash: String,
    /// One slot per known pattern tag, L2-normalized.
    pub signature: Vec<f64>,
    pub created_at: DateTime<Utc>,
}

impl SourceFingerprint {
    pub fn column(&self, normalized_name: &str) -> Option<&ColumnProfile> {
        self.columns
            .iter()
            .find(|profile| profile.normalized_name == normalized_name)
    }
}

/// Cosine similarity between two signature vectors.
///
/// Vectors of mismatched length compare as 0 by definition; this only
/// occurs across incompatible pattern-universe versions.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
