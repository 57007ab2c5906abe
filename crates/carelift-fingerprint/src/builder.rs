//! Fingerprint construction.
//!
//! The structural hash covers the sorted `normalized-name:dominant-pattern`
//! pairs, so two sources with the same logical structure hash identically
//! regardless of cell values or column order. The signature vector carries
//! one slot per known pattern tag, accumulated with each column's
//! dominant-pattern confidence and L2-normalized.

use chrono::Utc;

use carelift_model::{
    AnalyzerSettings, CancelToken, ColumnProfile, PatternTag, Result, SourceFingerprint,
    SourceKind, SourceTable,
};
use carelift_profile::analyze_source;

use crate::hash::sha256_hex;
use crate::origin::detect_origin;

/// Analyze a source and derive its fingerprint.
pub fn fingerprint(
    source: &SourceTable,
    settings: &AnalyzerSettings,
    cancel: &CancelToken,
) -> Result<SourceFingerprint> {
    let columns = analyze_source(source, settings, cancel)?;
    Ok(from_profiles(source.kind, columns))
}

/// Derive a fingerprint from already-built column profiles.
pub fn from_profiles(kind: SourceKind, columns: Vec<ColumnProfile>) -> SourceFingerprint {
    let structural_hash = structural_hash(&columns);
    // Same truncation as elsewhere in the codebase: the first 16 digest
    // bytes are enough to key a fingerprint.
    let id = format!("fp-{}", &structural_hash[..32]);
    let origin = detect_origin(columns.iter().map(|c| c.normalized_name.as_str()));
    let signature = signature_vector(&columns);

    tracing::debug!(
        id = %id,
        columns = columns.len(),
        origin = origin.map(|o| o.as_str()).unwrap_or("unknown"),
        "built source fingerprint"
    );

    SourceFingerprint {
        id,
        kind,
        origin,
        columns,
        structural_hash,
        signature,
        created_at: Utc::now(),
    }
}

fn structural_hash(columns: &[ColumnProfile]) -> String {
    let mut pairs: Vec<String> = columns
        .iter()
        .map(|profile| format!("{}:{}", profile.normalized_name, profile.dominant))
        .collect();
    pairs.sort();
    sha256_hex(pairs.join("|").as_bytes())
}

fn signature_vector(columns: &[ColumnProfile]) -> Vec<f64> {
    let mut vector = vec![0.0; PatternTag::COUNT];
    for profile in columns {
        vector[profile.dominant.slot()] += profile.confidence;
    }
    let norm: f64 = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for slot in &mut vector {
            *slot /= norm;
        }
    }
    vector
}
