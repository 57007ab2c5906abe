//! Mapping types: learned mappings, suggestions and the per-source plan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::source::OriginSystem;

/// Deterministic value transformation applied between source and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformKind {
    /// Parse a legacy date shape and emit ISO 8601 (YYYY-MM-DD).
    DateToIso,
    /// Strip a phone number down to its 10 significant digits.
    PhoneDigits,
    /// Given part of a combined full name (comma heuristic).
    NameGivenPart,
    /// Family part of a combined full name (comma heuristic).
    NameFamilyPart,
    /// Free-text US state name to its two-letter code.
    StateToCode,
}

impl TransformKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransformKind::DateToIso => "DATE_TO_ISO",
            TransformKind::PhoneDigits => "PHONE_DIGITS",
            TransformKind::NameGivenPart => "NAME_GIVEN_PART",
            TransformKind::NameFamilyPart => "NAME_FAMILY_PART",
            TransformKind::StateToCode => "STATE_TO_CODE",
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted, confidence-scored source-to-target correspondence learned
/// from past migration outcomes.
///
/// Keyed by (normalized source column, optional origin system, optional
/// tenant). Confidence stays in [0,1] and never increases on a
/// failure-dominant outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnedMapping {
    pub normalized_name: String,
    pub origin: Option<OriginSystem>,
    pub tenant: Option<String>,
    pub target_table: String,
    pub target_column: String,
    pub transform: Option<TransformKind>,
    pub successes: u64,
    pub failures: u64,
    pub confidence: f64,
    pub last_used: DateTime<Utc>,
}

impl LearnedMapping {
    /// Fold a migration outcome into the counts and re-derive confidence.
    pub fn record_outcome(&mut self, successes: u64, failures: u64, now: DateTime<Utc>) {
        self.successes = self.successes.saturating_add(successes);
        self.failures = self.failures.saturating_add(failures);
        self.confidence = derive_confidence(self.successes, self.failures);
        self.last_used = now;
    }

    /// Explicit confidence decrease after a human override rejected this
    /// mapping in favor of a different target.
    pub fn decay(&mut self, factor: f64) {
        self.confidence = (self.confidence * factor).clamp(0.0, 1.0);
    }
}

/// Success-weighted confidence, clamped to [0,1].
pub fn derive_confidence(successes: u64, failures: u64) -> f64 {
    let total = successes + failures;
    if total == 0 {
        return 0.0;
    }
    (successes as f64 / total as f64).clamp(0.0, 1.0)
}

/// A lower-ranked mapping candidate retained for human review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingAlternative {
    pub target_table: String,
    pub target_column: String,
    pub confidence: f64,
}

/// The chosen mapping for one source column, with the evidence trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingSuggestion {
    pub source_column: String,
    pub normalized_name: String,
    pub target_table: String,
    pub target_column: String,
    /// Combined evidence score, clamped to [0,1].
    pub confidence: f64,
    /// Human-readable evidence, one entry per contributing channel.
    pub reasons: Vec<String>,
    pub transform: Option<TransformKind>,
    /// Up to three ranked runners-up.
    pub alternatives: Vec<MappingAlternative>,
}

/// A column no candidate cleared the floor for; reported, never guessed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnmappedColumn {
    pub source_column: String,
    pub best_score: f64,
}

/// Per-source mapping output: one suggestion or unmapped entry per column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingPlan {
    pub suggestions: Vec<MappingSuggestion>,
    pub unmapped: Vec<UnmappedColumn>,
}

impl MappingPlan {
    pub fn suggestion_for(&self, source_column: &str) -> Option<&MappingSuggestion> {
        self.suggestions
            .iter()
            .find(|s| s.source_column.eq_ignore_ascii_case(source_column))
    }

    /// Suggestions grouped by target table, preserving plan order.
    pub fn by_table(&self) -> Vec<(&str, Vec<&MappingSuggestion>)> {
        let mut grouped: Vec<(&str, Vec<&MappingSuggestion>)> = Vec::new();
        for suggestion in &self.suggestions {
            match grouped
                .iter()
                .position(|(table, _)| *table == suggestion.target_table)
            {
                Some(idx) => grouped[idx].1.push(suggestion),
                None => grouped.push((suggestion.target_table.as_str(), vec![suggestion])),
            }
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> LearnedMapping {
        LearnedMapping {
            normalized_name: "dob".to_string(),
            origin: None,
            tenant: None,
            target_table: "patients".to_string(),
            target_column: "date_of_birth".to_string(),
            transform: Some(TransformKind::DateToIso),
            successes: 8,
            failures: 2,
            confidence: derive_confidence(8, 2),
            last_used: Utc::now(),
        }
    }

    #[test]
    fn pure_success_raises_or_caps_confidence() {
        let mut m = mapping();
        let before = m.confidence;
        m.record_outcome(10, 0, Utc::now());
        assert!(m.confidence >= before);
        assert!(m.confidence <= 1.0);
    }

    #[test]
    fn failure_dominant_outcome_never_raises_confidence() {
        let mut m = mapping();
        let before = m.confidence;
        m.record_outcome(1, 9, Utc::now());
        assert!(m.confidence < before);
    }

    #[test]
    fn decay_strictly_decreases() {
        let mut m = mapping();
        let before = m.confidence;
        m.decay(0.5);
        assert!(m.confidence < before);
        assert!(m.confidence >= 0.0);
    }
}
