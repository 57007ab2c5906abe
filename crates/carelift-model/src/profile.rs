use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::pattern::PatternTag;

/// Coarse inferred type of a column, independent of the pattern taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoarseType {
    Text,
    Number,
    Boolean,
    Date,
}

impl CoarseType {
    pub fn as_str(self) -> &'static str {
        match self {
            CoarseType::Text => "TEXT",
            CoarseType::Number => "NUMBER",
            CoarseType::Boolean => "BOOLEAN",
            CoarseType::Date => "DATE",
        }
    }
}

impl fmt::Display for CoarseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Statistical and semantic profile of one source column.
///
/// Created once per analysis pass and immutable thereafter. Invariant: the
/// dominant pattern is a member of `detected` unless the set is empty, in
/// which case it is the length-derived text fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Original header as it appeared in the source.
    pub name: String,
    /// Lowercased name with non-alphanumeric runs collapsed to `_`.
    pub normalized_name: String,
    /// Every pattern family that matched at least one sampled value.
    pub detected: BTreeSet<PatternTag>,
    /// The single most representative pattern for the column.
    pub dominant: PatternTag,
    /// Fraction of sampled non-null values matching the dominant pattern.
    pub confidence: f64,
    /// Up to five example values, in source order.
    pub samples: Vec<String>,
    /// Fraction of the full (unsampled) column that is null/blank.
    pub null_ratio: f64,
    /// Distinct non-null values over non-null count, full column.
    pub unique_ratio: f64,
    /// Mean character length of non-null values.
    pub avg_length: f64,
    pub coarse_type: CoarseType,
}

impl ColumnProfile {
    pub fn has_pattern(&self, tag: PatternTag) -> bool {
        self.detected.contains(&tag)
    }

    /// True when analysis found a specific (non-generic) pattern.
    pub fn has_specific_pattern(&self) -> bool {
        !self.dominant.is_generic_text() && self.dominant != PatternTag::Unknown
    }
}
