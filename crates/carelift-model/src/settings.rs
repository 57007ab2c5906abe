//! Component settings: explicit immutable configuration passed in at
//! construction time so tests can substitute fixtures.

use serde::Deserialize;

/// Column analysis settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    /// Pattern detection samples at most this many non-null values per
    /// column for cost control. Null and uniqueness statistics always use
    /// the full column.
    pub sample_cap: usize,
    /// Average length above which an unpatterned column falls back to the
    /// long-text tag instead of short-text.
    pub long_text_threshold: usize,
    /// Example values retained on the profile.
    pub max_samples: usize,
    /// Fan column analysis out over a bounded worker pool.
    pub parallel: bool,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            sample_cap: 100,
            long_text_threshold: 40,
            max_samples: 5,
            parallel: true,
        }
    }
}

/// Mapping intelligence settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapperSettings {
    /// Below this pattern-derived best score the assist scorer is consulted.
    pub assist_threshold: f64,
    /// Candidates at or below this combined score are reported unmapped.
    pub candidate_floor: f64,
    /// Ranked runners-up kept on each suggestion.
    pub max_alternatives: usize,
    /// Tenant scope for learned-mapping lookups and fingerprint storage.
    pub tenant: Option<String>,
}

impl Default for MapperSettings {
    fn default() -> Self {
        Self {
            assist_threshold: 0.6,
            candidate_floor: 0.2,
            max_alternatives: 3,
            tenant: None,
        }
    }
}

/// Migration executor settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExecutorSettings {
    /// Rows per write batch; bounds target-store transaction size.
    pub batch_size: usize,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self { batch_size: 100 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_deserialize_with_partial_fields() {
        let analyzer: AnalyzerSettings = serde_json::from_str(r#"{"sample_cap": 25}"#).unwrap();
        assert_eq!(analyzer.sample_cap, 25);
        assert_eq!(analyzer.max_samples, 5);

        let mapper: MapperSettings = serde_json::from_str(r#"{"tenant": "clinic-a"}"#).unwrap();
        assert_eq!(mapper.tenant.as_deref(), Some("clinic-a"));
        assert!((mapper.assist_threshold - 0.6).abs() < f64::EPSILON);
    }
}
