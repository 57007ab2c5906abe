//! Evidence-channel weights and name-similarity scoring.
//!
//! Channels combine additively; the final candidate score is clamped to
//! [0,1] in one place ([`combine`]) rather than per channel.

use rapidfuzz::distance::levenshtein;

use carelift_model::strip_separators;

/// Base contribution of a learned-mapping hit; the stored confidence adds
/// up to another 0.5 on top, so a perfect history caps this channel at 1.0.
pub const LEARNED_BASE: f64 = 0.5;
/// Contribution when the target column accepts the dominant pattern.
pub const PATTERN_WEIGHT: f64 = 0.3;
/// Multiplier on name similarity above [`NAME_SIMILARITY_MIN`].
pub const NAME_WEIGHT: f64 = 0.4;
pub const NAME_SIMILARITY_MIN: f64 = 0.5;
/// Contribution of a synonym-dictionary membership hit.
pub const SYNONYM_WEIGHT: f64 = 0.25;
/// Contribution of the raw-name substring heuristic.
pub const SUBSTRING_WEIGHT: f64 = 0.1;

/// Normalized edit-distance similarity between a source column name and a
/// target column name, both reduced to lowercase alphanumerics first.
///
/// An exact match short-circuits to 1.0 and substring containment in
/// either direction to 0.8; otherwise 1 − distance / max-length.
pub fn name_similarity(source_name: &str, target_name: &str) -> f64 {
    let source = strip_separators(source_name);
    let target = strip_separators(target_name);
    if source.is_empty() || target.is_empty() {
        return 0.0;
    }
    if source == target {
        return 1.0;
    }
    if source.contains(&target) || target.contains(&source) {
        return 0.8;
    }
    let distance = levenshtein::distance(source.chars(), target.chars());
    let max_len = source.chars().count().max(target.chars().count());
    1.0 - distance as f64 / max_len as f64
}

/// Combine additive channel contributions into a bounded score.
pub fn combine(contributions: &[f64]) -> f64 {
    contributions.iter().sum::<f64>().clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_separator_variants_short_circuit() {
        assert_eq!(name_similarity("first_name", "first_name"), 1.0);
        assert_eq!(name_similarity("firstname", "first_name"), 1.0);
        assert_eq!(name_similarity("FIRST NAME", "first_name"), 1.0);
    }

    #[test]
    fn substring_containment_short_circuits() {
        assert_eq!(name_similarity("npi_num", "npi"), 0.8);
        assert_eq!(name_similarity("npi", "provider_npi"), 0.8);
    }

    #[test]
    fn abbreviations_clear_the_contribution_floor() {
        let fname = name_similarity("fname", "first_name");
        assert!(fname > NAME_SIMILARITY_MIN, "fname scored {fname}");
        let firstname = name_similarity("firstname", "first_name");
        assert!(firstname > NAME_SIMILARITY_MIN);
    }

    #[test]
    fn unrelated_names_score_low() {
        assert!(name_similarity("dob", "procedure_code") < NAME_SIMILARITY_MIN);
    }

    #[test]
    fn combine_clamps_to_unit_interval() {
        assert_eq!(combine(&[0.5, 0.4, 0.3]), 1.0);
        assert!((combine(&[0.2, 0.1]) - 0.3).abs() < 1e-9);
        assert_eq!(combine(&[]), 0.0);
    }
}
