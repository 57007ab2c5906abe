//! Per-column profile construction.
//!
//! Pattern detection runs over a capped sample of non-null values for cost
//! control; null fraction, uniqueness and average length are computed over
//! the full column so the statistics are not biased by the sample.

use std::collections::{BTreeMap, BTreeSet};

use carelift_detect::detect;
use carelift_model::{AnalyzerSettings, CoarseType, ColumnProfile, PatternTag, normalize_name};

/// Build the profile for one source column.
pub fn analyze_column(name: &str, values: &[String], settings: &AnalyzerSettings) -> ColumnProfile {
    let total = values.len();
    let non_null: Vec<&str> = values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .collect();

    let null_ratio = if total == 0 {
        1.0
    } else {
        (total - non_null.len()) as f64 / total as f64
    };
    let unique_ratio = if non_null.is_empty() {
        0.0
    } else {
        let distinct: BTreeSet<&str> = non_null.iter().copied().collect();
        distinct.len() as f64 / non_null.len() as f64
    };
    let avg_length = if non_null.is_empty() {
        0.0
    } else {
        non_null
            .iter()
            .map(|value| value.chars().count())
            .sum::<usize>() as f64
            / non_null.len() as f64
    };

    let sampled: Vec<&str> = non_null
        .iter()
        .copied()
        .take(settings.sample_cap)
        .collect();
    let mut tally: BTreeMap<PatternTag, usize> = BTreeMap::new();
    let mut detected: BTreeSet<PatternTag> = BTreeSet::new();
    for value in &sampled {
        for tag in detect(value) {
            detected.insert(tag);
            *tally.entry(tag).or_insert(0) += 1;
        }
    }

    let dominant = pick_dominant(&tally, avg_length, settings.long_text_threshold);
    if !sampled.is_empty() {
        detected.insert(dominant);
    }
    let confidence = if sampled.is_empty() {
        0.0
    } else {
        tally.get(&dominant).copied().unwrap_or(0) as f64 / sampled.len() as f64
    };

    let samples: Vec<String> = non_null
        .iter()
        .take(settings.max_samples)
        .map(|value| (*value).to_string())
        .collect();

    let coarse_type = infer_coarse_type(dominant, &sampled);

    tracing::debug!(
        column = name,
        dominant = %dominant,
        confidence,
        null_ratio,
        "analyzed column"
    );

    ColumnProfile {
        name: name.to_string(),
        normalized_name: normalize_name(name),
        detected,
        dominant,
        confidence,
        samples,
        null_ratio,
        unique_ratio,
        avg_length,
        coarse_type,
    }
}

/// Highest-tally specific pattern wins; ties break toward the higher
/// detection priority. The generic text tags cannot win unless no specific
/// pattern ever matched, in which case the average value length decides
/// between the short and long fallback.
fn pick_dominant(
    tally: &BTreeMap<PatternTag, usize>,
    avg_length: f64,
    long_text_threshold: usize,
) -> PatternTag {
    let mut best: Option<(PatternTag, usize)> = None;
    for tag in PatternTag::ALL {
        if tag.is_generic_text() || tag == PatternTag::Unknown {
            continue;
        }
        if let Some(count) = tally.get(&tag).copied()
            && count > 0
            && best.is_none_or(|(_, best_count)| count > best_count)
        {
            best = Some((tag, count));
        }
    }
    match best {
        Some((tag, _)) => tag,
        None if avg_length >= long_text_threshold as f64 => PatternTag::LongText,
        None => PatternTag::ShortText,
    }
}

fn infer_coarse_type(dominant: PatternTag, sampled: &[&str]) -> CoarseType {
    match dominant {
        PatternTag::Integer | PatternTag::Decimal => CoarseType::Number,
        PatternTag::Boolean => CoarseType::Boolean,
        tag if tag.is_date() => CoarseType::Date,
        _ => {
            let all_numeric =
                !sampled.is_empty() && sampled.iter().all(|value| value.parse::<f64>().is_ok());
            if all_numeric {
                CoarseType::Number
            } else {
                CoarseType::Text
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(name: &str, values: &[&str]) -> ColumnProfile {
        let owned: Vec<String> = values.iter().map(|v| (*v).to_string()).collect();
        analyze_column(name, &owned, &AnalyzerSettings::default())
    }

    #[test]
    fn dominant_is_the_most_common_specific_pattern() {
        let profile = analyze(
            "DOB",
            &["03/14/1955", "07/02/1961", "12/30/1949", "not a date"],
        );
        assert_eq!(profile.dominant, PatternTag::DateUs);
        assert!((profile.confidence - 0.75).abs() < 1e-9);
        assert_eq!(profile.coarse_type, CoarseType::Date);
    }

    #[test]
    fn generic_text_cannot_outvote_a_specific_pattern() {
        // Three free-text values, two dates: the date family still wins.
        let profile = analyze(
            "mixed",
            &["alpha", "beta", "gamma", "1999-01-01", "2001-02-03"],
        );
        assert_eq!(profile.dominant, PatternTag::DateIso);
    }

    #[test]
    fn unpatterned_column_falls_back_by_length() {
        let short = analyze("note", &["ok", "fine", "well"]);
        assert_eq!(short.dominant, PatternTag::ShortText);

        let long_value = "The patient was advised to continue the current dosage for two weeks";
        let long = analyze("note", &[long_value, long_value]);
        assert_eq!(long.dominant, PatternTag::LongText);
    }

    #[test]
    fn null_and_uniqueness_use_the_full_column() {
        let profile = analyze("id", &["a", "", "b", "", "a"]);
        assert!((profile.null_ratio - 0.4).abs() < 1e-9);
        assert!((profile.unique_ratio - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn confidence_grows_with_dominant_share() {
        let low = analyze("v", &["1999-01-01", "x", "y", "z"]);
        let high = analyze("v", &["1999-01-01", "1999-01-02", "1999-01-03", "z"]);
        assert_eq!(low.dominant, PatternTag::DateIso);
        assert_eq!(high.dominant, PatternTag::DateIso);
        assert!(high.confidence > low.confidence);
    }

    #[test]
    fn all_null_column_profiles_cleanly() {
        let profile = analyze("empty", &["", "  ", ""]);
        assert!(profile.detected.is_empty());
        assert_eq!(profile.dominant, PatternTag::ShortText);
        assert_eq!(profile.confidence, 0.0);
        assert!((profile.null_ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn samples_are_capped_and_in_source_order() {
        let values: Vec<&str> = vec!["a", "b", "c", "d", "e", "f", "g"];
        let profile = analyze("col", &values);
        assert_eq!(profile.samples, vec!["a", "b", "c", "d", "e"]);
    }
}
