//! Ordered pattern classification of a single textual value.
//!
//! Matchers run in the fixed priority order defined by
//! [`PatternTag::ALL`]: clinical code systems first, then identifiers,
//! contact/demographic shapes, dates and numerics. Every non-empty value
//! additionally receives one of the two generic text-length fallbacks, so
//! downstream tallying can always fall back to a text classification.

use std::sync::LazyLock;

use regex::Regex;

use carelift_model::PatternTag;

use crate::shapes::{is_email_shape, is_iso_date, is_state_code};

/// Values at or above this length fall into the long-text bucket.
pub const LONG_TEXT_MIN: usize = 40;

static NPI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("Invalid NPI regex"));

static ICD10_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-TV-Z]\d[0-9A-Z](\.[0-9A-Z]{1,4})?$").expect("Invalid ICD-10 regex")
});

/// Five digits, or four digits plus a Category II/III letter.
static CPT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{5}|\d{4}[FTU])$").expect("Invalid CPT regex"));

/// NDC in any of its three hyphenated shapes, or the bare 11-digit form.
static NDC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{4}-\d{2}|\d{5}-\d{3}-\d{2}|\d{5}-\d{4}-\d|\d{11})$")
        .expect("Invalid NDC regex")
});

static LOINC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,5}-\d$").expect("Invalid LOINC regex"));

static SSN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{3}-\d{2}-\d{4}|\d{9})$").expect("Invalid SSN regex"));

static MRN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(MRN|MR)[-#:\s]?\d{5,10}$").expect("Invalid MRN regex")
});

static UUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("Invalid UUID regex")
});

static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?1?[\s.-]?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}$").expect("Invalid phone regex")
});

static ZIP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("Invalid ZIP regex"));

static DATETIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}(:\d{2})?(\.\d+)?(Z|[+-]\d{2}:?\d{2})?$")
        .expect("Invalid datetime regex")
});

static DATE_US_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2}[/-]\d{1,2}[/-](\d{4}|\d{2})$").expect("Invalid US date regex")
});

static DECIMAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+\.\d+$").expect("Invalid decimal regex"));

static INTEGER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+$").expect("Invalid integer regex"));

const GENDER_VALUES: &[&str] = &[
    "m",
    "f",
    "male",
    "female",
    "other",
    "unknown",
    "u",
    "nonbinary",
    "non-binary",
];

const BOOLEAN_VALUES: &[&str] = &["true", "false", "yes", "no", "t", "f", "y", "n"];

/// Classify one value into every pattern family whose matcher succeeds, in
/// priority order. Empty or whitespace-only input yields `[Unknown]`;
/// anything else ends with its text-length fallback tag.
pub fn detect(value: &str) -> Vec<PatternTag> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return vec![PatternTag::Unknown];
    }
    let mut tags = Vec::new();
    for tag in PatternTag::ALL {
        if tag.is_generic_text() || tag == PatternTag::Unknown {
            continue;
        }
        if matches_tag(tag, trimmed) {
            tags.push(tag);
        }
    }
    tags.push(generic_text_tag(trimmed));
    tags
}

/// The length-based fallback for a non-empty value.
pub fn generic_text_tag(trimmed: &str) -> PatternTag {
    if trimmed.chars().count() >= LONG_TEXT_MIN {
        PatternTag::LongText
    } else {
        PatternTag::ShortText
    }
}

fn matches_tag(tag: PatternTag, value: &str) -> bool {
    match tag {
        PatternTag::Npi => NPI_REGEX.is_match(value),
        PatternTag::Icd10 => ICD10_REGEX.is_match(value),
        PatternTag::Cpt => CPT_REGEX.is_match(value),
        PatternTag::Ndc => NDC_REGEX.is_match(value),
        PatternTag::Loinc => LOINC_REGEX.is_match(value),
        PatternTag::Ssn => SSN_REGEX.is_match(value),
        PatternTag::Mrn => MRN_REGEX.is_match(value),
        PatternTag::Uuid => UUID_REGEX.is_match(value),
        PatternTag::Email => is_email_shape(value),
        PatternTag::Phone => PHONE_REGEX.is_match(value),
        PatternTag::ZipCode => ZIP_REGEX.is_match(value),
        PatternTag::StateCode => is_state_code(value),
        PatternTag::Gender => contains_folded(GENDER_VALUES, value),
        PatternTag::DateTime => DATETIME_REGEX.is_match(value),
        PatternTag::DateIso => is_iso_date(value),
        PatternTag::DateUs => DATE_US_REGEX.is_match(value),
        PatternTag::Boolean => contains_folded(BOOLEAN_VALUES, value),
        PatternTag::Decimal => DECIMAL_REGEX.is_match(value),
        PatternTag::Integer => INTEGER_REGEX.is_match(value),
        PatternTag::LongText | PatternTag::ShortText | PatternTag::Unknown => false,
    }
}

fn contains_folded(values: &[&str], value: &str) -> bool {
    values.iter().any(|v| v.eq_ignore_ascii_case(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_unknown() {
        assert_eq!(detect(""), vec![PatternTag::Unknown]);
        assert_eq!(detect("   "), vec![PatternTag::Unknown]);
    }

    #[test]
    fn detection_is_idempotent_and_order_stable() {
        let first = detect("1234567893");
        let second = detect("1234567893");
        assert_eq!(first, second);
        // Priority order: clinical identifier before generic numerics.
        assert_eq!(first.first(), Some(&PatternTag::Npi));
        assert!(first.contains(&PatternTag::Integer));
        assert_eq!(first.last(), Some(&PatternTag::ShortText));
    }

    #[test]
    fn clinical_codes_match_their_shapes() {
        assert!(detect("E11.9").contains(&PatternTag::Icd10));
        assert!(detect("99213").contains(&PatternTag::Cpt));
        assert!(detect("0001F").contains(&PatternTag::Cpt));
        assert!(detect("2345-7").contains(&PatternTag::Loinc));
    }

    #[test]
    fn ndc_accepts_all_three_hyphenated_shapes() {
        assert!(detect("0002-3227-30").contains(&PatternTag::Ndc));
        assert!(detect("50242-040-62").contains(&PatternTag::Ndc));
        assert!(detect("60505-2638-1").contains(&PatternTag::Ndc));
        assert!(detect("00023227301").contains(&PatternTag::Ndc));
    }

    #[test]
    fn dates_split_by_family() {
        assert!(detect("1955-03-14").contains(&PatternTag::DateIso));
        assert!(detect("03/14/1955").contains(&PatternTag::DateUs));
        assert!(detect("2023-01-02T10:30:00").contains(&PatternTag::DateTime));
        assert!(!detect("03/14/1955").contains(&PatternTag::DateIso));
    }

    #[test]
    fn long_values_fall_back_to_long_text() {
        let value = "Patient reported persistent dizziness after the morning dose";
        let tags = detect(value);
        assert_eq!(tags.last(), Some(&PatternTag::LongText));
    }

    #[test]
    fn contact_shapes() {
        assert!(detect("nurse@clinic.org").contains(&PatternTag::Email));
        assert!(detect("(206) 555-0134").contains(&PatternTag::Phone));
        assert!(detect("98101").contains(&PatternTag::ZipCode));
        assert!(detect("WA").contains(&PatternTag::StateCode));
    }

    #[test]
    fn mrn_prefixed_identifiers() {
        assert!(detect("MRN-0012345").contains(&PatternTag::Mrn));
        assert!(detect("mrn 884422").contains(&PatternTag::Mrn));
        assert!(!detect("0012345").contains(&PatternTag::Mrn));
    }
}
