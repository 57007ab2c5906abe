use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic pattern families recognized in source values.
///
/// The declaration order is the detection priority order: clinical code
/// systems first, then identifiers, contact and demographic shapes, dates,
/// numerics, and finally the two generic text fallbacks. The same order
/// defines the slot layout of a fingerprint's signature vector, so adding
/// or reordering variants is a fingerprint-format change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternTag {
    /// National Provider Identifier (10 digits, Luhn-protected).
    Npi,
    /// ICD-10 diagnosis code (e.g. E11.9).
    Icd10,
    /// CPT procedure code (5 digits, or 4 digits + category letter).
    Cpt,
    /// NDC drug code (4-4-2, 5-3-2, 5-4-1 or bare 11-digit).
    Ndc,
    /// LOINC observation code (1-5 digits, hyphen, check digit).
    Loinc,
    /// US Social Security Number.
    Ssn,
    /// Medical record number (prefixed institutional identifier).
    Mrn,
    /// RFC 4122 UUID.
    Uuid,
    Email,
    Phone,
    ZipCode,
    /// Two-letter US state or territory code.
    StateCode,
    Gender,
    /// ISO 8601 date with time component.
    DateTime,
    /// ISO 8601 calendar date (YYYY-MM-DD).
    DateIso,
    /// US-style slash or dash date (MM/DD/YYYY).
    DateUs,
    Boolean,
    Decimal,
    Integer,
    /// Generic fallback for free text above the long-text threshold.
    LongText,
    /// Generic fallback for short free text.
    ShortText,
    /// Empty or whitespace-only input.
    Unknown,
}

impl PatternTag {
    /// All tags in detection priority / signature-slot order.
    pub const ALL: [PatternTag; 22] = [
        PatternTag::Npi,
        PatternTag::Icd10,
        PatternTag::Cpt,
        PatternTag::Ndc,
        PatternTag::Loinc,
        PatternTag::Ssn,
        PatternTag::Mrn,
        PatternTag::Uuid,
        PatternTag::Email,
        PatternTag::Phone,
        PatternTag::ZipCode,
        PatternTag::StateCode,
        PatternTag::Gender,
        PatternTag::DateTime,
        PatternTag::DateIso,
        PatternTag::DateUs,
        PatternTag::Boolean,
        PatternTag::Decimal,
        PatternTag::Integer,
        PatternTag::LongText,
        PatternTag::ShortText,
        PatternTag::Unknown,
    ];

    /// Number of signature-vector slots.
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this tag in the signature vector.
    pub fn slot(self) -> usize {
        Self::ALL
            .iter()
            .position(|tag| *tag == self)
            .unwrap_or(Self::COUNT - 1)
    }

    /// True for the catch-all text tags that must not win dominance over a
    /// specific pattern.
    pub fn is_generic_text(self) -> bool {
        matches!(self, PatternTag::ShortText | PatternTag::LongText)
    }

    /// True for date-family tags.
    pub fn is_date(self) -> bool {
        matches!(
            self,
            PatternTag::DateTime | PatternTag::DateIso | PatternTag::DateUs
        )
    }

    /// True when a pattern match alone is not sufficient and a structural
    /// check-digit validation is required downstream.
    pub fn is_checksum_protected(self) -> bool {
        matches!(self, PatternTag::Npi)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PatternTag::Npi => "NPI",
            PatternTag::Icd10 => "ICD10",
            PatternTag::Cpt => "CPT",
            PatternTag::Ndc => "NDC",
            PatternTag::Loinc => "LOINC",
            PatternTag::Ssn => "SSN",
            PatternTag::Mrn => "MRN",
            PatternTag::Uuid => "UUID",
            PatternTag::Email => "EMAIL",
            PatternTag::Phone => "PHONE",
            PatternTag::ZipCode => "ZIP_CODE",
            PatternTag::StateCode => "STATE_CODE",
            PatternTag::Gender => "GENDER",
            PatternTag::DateTime => "DATE_TIME",
            PatternTag::DateIso => "DATE_ISO",
            PatternTag::DateUs => "DATE_US",
            PatternTag::Boolean => "BOOLEAN",
            PatternTag::Decimal => "DECIMAL",
            PatternTag::Integer => "INTEGER",
            PatternTag::LongText => "LONG_TEXT",
            PatternTag::ShortText => "SHORT_TEXT",
            PatternTag::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for PatternTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PatternTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        Self::ALL
            .iter()
            .find(|tag| tag.as_str() == normalized)
            .copied()
            .ok_or_else(|| format!("Unknown pattern tag: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_stable_and_unique() {
        for (idx, tag) in PatternTag::ALL.iter().enumerate() {
            assert_eq!(tag.slot(), idx);
        }
    }

    #[test]
    fn round_trips_through_str() {
        for tag in PatternTag::ALL {
            assert_eq!(tag.as_str().parse::<PatternTag>().unwrap(), tag);
        }
    }

    #[test]
    fn generic_tags_are_text_fallbacks() {
        assert!(PatternTag::ShortText.is_generic_text());
        assert!(PatternTag::LongText.is_generic_text());
        assert!(!PatternTag::Npi.is_generic_text());
    }
}
