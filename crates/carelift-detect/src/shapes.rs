//! Shape validators shared between pattern detection and migration-time
//! value validation.

use std::sync::LazyLock;

use regex::Regex;

/// Two-letter USPS codes for the 50 states, DC and the territories.
pub const STATE_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM",
    "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA",
    "WV", "WI", "WY", "AS", "GU", "MP", "PR", "VI",
];

static ISO_DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").expect("Invalid ISO date regex")
});

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

/// Strict ISO 8601 calendar date (YYYY-MM-DD, month and day ranges checked).
pub fn is_iso_date(value: &str) -> bool {
    ISO_DATE_REGEX.is_match(value.trim())
}

/// Minimal local-part@domain email shape.
pub fn is_email_shape(value: &str) -> bool {
    EMAIL_REGEX.is_match(value.trim())
}

/// Case-insensitive two-letter state/territory code check.
pub fn is_state_code(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.len() != 2 {
        return false;
    }
    let upper = trimmed.to_ascii_uppercase();
    STATE_CODES.contains(&upper.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_date_checks_ranges() {
        assert!(is_iso_date("1955-03-14"));
        assert!(is_iso_date("2024-12-31"));
        assert!(!is_iso_date("1955-13-14"));
        assert!(!is_iso_date("1955-00-14"));
        assert!(!is_iso_date("03/14/1955"));
    }

    #[test]
    fn state_codes_are_case_insensitive() {
        assert!(is_state_code("CA"));
        assert!(is_state_code("wa"));
        assert!(!is_state_code("XX"));
        assert!(!is_state_code("CAL"));
    }

    #[test]
    fn email_shape() {
        assert!(is_email_shape("a.person@clinic.org"));
        assert!(!is_email_shape("not-an-email"));
        assert!(!is_email_shape("a@b"));
    }
}
