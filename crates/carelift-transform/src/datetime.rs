//! Legacy date parsing and ISO 8601 (YYYY-MM-DD) output.
//!
//! Legacy healthcare exports carry dates in US slash forms, two-digit
//! years, month names and full timestamps. Parsing tries the known shapes
//! in order; an already-canonical date passes through untouched.

use chrono::NaiveDate;

use crate::error::TransformError;

/// Date-only formats tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y", "%Y/%m/%d", "%d-%b-%Y", "%B %d, %Y", "%b %d, %Y",
    "%m/%d/%y",
];

/// Datetime formats whose date part is kept.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Parse a legacy date value and render it as an ISO 8601 calendar date.
pub fn to_iso_date(value: &str) -> Result<String, TransformError> {
    let trimmed = value.trim();
    if let Some(date) = parse_date(trimmed) {
        return Ok(date.format("%Y-%m-%d").to_string());
    }
    Err(TransformError::UnparseableDate(trimmed.to_string()))
}

/// Try every known date and datetime shape.
pub fn parse_date(trimmed: &str) -> Option<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = chrono::NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn us_slash_dates_normalize() {
        assert_eq!(to_iso_date("03/14/1955").unwrap(), "1955-03-14");
        assert_eq!(to_iso_date("3/4/1955").unwrap(), "1955-03-04");
    }

    #[test]
    fn iso_dates_pass_through() {
        assert_eq!(to_iso_date("1955-03-14").unwrap(), "1955-03-14");
    }

    #[test]
    fn month_name_dates_normalize() {
        assert_eq!(to_iso_date("March 14, 1955").unwrap(), "1955-03-14");
        assert_eq!(to_iso_date("14-Mar-1955").unwrap(), "1955-03-14");
    }

    #[test]
    fn timestamps_keep_the_date_part() {
        assert_eq!(to_iso_date("2023-06-01T10:30:00").unwrap(), "2023-06-01");
        assert_eq!(to_iso_date("06/01/2023 10:30").unwrap(), "2023-06-01");
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(to_iso_date("not a date").is_err());
        assert!(to_iso_date("13/45/1955").is_err());
    }
}
