//! Column-specific value validation applied after transformation.
//!
//! Messages are column-scoped and value-free so the distinct-error set on
//! a migration result stays reviewable even when thousands of rows fail
//! the same way.

use carelift_detect::{is_email_shape, is_iso_date, is_state_code, validate_npi};
use carelift_model::{TargetColumn, ValueFormat};

/// Validate one transformed value against its target column's rules.
pub fn validate_value(column: &TargetColumn, value: Option<&str>) -> Result<(), String> {
    let Some(value) = value else {
        if column.required {
            return Err(format!("required field '{}' is missing", column.name));
        }
        return Ok(());
    };
    match column.format {
        Some(ValueFormat::NpiChecksum) => {
            if !validate_npi(value) {
                return Err(format!("'{}' failed the NPI check digit", column.name));
            }
        }
        Some(ValueFormat::IsoDate) => {
            if !is_iso_date(value) {
                return Err(format!("'{}' is not an ISO 8601 date", column.name));
            }
        }
        Some(ValueFormat::StateCode) => {
            if !is_state_code(value) {
                return Err(format!("'{}' is not a two-letter state code", column.name));
            }
        }
        Some(ValueFormat::Email) => {
            if !is_email_shape(value) {
                return Err(format!("'{}' is not a valid email address", column.name));
            }
        }
        None => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use carelift_model::PatternTag;
    use std::collections::BTreeSet;

    fn column(required: bool, format: Option<ValueFormat>) -> TargetColumn {
        TargetColumn {
            name: "field".to_string(),
            accepted: BTreeSet::from([PatternTag::ShortText]),
            required,
            format,
        }
    }

    #[test]
    fn required_null_is_rejected() {
        assert!(validate_value(&column(true, None), None).is_err());
        assert!(validate_value(&column(false, None), None).is_ok());
    }

    #[test]
    fn checksum_validation_is_stricter_than_the_pattern() {
        let npi = column(false, Some(ValueFormat::NpiChecksum));
        // Ten digits, so the pattern matches, but the check digit is wrong.
        assert!(validate_value(&npi, Some("1234567894")).is_err());
        assert!(validate_value(&npi, Some("1234567893")).is_ok());
    }

    #[test]
    fn format_rules_by_kind() {
        assert!(validate_value(&column(false, Some(ValueFormat::IsoDate)), Some("1955-03-14")).is_ok());
        assert!(
            validate_value(&column(false, Some(ValueFormat::IsoDate)), Some("03/14/1955")).is_err()
        );
        assert!(validate_value(&column(false, Some(ValueFormat::StateCode)), Some("WA")).is_ok());
        assert!(validate_value(&column(false, Some(ValueFormat::StateCode)), Some("Wash")).is_err());
        assert!(validate_value(&column(false, Some(ValueFormat::Email)), Some("a@b.org")).is_ok());
        assert!(validate_value(&column(false, Some(ValueFormat::Email)), Some("a-b.org")).is_err());
    }
}
