//! Free-text US state names to two-letter USPS codes.

use crate::error::TransformError;

const STATE_NAMES: &[(&str, &str)] = &[
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("delaware", "DE"),
    ("district of columbia", "DC"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("maine", "ME"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new hampshire", "NH"),
    ("new jersey", "NJ"),
    ("new mexico", "NM"),
    ("new york", "NY"),
    ("north carolina", "NC"),
    ("north dakota", "ND"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("pennsylvania", "PA"),
    ("rhode island", "RI"),
    ("south carolina", "SC"),
    ("south dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virginia", "VA"),
    ("washington", "WA"),
    ("west virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
];

/// Convert a state value to its two-letter code. Already-valid codes pass
/// through uppercased; full names are looked up case-insensitively.
pub fn to_state_code(value: &str) -> Result<String, TransformError> {
    let trimmed = value.trim();
    if trimmed.len() == 2 {
        let upper = trimmed.to_ascii_uppercase();
        if STATE_NAMES.iter().any(|(_, code)| *code == upper) {
            return Ok(upper);
        }
        return Err(TransformError::UnknownState(trimmed.to_string()));
    }
    let folded = trimmed.to_lowercase();
    let folded = folded.split_whitespace().collect::<Vec<_>>().join(" ");
    STATE_NAMES
        .iter()
        .find(|(name, _)| *name == folded)
        .map(|(_, code)| (*code).to_string())
        .ok_or_else(|| TransformError::UnknownState(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_names_map_to_codes() {
        assert_eq!(to_state_code("Washington").unwrap(), "WA");
        assert_eq!(to_state_code("new  york").unwrap(), "NY");
    }

    #[test]
    fn codes_pass_through_uppercased() {
        assert_eq!(to_state_code("wa").unwrap(), "WA");
        assert_eq!(to_state_code("CA").unwrap(), "CA");
    }

    #[test]
    fn unknown_states_are_errors() {
        assert!(to_state_code("Cascadia").is_err());
        assert!(to_state_code("XX").is_err());
    }
}
