//! Phone and name normalization.

use crate::error::TransformError;

/// Strip a phone number to its 10 significant digits, dropping a leading
/// US country code.
pub fn phone_digits(value: &str) -> Result<String, TransformError> {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        10 => Ok(digits),
        11 if digits.starts_with('1') => Ok(digits[1..].to_string()),
        _ => Err(TransformError::InvalidPhone(value.trim().to_string())),
    }
}

/// Given (first) part of a combined name.
///
/// `"Smith, Mary"` yields `Mary`; without a comma the last whitespace token
/// is treated as the family name and everything before it as given. A
/// single token is returned unchanged.
pub fn name_given_part(value: &str) -> String {
    split_full_name(value).0
}

/// Family (last) part of a combined name.
pub fn name_family_part(value: &str) -> String {
    split_full_name(value).1
}

fn split_full_name(value: &str) -> (String, String) {
    let trimmed = value.trim();
    if let Some((family, given)) = trimmed.split_once(',') {
        return (given.trim().to_string(), family.trim().to_string());
    }
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    match tokens.as_slice() {
        [] => (String::new(), String::new()),
        [only] => ((*only).to_string(), (*only).to_string()),
        [given @ .., family] => (given.join(" "), (*family).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_strips_formatting() {
        assert_eq!(phone_digits("(206) 555-0134").unwrap(), "2065550134");
        assert_eq!(phone_digits("+1 206.555.0134").unwrap(), "2065550134");
        assert_eq!(phone_digits("206-555-0134").unwrap(), "2065550134");
    }

    #[test]
    fn phone_rejects_wrong_digit_counts() {
        assert!(phone_digits("555-0134").is_err());
        assert!(phone_digits("+44 20 7946 0958").is_err());
    }

    #[test]
    fn comma_names_split_family_first() {
        assert_eq!(name_given_part("Smith, Mary"), "Mary");
        assert_eq!(name_family_part("Smith, Mary"), "Smith");
    }

    #[test]
    fn space_names_split_family_last() {
        assert_eq!(name_given_part("Mary Jane Smith"), "Mary Jane");
        assert_eq!(name_family_part("Mary Jane Smith"), "Smith");
    }

    #[test]
    fn single_token_names_pass_through() {
        assert_eq!(name_given_part("Cher"), "Cher");
        assert_eq!(name_family_part("Cher"), "Cher");
    }
}
