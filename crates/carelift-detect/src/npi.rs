//! Structural validation of National Provider Identifiers.
//!
//! A pattern match on ten digits is never sufficient for an NPI: the final
//! digit is a Luhn check digit computed over the identifier prefixed with
//! the fixed institutional prefix 80840. Downstream validation must call
//! [`validate_npi`] rather than trusting the detected pattern.

/// Prefix identifying the US health-industry card issuer, prepended before
/// the check-digit computation.
const NPI_PREFIX: [u32; 5] = [8, 0, 8, 4, 0];

/// Validate a candidate NPI: exactly ten digits whose Luhn sum over the
/// 80840-prefixed digit string is divisible by 10.
pub fn validate_npi(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.len() != 10 {
        return false;
    }
    let mut digits = Vec::with_capacity(15);
    digits.extend(NPI_PREFIX);
    for ch in trimmed.chars() {
        match ch.to_digit(10) {
            Some(digit) => digits.push(digit),
            None => return false,
        }
    }
    luhn_sum(&digits) % 10 == 0
}

/// Luhn sum: double every second digit from the right, subtract 9 when the
/// doubled value exceeds 9, sum everything.
fn luhn_sum(digits: &[u32]) -> u32 {
    let mut sum = 0;
    for (idx, digit) in digits.iter().rev().enumerate() {
        let mut d = *digit;
        if idx % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_valid_identifiers() {
        assert!(validate_npi("1234567893"));
        assert!(validate_npi("1111111112"));
        assert!(validate_npi(" 1234567893 "));
    }

    #[test]
    fn rejects_corrupted_check_digit() {
        assert!(!validate_npi("1234567894"));
        assert!(!validate_npi("1111111113"));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(!validate_npi(""));
        assert!(!validate_npi("123456789"));
        assert!(!validate_npi("12345678901"));
        assert!(!validate_npi("12345678a3"));
    }
}
