//! Name normalization shared across analysis, mapping and learning.

/// Lowercase a column name and collapse every non-alphanumeric run into a
/// single underscore. `"Pat. DOB  (legacy)"` becomes `"pat_dob_legacy"`.
///
/// This is the canonical key shape for learned-mapping lookups, so any
/// change here invalidates the learned store.
pub fn normalize_name(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    let mut pending_separator = false;
    for ch in raw.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !normalized.is_empty() {
                normalized.push('_');
            }
            pending_separator = false;
            normalized.extend(ch.to_lowercase());
        } else {
            pending_separator = true;
        }
    }
    normalized
}

/// Lowercase and drop every non-alphanumeric character. Used by the
/// raw-name substring heuristic where separators must not matter.
pub fn strip_separators(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(normalize_name("Pat. DOB  (legacy)"), "pat_dob_legacy");
        assert_eq!(normalize_name("first_name"), "first_name");
        assert_eq!(normalize_name("  NPI#  "), "npi");
    }

    #[test]
    fn strip_separators_drops_everything_non_alphanumeric() {
        assert_eq!(strip_separators("First-Name_2"), "firstname2");
        assert_eq!(strip_separators("NPI NUM"), "npinum");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_name("Visit Date/Time");
        assert_eq!(normalize_name(&once), once);
    }
}
