//! Best-effort origin-system detection from column naming conventions.

use carelift_model::OriginSystem;

/// Vendor-specific substrings scanned for in normalized column names, in
/// detection order. First system with any hit wins.
const ORIGIN_KEYWORDS: &[(OriginSystem, &[&str])] = &[
    (
        OriginSystem::Epic,
        &["epic", "pat_enc", "pat_mrn", "csn_id", "zc_"],
    ),
    (
        OriginSystem::Cerner,
        &["cerner", "person_id", "encntr", "millennium"],
    ),
    (OriginSystem::Meditech, &["meditech", "mt_urn"]),
    (OriginSystem::Athenahealth, &["athena", "athenanet"]),
    (OriginSystem::Allscripts, &["allscripts", "touchworks"]),
];

/// Scan normalized column names for vendor naming conventions. Absence of
/// a match leaves the origin undetermined; this never fails.
pub fn detect_origin<'a>(normalized_names: impl Iterator<Item = &'a str>) -> Option<OriginSystem> {
    let names: Vec<&str> = normalized_names.collect();
    for (system, keywords) in ORIGIN_KEYWORDS {
        let hit = names
            .iter()
            .any(|name| keywords.iter().any(|keyword| name.contains(keyword)));
        if hit {
            return Some(*system);
        }
    }
    None
}
