//! Transformation inference: a deterministic rule table over the source
//! column's dominant pattern and the chosen target column name.

use carelift_model::{PatternTag, TransformKind};

/// Decide whether a mapping needs a transformation. Pure function; the
/// same inputs always produce the same answer.
pub fn infer_transform(dominant: PatternTag, target_column: &str) -> Option<TransformKind> {
    let target = target_column.to_ascii_lowercase();

    if is_date_target(&target) {
        return match dominant {
            // Already canonical.
            PatternTag::DateIso => None,
            PatternTag::DateUs | PatternTag::DateTime => Some(TransformKind::DateToIso),
            // Free text landing on a date column still goes through the
            // parser so validation sees a canonical value or a clean error.
            PatternTag::ShortText => Some(TransformKind::DateToIso),
            _ => None,
        };
    }

    if dominant == PatternTag::Phone && target.contains("phone") {
        return Some(TransformKind::PhoneDigits);
    }

    if target == "state" && matches!(dominant, PatternTag::ShortText | PatternTag::LongText) {
        return Some(TransformKind::StateToCode);
    }

    if matches!(dominant, PatternTag::ShortText | PatternTag::LongText) {
        if target == "first_name" {
            return Some(TransformKind::NameGivenPart);
        }
        if target == "last_name" {
            return Some(TransformKind::NameFamilyPart);
        }
    }

    None
}

fn is_date_target(target: &str) -> bool {
    target.contains("date") || target.ends_with("_at") || target == "dob"
}
