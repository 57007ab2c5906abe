pub mod datetime;
pub mod error;
pub mod rules;
pub mod states;
pub mod text;

pub use datetime::{parse_date, to_iso_date};
pub use error::TransformError;
pub use rules::infer_transform;
pub use states::to_state_code;
pub use text::{name_family_part, name_given_part, phone_digits};

use carelift_model::TransformKind;

/// Apply a transformation to one source value.
pub fn apply(kind: TransformKind, value: &str) -> Result<String, TransformError> {
    match kind {
        TransformKind::DateToIso => to_iso_date(value),
        TransformKind::PhoneDigits => phone_digits(value),
        TransformKind::NameGivenPart => Ok(name_given_part(value)),
        TransformKind::NameFamilyPart => Ok(name_family_part(value)),
        TransformKind::StateToCode => to_state_code(value),
    }
}
