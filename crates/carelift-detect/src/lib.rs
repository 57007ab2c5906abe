pub mod npi;
pub mod patterns;
pub mod shapes;

pub use npi::validate_npi;
pub use patterns::{LONG_TEXT_MIN, detect, generic_text_tag};
pub use shapes::{STATE_CODES, is_email_shape, is_iso_date, is_state_code};
