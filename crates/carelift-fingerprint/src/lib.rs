pub mod builder;
pub mod hash;
pub mod origin;

pub use builder::{fingerprint, from_profiles};
pub use hash::sha256_hex;
pub use origin::detect_origin;
