//! Validation modules

pub mod identity;

pub use identity::{
    is_valid_aadhaar, is_valid_pan, normalize_aadhaar, normalize_pan, validate_and_normalize,
    ValidationPolicy,
};
