//! Identity-number format checks.
//!
//! PAN: 5 letters, 4 digits, 1 letter after removing whitespace and uppercasing.
//! Aadhaar: 12 characters of digits or `X` (masked) after removing whitespace and
//! hyphens, not fully masked. A 12-character Aadhaar value is regrouped as
//! `dddd dddd dddd`; anything else keeps its cleaned form.
//!
//! A malformed number is not an error: it is reported through the `*_valid` flag.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::models::DocumentType;

static PAN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("PAN pattern is valid"));

static AADHAAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9X]{12}$").expect("Aadhaar pattern is valid"));

const AADHAAR_LEN: usize = 12;

/// Which document types get their number checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub pan: bool,
    pub aadhaar: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            pan: true,
            aadhaar: true,
        }
    }
}

impl ValidationPolicy {
    pub fn applies_to(&self, document_type: DocumentType) -> bool {
        match document_type {
            DocumentType::Pan => self.pan,
            DocumentType::Aadhaar => self.aadhaar,
        }
    }
}

pub fn normalize_pan(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn is_valid_pan(normalized: &str) -> bool {
    PAN_PATTERN.is_match(normalized)
}

fn strip_aadhaar(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

pub fn normalize_aadhaar(raw: &str) -> String {
    let cleaned: Vec<char> = strip_aadhaar(raw).chars().collect();
    if cleaned.len() != AADHAAR_LEN {
        return cleaned.into_iter().collect();
    }

    cleaned
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Accepts raw or normalized input; separators are ignored.
pub fn is_valid_aadhaar(value: &str) -> bool {
    let cleaned = strip_aadhaar(value);
    AADHAAR_PATTERN.is_match(&cleaned) && cleaned.chars().any(|c| c != 'X')
}

/// Normalize the identity number of `fields` and record whether it is well formed.
///
/// The number is rewritten only when it is a non-empty string. A missing, empty
/// or non-string number is left as is and flagged invalid. All other keys pass
/// through untouched. Applying this twice gives the same mapping as applying it once.
pub fn validate_and_normalize(
    fields: &Map<String, Value>,
    document_type: DocumentType,
) -> Map<String, Value> {
    let mut out = fields.clone();
    let number_key = document_type.number_field();

    let raw = match fields.get(number_key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    };

    let valid = match raw {
        Some(raw) => {
            let (normalized, valid) = match document_type {
                DocumentType::Pan => {
                    let pan = normalize_pan(raw);
                    let valid = is_valid_pan(&pan);
                    (pan, valid)
                }
                DocumentType::Aadhaar => {
                    let aadhaar = normalize_aadhaar(raw);
                    let valid = is_valid_aadhaar(&aadhaar);
                    (aadhaar, valid)
                }
            };
            out.insert(number_key.to_string(), Value::String(normalized));
            valid
        }
        None => false,
    };

    out.insert(document_type.valid_field().to_string(), Value::Bool(valid));
    out
}
