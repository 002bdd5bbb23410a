//! Recovery of a JSON object from free-text model output.
//!
//! Vision models wrap their JSON in prose or markdown fences more often than not.
//! [`parse_model_response`] tries progressively looser readings of the text and
//! returns the first one that yields a JSON object. Malformed JSON is never repaired.

use serde_json::{Map, Value};

use crate::constants::PARSE_PREVIEW_CHARS;
use crate::error::ExtractionError;
use crate::models::DocumentType;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

fn as_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn from_json_fence(text: &str) -> Option<Map<String, Value>> {
    let (_, after) = text.split_once(JSON_FENCE)?;
    let body = after.split(FENCE).next().unwrap_or(after);
    as_object(body)
}

fn from_any_fence(text: &str) -> Option<Map<String, Value>> {
    as_object(text.split(FENCE).nth(1)?)
}

/// Substring from a `{` to the last `}`, trying each opening brace in turn.
fn from_braces(text: &str) -> Option<Map<String, Value>> {
    let end = text.rfind('}')?;
    text[..end]
        .match_indices('{')
        .find_map(|(start, _)| as_object(&text[start..=end]))
}

fn preview(text: &str) -> String {
    text.chars().take(PARSE_PREVIEW_CHARS).collect()
}

/// Extract the JSON object a model answer contains.
///
/// Readings are tried in order: the whole text, a ```` ```json ```` block, the
/// first fenced block, then the span from an opening brace to the last closing
/// brace. Fails with [`ExtractionError::Parse`] holding the first 500 characters.
pub fn parse_model_response(raw: &str) -> Result<Map<String, Value>, ExtractionError> {
    as_object(raw)
        .or_else(|| from_json_fence(raw))
        .or_else(|| from_any_fence(raw))
        .or_else(|| from_braces(raw))
        .ok_or_else(|| ExtractionError::Parse {
            preview: preview(raw),
        })
}

/// Reject a parsed answer that carries none of `document_type`'s fields.
///
/// Error payloads from the model endpoint (`{"error": "..."}`) parse as objects
/// but are not extractions.
pub fn ensure_expected_fields(
    fields: &Map<String, Value>,
    document_type: DocumentType,
    raw: &str,
) -> Result<(), ExtractionError> {
    if document_type.fields().iter().any(|key| fields.contains_key(*key)) {
        Ok(())
    } else {
        Err(ExtractionError::MissingFields {
            preview: preview(raw),
        })
    }
}
