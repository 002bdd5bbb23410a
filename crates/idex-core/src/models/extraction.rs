use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::document::DocumentType;

/// Fields read from a PAN card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct PanFields {
    pub pan_number: Option<String>,
    pub name: Option<String>,
    pub fathers_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub signature_present: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan_valid: Option<bool>,
}

/// Fields read from an Aadhaar card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AadhaarFields {
    pub aadhaar_number: Option<String>,
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub qr_code_present: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aadhaar_valid: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ExtractionFields {
    Pan(PanFields),
    Aadhaar(AadhaarFields),
}

/// Textual form of a model-supplied value. Strings are taken as-is, `null` is absent.
fn text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn flag(fields: &Map<String, Value>, key: &str) -> Option<bool> {
    fields.get(key).and_then(Value::as_bool)
}

impl ExtractionFields {
    /// Build the typed record for `document_type` from a parsed model answer.
    ///
    /// Keys outside the record's schema are dropped.
    pub fn from_map(document_type: DocumentType, fields: &Map<String, Value>) -> Self {
        match document_type {
            DocumentType::Pan => ExtractionFields::Pan(PanFields {
                pan_number: text(fields, "pan_number"),
                name: text(fields, "name"),
                fathers_name: text(fields, "fathers_name"),
                date_of_birth: text(fields, "date_of_birth"),
                signature_present: text(fields, "signature_present"),
                pan_valid: flag(fields, "pan_valid"),
            }),
            DocumentType::Aadhaar => ExtractionFields::Aadhaar(AadhaarFields {
                aadhaar_number: text(fields, "aadhaar_number"),
                name: text(fields, "name"),
                date_of_birth: text(fields, "date_of_birth"),
                gender: text(fields, "gender"),
                address: text(fields, "address"),
                qr_code_present: text(fields, "qr_code_present"),
                aadhaar_valid: flag(fields, "aadhaar_valid"),
            }),
        }
    }

    pub fn document_type(&self) -> DocumentType {
        match self {
            ExtractionFields::Pan(_) => DocumentType::Pan,
            ExtractionFields::Aadhaar(_) => DocumentType::Aadhaar,
        }
    }

    pub fn number(&self) -> Option<&str> {
        match self {
            ExtractionFields::Pan(f) => f.pan_number.as_deref(),
            ExtractionFields::Aadhaar(f) => f.aadhaar_number.as_deref(),
        }
    }

    /// `None` when the format validator did not run.
    pub fn is_valid(&self) -> Option<bool> {
        match self {
            ExtractionFields::Pan(f) => f.pan_valid,
            ExtractionFields::Aadhaar(f) => f.aadhaar_valid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExtractionMetadata {
    pub processed_at: DateTime<Utc>,
    pub processing_time_ms: f64,
    pub model_version: String,
    pub original_filename: Option<String>,
    pub file_size_bytes: Option<u64>,
}

/// Milliseconds rounded to two decimal places.
pub fn elapsed_ms(elapsed: Duration) -> f64 {
    (elapsed.as_nanos() as f64 / 10_000.0).round() / 100.0
}

impl ExtractionMetadata {
    pub fn new(
        elapsed: Duration,
        model_version: impl Into<String>,
        original_filename: Option<&str>,
        file_size_bytes: Option<u64>,
    ) -> Self {
        Self {
            processed_at: Utc::now(),
            processing_time_ms: elapsed_ms(elapsed),
            model_version: model_version.into(),
            original_filename: original_filename.map(str::to_string),
            file_size_bytes,
        }
    }
}

/// Outcome of one extraction. Exactly one of `data` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExtractionResult {
    status: ExtractionStatus,
    document_type: DocumentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<ExtractionFields>,
    metadata: ExtractionMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ExtractionResult {
    pub fn success(data: ExtractionFields, metadata: ExtractionMetadata) -> Self {
        Self {
            status: ExtractionStatus::Success,
            document_type: data.document_type(),
            data: Some(data),
            metadata,
            error: None,
        }
    }

    pub fn failure(
        document_type: DocumentType,
        error: impl ToString,
        metadata: ExtractionMetadata,
    ) -> Self {
        Self {
            status: ExtractionStatus::Error,
            document_type,
            data: None,
            metadata,
            error: Some(error.to_string()),
        }
    }

    pub fn status(&self) -> ExtractionStatus {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status == ExtractionStatus::Success
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn data(&self) -> Option<&ExtractionFields> {
        self.data.as_ref()
    }

    pub fn metadata(&self) -> &ExtractionMetadata {
        &self.metadata
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
