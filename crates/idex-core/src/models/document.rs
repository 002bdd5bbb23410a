use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ExtractionError;

/// Kind of identity card a document is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pan,
    Aadhaar,
}

impl DocumentType {
    pub const ALL: [DocumentType; 2] = [DocumentType::Pan, DocumentType::Aadhaar];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Pan => "pan",
            DocumentType::Aadhaar => "aadhaar",
        }
    }

    /// Key of the identity number field in this type's record.
    pub fn number_field(&self) -> &'static str {
        match self {
            DocumentType::Pan => "pan_number",
            DocumentType::Aadhaar => "aadhaar_number",
        }
    }

    /// Keys the extraction prompt asks the model to return.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            DocumentType::Pan => &[
                "pan_number",
                "name",
                "fathers_name",
                "date_of_birth",
                "signature_present",
            ],
            DocumentType::Aadhaar => &[
                "aadhaar_number",
                "name",
                "date_of_birth",
                "gender",
                "address",
                "qr_code_present",
            ],
        }
    }

    /// Key of the validation flag added by the format validator.
    pub fn valid_field(&self) -> &'static str {
        match self {
            DocumentType::Pan => "pan_valid",
            DocumentType::Aadhaar => "aadhaar_valid",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pan" => Ok(DocumentType::Pan),
            "aadhaar" => Ok(DocumentType::Aadhaar),
            _ => Err(ExtractionError::UnknownDocumentType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tags_case_insensitively() {
        assert_eq!("pan".parse::<DocumentType>(), Ok(DocumentType::Pan));
        assert_eq!("PAN".parse::<DocumentType>(), Ok(DocumentType::Pan));
        assert_eq!(" Aadhaar ".parse::<DocumentType>(), Ok(DocumentType::Aadhaar));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(
            "passport".parse::<DocumentType>(),
            Err(ExtractionError::UnknownDocumentType("passport".to_string()))
        );
        assert!("".parse::<DocumentType>().is_err());
    }

    #[test]
    fn field_lists_lead_with_the_number_field() {
        for doc_type in DocumentType::ALL {
            assert_eq!(doc_type.fields()[0], doc_type.number_field());
            assert!(!doc_type.fields().contains(&doc_type.valid_field()));
        }
    }

    #[test]
    fn serializes_as_lowercase_tag() {
        assert_eq!(
            serde_json::to_string(&DocumentType::Aadhaar).unwrap(),
            "\"aadhaar\""
        );
    }
}
