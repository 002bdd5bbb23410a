//! Multipart parsing for extraction uploads

use axum::extract::Multipart;
use bytes::Bytes;
use idex_core::{AppError, DocumentType};

use crate::constants::{DOCUMENT_TYPE_FIELD, FILES_FIELD, FILE_FIELD};

/// One uploaded file as received, before staging.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub data: Bytes,
}

/// Fields of an extraction form. Unknown fields are ignored.
#[derive(Debug, Default)]
pub struct ExtractionForm {
    pub files: Vec<UploadedFile>,
    pub document_type: Option<String>,
}

impl ExtractionForm {
    /// The single `file` upload; more than one is rejected.
    pub fn single_file(mut self) -> Result<UploadedFile, AppError> {
        match self.files.len() {
            0 => Err(AppError::InvalidInput("No file provided".to_string())),
            1 => Ok(self.files.remove(0)),
            _ => Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            )),
        }
    }

    /// The `document_type` field parsed into a [`DocumentType`].
    pub fn document_type(&self) -> Result<DocumentType, AppError> {
        let tag = self
            .document_type
            .as_deref()
            .ok_or_else(|| AppError::InvalidInput("document_type is required".to_string()))?;
        tag.parse().map_err(AppError::from)
    }
}

/// Read every part of `multipart`, collecting uploads from `file_field`.
pub async fn read_extraction_form(
    mut multipart: Multipart,
    file_field: &str,
) -> Result<ExtractionForm, AppError> {
    let mut form = ExtractionForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == file_field {
            let filename = field
                .file_name()
                .map(|s: &str| s.to_string())
                .filter(|s| !s.trim().is_empty());
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;
            form.files.push(UploadedFile { filename, data });
        } else if field_name == DOCUMENT_TYPE_FIELD {
            let value = field.text().await.map_err(|e| {
                AppError::InvalidInput(format!("Failed to read {}: {}", DOCUMENT_TYPE_FIELD, e))
            })?;
            form.document_type = Some(value);
        }
    }

    Ok(form)
}

/// Form of the single-document endpoints.
pub async fn read_single_form(multipart: Multipart) -> Result<ExtractionForm, AppError> {
    read_extraction_form(multipart, FILE_FIELD).await
}

/// Form of the batch endpoints.
pub async fn read_batch_form(multipart: Multipart) -> Result<ExtractionForm, AppError> {
    read_extraction_form(multipart, FILES_FIELD).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> UploadedFile {
        UploadedFile {
            filename: Some(name.to_string()),
            data: Bytes::from_static(b"img"),
        }
    }

    #[test]
    fn test_single_file_requires_exactly_one() {
        assert!(ExtractionForm::default().single_file().is_err());

        let form = ExtractionForm {
            files: vec![file("a.jpg")],
            document_type: None,
        };
        assert_eq!(form.single_file().unwrap().filename.as_deref(), Some("a.jpg"));

        let form = ExtractionForm {
            files: vec![file("a.jpg"), file("b.jpg")],
            document_type: None,
        };
        assert!(form.single_file().is_err());
    }

    #[test]
    fn test_document_type_field() {
        let mut form = ExtractionForm::default();
        assert!(matches!(form.document_type(), Err(AppError::InvalidInput(_))));

        form.document_type = Some(" Aadhaar ".to_string());
        assert_eq!(form.document_type().unwrap(), DocumentType::Aadhaar);

        form.document_type = Some("passport".to_string());
        assert!(matches!(
            form.document_type(),
            Err(AppError::UnknownDocumentType(_))
        ));
    }
}
