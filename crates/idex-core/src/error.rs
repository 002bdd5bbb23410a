//! Error types module
//!
//! Two families of errors live here:
//!
//! - [`ExtractionError`] describes why a single extraction (or a batch precondition)
//!   failed. The pipeline never propagates it; it is rendered into the `error`
//!   field of an error-status result.
//! - [`AppError`] is what the HTTP layer turns into a status code and JSON body.
//!   It self-describes its presentation through [`ErrorMetadata`].

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like an unreachable model
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "TOO_MANY_DOCUMENTS")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Failure of one extraction step, or of a batch precondition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("Unknown document type: {0}")]
    UnknownDocumentType(String),

    #[error("Image file not found: {0}")]
    ImageNotFound(String),

    #[error("Failed to read image file {path}: {reason}")]
    ImageRead { path: String, reason: String },

    #[error("Vision model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Vision model did not answer within {0}s")]
    ModelTimeout(u64),

    #[error("Error calling vision model: {0}")]
    ModelRequest(String),

    #[error("No response received from vision model")]
    EmptyModelResponse,

    #[error("Failed to parse JSON from model response. Response text: {preview}")]
    Parse { preview: String },

    #[error("Model response contains none of the expected fields. Response text: {preview}")]
    MissingFields { preview: String },

    #[error("No files provided")]
    NoDocuments,

    #[error("Too many files: {count} submitted, maximum {max} per batch")]
    TooManyDocuments { count: usize, max: usize },

    #[error("Error saving file: {0}")]
    Staging(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File type not allowed: {0}")]
    UnsupportedFileType(String),

    #[error("File too large: {0}")]
    FileTooLarge(String),

    #[error("Unknown document type: {0}")]
    UnknownDocumentType(String),

    #[error("No files provided")]
    NoDocuments,

    #[error("Too many files: {count} submitted, maximum {max} per batch")]
    TooManyDocuments { count: usize, max: usize },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::UnknownDocumentType(tag) => AppError::UnknownDocumentType(tag),
            ExtractionError::NoDocuments => AppError::NoDocuments,
            ExtractionError::TooManyDocuments { count, max } => {
                AppError::TooManyDocuments { count, max }
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::UnsupportedFileType(_) => (
            400,
            "UNSUPPORTED_FILE_TYPE",
            false,
            Some("Upload a JPG, JPEG, PNG or PDF file"),
            false,
            LogLevel::Debug,
        ),
        // Oversize uploads are a client error of the form, not a transport limit
        AppError::FileTooLarge(_) => (
            400,
            "FILE_TOO_LARGE",
            false,
            Some("Reduce file size and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::UnknownDocumentType(_) => (
            400,
            "UNKNOWN_DOCUMENT_TYPE",
            false,
            Some("Use document_type 'pan' or 'aadhaar'"),
            false,
            LogLevel::Debug,
        ),
        AppError::NoDocuments => (
            400,
            "NO_DOCUMENTS",
            false,
            Some("Attach at least one file"),
            false,
            LogLevel::Debug,
        ),
        AppError::TooManyDocuments { .. } => (
            400,
            "TOO_MANY_DOCUMENTS",
            false,
            Some("Split the upload into batches of 50 files or fewer"),
            false,
            LogLevel::Debug,
        ),
        AppError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::UnsupportedFileType(_) => "UnsupportedFileType",
            AppError::FileTooLarge(_) => "FileTooLarge",
            AppError::UnknownDocumentType(_) => "UnknownDocumentType",
            AppError::NoDocuments => "NoDocuments",
            AppError::TooManyDocuments { .. } => "TooManyDocuments",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::UnsupportedFileType(ref msg) => msg.clone(),
            AppError::FileTooLarge(ref msg) => msg.clone(),
            AppError::UnknownDocumentType(ref tag) => {
                format!("Unknown document type: {}", tag)
            }
            AppError::NoDocuments => "No files provided".to_string(),
            AppError::TooManyDocuments { max, .. } => {
                format!("Too many files. Maximum {} files per batch", max)
            }
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_preconditions_map_to_bad_request() {
        let err: AppError = ExtractionError::TooManyDocuments { count: 51, max: 50 }.into();
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "TOO_MANY_DOCUMENTS");
        assert_eq!(err.client_message(), "Too many files. Maximum 50 files per batch");

        let err: AppError = ExtractionError::NoDocuments.into();
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "NO_DOCUMENTS");
    }

    #[test]
    fn oversize_file_is_a_bad_request() {
        let err = AppError::FileTooLarge("Maximum size: 10485760 bytes".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert!(!err.is_sensitive());
    }

    #[test]
    fn pipeline_failures_are_internal_and_hidden() {
        let err: AppError = ExtractionError::EmptyModelResponse.into();
        assert_eq!(err.http_status_code(), 500);
        assert!(err.is_sensitive());
        assert_eq!(err.client_message(), "Internal server error");
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn staging_and_schema_failures_are_internal() {
        for err in [
            ExtractionError::Staging("disk full".to_string()),
            ExtractionError::MissingFields {
                preview: "{\"error\":\"model not loaded\"}".to_string(),
            },
        ] {
            let err: AppError = err.into();
            assert_eq!(err.http_status_code(), 500);
            assert_eq!(err.error_code(), "INTERNAL_ERROR");
            assert_eq!(err.client_message(), "Internal server error");
        }
    }

    #[test]
    fn detailed_message_walks_source_chain() {
        let source = anyhow::anyhow!("disk full");
        let err = AppError::InternalWithSource {
            message: "write failed".to_string(),
            source,
        };
        assert!(err.detailed_message().contains("Caused by: disk full"));
    }
}
