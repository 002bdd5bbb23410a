//! Storage abstraction trait and errors

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use idex_core::{AppError, ExtractionResult};

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("No filename provided")]
    MissingFilename,

    #[error("File type not allowed. Allowed types: {}", allowed.join(", "))]
    UnsupportedFileType { allowed: Vec<String> },

    #[error("File too large. Maximum size: {max} bytes")]
    FileTooLarge { max: usize },

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::MissingFilename => AppError::InvalidInput(err.to_string()),
            StorageError::UnsupportedFileType { .. } => {
                AppError::UnsupportedFileType(err.to_string())
            }
            StorageError::FileTooLarge { .. } => AppError::FileTooLarge(err.to_string()),
            other => AppError::Internal(format!("Error saving file: {}", other)),
        }
    }
}

/// Destination for successful extraction results.
#[async_trait]
pub trait ResultStore: Send + Sync + std::fmt::Debug {
    /// Persist `result` and return where it was written.
    async fn save(&self, result: &ExtractionResult) -> StorageResult<PathBuf>;
}
