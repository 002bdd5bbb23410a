//! idex Core Library
//!
//! This crate provides the domain models, error types, configuration, prompt
//! catalog, model-response parser and format validator that are shared across
//! all idex components. Everything here is free of network and filesystem I/O
//! apart from reading the environment in [`Config::from_env`].

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, ExtractionError, LogLevel};
pub use models::{
    aggregate_status, AadhaarFields, BatchResult, BatchStatus, DocumentType, ExtractionFields,
    ExtractionMetadata, ExtractionResult, ExtractionStatus, PanFields,
};
pub use parser::{ensure_expected_fields, parse_model_response};
pub use prompts::{get_prompt, prompt_for};
pub use validation::{validate_and_normalize, ValidationPolicy};
