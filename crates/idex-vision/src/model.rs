//! Vision model capability
//!
//! The pipeline only needs two things from a model backend: an answer to a
//! question about an image, and a cheap reachability check for health reports.

use async_trait::async_trait;
use std::fmt::Debug;

use idex_core::ExtractionError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VisionError {
    /// The endpoint could not be reached at all
    #[error("Cannot connect to vision model at {0}")]
    Unavailable(String),

    #[error("Vision model request timed out after {0}s")]
    Timeout(u64),

    #[error("Vision model API request failed: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Vision model request failed: {0}")]
    Request(String),
}

impl From<VisionError> for ExtractionError {
    fn from(err: VisionError) -> Self {
        match err {
            VisionError::Unavailable(endpoint) => ExtractionError::ModelUnavailable(endpoint),
            VisionError::Timeout(secs) => ExtractionError::ModelTimeout(secs),
            other => ExtractionError::ModelRequest(other.to_string()),
        }
    }
}

/// A vision-language model that can answer questions about an image.
#[async_trait]
pub trait VisionModel: Send + Sync + Debug {
    /// Identifier reported in extraction metadata
    fn model_id(&self) -> &str;

    /// Ask `prompt` about `image` and return the model's answer text.
    async fn query(&self, image: &[u8], prompt: &str) -> Result<String, VisionError>;

    /// Whether the backend is reachable. Never fails.
    async fn ping(&self) -> bool;
}
