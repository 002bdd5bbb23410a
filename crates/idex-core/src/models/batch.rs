use std::time::Duration;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::extraction::{elapsed_ms, ExtractionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Success,
    Partial,
    Error,
}

/// Overall status of a set of results.
///
/// `Success` only when nothing failed and there was at least one result,
/// `Error` when nothing succeeded, otherwise `Partial`.
pub fn aggregate_status(results: &[ExtractionResult]) -> BatchStatus {
    let successful = results.iter().filter(|r| r.is_success()).count();
    let failed = results.len() - successful;

    if failed == 0 && successful > 0 {
        BatchStatus::Success
    } else if successful == 0 {
        BatchStatus::Error
    } else {
        BatchStatus::Partial
    }
}

/// Outcome of a batch. Counters are always derived from `results`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BatchResult {
    status: BatchStatus,
    total_documents: usize,
    successful: usize,
    failed: usize,
    results: Vec<ExtractionResult>,
    processing_time_ms: f64,
}

impl BatchResult {
    pub fn from_results(results: Vec<ExtractionResult>, elapsed: Duration) -> Self {
        let successful = results.iter().filter(|r| r.is_success()).count();
        Self {
            status: aggregate_status(&results),
            total_documents: results.len(),
            successful,
            failed: results.len() - successful,
            results,
            processing_time_ms: elapsed_ms(elapsed),
        }
    }

    pub fn status(&self) -> BatchStatus {
        self.status
    }

    pub fn total_documents(&self) -> usize {
        self.total_documents
    }

    pub fn successful(&self) -> usize {
        self.successful
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn results(&self) -> &[ExtractionResult] {
        &self.results
    }

    pub fn processing_time_ms(&self) -> f64 {
        self.processing_time_ms
    }
}
