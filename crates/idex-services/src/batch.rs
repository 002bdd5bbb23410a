//! Batch orchestration
//!
//! A batch is validated as a whole (size limits) and then processed item by item.
//! Individual items never fail the batch; their errors end up in the per-item
//! results and the batch status summarizes them.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::instrument;

use idex_core::constants::MAX_BATCH_SIZE;
use idex_core::{
    BatchResult, Config, DocumentType, ExtractionError, ExtractionMetadata, ExtractionResult,
};

use crate::extractor::DocumentExtractor;

/// One document submitted to a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchItem {
    /// Image available on disk, ready for extraction
    Staged {
        image_path: PathBuf,
        document_type: DocumentType,
        original_filename: Option<String>,
    },
    /// Upload that could not be staged; reported as a failed item
    Rejected {
        document_type: DocumentType,
        original_filename: Option<String>,
        reason: String,
    },
}

impl BatchItem {
    pub fn staged(
        image_path: impl Into<PathBuf>,
        document_type: DocumentType,
        original_filename: Option<String>,
    ) -> Self {
        BatchItem::Staged {
            image_path: image_path.into(),
            document_type,
            original_filename,
        }
    }

    pub fn rejected(
        document_type: DocumentType,
        original_filename: Option<String>,
        reason: impl Into<String>,
    ) -> Self {
        BatchItem::Rejected {
            document_type,
            original_filename,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    /// One item at a time, results in input order
    Sequential,
    /// All items at once, results in completion order
    Concurrent,
}

#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    extractor: Arc<DocumentExtractor>,
    max_batch_size: usize,
}

impl BatchOrchestrator {
    pub fn new(extractor: Arc<DocumentExtractor>) -> Self {
        Self {
            extractor,
            max_batch_size: MAX_BATCH_SIZE,
        }
    }

    pub fn from_config(extractor: Arc<DocumentExtractor>, config: &Config) -> Self {
        Self::new(extractor).with_max_batch_size(config.extraction.max_batch_size)
    }

    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Reject batches that are empty or larger than the configured maximum.
    pub fn check_size(&self, count: usize) -> Result<(), ExtractionError> {
        if count == 0 {
            return Err(ExtractionError::NoDocuments);
        }
        if count > self.max_batch_size {
            return Err(ExtractionError::TooManyDocuments {
                count,
                max: self.max_batch_size,
            });
        }
        Ok(())
    }

    /// Extract every item and fold the outcomes into one [`BatchResult`].
    ///
    /// Produces exactly one result per item. In concurrent mode the model calls
    /// are still bounded by the extractor's concurrency limit, and dropping the
    /// returned future abandons this batch's in-flight calls.
    #[instrument(skip_all, fields(total_documents = items.len(), mode = ?mode))]
    pub async fn extract_batch(
        &self,
        items: Vec<BatchItem>,
        mode: BatchMode,
    ) -> Result<BatchResult, ExtractionError> {
        self.check_size(items.len())?;

        let start = Instant::now();
        let mut results = Vec::with_capacity(items.len());

        match mode {
            BatchMode::Sequential => {
                for item in items {
                    results.push(self.run_item(item).await);
                }
            }
            BatchMode::Concurrent => {
                let mut pending: FuturesUnordered<_> =
                    items.into_iter().map(|item| self.run_item(item)).collect();
                while let Some(result) = pending.next().await {
                    results.push(result);
                }
            }
        }

        let batch = BatchResult::from_results(results, start.elapsed());
        tracing::info!(
            status = ?batch.status(),
            successful = batch.successful(),
            failed = batch.failed(),
            elapsed_ms = batch.processing_time_ms(),
            "Batch extraction finished"
        );
        Ok(batch)
    }

    async fn run_item(&self, item: BatchItem) -> ExtractionResult {
        match item {
            BatchItem::Staged {
                image_path,
                document_type,
                original_filename,
            } => {
                self.extractor
                    .extract(&image_path, document_type, original_filename.as_deref())
                    .await
            }
            BatchItem::Rejected {
                document_type,
                original_filename,
                reason,
            } => ExtractionResult::failure(
                document_type,
                ExtractionError::Staging(reason),
                ExtractionMetadata::new(
                    Duration::ZERO,
                    self.extractor.model_version(),
                    original_filename.as_deref(),
                    None,
                ),
            ),
        }
    }
}
