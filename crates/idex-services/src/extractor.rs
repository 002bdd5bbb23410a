//! Single-document extraction pipeline
//!
//! `extract` never fails: every problem along the way (missing image, model
//! outage, unparseable answer) becomes an error-status [`ExtractionResult`] so a
//! caller processing many documents can keep going.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::Semaphore;
use tracing::instrument;

use idex_core::constants::DEFAULT_MODEL_VERSION;
use idex_core::{
    ensure_expected_fields, parse_model_response, prompt_for, validate_and_normalize, Config,
    DocumentType,
    ExtractionError, ExtractionFields, ExtractionMetadata, ExtractionResult, ValidationPolicy,
};
use idex_storage::ResultStore;
use idex_vision::VisionModel;

fn image_error(image_path: &Path, err: std::io::Error) -> ExtractionError {
    match err.kind() {
        std::io::ErrorKind::NotFound => {
            ExtractionError::ImageNotFound(image_path.display().to_string())
        }
        _ => ExtractionError::ImageRead {
            path: image_path.display().to_string(),
            reason: err.to_string(),
        },
    }
}

/// Runs one document through prompt, model, parser and validator.
///
/// Model calls from every caller sharing this extractor go through one semaphore,
/// so at most `concurrency` queries hit the model endpoint at a time.
#[derive(Debug)]
pub struct DocumentExtractor {
    model: Arc<dyn VisionModel>,
    permits: Arc<Semaphore>,
    call_timeout: Duration,
    policy: ValidationPolicy,
    result_store: Option<Arc<dyn ResultStore>>,
}

impl DocumentExtractor {
    pub fn new(model: Arc<dyn VisionModel>, concurrency: usize, call_timeout: Duration) -> Self {
        Self {
            model,
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
            call_timeout,
            policy: ValidationPolicy::default(),
            result_store: None,
        }
    }

    /// Extractor configured from `config`. `result_store` is only used when
    /// saving extracted data is enabled.
    pub fn from_config(
        model: Arc<dyn VisionModel>,
        config: &Config,
        result_store: Option<Arc<dyn ResultStore>>,
    ) -> Self {
        let extractor = Self::new(
            model,
            config.model.concurrency,
            Duration::from_secs(config.model.timeout_secs),
        )
        .with_policy(config.validation_policy());

        match result_store {
            Some(store) if config.extraction.save_extracted_data => {
                extractor.with_result_store(store)
            }
            _ => extractor,
        }
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_result_store(mut self, store: Arc<dyn ResultStore>) -> Self {
        self.result_store = Some(store);
        self
    }

    pub fn model(&self) -> &Arc<dyn VisionModel> {
        &self.model
    }

    /// Model identifier recorded in result metadata.
    pub fn model_version(&self) -> &str {
        match self.model.model_id() {
            "" => DEFAULT_MODEL_VERSION,
            id => id,
        }
    }

    /// Extract the fields of `document_type` from the image at `image_path`.
    #[instrument(
        skip_all,
        fields(document_type = %document_type, filename = original_filename.unwrap_or("-"))
    )]
    pub async fn extract(
        &self,
        image_path: &Path,
        document_type: DocumentType,
        original_filename: Option<&str>,
    ) -> ExtractionResult {
        let start = Instant::now();
        let mut file_size = None;

        let outcome = self.run(image_path, document_type, &mut file_size).await;
        let metadata = ExtractionMetadata::new(
            start.elapsed(),
            self.model_version(),
            original_filename,
            file_size,
        );

        match outcome {
            Ok(fields) => {
                tracing::info!(
                    elapsed_ms = metadata.processing_time_ms,
                    valid = ?fields.is_valid(),
                    "Extraction succeeded"
                );
                let result = ExtractionResult::success(fields, metadata);
                self.persist(&result).await;
                result
            }
            Err(err) => {
                tracing::warn!(
                    elapsed_ms = metadata.processing_time_ms,
                    error = %err,
                    "Extraction failed"
                );
                ExtractionResult::failure(document_type, err, metadata)
            }
        }
    }

    /// Like [`extract`](Self::extract) for a raw document-type tag.
    ///
    /// An unknown tag is rejected before any I/O.
    pub async fn extract_tag(
        &self,
        image_path: &Path,
        tag: &str,
        original_filename: Option<&str>,
    ) -> Result<ExtractionResult, ExtractionError> {
        let document_type: DocumentType = tag.parse()?;
        Ok(self
            .extract(image_path, document_type, original_filename)
            .await)
    }

    async fn run(
        &self,
        image_path: &Path,
        document_type: DocumentType,
        file_size: &mut Option<u64>,
    ) -> Result<ExtractionFields, ExtractionError> {
        let prompt = prompt_for(document_type);

        let stat = fs::metadata(image_path)
            .await
            .map_err(|e| image_error(image_path, e))?;
        if !stat.is_file() {
            return Err(ExtractionError::ImageNotFound(
                image_path.display().to_string(),
            ));
        }
        *file_size = Some(stat.len());

        let answer = self.query_model(image_path, prompt).await?;
        if answer.trim().is_empty() {
            return Err(ExtractionError::EmptyModelResponse);
        }

        let mut parsed = parse_model_response(&answer)?;
        ensure_expected_fields(&parsed, document_type, &answer)?;

        // The validity flag is only ever set by the validator
        parsed.remove(document_type.valid_field());
        let fields: Map<String, Value> = if self.policy.applies_to(document_type) {
            validate_and_normalize(&parsed, document_type)
        } else {
            parsed
        };

        Ok(ExtractionFields::from_map(document_type, &fields))
    }

    /// Read the image and query the model while holding a pool permit, so at most
    /// `concurrency` images are held in memory at once.
    async fn query_model(
        &self,
        image_path: &Path,
        prompt: &str,
    ) -> Result<String, ExtractionError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ExtractionError::ModelUnavailable("extraction pool closed".to_string()))?;

        let image = fs::read(image_path)
            .await
            .map_err(|e| image_error(image_path, e))?;

        match tokio::time::timeout(self.call_timeout, self.model.query(&image, prompt)).await {
            Ok(answer) => Ok(answer?),
            Err(_) => Err(ExtractionError::ModelTimeout(self.call_timeout.as_secs())),
        }
    }

    async fn persist(&self, result: &ExtractionResult) {
        let Some(store) = &self.result_store else {
            return;
        };

        if let Err(e) = store.save(result).await {
            tracing::warn!(error = %e, "Failed to save extraction result");
        }
    }
}
