//! Application state shared by all handlers.

use std::sync::Arc;

use idex_core::Config;
use idex_services::{BatchOrchestrator, DocumentExtractor};
use idex_storage::{ResultStore, UploadStaging};
use idex_vision::VisionModel;

/// Everything a request needs, built once at startup and shared through `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
    pub model: Arc<dyn VisionModel>,
    pub extractor: Arc<DocumentExtractor>,
    pub orchestrator: BatchOrchestrator,
    pub staging: UploadStaging,
}

impl AppState {
    /// Wire the extraction pipeline around `model` according to `config`.
    pub fn new(
        config: Config,
        model: Arc<dyn VisionModel>,
        result_store: Option<Arc<dyn ResultStore>>,
    ) -> Self {
        let extractor = Arc::new(DocumentExtractor::from_config(
            model.clone(),
            &config,
            result_store,
        ));
        let orchestrator = BatchOrchestrator::from_config(extractor.clone(), &config);
        let staging = UploadStaging::from_config(&config);

        Self {
            config,
            model,
            extractor,
            orchestrator,
            staging,
        }
    }
}
