//! Helpers shared by the `idex` binary.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use idex_core::{Config, DocumentType};
use idex_services::{BatchItem, DocumentExtractor};
use idex_storage::{LocalResultStore, ResultStore, UploadStaging};
use idex_vision::{MoondreamClient, VisionModel};

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays JSON.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Moondream client for the configured endpoint.
pub fn build_model(config: &Config) -> anyhow::Result<Arc<dyn VisionModel>> {
    let client = MoondreamClient::new(
        &config.model.endpoint,
        &config.model.model,
        Duration::from_secs(config.model.timeout_secs),
    )?;
    Ok(Arc::new(client))
}

/// Extractor wired the same way the API wires it.
pub fn build_extractor(config: &Config) -> anyhow::Result<Arc<DocumentExtractor>> {
    let model = build_model(config)?;
    let store: Arc<dyn ResultStore> =
        Arc::new(LocalResultStore::new(&config.extraction.output_folder));
    Ok(Arc::new(DocumentExtractor::from_config(
        model,
        config,
        Some(store),
    )))
}

/// File name of `path`, used as the result's original filename.
pub fn display_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}

/// One batch item per path. Local files are read in place; files with a
/// disallowed extension become rejected items.
pub fn local_items(
    staging: &UploadStaging,
    paths: &[PathBuf],
    document_type: DocumentType,
) -> Vec<BatchItem> {
    paths
        .iter()
        .map(|path| {
            let name = display_name(path);
            let checked = staging.check_extension(name.as_deref().unwrap_or_default());
            match checked {
                Ok(_) => BatchItem::staged(path.clone(), document_type, name),
                Err(e) => BatchItem::rejected(document_type, name, e.to_string()),
            }
        })
        .collect()
}
