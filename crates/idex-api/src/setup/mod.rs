//! Application setup and initialization

pub mod routes;
pub mod server;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use idex_core::Config;
use idex_storage::{ensure_directories, LocalResultStore, ResultStore};
use idex_vision::{MoondreamClient, VisionModel};

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(&config.server.log_format)?;

    tracing::info!(
        environment = %config.server.environment,
        "Configuration loaded and validated successfully"
    );

    ensure_directories(&[
        Path::new(&config.extraction.upload_folder),
        Path::new(&config.extraction.output_folder),
    ])
    .await?;

    let model: Arc<dyn VisionModel> = Arc::new(MoondreamClient::new(
        &config.model.endpoint,
        &config.model.model,
        Duration::from_secs(config.model.timeout_secs),
    )?);
    tracing::info!(
        endpoint = %config.model.endpoint,
        model = %config.model.model,
        "Vision model client ready"
    );

    let result_store: Arc<dyn ResultStore> =
        Arc::new(LocalResultStore::new(&config.extraction.output_folder));

    let state = Arc::new(AppState::new(config, model, Some(result_store)));
    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}
