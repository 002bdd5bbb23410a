//! Batch extraction endpoints
//!
//! The whole form is rejected only for batch-level problems (document type, file
//! count). A file that cannot be staged becomes an error result in the batch.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use idex_core::BatchResult;
use idex_services::{BatchItem, BatchMode};

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::read_batch_form;

#[utoipa::path(
    post,
    path = "/api/v1/batch/extract",
    tag = "batch",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Batch processed one file at a time", body = BatchResult),
        (status = 400, description = "Invalid document type or file count", body = ErrorResponse)
    )
)]
pub async fn batch_extract(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<BatchResult>, HttpAppError> {
    run_batch(&state, multipart, BatchMode::Sequential).await
}

#[utoipa::path(
    post,
    path = "/api/v1/batch/extract/async",
    tag = "batch",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Batch processed concurrently; results in completion order", body = BatchResult),
        (status = 400, description = "Invalid document type or file count", body = ErrorResponse)
    )
)]
pub async fn batch_extract_concurrent(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<BatchResult>, HttpAppError> {
    run_batch(&state, multipart, BatchMode::Concurrent).await
}

async fn run_batch(
    state: &AppState,
    multipart: Multipart,
    mode: BatchMode,
) -> Result<Json<BatchResult>, HttpAppError> {
    let form = read_batch_form(multipart).await?;
    let document_type = form.document_type()?;
    state.orchestrator.check_size(form.files.len())?;

    let mut items = Vec::with_capacity(form.files.len());
    let mut staged_uploads = Vec::new();

    for upload in form.files {
        match state
            .staging
            .stage(upload.filename.as_deref(), &upload.data)
            .await
        {
            Ok(staged) => {
                items.push(BatchItem::staged(
                    staged.path.clone(),
                    document_type,
                    Some(staged.original_filename.clone()),
                ));
                staged_uploads.push(staged);
            }
            Err(e) => {
                tracing::warn!(
                    filename = upload.filename.as_deref().unwrap_or("-"),
                    error = %e,
                    "Rejected batch upload"
                );
                items.push(BatchItem::rejected(
                    document_type,
                    upload.filename,
                    e.to_string(),
                ));
            }
        }
    }

    let batch = state.orchestrator.extract_batch(items, mode).await;
    state.staging.cleanup_all(&staged_uploads).await;

    Ok(Json(batch?))
}
