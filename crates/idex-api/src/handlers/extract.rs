//! Single-document extraction endpoints

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use idex_core::{DocumentType, ExtractionResult};

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{read_single_form, UploadedFile};

#[utoipa::path(
    post,
    path = "/api/v1/extract/pan",
    tag = "extraction",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Extraction finished (check `status` for the outcome)", body = ExtractionResult),
        (status = 400, description = "Invalid upload", body = ErrorResponse)
    )
)]
pub async fn extract_pan(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ExtractionResult>, HttpAppError> {
    let upload = read_single_form(multipart).await?.single_file()?;
    extract_upload(&state, upload, DocumentType::Pan).await
}

#[utoipa::path(
    post,
    path = "/api/v1/extract/aadhaar",
    tag = "extraction",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Extraction finished (check `status` for the outcome)", body = ExtractionResult),
        (status = 400, description = "Invalid upload", body = ErrorResponse)
    )
)]
pub async fn extract_aadhaar(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ExtractionResult>, HttpAppError> {
    let upload = read_single_form(multipart).await?.single_file()?;
    extract_upload(&state, upload, DocumentType::Aadhaar).await
}

/// Extraction with the document type given as the `document_type` form field.
#[utoipa::path(
    post,
    path = "/api/v1/extract",
    tag = "extraction",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Extraction finished (check `status` for the outcome)", body = ExtractionResult),
        (status = 400, description = "Invalid upload or document type", body = ErrorResponse)
    )
)]
pub async fn extract_document(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ExtractionResult>, HttpAppError> {
    let form = read_single_form(multipart).await?;
    let document_type = form.document_type()?;
    let upload = form.single_file()?;
    extract_upload(&state, upload, document_type).await
}

async fn extract_upload(
    state: &AppState,
    upload: UploadedFile,
    document_type: DocumentType,
) -> Result<Json<ExtractionResult>, HttpAppError> {
    let staged = state
        .staging
        .stage(upload.filename.as_deref(), &upload.data)
        .await?;

    let result = state
        .extractor
        .extract(&staged.path, document_type, Some(&staged.original_filename))
        .await;

    state.staging.cleanup(&staged).await;

    Ok(Json(result))
}
