//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use idex_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "idex API",
        description = "Extracts structured fields from PAN and Aadhaar card images using a vision-language model. Single uploads and batches of up to 50 files are accepted under /api/v1/."
    ),
    paths(
        // Single documents
        handlers::extract::extract_pan,
        handlers::extract::extract_aadhaar,
        handlers::extract::extract_document,
        // Batches
        handlers::batch::batch_extract,
        handlers::batch::batch_extract_concurrent,
        // Health
        handlers::health::health_check,
    ),
    components(schemas(
        models::DocumentType,
        models::PanFields,
        models::AadhaarFields,
        models::ExtractionFields,
        models::ExtractionStatus,
        models::ExtractionMetadata,
        models::ExtractionResult,
        models::BatchStatus,
        models::BatchResult,
        handlers::health::HealthResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "extraction", description = "Single-document extraction"),
        (name = "batch", description = "Multi-document extraction"),
        (name = "health", description = "Service and model health"),
    )
)]
pub struct ApiDoc;

/// The OpenAPI document served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    let mut spec = ApiDoc::openapi();
    spec.info.version = env!("CARGO_PKG_VERSION").to_string();
    spec
}
