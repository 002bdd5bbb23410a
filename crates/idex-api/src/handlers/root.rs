//! Service info and unknown-route responses

use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::constants::{API_V1_PREFIX, DOCS_PATH, OPENAPI_PATH};
use crate::state::AppState;

pub async fn service_info(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "name": state.config.server.project_name,
        "version": state.config.server.version,
        "status": "running",
        "timestamp": Utc::now(),
        "docs": DOCS_PATH,
        "openapi": OPENAPI_PATH,
        "health": "/health",
        "endpoints": {
            "extract_pan": format!("{}/extract/pan", API_V1_PREFIX),
            "extract_aadhaar": format!("{}/extract/aadhaar", API_V1_PREFIX),
            "extract_document": format!("{}/extract", API_V1_PREFIX),
            "batch_extract": format!("{}/batch/extract", API_V1_PREFIX),
            "batch_extract_async": format!("{}/batch/extract/async", API_V1_PREFIX),
            "health": format!("{}/health", API_V1_PREFIX),
        }
    }))
}

pub async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "error",
            "error": "Endpoint not found",
            "detail": format!("The requested endpoint {} does not exist", uri.path()),
            "timestamp": Utc::now(),
        })),
    )
}
