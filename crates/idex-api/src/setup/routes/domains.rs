//! Extraction route groups.

use std::sync::Arc;

use axum::routing::post;
use axum::Router;

use crate::constants::API_V1_PREFIX;
use crate::handlers;
use crate::state::AppState;

pub fn extraction_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/extract/pan", API_V1_PREFIX),
            post(handlers::extract::extract_pan),
        )
        .route(
            &format!("{}/extract/aadhaar", API_V1_PREFIX),
            post(handlers::extract::extract_aadhaar),
        )
        .route(
            &format!("{}/extract", API_V1_PREFIX),
            post(handlers::extract::extract_document),
        )
}

pub fn batch_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/batch/extract", API_V1_PREFIX),
            post(handlers::batch::batch_extract),
        )
        .route(
            &format!("{}/batch/extract/async", API_V1_PREFIX),
            post(handlers::batch::batch_extract_concurrent),
        )
}
