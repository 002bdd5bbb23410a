use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::error::RedactedErrorBody;

#[derive(Debug, Clone)]
pub struct ErrorDetailsConfig {
    pub is_production: bool,
}

impl ErrorDetailsConfig {
    pub fn new(is_production: bool) -> Self {
        Self { is_production }
    }
}

/// Error details middleware
/// Swaps error bodies for their detail-free form when running in production
pub async fn error_details_middleware(
    State(config): State<Arc<ErrorDetailsConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(RedactedErrorBody(body)) = response.extensions_mut().remove::<RedactedErrorBody>()
    else {
        return response;
    };
    if !config.is_production {
        return response;
    }

    (response.status(), Json(body)).into_response()
}
