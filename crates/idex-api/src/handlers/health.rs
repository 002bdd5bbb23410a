//! Health check handler

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` when the vision model answers, `degraded` otherwise
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub moondream_connected: bool,
}

/// Service health. Always HTTP 200; an unreachable model only degrades the status.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses((status = 200, description = "Service health", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let moondream_connected = state.model.ping().await;
    if !moondream_connected {
        tracing::warn!("Vision model endpoint is not reachable");
    }

    Json(HealthResponse {
        status: if moondream_connected {
            "healthy"
        } else {
            "degraded"
        }
        .to_string(),
        timestamp: Utc::now(),
        version: state.config.server.version.clone(),
        moondream_connected,
    })
}
