//! Route configuration and setup.
//!
//! Extraction route groups live in [domains](domains).

mod domains;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use idex_core::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::api_doc::get_openapi_spec;
use crate::constants::{API_V1_PREFIX, DOCS_PATH, MULTIPART_OVERHEAD_BYTES, OPENAPI_PATH};
use crate::handlers;
use crate::middleware::{error_details_middleware, ErrorDetailsConfig};
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let config = &state.config;
    let cors = setup_cors(config)?;
    let body_limit = request_body_limit(config);
    tracing::debug!(body_limit, "Request body limit configured");
    let error_details_config = Arc::new(ErrorDetailsConfig::new(config.is_production()));

    let app = Router::new()
        .route("/", get(handlers::root::service_info))
        .route("/health", get(handlers::health::health_check))
        .route(
            &format!("{}/health", API_V1_PREFIX),
            get(handlers::health::health_check),
        )
        .merge(domains::extraction_routes())
        .merge(domains::batch_routes())
        .merge(
            utoipa_rapidoc::RapiDoc::with_openapi(OPENAPI_PATH, get_openapi_spec())
                .path(DOCS_PATH),
        )
        .fallback(handlers::root::not_found)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn_with_state(
            error_details_config,
            error_details_middleware,
        ))
        .with_state(state);

    Ok(app)
}

/// Large enough for a full batch of maximum-size files.
fn request_body_limit(config: &Config) -> usize {
    config
        .extraction
        .max_file_size_bytes
        .saturating_mul(config.extraction.max_batch_size.max(1))
        .saturating_add(MULTIPART_OVERHEAD_BYTES)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let origins = &config.server.cors_origins;
    let cors = if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_limit_covers_full_batch() {
        let mut config = Config::default();
        config.extraction.max_file_size_bytes = 1000;
        config.extraction.max_batch_size = 50;
        assert_eq!(request_body_limit(&config), 50_000 + MULTIPART_OVERHEAD_BYTES);
    }

    #[test]
    fn test_invalid_cors_origin_rejected() {
        let mut config = Config::default();
        config.server.cors_origins = vec!["bad\norigin".to_string()];
        assert!(setup_cors(&config).is_err());

        config.server.cors_origins = vec!["https://app.example.com".to_string()];
        assert!(setup_cors(&config).is_ok());
    }
}
