mod helpers;

use helpers::*;
use idex_vision::ScriptedVisionModel;
use serde_json::Value;

#[tokio::test]
async fn test_health_reports_connected_model() {
    let app = spawn_app(ScriptedVisionModel::new("{}"));

    for path in ["/health", "/api/v1/health"] {
        let response = app.server.get(path).await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["moondream_connected"], true);
        assert!(body["timestamp"].is_string());
        assert!(body["version"].is_string());
    }
}

#[tokio::test]
async fn test_health_degraded_when_model_unreachable() {
    let app = spawn_app(ScriptedVisionModel::new("{}").unreachable());

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["moondream_connected"], false);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = spawn_app(ScriptedVisionModel::new("{}"));

    let response = app.server.get("/api/v1/passport").await;

    response.assert_status_not_found();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "Endpoint not found");
    assert!(body["detail"].as_str().unwrap().contains("/api/v1/passport"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_root_lists_endpoints() {
    let app = spawn_app(ScriptedVisionModel::new("{}"));

    let response = app.server.get("/").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "running");
    assert_eq!(body["docs"], "/docs");
    assert_eq!(body["endpoints"]["extract_pan"], "/api/v1/extract/pan");
    assert_eq!(body["endpoints"]["batch_extract_async"], "/api/v1/batch/extract/async");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = spawn_app(ScriptedVisionModel::new("{}"));

    let response = app.server.get("/api/openapi.json").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert!(body["paths"]["/api/v1/batch/extract"].is_object());
}
