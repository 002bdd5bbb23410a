use std::time::Duration;

use idex_vision::{MoondreamClient, VisionError, VisionModel};
use mockito::{Matcher, Server};
use serde_json::json;

const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn client(url: &str) -> MoondreamClient {
    MoondreamClient::new(url, "moondream2", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_query_sends_data_url_and_question() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/query")
        .match_body(Matcher::PartialJson(json!({
            "image_url": "data:image/png;base64,iVBORw0KGgo=",
            "question": "What is the PAN number?"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"answer": "{\"pan_number\": \"ABCDE1234F\"}"}).to_string())
        .create_async()
        .await;

    let answer = client(&server.url())
        .query(PNG_HEADER, "What is the PAN number?")
        .await
        .unwrap();

    assert_eq!(answer, "{\"pan_number\": \"ABCDE1234F\"}");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_query_accepts_bare_string_answer() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/query")
        .with_status(200)
        .with_body("\"just text\"")
        .create_async()
        .await;

    let answer = client(&server.url()).query(b"jpeg", "q").await.unwrap();
    assert_eq!(answer, "just text");
}

#[tokio::test]
async fn test_query_null_answer_is_empty_text() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/query")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"answer": null, "request_id": "r-1"}).to_string())
        .create_async()
        .await;

    let answer = client(&server.url()).query(b"jpeg", "q").await.unwrap();
    assert_eq!(answer, "");
}

#[tokio::test]
async fn test_query_error_object_is_empty_text() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/query")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"error": "model not loaded"}).to_string())
        .create_async()
        .await;

    let answer = client(&server.url()).query(b"jpeg", "q").await.unwrap();
    assert!(answer.is_empty());
}

#[tokio::test]
async fn test_query_non_success_status_is_api_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/query")
        .with_status(503)
        .with_body("model loading")
        .create_async()
        .await;

    let err = client(&server.url()).query(b"jpeg", "q").await.unwrap_err();
    assert_eq!(
        err,
        VisionError::Api {
            status: 503,
            body: "model loading".to_string()
        }
    );
}

#[tokio::test]
async fn test_query_unreachable_endpoint_is_unavailable() {
    // Nothing listens on port 9 locally
    let err = client("http://127.0.0.1:9").query(b"jpeg", "q").await.unwrap_err();
    assert!(matches!(err, VisionError::Unavailable(_)), "got {err:?}");
}

#[tokio::test]
async fn test_ping_counts_any_response_as_reachable() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/")
        .with_status(404)
        .create_async()
        .await;

    assert!(client(&server.url()).ping().await);
    assert!(!client("http://127.0.0.1:9").ping().await);
}
