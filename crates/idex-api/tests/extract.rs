mod helpers;

use axum_test::multipart::MultipartForm;
use bytes::Bytes;
use helpers::*;
use idex_vision::{ScriptedVisionModel, VisionError};
use serde_json::Value;

#[tokio::test]
async fn test_extract_pan_success() {
    let model = ScriptedVisionModel::new("unused").answer(&b"pan-card"[..], pan_answer("abcde 1234f"));
    let app = spawn_app(model);

    let response = app
        .server
        .post("/api/v1/extract/pan")
        .multipart(single_form("pan.jpg", b"pan-card"))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "success");
    assert_eq!(body["document_type"], "pan");
    assert_eq!(body["data"]["pan_number"], "ABCDE1234F");
    assert_eq!(body["data"]["pan_valid"], true);
    assert_eq!(body["data"]["name"], "RAVI KUMAR");
    assert_eq!(body["metadata"]["original_filename"], "pan.jpg");
    assert_eq!(body["metadata"]["file_size_bytes"], 8);
    assert_eq!(body["metadata"]["model_version"], "scripted");
    assert!(body.get("error").is_none());

    // Successful results are persisted when saving is enabled
    let saved = std::fs::read_dir(app.outputs()).unwrap().count();
    assert_eq!(saved, 1);
}

#[tokio::test]
async fn test_extract_aadhaar_normalizes_number() {
    let model = ScriptedVisionModel::new(aadhaar_answer("1234-5678-9012"));
    let app = spawn_app(model);

    let response = app
        .server
        .post("/api/v1/extract/aadhaar")
        .multipart(single_form("aadhaar.png", b"aadhaar-card"))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["aadhaar_number"], "1234 5678 9012");
    assert_eq!(body["data"]["aadhaar_valid"], true);
    assert_eq!(body["data"]["gender"], "Female");
}

#[tokio::test]
async fn test_unparseable_answer_is_error_result_with_200() {
    let app = spawn_app(ScriptedVisionModel::new("I cannot read this card."));

    let response = app
        .server
        .post("/api/v1/extract/pan")
        .multipart(single_form("blurry.jpg", b"blurry"))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "error");
    assert!(body.get("data").is_none());
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to parse JSON from model response"));
    assert_eq!(body["metadata"]["original_filename"], "blurry.jpg");

    // Failures are not persisted
    assert_eq!(std::fs::read_dir(app.outputs()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_model_outage_is_error_result() {
    let app = spawn_app(ScriptedVisionModel::failing(VisionError::Unavailable(
        "connection refused".to_string(),
    )));

    let response = app
        .server
        .post("/api/v1/extract/aadhaar")
        .multipart(single_form("card.jpg", b"card"))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "error");
    assert!(body["error"].as_str().unwrap().contains("unavailable"));
}

#[tokio::test]
async fn test_extract_with_document_type_field() {
    let app = spawn_app(ScriptedVisionModel::new(pan_answer("ABCDE1234F")));

    let form = single_form("card.jpg", b"card").add_text("document_type", "PAN");
    let response = app.server.post("/api/v1/extract").multipart(form).await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["document_type"], "pan");
    assert_eq!(body["data"]["pan_number"], "ABCDE1234F");
}

#[tokio::test]
async fn test_unknown_or_missing_document_type_is_400() {
    let app = spawn_app(ScriptedVisionModel::new("{}"));

    let form = single_form("card.jpg", b"card").add_text("document_type", "passport");
    let response = app.server.post("/api/v1/extract").multipart(form).await;
    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "UNKNOWN_DOCUMENT_TYPE");
    assert_eq!(body["error"], "Unknown document type: passport");

    let response = app
        .server
        .post("/api/v1/extract")
        .multipart(single_form("card.jpg", b"card"))
        .await;
    response.assert_status_bad_request();

    assert_eq!(app.model.calls(), 0);
}

#[tokio::test]
async fn test_error_details_shown_outside_production() {
    let app = spawn_app(ScriptedVisionModel::new("{}"));

    let form = single_form("card.jpg", b"card").add_text("document_type", "passport");
    let response = app.server.post("/api/v1/extract").multipart(form).await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["details"], "Unknown document type: passport");
    assert_eq!(body["error_type"], "UnknownDocumentType");
}

#[tokio::test]
async fn test_error_details_hidden_in_production() {
    let app = spawn_app_with(ScriptedVisionModel::new("{}"), |config| {
        config.server.environment = "production".to_string();
    });

    let form = single_form("card.jpg", b"card").add_text("document_type", "passport");
    let response = app.server.post("/api/v1/extract").multipart(form).await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "UNKNOWN_DOCUMENT_TYPE");
    assert_eq!(body["error"], "Unknown document type: passport");
    assert!(body.get("details").is_none());
    assert!(body.get("error_type").is_none());
}

#[tokio::test]
async fn test_missing_file_is_400() {
    let app = spawn_app(ScriptedVisionModel::new("{}"));

    let form = MultipartForm::new().add_text("note", "no file here");
    let response = app.server.post("/api/v1/extract/pan").multipart(form).await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["error"], "No file provided");
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_disallowed_extension_is_400() {
    let app = spawn_app(ScriptedVisionModel::new("{}"));

    let response = app
        .server
        .post("/api/v1/extract/pan")
        .multipart(single_form("card.gif", b"GIF89a"))
        .await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(
        body["error"],
        "File type not allowed. Allowed types: jpg, jpeg, png, pdf"
    );
    assert_eq!(body["code"], "UNSUPPORTED_FILE_TYPE");
    assert_eq!(app.model.calls(), 0);
}

#[tokio::test]
async fn test_oversize_file_is_400() {
    let app = spawn_app(ScriptedVisionModel::new("{}"));

    let big = Bytes::from(vec![0u8; MAX_FILE_SIZE + 1]);
    let part = axum_test::multipart::Part::bytes(big)
        .file_name("big.jpg")
        .mime_type("image/jpeg");
    let form = MultipartForm::new().add_part("file", part);
    let response = app.server.post("/api/v1/extract/pan").multipart(form).await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["error"], "File too large. Maximum size: 1024 bytes");
    assert_eq!(std::fs::read_dir(app.uploads()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_staged_upload_deleted_when_configured() {
    let app = spawn_app_with(ScriptedVisionModel::new(pan_answer("ABCDE1234F")), |config| {
        config.extraction.delete_uploaded_files = true;
    });

    let response = app
        .server
        .post("/api/v1/extract/pan")
        .multipart(single_form("card.jpg", b"card"))
        .await;

    response.assert_status_ok();
    assert_eq!(std::fs::read_dir(app.uploads()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_staged_upload_kept_by_default() {
    let app = spawn_app(ScriptedVisionModel::new(pan_answer("ABCDE1234F")));

    app.server
        .post("/api/v1/extract/pan")
        .multipart(single_form("card.jpg", b"card"))
        .await
        .assert_status_ok();

    assert_eq!(std::fs::read_dir(app.uploads()).unwrap().count(), 1);
}
