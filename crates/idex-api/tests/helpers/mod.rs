#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use bytes::Bytes;
use idex_api::setup::routes::setup_routes;
use idex_api::AppState;
use idex_core::Config;
use idex_storage::{LocalResultStore, ResultStore};
use idex_vision::ScriptedVisionModel;
use tempfile::TempDir;

pub const MAX_FILE_SIZE: usize = 1024;

pub struct TestApp {
    pub server: TestServer,
    pub model: Arc<ScriptedVisionModel>,
    pub dir: TempDir,
}

impl TestApp {
    pub fn uploads(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    pub fn outputs(&self) -> PathBuf {
        self.dir.path().join("outputs")
    }
}

pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.extraction.upload_folder = dir.join("uploads").display().to_string();
    config.extraction.output_folder = dir.join("outputs").display().to_string();
    config.extraction.max_file_size_bytes = MAX_FILE_SIZE;
    config
}

pub fn spawn_app(model: ScriptedVisionModel) -> TestApp {
    spawn_app_with(model, |_| {})
}

pub fn spawn_app_with(model: ScriptedVisionModel, configure: impl FnOnce(&mut Config)) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    configure(&mut config);
    std::fs::create_dir_all(&config.extraction.upload_folder).unwrap();
    std::fs::create_dir_all(&config.extraction.output_folder).unwrap();

    let model = Arc::new(model);
    let store: Arc<dyn ResultStore> =
        Arc::new(LocalResultStore::new(&config.extraction.output_folder));
    let state = Arc::new(AppState::new(config, model.clone(), Some(store)));
    let router = setup_routes(state).unwrap();

    TestApp {
        server: TestServer::new(router).unwrap(),
        model,
        dir,
    }
}

pub fn pan_answer(number: &str) -> String {
    format!(
        "Here is the extracted data:\n```json\n{{\"pan_number\": \"{}\", \"name\": \"RAVI KUMAR\", \"fathers_name\": \"SURESH KUMAR\", \"date_of_birth\": \"01/01/1990\", \"signature_present\": \"yes\"}}\n```",
        number
    )
}

pub fn aadhaar_answer(number: &str) -> String {
    format!(
        "{{\"aadhaar_number\": \"{}\", \"name\": \"Priya Sharma\", \"date_of_birth\": \"15/08/1992\", \"gender\": \"Female\", \"address\": \"Pune\", \"qr_code_present\": \"yes\"}}",
        number
    )
}

pub fn image_part(filename: &str, data: &'static [u8]) -> Part {
    Part::bytes(Bytes::from_static(data))
        .file_name(filename)
        .mime_type("image/jpeg")
}

pub fn single_form(filename: &str, data: &'static [u8]) -> MultipartForm {
    MultipartForm::new().add_part("file", image_part(filename, data))
}
