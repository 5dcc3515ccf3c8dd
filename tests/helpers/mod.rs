//! Test helpers for driving the relay in-process

use std::path::{Path, PathBuf};
use std::time::Duration;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use face_verify_relay::app_state::AppState;
use face_verify_relay::config::AppConfig;
use face_verify_relay::routes;
use face_verify_relay::services::{storage::UploadStore, verifier::DeepFaceClient};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Address nothing listens on, standing in for a downed verification service.
pub const UNREACHABLE_VERIFY_URL: &str = "http://127.0.0.1:9/verify";

/// A relay instance with its own scratch upload directory.
pub struct TestApp {
    pub server: TestServer,
    pub upload_dir: PathBuf,
    _scratch: TempDir,
}

impl TestApp {
    /// Names of the files currently in the upload directory, sorted.
    pub fn uploaded_files(&self) -> Vec<String> {
        list_dir(&self.upload_dir)
    }

    pub fn read_upload(&self, name: &str) -> Vec<u8> {
        std::fs::read(self.upload_dir.join(name)).expect("uploaded file missing")
    }
}

pub fn spawn_app(verify_url: &str) -> TestApp {
    spawn_app_with(|config| config.verify_url = verify_url.to_string())
}

/// Spawn the relay after letting the caller tweak the configuration.
pub fn spawn_app_with(customize: impl FnOnce(&mut AppConfig)) -> TestApp {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = AppConfig {
        upload_dir: scratch.path().join("uploads"),
        verify_timeout_secs: 5,
        ..AppConfig::default()
    };
    customize(&mut config);

    let upload_dir = config.upload_dir.clone();
    let storage = UploadStore::new(&config.upload_dir, config.upload_naming)
        .expect("Failed to create upload store");
    let verifier = DeepFaceClient::new(&config.verify_url, config.verify_timeout())
        .expect("Failed to create verifier client");

    let app = routes::router(AppState::new(config, storage, verifier));
    let server = TestServer::new(app).expect("Failed to start test server");

    TestApp {
        server,
        upload_dir,
        _scratch: scratch,
    }
}

/// Start a mock verification service answering `POST /verify` with `response`.
pub async fn mock_verifier(response: ResponseTemplate, expected_calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify"))
        .respond_with(response)
        .expect(expected_calls)
        .mount(&server)
        .await;
    server
}

pub fn verify_url(server: &MockServer) -> String {
    format!("{}/verify", server.uri())
}

/// A verdict shaped like DeepFace's, delayed by `delay`.
pub fn verdict(delay: Duration) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(serde_json::json!({"verified": true, "distance": 0.12}))
        .set_delay(delay)
}

pub fn image(filename: &str, bytes: impl Into<Vec<u8>>) -> Part {
    Part::bytes(bytes.into()).file_name(filename.to_string())
}

/// Multipart form carrying both required images.
pub fn both_images(id_name: &str, face_name: &str) -> MultipartForm {
    MultipartForm::new()
        .add_part("id_image", image(id_name, b"fake-id-jpeg".to_vec()))
        .add_part("face_image", image(face_name, b"fake-face-jpeg".to_vec()))
}

fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("upload dir missing")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
