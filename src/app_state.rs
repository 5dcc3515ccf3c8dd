use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{storage::UploadStore, verifier::DeepFaceClient};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Arc<UploadStore>,
    pub verifier: Arc<DeepFaceClient>,
}

impl AppState {
    pub fn new(config: AppConfig, storage: UploadStore, verifier: DeepFaceClient) -> Self {
        Self {
            config: Arc::new(config),
            storage: Arc::new(storage),
            verifier: Arc::new(verifier),
        }
    }
}
