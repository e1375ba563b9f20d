//! Application state shared by all handlers.

use shotbox_core::ServerConfig;
use shotbox_processing::UploadValidator;
use shotbox_storage::Storage;
use std::sync::Arc;

use crate::services::ingestion::IngestionService;

#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub storage: Arc<dyn Storage>,
    pub ingestion: IngestionService,
}

impl AppState {
    pub fn new(config: ServerConfig, storage: Arc<dyn Storage>) -> Self {
        let validator = UploadValidator::new(config.max_file_size_bytes);
        let ingestion = IngestionService::new(storage.clone(), validator);
        Self {
            config,
            storage,
            ingestion,
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.config.max_file_size_bytes
    }
}
