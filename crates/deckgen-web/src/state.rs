use std::sync::Arc;

use deckgen_core::PdfBackend;

use crate::config::ServerConfig;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub backend: Arc<dyn PdfBackend>,
}

impl AppState {
    pub fn new(config: ServerConfig, backend: Arc<dyn PdfBackend>) -> Self {
        Self { config, backend }
    }
}
