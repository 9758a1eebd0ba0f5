use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use deckgen_core::{
    ExtractionResponse, ExtractionResult, ExtractionService, PdfBackend, UPLOAD_FIELD,
    UploadLimits, UploadedFile,
};

pub const EXTRACT_PATH: &str = "/api/extract-pdf-text";

/// Uploads files to a running `deckgen-web` server.
pub struct HttpExtractionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpExtractionClient {
    pub fn new(server_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", server_url.trim_end_matches('/'), EXTRACT_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ExtractionService for HttpExtractionClient {
    fn extract<'a>(
        &'a self,
        file: &'a UploadedFile,
    ) -> Pin<Box<dyn Future<Output = Result<ExtractionResult, String>> + Send + 'a>> {
        Box::pin(async move {
            let part = reqwest::multipart::Part::bytes(file.data.clone())
                .file_name(file.name.clone())
                .mime_str(&file.mime_type)
                .map_err(|e| e.to_string())?;
            let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD, part);

            tracing::debug!(endpoint = %self.endpoint, file = %file.name, "uploading document");

            let resp = self
                .client
                .post(&self.endpoint)
                .multipart(form)
                .send()
                .await
                .map_err(|e| e.to_string())?;

            let status = resp.status().as_u16();
            let body = resp.text().await.map_err(|e| e.to_string())?;

            Ok(match serde_json::from_str::<ExtractionResponse>(&body) {
                Ok(parsed) => parsed.into_result(status),
                Err(e) => {
                    tracing::debug!(status, error = %e, "response was not extraction JSON");
                    ExtractionResult::Failure {
                        message: format!("Failed to extract text from PDF: HTTP {}", status),
                        status,
                    }
                }
            })
        })
    }
}

/// Runs extraction in-process, without a server.
pub struct LocalExtractor {
    backend: Arc<dyn PdfBackend>,
    limits: UploadLimits,
}

impl LocalExtractor {
    pub fn new(backend: Arc<dyn PdfBackend>, limits: UploadLimits) -> Self {
        Self { backend, limits }
    }
}

impl ExtractionService for LocalExtractor {
    fn extract<'a>(
        &'a self,
        file: &'a UploadedFile,
    ) -> Pin<Box<dyn Future<Output = Result<ExtractionResult, String>> + Send + 'a>> {
        let file = file.clone();
        let backend = Arc::clone(&self.backend);
        let limits = self.limits;
        Box::pin(async move {
            // MuPDF is not async
            tokio::task::spawn_blocking(move || {
                deckgen_ingest::process_upload(Some(&file), &limits, backend.as_ref())
            })
            .await
            .map_err(|e| format!("Task join error: {}", e))
        })
    }
}
