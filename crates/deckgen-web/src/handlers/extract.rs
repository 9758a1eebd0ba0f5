use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use std::sync::Arc;

use deckgen_core::classify::classify_message;
use deckgen_core::{ExtractionResult, FailureKind, UploadError, ValidationError, validate_upload};

use crate::models::ExtractJson;
use crate::state::AppState;
use crate::upload;

/// `POST /api/extract-pdf-text`
pub async fn extract_pdf_text(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ExtractJson {
    let result = match handle_extract(&state, multipart).await {
        Ok(result) => result,
        Err(err) => {
            if err.status() >= 500 {
                tracing::error!(error = %err, "error extracting text from PDF");
            } else {
                tracing::info!(status = err.status(), error = %err, "upload rejected");
            }
            ExtractionResult::from(err)
        }
    };
    ExtractJson(result)
}

async fn handle_extract(
    state: &Arc<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ExtractionResult, UploadError> {
    let limits = state.config.limits;
    let multipart = multipart.map_err(|e| UploadError::Multipart(e.body_text()))?;

    let file = upload::parse_multipart(multipart, limits.max_file_size)
        .await?
        .ok_or(ValidationError::MissingFile)?;
    validate_upload(Some(&file), &limits)?;

    tracing::info!(
        filename = %file.name,
        size = file.size_bytes,
        "extracting text from uploaded PDF"
    );

    let data = file.data;
    let backend = Arc::clone(&state.backend);
    let task = tokio::task::spawn_blocking(move || {
        deckgen_ingest::extract_text(&data, backend.as_ref(), limits.max_pages)
    });

    let joined = match state.config.extraction_timeout {
        Some(timeout) => match tokio::time::timeout(timeout, task).await {
            Ok(joined) => joined,
            Err(_) => {
                return Err(UploadError::ExtractionFailure {
                    kind: FailureKind::Timeout,
                    detail: format!("extraction exceeded {}s", timeout.as_secs()),
                });
            }
        },
        None => task.await,
    };

    joined.map_err(|e| {
        let detail = format!("extraction task failed: {}", e);
        UploadError::ExtractionFailure {
            kind: classify_message(&detail),
            detail,
        }
    })?
}
