use std::sync::Arc;

use thiserror::Error;

// Re-export domain types for convenience
pub use deckgen_core::{
    ExtractionResult, PdfBackend, UploadError, UploadLimits, UploadedFile, validate_upload,
};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("PDF support not compiled in (enable the `pdf` feature of deckgen-ingest)")]
    NoPdfSupport,
}

/// The PDF backend compiled into this build.
#[cfg(feature = "pdf")]
pub fn default_backend() -> Result<Arc<dyn PdfBackend>, IngestError> {
    Ok(Arc::new(deckgen_pdf_mupdf::MupdfBackend::new()))
}

#[cfg(not(feature = "pdf"))]
pub fn default_backend() -> Result<Arc<dyn PdfBackend>, IngestError> {
    Err(IngestError::NoPdfSupport)
}

/// Run `backend` over `data` and turn its output into a success result.
///
/// The text is trimmed; blank text is [`UploadError::ExtractionEmpty`].
/// `pages` and `total_pages` both carry the document's page count as the
/// backend reports it.
pub fn extract_text(
    data: &[u8],
    backend: &dyn PdfBackend,
    max_pages: usize,
) -> Result<ExtractionResult, UploadError> {
    let document = backend.extract_text(data, max_pages).map_err(|e| {
        tracing::error!(error = %e, "error extracting text from PDF");
        UploadError::from_backend(&e)
    })?;

    let text = document.text.trim();
    if text.is_empty() {
        tracing::info!(
            page_count = document.page_count,
            "document produced no extractable text"
        );
        return Err(UploadError::ExtractionEmpty);
    }

    tracing::info!(
        page_count = document.page_count,
        pages_read = document.pages_read,
        chars = text.len(),
        "extracted text from PDF"
    );

    Ok(ExtractionResult::Success {
        text: text.to_string(),
        pages: document.page_count,
        total_pages: document.page_count,
    })
}

/// Full synchronous upload pipeline: validate, then extract.
///
/// Every failure becomes an [`ExtractionResult::Failure`] carrying its HTTP
/// status and message.
pub fn process_upload(
    file: Option<&UploadedFile>,
    limits: &UploadLimits,
    backend: &dyn PdfBackend,
) -> ExtractionResult {
    let outcome = validate_upload(file, limits)
        .map_err(UploadError::from)
        .and_then(|file| extract_text(&file.data, backend, limits.max_pages));

    match outcome {
        Ok(result) => result,
        Err(err) => {
            tracing::debug!(status = err.status(), error = %err, "upload rejected");
            ExtractionResult::from(err)
        }
    }
}
