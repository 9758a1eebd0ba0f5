use thiserror::Error;

pub mod assembler;
pub mod backend;
pub mod classify;
pub mod config_file;
pub mod mock;
pub mod response;
pub mod validation;

// Re-export for convenience
pub use assembler::{
    AssemblerError, AssemblerState, ExtractionService, GenerationTrigger, PROMPT_SEPARATOR,
    PromptAssembler, merge_prompt,
};
pub use backend::{BackendError, ExtractedDocument, PdfBackend};
pub use classify::{FailureKind, classify_failure};
pub use response::{ExtractionResponse, ExtractionResult};
pub use validation::{PDF_MIME_TYPE, UploadLimits, ValidationError, validate_upload};

/// Default upload size limit: 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default number of pages handed to the text extractor.
pub const DEFAULT_MAX_PAGES: usize = 50;

/// Multipart field name carrying the uploaded document.
pub const UPLOAD_FIELD: &str = "pdfFile";

/// A file submitted for text extraction.
///
/// Lives for a single request. `size_bytes` is the declared size; for files
/// read off the wire it equals `data.len()`.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Build an upload from in-memory bytes, deriving `size_bytes` from the data.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size_bytes: data.len() as u64,
            mime_type: mime_type.into(),
            data,
        }
    }
}

/// Everything that can end an upload attempt without a success response.
///
/// Each variant maps to exactly one HTTP status and one user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no extractable text in document")]
    ExtractionEmpty,
    #[error("extraction failed ({kind:?}): {detail}")]
    ExtractionFailure { kind: FailureKind, detail: String },
    #[error("malformed multipart request: {0}")]
    Multipart(String),
}

impl UploadError {
    /// HTTP status code reported for this error.
    pub fn status(&self) -> u16 {
        match self {
            UploadError::Validation(v) => v.status(),
            UploadError::ExtractionEmpty => 422,
            UploadError::ExtractionFailure { .. } => 500,
            UploadError::Multipart(_) => 400,
        }
    }

    /// Message returned to the client in the `message` field.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::Validation(v) => v.to_string(),
            UploadError::ExtractionEmpty => {
                "No text could be extracted from the PDF. The file might be image-based or corrupted."
                    .to_string()
            }
            UploadError::ExtractionFailure { kind, .. } => kind.user_message().to_string(),
            UploadError::Multipart(detail) => format!("Malformed upload request: {}", detail),
        }
    }

    /// Build an extraction failure from a backend error, picking the message
    /// kind with [`classify_failure`].
    pub fn from_backend(err: &BackendError) -> Self {
        UploadError::ExtractionFailure {
            kind: classify_failure(err),
            detail: err.to_string(),
        }
    }
}
