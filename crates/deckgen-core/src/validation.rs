//! Upload checks that run before any bytes reach a PDF backend.

use thiserror::Error;

use crate::{DEFAULT_MAX_FILE_SIZE, UploadedFile};

/// The only MIME type the upload endpoint accepts.
pub const PDF_MIME_TYPE: &str = "application/pdf";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No PDF file provided.")]
    MissingFile,
    #[error("Invalid file type. Only PDF files are allowed.")]
    InvalidType { mime_type: String },
    #[error("File too large. Maximum size is {}MB.", .max_bytes / (1024 * 1024))]
    TooLarge { size_bytes: u64, max_bytes: u64 },
}

impl ValidationError {
    pub fn status(&self) -> u16 {
        match self {
            ValidationError::MissingFile | ValidationError::InvalidType { .. } => 400,
            ValidationError::TooLarge { .. } => 413,
        }
    }
}

/// Size and page caps applied to an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_file_size: u64,
    pub max_pages: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_pages: crate::DEFAULT_MAX_PAGES,
        }
    }
}

/// Validate an optional upload in the fixed order: presence, type, size.
///
/// The MIME check is an exact comparison against the declared type; the
/// bytes are never sniffed. The size check is strict: a file exactly at the
/// limit passes.
pub fn validate_upload<'a>(
    file: Option<&'a UploadedFile>,
    limits: &UploadLimits,
) -> Result<&'a UploadedFile, ValidationError> {
    let file = file.ok_or(ValidationError::MissingFile)?;

    if file.mime_type != PDF_MIME_TYPE {
        return Err(ValidationError::InvalidType {
            mime_type: file.mime_type.clone(),
        });
    }

    if file.size_bytes > limits.max_file_size {
        return Err(ValidationError::TooLarge {
            size_bytes: file.size_bytes,
            max_bytes: limits.max_file_size,
        });
    }

    Ok(file)
}
