use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    Open(String),
    #[error("document is password protected")]
    Encrypted,
    #[error("failed to extract text: {0}")]
    Extraction(String),
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for BackendError {
    fn from(e: std::io::Error) -> Self {
        BackendError::Io(e.to_string())
    }
}

/// Raw output of a backend run, before trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub text: String,
    /// Page count of the whole document, as reported by the backend.
    pub page_count: usize,
    /// Pages actually read (at most the requested cap).
    pub pages_read: usize,
}

/// Trait for PDF text extraction backends.
///
/// Implementors work on the full document held in memory and stop after
/// `max_pages` pages. Backends are synchronous; async callers run them on a
/// blocking thread.
pub trait PdfBackend: Send + Sync {
    /// Extract the text of the first `max_pages` pages of `data`.
    fn extract_text(&self, data: &[u8], max_pages: usize)
    -> Result<ExtractedDocument, BackendError>;
}
