//! Mock PDF backend for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::backend::{BackendError, ExtractedDocument, PdfBackend};

/// A configurable mock response for [`MockBackend`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return this text for a document of `page_count` pages.
    Text { text: String, page_count: usize },
    /// Fail with the given error.
    Error(BackendError),
}

/// A hand-rolled mock implementing [`PdfBackend`] for tests.
///
/// Returns the same response on every call, optionally after a delay, and
/// counts calls. `pages_read` is `min(page_count, max_pages)`.
pub struct MockBackend {
    response: MockResponse,
    delay: Option<Duration>,
    call_count: AtomicUsize,
}

impl MockBackend {
    pub fn new(response: MockResponse) -> Self {
        Self {
            response,
            delay: None,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Shorthand for a backend that always extracts `text`.
    pub fn text(text: impl Into<String>, page_count: usize) -> Self {
        Self::new(MockResponse::Text {
            text: text.into(),
            page_count,
        })
    }

    /// Shorthand for a backend that always fails with `err`.
    pub fn failing(err: BackendError) -> Self {
        Self::new(MockResponse::Error(err))
    }

    /// Block the calling thread for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl PdfBackend for MockBackend {
    fn extract_text(
        &self,
        _data: &[u8],
        max_pages: usize,
    ) -> Result<ExtractedDocument, BackendError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        match &self.response {
            MockResponse::Text { text, page_count } => Ok(ExtractedDocument {
                text: text.clone(),
                page_count: *page_count,
                pages_read: (*page_count).min(max_pages),
            }),
            MockResponse::Error(e) => Err(e.clone()),
        }
    }
}
