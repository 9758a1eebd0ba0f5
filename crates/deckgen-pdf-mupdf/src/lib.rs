use mupdf::{Document, Page, TextPageFlags};

use deckgen_core::{BackendError, ExtractedDocument, PdfBackend};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// Kept in its own crate so the mupdf dependency (AGPL-3.0) can be switched
/// off through the `pdf` feature of `deckgen-ingest`.
///
/// Documents are opened straight from memory. Encrypted documents are
/// rejected with [`BackendError::Encrypted`] before any page is loaded.
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn extract_text(
        &self,
        data: &[u8],
        max_pages: usize,
    ) -> Result<ExtractedDocument, BackendError> {
        let document = Document::from_bytes(data, "application/pdf")
            .map_err(|e| BackendError::Open(e.to_string()))?;

        if document
            .needs_password()
            .map_err(|e| BackendError::Open(e.to_string()))?
        {
            return Err(BackendError::Encrypted);
        }

        let page_count = document
            .page_count()
            .map_err(|e| BackendError::Extraction(e.to_string()))?;
        let page_count = usize::try_from(page_count).unwrap_or_default();
        let pages_read = page_count.min(max_pages);

        let mut pages_text = Vec::with_capacity(pages_read);
        for page_no in 0..pages_read {
            // pages_read <= page_count, which came from an i32
            let page = document
                .load_page(page_no as i32)
                .map_err(|e| BackendError::Extraction(e.to_string()))?;
            pages_text.push(page_text(&page)?);
        }

        tracing::debug!(page_count, pages_read, "mupdf extraction finished");

        Ok(ExtractedDocument {
            text: pages_text.join("\n"),
            page_count,
            pages_read,
        })
    }
}

/// Text of one page, line by line in reading order.
fn page_text(page: &Page) -> Result<String, BackendError> {
    let text_page = page
        .to_text_page(TextPageFlags::empty())
        .map_err(|e| BackendError::Extraction(e.to_string()))?;

    let mut text = String::new();
    for block in text_page.blocks() {
        for line in block.lines() {
            text.extend(line.chars().map(|c| c.char().unwrap_or('\u{FFFD}')));
            text.push('\n');
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_to_open() {
        let err = MupdfBackend::new()
            .extract_text(b"definitely not a pdf", 50)
            .unwrap_err();
        assert!(matches!(
            err,
            BackendError::Open(_) | BackendError::Extraction(_)
        ));
    }

    #[test]
    fn empty_input_fails() {
        assert!(MupdfBackend::new().extract_text(&[], 50).is_err());
    }
}
