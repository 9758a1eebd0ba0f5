//! Maps backend failures onto the messages shown to users.
//!
//! Backends only sometimes know *why* a document failed. When they report
//! [`BackendError::Encrypted`] the answer is exact; otherwise the choice is a
//! best-effort match on the error text, checked in a fixed order. This is
//! message selection, not a typed error taxonomy.

use crate::backend::BackendError;

/// Which user-facing message an extraction failure gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidPdf,
    PasswordProtected,
    Timeout,
    Generic,
}

impl FailureKind {
    pub fn user_message(self) -> &'static str {
        match self {
            FailureKind::InvalidPdf => "Invalid PDF file. Please ensure the file is not corrupted.",
            FailureKind::PasswordProtected => "Password-protected PDFs are not supported.",
            FailureKind::Timeout => "Timed out while processing document for text extraction.",
            FailureKind::Generic => "Failed to process document for text extraction.",
        }
    }
}

/// Pick the message kind for a backend error.
pub fn classify_failure(err: &BackendError) -> FailureKind {
    match err {
        BackendError::Encrypted => FailureKind::PasswordProtected,
        other => classify_message(&other.to_string()),
    }
}

/// Substring heuristic over free-form error text.
///
/// "PDF" wins over "password": a message mentioning both is reported as an
/// invalid PDF.
pub fn classify_message(message: &str) -> FailureKind {
    if message.contains("Invalid PDF") || message.contains("PDF") {
        FailureKind::InvalidPdf
    } else if message.contains("password") {
        FailureKind::PasswordProtected
    } else {
        FailureKind::Generic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypted_is_typed() {
        assert_eq!(
            classify_failure(&BackendError::Encrypted),
            FailureKind::PasswordProtected
        );
    }

    #[test]
    fn open_errors_mention_pdf() {
        // BackendError::Open renders as "failed to open PDF: ..."
        let err = BackendError::Open("no objects found".into());
        assert_eq!(classify_failure(&err), FailureKind::InvalidPdf);
    }

    #[test]
    fn password_text_without_pdf() {
        let err = BackendError::Extraction("document requires a password".into());
        assert_eq!(classify_failure(&err), FailureKind::PasswordProtected);
    }

    #[test]
    fn pdf_takes_precedence_over_password() {
        assert_eq!(
            classify_message("PDF needs a password"),
            FailureKind::InvalidPdf
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(classify_message("bad pdf header"), FailureKind::Generic);
        assert_eq!(classify_message("Password required"), FailureKind::Generic);
    }

    #[test]
    fn unknown_errors_are_generic() {
        let err = BackendError::Io("broken pipe".into());
        assert_eq!(classify_failure(&err), FailureKind::Generic);
        assert_eq!(
            FailureKind::Generic.user_message(),
            "Failed to process document for text extraction."
        );
    }
}
