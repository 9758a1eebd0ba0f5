use serde::{Deserialize, Serialize};

use crate::UploadError;

/// Outcome of a single upload attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    Success {
        text: String,
        pages: usize,
        total_pages: usize,
    },
    Failure {
        message: String,
        status: u16,
    },
}

impl ExtractionResult {
    pub fn status(&self) -> u16 {
        match self {
            ExtractionResult::Success { .. } => 200,
            ExtractionResult::Failure { status, .. } => *status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResult::Success { .. })
    }
}

impl From<UploadError> for ExtractionResult {
    fn from(err: UploadError) -> Self {
        ExtractionResult::Failure {
            message: err.user_message(),
            status: err.status(),
        }
    }
}

// ── Wire JSON ───────────────────────────────────────────────────────────

/// JSON body of `POST /api/extract-pdf-text`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&ExtractionResult> for ExtractionResponse {
    fn from(r: &ExtractionResult) -> Self {
        match r {
            ExtractionResult::Success {
                text,
                pages,
                total_pages,
            } => ExtractionResponse {
                success: true,
                text: Some(text.clone()),
                pages: Some(*pages),
                total_pages: Some(*total_pages),
                message: None,
            },
            ExtractionResult::Failure { message, .. } => ExtractionResponse {
                success: false,
                message: Some(message.clone()),
                ..Default::default()
            },
        }
    }
}

impl ExtractionResponse {
    /// Rebuild the tagged result from a decoded body and its HTTP status.
    ///
    /// A 2xx body claiming success decodes as a success even when its text is
    /// blank or missing; deciding what blank text means is left to the caller.
    pub fn into_result(self, status: u16) -> ExtractionResult {
        if self.success && (200..300).contains(&status) {
            let pages = self.pages.unwrap_or_default();
            return ExtractionResult::Success {
                text: self.text.unwrap_or_default(),
                pages,
                total_pages: self.total_pages.unwrap_or(pages),
            };
        }
        ExtractionResult::Failure {
            message: self
                .message
                .unwrap_or_else(|| format!("Failed to extract text from PDF: HTTP {}", status)),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_serializes_camel_case() {
        let r = ExtractionResult::Success {
            text: "Hello".into(),
            pages: 3,
            total_pages: 3,
        };
        let json = serde_json::to_value(ExtractionResponse::from(&r)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "text": "Hello", "pages": 3, "totalPages": 3})
        );
    }

    #[test]
    fn failure_omits_payload_fields() {
        let r = ExtractionResult::Failure {
            message: "No PDF file provided.".into(),
            status: 400,
        };
        let json = serde_json::to_value(ExtractionResponse::from(&r)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "message": "No PDF file provided."})
        );
    }

    #[test]
    fn error_status_overrides_success_flag() {
        let body = ExtractionResponse {
            success: true,
            text: Some("text".into()),
            ..Default::default()
        };
        let r = body.into_result(500);
        assert!(!r.is_success());
        assert_eq!(r.status(), 500);
    }

    #[test]
    fn success_without_text_keeps_success_shape() {
        let body = ExtractionResponse {
            success: true,
            pages: Some(1),
            total_pages: Some(1),
            ..Default::default()
        };
        assert_eq!(
            body.into_result(200),
            ExtractionResult::Success {
                text: String::new(),
                pages: 1,
                total_pages: 1
            }
        );
    }

    #[test]
    fn missing_message_gets_http_fallback() {
        let body = ExtractionResponse::default();
        match body.into_result(502) {
            ExtractionResult::Failure { message, status } => {
                assert_eq!(status, 502);
                assert!(message.contains("502"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
