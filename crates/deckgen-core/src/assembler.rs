//! Prompt assembly: merge typed prompt text with text extracted from an
//! uploaded document, then hand the result to the generation trigger.
//!
//! The assembler owns the prompt string and at most one selected file. A
//! submission walks `Idle → ProcessingFile → (Generating | Failed)`; the
//! only suspension point is the single extraction round trip.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::response::ExtractionResult;
use crate::validation::{PDF_MIME_TYPE, UploadLimits};
use crate::UploadedFile;

/// Separator placed between typed prompt text and extracted document text.
pub const PROMPT_SEPARATOR: &str = "\n\n---\n\n";

/// Merge typed prompt text with extracted document text.
///
/// Both sides are trimmed. When the typed text is blank the result is the
/// extracted text alone; typed text is never dropped.
pub fn merge_prompt(current: &str, extracted: &str) -> String {
    let current = current.trim();
    let extracted = extracted.trim();
    if current.is_empty() {
        extracted.to_string()
    } else {
        format!("{current}{PROMPT_SEPARATOR}{extracted}")
    }
}

/// Something that turns an uploaded file into an [`ExtractionResult`].
///
/// `Err` is a transport failure (the request never produced a response).
pub trait ExtractionService: Send + Sync {
    fn extract<'a>(
        &'a self,
        file: &'a UploadedFile,
    ) -> Pin<Box<dyn Future<Output = Result<ExtractionResult, String>> + Send + 'a>>;
}

/// Downstream consumer of the assembled prompt.
pub trait GenerationTrigger: Send + Sync {
    fn trigger<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblerState {
    Idle,
    ProcessingFile,
    Generating,
    Failed(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssemblerError {
    #[error("a generation is already in progress")]
    Busy,
    #[error("{0}")]
    InvalidSelection(String),
    #[error("Failed to process document: {0}")]
    Extraction(String),
    #[error("Could not extract text from the PDF. It might be empty or malformed.")]
    EmptyExtraction,
    #[error("Failed to start generation: {0}")]
    Trigger(String),
}

pub struct PromptAssembler<S, T> {
    service: S,
    trigger: T,
    limits: UploadLimits,
    prompt: String,
    selected: Option<UploadedFile>,
    file_error: Option<String>,
    state: AssemblerState,
}

impl<S: ExtractionService, T: GenerationTrigger> PromptAssembler<S, T> {
    pub fn new(service: S, trigger: T) -> Self {
        Self::with_limits(service, trigger, UploadLimits::default())
    }

    pub fn with_limits(service: S, trigger: T, limits: UploadLimits) -> Self {
        Self {
            service,
            trigger,
            limits,
            prompt: String::new(),
            selected: None,
            file_error: None,
            state: AssemblerState::Idle,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Replace the prompt text (direct user typing).
    pub fn set_prompt(&mut self, text: impl Into<String>) {
        self.prompt = text.into();
    }

    pub fn selected_file(&self) -> Option<&UploadedFile> {
        self.selected.as_ref()
    }

    /// The last error tied to file selection or processing, if any.
    pub fn file_error(&self) -> Option<&str> {
        self.file_error.as_deref()
    }

    pub fn state(&self) -> &AssemblerState {
        &self.state
    }

    pub fn trigger_ref(&self) -> &T {
        &self.trigger
    }

    /// Select (or with `None`, clear) the file to upload on the next submit.
    ///
    /// Rejects non-PDF and oversized files up front; a rejected file clears
    /// the selection. The prompt text is never touched here.
    pub fn select_file(&mut self, file: Option<UploadedFile>) -> Result<(), AssemblerError> {
        self.file_error = None;
        let Some(file) = file else {
            self.selected = None;
            return Ok(());
        };

        let rejection = if file.mime_type != PDF_MIME_TYPE {
            Some("Only PDF files are supported.".to_string())
        } else if file.size_bytes > self.limits.max_file_size {
            Some(format!(
                "File too large. Maximum size is {}MB.",
                self.limits.max_file_size / (1024 * 1024)
            ))
        } else {
            None
        };

        if let Some(msg) = rejection {
            self.selected = None;
            self.file_error = Some(msg.clone());
            return Err(AssemblerError::InvalidSelection(msg));
        }

        tracing::debug!(name = %file.name, size = file.size_bytes, "selected file");
        self.selected = Some(file);
        Ok(())
    }

    /// Mark the downstream generation as finished so the next submit can run.
    pub fn generation_finished(&mut self) {
        if self.state == AssemblerState::Generating {
            self.state = AssemblerState::Idle;
        }
    }

    /// Build the final prompt and fire the generation trigger once.
    ///
    /// On any extraction failure the prompt is left untouched and the
    /// trigger is not called. Returns the prompt that was sent.
    pub async fn submit(&mut self) -> Result<String, AssemblerError> {
        if matches!(
            self.state,
            AssemblerState::ProcessingFile | AssemblerState::Generating
        ) {
            return Err(AssemblerError::Busy);
        }

        let final_text = match self.selected.as_ref() {
            None => self.prompt.clone(),
            Some(file) => {
                self.state = AssemblerState::ProcessingFile;
                self.file_error = None;

                let outcome = self.service.extract(file).await;
                match resolve_extraction(outcome) {
                    Ok(extracted) => merge_prompt(&self.prompt, &extracted),
                    Err(err) => return Err(self.fail(err)),
                }
            }
        };

        self.prompt = final_text.clone();
        self.state = AssemblerState::Generating;

        if let Err(e) = self.trigger.trigger(&self.prompt).await {
            return Err(self.fail(AssemblerError::Trigger(e)));
        }

        Ok(final_text)
    }

    fn fail(&mut self, err: AssemblerError) -> AssemblerError {
        let msg = err.to_string();
        tracing::warn!(error = %msg, "prompt assembly failed");
        if !matches!(err, AssemblerError::Trigger(_)) {
            self.file_error = Some(msg.clone());
        }
        self.state = AssemblerState::Failed(msg);
        err
    }
}

/// Turn an extraction outcome into the extracted text or an assembler error.
fn resolve_extraction(
    outcome: Result<ExtractionResult, String>,
) -> Result<String, AssemblerError> {
    match outcome {
        Err(transport) => Err(AssemblerError::Extraction(transport)),
        Ok(ExtractionResult::Failure { message, .. }) => Err(AssemblerError::Extraction(message)),
        Ok(ExtractionResult::Success {
            text,
            pages,
            total_pages,
        }) => {
            if text.trim().is_empty() {
                return Err(AssemblerError::EmptyExtraction);
            }
            tracing::info!(pages, total_pages, "extracted text from document");
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_with_empty_prompt() {
        assert_eq!(merge_prompt("", "Hello World"), "Hello World");
        assert_eq!(merge_prompt("   \n", "  Hello World \n"), "Hello World");
    }

    #[test]
    fn merge_with_existing_prompt() {
        assert_eq!(
            merge_prompt("Intro text", "Hello World"),
            "Intro text\n\n---\n\nHello World"
        );
    }

    #[test]
    fn merge_trims_both_sides() {
        assert_eq!(
            merge_prompt("  Intro text\n", "\n\nHello World  "),
            "Intro text\n\n---\n\nHello World"
        );
    }

    #[test]
    fn resolve_transport_error() {
        let err = resolve_extraction(Err("connection refused".into())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to process document: connection refused"
        );
    }

    #[test]
    fn resolve_blank_success_is_empty_extraction() {
        let err = resolve_extraction(Ok(ExtractionResult::Success {
            text: " ".into(),
            pages: 1,
            total_pages: 1,
        }))
        .unwrap_err();
        assert_eq!(err, AssemblerError::EmptyExtraction);
    }
}
