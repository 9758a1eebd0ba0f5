//! Integration tests for [`PromptAssembler`].
//!
//! The extraction service and generation trigger are in-memory fakes, so
//! these tests exercise the state machine without any HTTP.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use deckgen_core::{
    AssemblerError, AssemblerState, ExtractionResult, ExtractionService, GenerationTrigger,
    PDF_MIME_TYPE, PromptAssembler, UploadedFile,
};

/// Returns a fixed outcome and counts calls.
struct FakeService {
    outcome: Result<ExtractionResult, String>,
    calls: AtomicUsize,
}

impl FakeService {
    fn new(outcome: Result<ExtractionResult, String>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    fn text(text: &str) -> Self {
        Self::new(Ok(ExtractionResult::Success {
            text: text.to_string(),
            pages: 2,
            total_pages: 2,
        }))
    }
}

impl ExtractionService for FakeService {
    fn extract<'a>(
        &'a self,
        _file: &'a UploadedFile,
    ) -> Pin<Box<dyn Future<Output = Result<ExtractionResult, String>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.outcome.clone();
        Box::pin(async move { outcome })
    }
}

/// Records every prompt it is handed.
#[derive(Default)]
struct RecordingTrigger {
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingTrigger {
    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl GenerationTrigger for RecordingTrigger {
    fn trigger<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>> {
        Box::pin(async move {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail {
                Err("generator offline".to_string())
            } else {
                Ok(())
            }
        })
    }
}

fn pdf_file() -> UploadedFile {
    UploadedFile::new("slides.pdf", PDF_MIME_TYPE, b"%PDF-1.7".to_vec())
}

#[tokio::test]
async fn no_file_sends_prompt_unchanged() {
    let mut asm = PromptAssembler::new(FakeService::text("unused"), RecordingTrigger::default());
    asm.set_prompt("  Quarterly review  ");

    let sent = asm.submit().await.unwrap();
    assert_eq!(sent, "  Quarterly review  ");
    assert_eq!(asm.trigger_ref().prompts(), vec!["  Quarterly review  "]);
    assert_eq!(asm.state(), &AssemblerState::Generating);
}

#[tokio::test]
async fn extracted_text_alone_when_prompt_blank() {
    let mut asm = PromptAssembler::new(FakeService::text("Hello World"), RecordingTrigger::default());
    asm.select_file(Some(pdf_file())).unwrap();

    let sent = asm.submit().await.unwrap();
    assert_eq!(sent, "Hello World");
    assert_eq!(asm.prompt(), "Hello World");
}

#[tokio::test]
async fn extracted_text_appended_after_separator() {
    let mut asm = PromptAssembler::new(FakeService::text("Hello World"), RecordingTrigger::default());
    asm.set_prompt("Intro text");
    asm.select_file(Some(pdf_file())).unwrap();

    let sent = asm.submit().await.unwrap();
    assert_eq!(sent, "Intro text\n\n---\n\nHello World");
    assert_eq!(asm.trigger_ref().prompts().len(), 1);
}

#[tokio::test]
async fn handler_failure_aborts_and_keeps_prompt() {
    let service = FakeService::new(Ok(ExtractionResult::Failure {
        message: "Invalid PDF file. Please ensure the file is not corrupted.".into(),
        status: 500,
    }));
    let mut asm = PromptAssembler::new(service, RecordingTrigger::default());
    asm.set_prompt("Intro text");
    asm.select_file(Some(pdf_file())).unwrap();

    let err = asm.submit().await.unwrap_err();
    assert!(matches!(err, AssemblerError::Extraction(_)));
    assert_eq!(asm.prompt(), "Intro text");
    assert!(asm.trigger_ref().prompts().is_empty());
    assert_eq!(
        asm.file_error(),
        Some("Failed to process document: Invalid PDF file. Please ensure the file is not corrupted.")
    );
    assert!(matches!(asm.state(), AssemblerState::Failed(_)));
}

#[tokio::test]
async fn transport_error_aborts() {
    let service = FakeService::new(Err("connection refused".into()));
    let mut asm = PromptAssembler::new(service, RecordingTrigger::default());
    asm.select_file(Some(pdf_file())).unwrap();

    let err = asm.submit().await.unwrap_err();
    assert_eq!(err, AssemblerError::Extraction("connection refused".into()));
    assert!(asm.trigger_ref().prompts().is_empty());
}

#[tokio::test]
async fn empty_text_success_aborts() {
    let mut asm = PromptAssembler::new(FakeService::text(""), RecordingTrigger::default());
    asm.set_prompt("Intro text");
    asm.select_file(Some(pdf_file())).unwrap();

    let err = asm.submit().await.unwrap_err();
    assert_eq!(err, AssemblerError::EmptyExtraction);
    assert_eq!(asm.prompt(), "Intro text");
    assert!(asm.trigger_ref().prompts().is_empty());
}

#[tokio::test]
async fn busy_while_generating() {
    let mut asm = PromptAssembler::new(FakeService::text("x"), RecordingTrigger::default());
    asm.set_prompt("first");
    asm.submit().await.unwrap();

    assert_eq!(asm.submit().await.unwrap_err(), AssemblerError::Busy);
    assert_eq!(asm.trigger_ref().prompts().len(), 1);

    asm.generation_finished();
    assert_eq!(asm.state(), &AssemblerState::Idle);
    asm.submit().await.unwrap();
    assert_eq!(asm.trigger_ref().prompts().len(), 2);
}

#[tokio::test]
async fn failed_state_allows_resubmit() {
    let mut asm = PromptAssembler::new(FakeService::text(" "), RecordingTrigger::default());
    asm.select_file(Some(pdf_file())).unwrap();
    assert!(asm.submit().await.is_err());

    asm.select_file(None).unwrap();
    asm.set_prompt("typed instead");
    assert_eq!(asm.submit().await.unwrap(), "typed instead");
}

#[tokio::test]
async fn trigger_failure_is_reported() {
    let trigger = RecordingTrigger {
        fail: true,
        ..Default::default()
    };
    let mut asm = PromptAssembler::new(FakeService::text("Hello"), trigger);
    asm.select_file(Some(pdf_file())).unwrap();

    let err = asm.submit().await.unwrap_err();
    assert!(matches!(err, AssemblerError::Trigger(_)));
    // Called exactly once even though it failed.
    assert_eq!(asm.trigger_ref().prompts(), vec!["Hello"]);
    assert!(asm.file_error().is_none());
}

#[test]
fn selecting_non_pdf_clears_selection() {
    let mut asm = PromptAssembler::new(FakeService::text("x"), RecordingTrigger::default());
    asm.select_file(Some(pdf_file())).unwrap();

    let notes = UploadedFile::new("notes.txt", "text/plain", b"hi".to_vec());
    let err = asm.select_file(Some(notes)).unwrap_err();
    assert_eq!(
        err,
        AssemblerError::InvalidSelection("Only PDF files are supported.".into())
    );
    assert!(asm.selected_file().is_none());
    assert_eq!(asm.file_error(), Some("Only PDF files are supported."));
}

#[test]
fn selecting_oversized_pdf_rejected() {
    let mut asm = PromptAssembler::new(FakeService::text("x"), RecordingTrigger::default());
    let mut big = pdf_file();
    big.size_bytes = 10 * 1024 * 1024 + 1;

    let err = asm.select_file(Some(big)).unwrap_err();
    assert_eq!(err.to_string(), "File too large. Maximum size is 10MB.");
    assert!(asm.selected_file().is_none());
}

#[tokio::test]
async fn rejected_selection_never_uploads() {
    let mut asm = PromptAssembler::new(FakeService::text("x"), RecordingTrigger::default());
    asm.set_prompt("keep me");
    let _ = asm.select_file(Some(UploadedFile::new("a.png", "image/png", vec![1])));

    assert_eq!(asm.submit().await.unwrap(), "keep me");
}
