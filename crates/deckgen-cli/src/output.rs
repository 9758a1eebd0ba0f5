use std::io::Write;

use deckgen_core::ExtractionResult;
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print an error line in red (or plain).
pub fn print_error(w: &mut dyn Write, msg: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "error:".red().bold(), msg)
    } else {
        writeln!(w, "error: {}", msg)
    }
}

/// Print a status line that is not part of the prompt itself.
pub fn print_note(w: &mut dyn Write, msg: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", msg.dimmed())
    } else {
        writeln!(w, "{}", msg)
    }
}

/// Print the outcome of a local `extract` run.
///
/// Extracted text goes to `out`, the summary and failures to `err`, so the
/// text can be piped on its own.
pub fn print_extraction(
    out: &mut dyn Write,
    err: &mut dyn Write,
    file_name: &str,
    result: &ExtractionResult,
    color: ColorMode,
) -> std::io::Result<()> {
    match result {
        ExtractionResult::Success {
            text,
            pages,
            total_pages,
        } => {
            writeln!(out, "{}", text)?;
            let summary = format!(
                "Extracted {} chars from {} ({} of {} pages)",
                text.chars().count(),
                file_name,
                pages,
                total_pages
            );
            if color.enabled() {
                writeln!(err, "{}", summary.green())
            } else {
                writeln!(err, "{}", summary)
            }
        }
        ExtractionResult::Failure { message, status } => {
            print_error(err, &format!("{} (status {})", message, status), color)
        }
    }
}
