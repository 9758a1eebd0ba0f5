use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deckgen_core::config_file::{self, ClientSection};
use deckgen_core::{
    ExtractionService, GenerationTrigger, PDF_MIME_TYPE, PromptAssembler, UploadLimits,
    UploadedFile,
};

mod client;
mod output;
mod trigger;

use client::{HttpExtractionClient, LocalExtractor};
use output::ColorMode;
use trigger::{StdoutTrigger, WebhookTrigger};

const DEFAULT_SERVER_URL: &str = "http://localhost:3000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Deck generator - build presentation prompts from text and PDF documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble a prompt (optionally merging a PDF's text) and start generation
    Generate {
        /// Prompt text typed by the user
        #[arg(short, long, conflicts_with = "prompt_file")]
        prompt: Option<String>,

        /// Read the prompt text from a file
        #[arg(long)]
        prompt_file: Option<PathBuf>,

        /// PDF whose text is appended to the prompt
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Base URL of the deckgen-web server
        #[arg(long, env = "DECKGEN_SERVER_URL")]
        server: Option<String>,

        /// Extract in-process instead of uploading to a server
        #[arg(long, conflicts_with = "server")]
        local: bool,

        /// POST the prompt to this URL instead of printing it
        #[arg(long, env = "DECKGEN_WEBHOOK_URL")]
        webhook: Option<String>,

        /// HTTP request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Extract text from a PDF locally and print it
    Extract {
        /// Path to the PDF file
        path: PathBuf,

        /// Maximum number of pages to read
        #[arg(long, default_value_t = deckgen_core::DEFAULT_MAX_PAGES)]
        max_pages: usize,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let ok = match cli.command {
        Command::Generate {
            prompt,
            prompt_file,
            file,
            server,
            local,
            webhook,
            timeout,
            no_color,
        } => {
            let client_config = config_file::load_config().client.unwrap_or_default();
            let prompt = match (prompt, prompt_file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                (None, None) => String::new(),
            };
            let opts = GenerateOptions::resolve(client_config, server, webhook, timeout);
            let color = ColorMode(!no_color);
            let upload = file.as_deref().map(read_upload).transpose()?;

            if local {
                let backend = deckgen_ingest::default_backend()?;
                let service = LocalExtractor::new(backend, UploadLimits::default());
                generate_with(service, &opts, prompt, upload, color).await?
            } else {
                let service = HttpExtractionClient::new(&opts.server_url, opts.timeout)?;
                tracing::debug!(endpoint = service.endpoint(), "using extraction server");
                generate_with(service, &opts, prompt, upload, color).await?
            }
        }
        Command::Extract {
            path,
            max_pages,
            no_color,
        } => extract(&path, max_pages, ColorMode(!no_color)).await?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Client settings after flags, env and config file are combined.
#[derive(Debug, Clone, PartialEq)]
struct GenerateOptions {
    server_url: String,
    webhook_url: Option<String>,
    timeout: Duration,
}

impl GenerateOptions {
    /// Flags (and their env vars) win over the config file.
    fn resolve(
        config: ClientSection,
        server: Option<String>,
        webhook: Option<String>,
        timeout: Option<u64>,
    ) -> Self {
        let secs = timeout
            .or(config.request_timeout_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        Self {
            server_url: server
                .or(config.server_url)
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            webhook_url: webhook.or(config.webhook_url),
            timeout: Duration::from_secs(secs),
        }
    }
}

/// Returns `false` when the failure has already been reported to the user.
async fn generate_with<S: ExtractionService>(
    service: S,
    opts: &GenerateOptions,
    prompt: String,
    upload: Option<UploadedFile>,
    color: ColorMode,
) -> anyhow::Result<bool> {
    match &opts.webhook_url {
        Some(url) => {
            let trigger = WebhookTrigger::new(url.as_str(), opts.timeout)?;
            let ok = run_assembler(service, trigger, prompt, upload, color).await?;
            if ok {
                output::print_note(
                    &mut std::io::stderr(),
                    &format!("Generation started via {}", url),
                    color,
                )?;
            }
            Ok(ok)
        }
        None => run_assembler(service, StdoutTrigger, prompt, upload, color).await,
    }
}

async fn run_assembler<S: ExtractionService, T: GenerationTrigger>(
    service: S,
    trigger: T,
    prompt: String,
    upload: Option<UploadedFile>,
    color: ColorMode,
) -> anyhow::Result<bool> {
    let mut assembler = PromptAssembler::new(service, trigger);
    assembler.set_prompt(prompt);

    let mut stderr = std::io::stderr();
    if let Err(e) = assembler.select_file(upload) {
        output::print_error(&mut stderr, &e.to_string(), color)?;
        return Ok(false);
    }

    if let Some(file) = assembler.selected_file() {
        output::print_note(
            &mut stderr,
            &format!("Extracting text from {}...", file.name),
            color,
        )?;
    }

    match assembler.submit().await {
        Ok(_) => {
            assembler.generation_finished();
            Ok(true)
        }
        Err(e) => {
            output::print_error(&mut stderr, &e.to_string(), color)?;
            Ok(false)
        }
    }
}

async fn extract(path: &Path, max_pages: usize, color: ColorMode) -> anyhow::Result<bool> {
    let upload = read_upload(path)?;
    let backend = deckgen_ingest::default_backend()?;
    let limits = UploadLimits {
        max_pages,
        ..UploadLimits::default()
    };

    let name = upload.name.clone();
    let result = tokio::task::spawn_blocking(move || {
        deckgen_ingest::process_upload(Some(&upload), &limits, backend.as_ref())
    })
    .await?;

    output::print_extraction(
        &mut std::io::stdout(),
        &mut std::io::stderr(),
        &name,
        &result,
        color,
    )?;

    Ok(result.is_success())
}

/// Read a file from disk into an upload. The MIME type comes from the
/// extension, as a browser would declare it.
fn read_upload(path: &Path) -> anyhow::Result<UploadedFile> {
    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadedFile::new(name, mime_for_path(path), data))
}

fn mime_for_path(path: &Path) -> &'static str {
    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        PDF_MIME_TYPE
    } else {
        "application/octet-stream"
    }
}
