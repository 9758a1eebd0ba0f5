use std::future::Future;
use std::io::Write;
use std::pin::Pin;
use std::time::Duration;

use deckgen_core::GenerationTrigger;
use serde::Serialize;

/// Writes the assembled prompt to stdout for a downstream process to pick up.
pub struct StdoutTrigger;

impl GenerationTrigger for StdoutTrigger {
    fn trigger<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>> {
        Box::pin(async move {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{}", prompt).map_err(|e| e.to_string())?;
            out.flush().map_err(|e| e.to_string())
        })
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
}

/// POSTs `{"prompt": ...}` to a generation webhook.
pub struct WebhookTrigger {
    client: reqwest::Client,
    url: String,
}

impl WebhookTrigger {
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            url: url.into(),
        })
    }
}

impl GenerationTrigger for WebhookTrigger {
    fn trigger<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>> {
        Box::pin(async move {
            let resp = self
                .client
                .post(&self.url)
                .json(&GenerateRequest { prompt })
                .send()
                .await
                .map_err(|e| e.to_string())?;

            let status = resp.status();
            if !status.is_success() {
                return Err(format!("HTTP {}", status));
            }
            tracing::info!(url = %self.url, chars = prompt.len(), "generation triggered");
            Ok(())
        })
    }
}
