//! Ollama provider — locally hosted models over the generation API.
//!
//! The daemon may simply not be running, so `generate` opens with a cheap
//! liveness probe and short-circuits to `Unavailable` instead of burning
//! the full request timeout on a dead socket.

use async_trait::async_trait;
use groundcrew_core::error::ProviderError;
use groundcrew_core::{FileRecord, Message};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for an Ollama daemon's `/api/generate` endpoint.
pub struct OllamaProvider {
    name: String,
    base_url: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: "ollama".into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature,
            client,
        }
    }

    /// Render the message sequence as one generation-style prompt.
    ///
    /// Ollama's generate endpoint takes a single string, so system blocks
    /// and the question are joined with blank lines in order.
    fn to_prompt(messages: &[Message]) -> String {
        messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Liveness probe against the daemon's tag listing.
    async fn probe(&self) -> std::result::Result<(), ProviderError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self.client.get(&url).send().await.map_err(|e| {
            ProviderError::Unavailable(format!(
                "cannot reach Ollama at {}: {e}",
                self.base_url
            ))
        })?;

        if !response.status().is_success() {
            return Err(ProviderError::Unavailable(format!(
                "Ollama at {} answered status {}",
                self.base_url,
                response.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl groundcrew_core::Provider for OllamaProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        messages: &[Message],
        files: &[FileRecord],
    ) -> std::result::Result<String, ProviderError> {
        if !files.is_empty() {
            debug!(count = files.len(), "Ignoring file attachments for local generation");
        }

        self.probe().await?;

        let url = format!("{}/api/generate", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "prompt": Self::to_prompt(messages),
            "stream": false,
            "options": { "temperature": self.temperature },
        });

        debug!(provider = %self.name, model = %self.model, "Sending generation request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status, body = %body, "Ollama request failed");
            return Err(ProviderError::Rejected { status, body });
        }

        let api_response: GenerateResponse =
            response.json().await.map_err(|e| ProviderError::Rejected {
                status,
                body: format!("unparseable response: {e}"),
            })?;

        Ok(api_response.response)
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(self.probe().await.is_ok())
    }
}

// --- Ollama API types ---

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}
