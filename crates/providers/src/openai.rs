//! OpenAI provider implementation.
//!
//! Chat completions over `/v1/chat/completions` with a role-tagged message
//! list, plus the embeddings endpoint used by the context indexer. Exactly
//! one round trip per call; retry policy belongs to the caller.

use async_trait::async_trait;
use groundcrew_core::error::{IndexError, ProviderError};
use groundcrew_core::{Embedder, FileRecord, Message, Role};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// OpenAI chat-completions client.
pub struct OpenAiProvider {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Self {
        Self {
            name: "openai".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
            client: http_client(timeout),
        }
    }

    /// Create with a custom base URL (e.g., for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn to_api_messages(messages: &[Message]) -> Vec<serde_json::Value> {
        messages
            .iter()
            .map(|m| {
                serde_json::json!({
                    "role": match m.role {
                        Role::System => "system",
                        Role::User => "user",
                    },
                    "content": m.content,
                })
            })
            .collect()
    }
}

#[async_trait]
impl groundcrew_core::Provider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        messages: &[Message],
        files: &[FileRecord],
    ) -> std::result::Result<String, ProviderError> {
        if !files.is_empty() {
            // File payloads ride in the retrieved context, not the wire call.
            debug!(count = files.len(), "Ignoring file attachments for chat completion");
        }

        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "messages": Self::to_api_messages(messages),
            "temperature": self.temperature,
            "stream": false,
        });

        debug!(provider = %self.name, model = %self.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status, body = %body, "OpenAI API error");
            return Err(ProviderError::Rejected { status, body });
        }

        let api_response: CompletionResponse =
            response.json().await.map_err(|e| ProviderError::Rejected {
                status,
                body: format!("unparseable response: {e}"),
            })?;

        extract_first_choice(api_response)
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let url = format!("{}/v1/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(map_transport_error)?;
        Ok(response.status().is_success())
    }
}

fn extract_first_choice(
    response: CompletionResponse,
) -> std::result::Result<String, ProviderError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content.unwrap_or_default())
        .ok_or_else(|| ProviderError::Rejected {
            status: 200,
            body: "no choices in response".into(),
        })
}

/// OpenAI embeddings client, used to build and query the context index.
pub struct OpenAiEmbedder {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiEmbedder {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: model.into(),
            client: http_client(timeout),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(
        &self,
        texts: &[String],
    ) -> std::result::Result<Vec<Vec<f32>>, IndexError> {
        let url = format!("{}/v1/embeddings", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
            "encoding_format": "float",
        });

        debug!(model = %self.model, count = texts.len(), "Sending embedding request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| IndexError::BuildFailed(format!("embedding request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, body = %body, "Embedding API error");
            return Err(IndexError::BuildFailed(format!(
                "embedding backend returned status {status}"
            )));
        }

        let api_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| IndexError::BuildFailed(format!("unparseable embedding response: {e}")))?;

        // The API may reorder entries; `index` restores input order.
        let mut data = api_response.data;
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client")
}

/// Timeouts and connection failures both mean the provider is unreachable.
fn map_transport_error(e: reqwest::Error) -> ProviderError {
    ProviderError::Unavailable(e.to_string())
}

// --- OpenAI API types ---

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}
