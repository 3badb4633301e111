//! Anthropic provider implementation.
//!
//! Uses the Messages API directly: `x-api-key` header authentication (not
//! Bearer), an `anthropic-version` header, and the system prompt as a
//! top-level field rather than a message entry.

use async_trait::async_trait;
use groundcrew_core::error::ProviderError;
use groundcrew_core::{FileRecord, Message, Role};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
// The Messages API requires max_tokens on every request.
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic Messages API client.
pub struct AnthropicProvider {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: "anthropic".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
            client,
        }
    }

    /// Create with a custom base URL (e.g., for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Split the sequence into the top-level system field and the message
    /// list. Anthropic puts system prompts outside `messages`.
    fn extract_system(messages: &[Message]) -> (Option<String>, Vec<serde_json::Value>) {
        let mut system_parts: Vec<&str> = Vec::new();
        let mut api_messages = Vec::new();

        for msg in messages {
            match msg.role {
                Role::System => system_parts.push(&msg.content),
                Role::User => api_messages.push(serde_json::json!({
                    "role": "user",
                    "content": msg.content,
                })),
            }
        }

        let system = if system_parts.is_empty() {
            None
        } else {
            Some(system_parts.join("\n\n"))
        };

        (system, api_messages)
    }
}

#[async_trait]
impl groundcrew_core::Provider for AnthropicProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        messages: &[Message],
        files: &[FileRecord],
    ) -> std::result::Result<String, ProviderError> {
        if !files.is_empty() {
            debug!(count = files.len(), "Ignoring file attachments for messages request");
        }

        let url = format!("{}/v1/messages", self.base_url);
        let (system, api_messages) = Self::extract_system(messages);

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": api_messages,
            "max_tokens": DEFAULT_MAX_TOKENS,
            "temperature": self.temperature,
        });
        if let Some(ref sys) = system {
            body["system"] = serde_json::json!(sys);
        }

        debug!(provider = %self.name, model = %self.model, "Sending messages request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status, body = %body, "Anthropic API error");
            return Err(ProviderError::Rejected { status, body });
        }

        let api_response: MessagesResponse =
            response.json().await.map_err(|e| ProviderError::Rejected {
                status,
                body: format!("unparseable response: {e}"),
            })?;

        Ok(join_text_blocks(api_response))
    }
}

/// Concatenate the response's text content blocks.
fn join_text_blocks(response: MessagesResponse) -> String {
    response
        .content
        .into_iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// --- Anthropic API types ---

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
}
