//! Provider trait — the abstraction over LLM backends.
//!
//! A Provider knows how to send an assembled message sequence to an LLM and
//! get a response back. Each request is exactly one round trip: providers do
//! not retry internally, retry policy belongs to the caller.
//!
//! Implementations: OpenAI, Anthropic, Ollama.

use async_trait::async_trait;

use crate::error::{IndexError, ProviderError};
use crate::file::FileRecord;
use crate::message::Message;

/// The core Provider trait.
///
/// Every LLM backend implements this trait. The chat pipeline calls
/// `generate()` without knowing which provider is being used.
///
/// The `files` argument exists for file-aware models; providers that cannot
/// accept files MUST still accept it and ignore it (explicit no-op, never an
/// error) so the contract stays uniform across backends.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai", "ollama").
    fn name(&self) -> &str;

    /// Send the message sequence and return the generated text.
    async fn generate(
        &self,
        messages: &[Message],
        files: &[FileRecord],
    ) -> std::result::Result<String, ProviderError>;

    /// Health check — can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}

/// The injected embedding function used by the context indexer.
///
/// One call embeds a batch of texts; the returned vectors are positionally
/// aligned with the inputs. Failures are hard: an index cannot be built
/// without embeddings.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(
        &self,
        texts: &[String],
    ) -> std::result::Result<Vec<Vec<f32>>, IndexError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoProvider;

    #[async_trait]
    impl Provider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(
            &self,
            messages: &[Message],
            _files: &[FileRecord],
        ) -> std::result::Result<String, ProviderError> {
            Ok(messages.last().map(|m| m.content.clone()).unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn default_health_check_is_ok() {
        let provider = EchoProvider;
        assert!(provider.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn generate_sees_terminal_message() {
        let provider = EchoProvider;
        let messages = vec![Message::system("instruction"), Message::user("question")];
        let out = provider.generate(&messages, &[]).await.unwrap();
        assert_eq!(out, "question");
    }
}
