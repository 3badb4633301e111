//! The chat service — one request, one pipeline run.
//!
//! Everything a request produces (file records, the context index) lives on
//! the request's own task and is dropped when the future completes. The
//! service itself holds only read-only collaborators, so one instance is
//! safely shared across concurrent requests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use groundcrew_config::AppConfig;
use groundcrew_core::error::{IndexError, ProviderError};
use groundcrew_core::{Embedder, FileRecord, Provider, TextChunk};
use groundcrew_index::{BuiltIndex, ContextIndexer};
use groundcrew_loaders::LoaderRegistry;
use groundcrew_providers::{OpenAiEmbedder, select};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// A chat request as handed over by the transport layer.
#[derive(Debug)]
pub struct ChatRequest {
    pub question: String,
    pub model: String,
    pub api_key: Option<String>,
    pub files: Vec<FileRecord>,
}

/// One retrieved passage, in the wire shape clients expect.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    pub page_content: String,
    pub metadata: HashMap<String, String>,
}

impl SourceDocument {
    fn from_chunk(chunk: TextChunk) -> Self {
        let metadata = HashMap::from([
            ("source".to_string(), chunk.source),
            ("chunk".to_string(), chunk.sequence.to_string()),
        ]);
        Self {
            page_content: chunk.text,
            metadata,
        }
    }
}

/// The generated answer plus the passages it was grounded in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub text: String,
    pub source_documents: Vec<SourceDocument>,
}

/// Result of the upload-only path: every indexed chunk's text, in order.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub context: Vec<String>,
}

/// Errors a request can fail with.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

impl ChatError {
    /// Whether this is the caller's fault (bad request semantics).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ChatError::Provider(
                ProviderError::UnsupportedModel(_) | ProviderError::MissingCredential(_)
            )
        )
    }
}

/// Orchestrates the provider-dispatch and file-grounding pipeline.
pub struct ChatService {
    config: AppConfig,
    registry: Arc<LoaderRegistry>,
    provider_override: Option<Arc<dyn Provider>>,
    embedder_override: Option<Arc<dyn Embedder>>,
}

impl ChatService {
    pub fn new(config: AppConfig) -> Self {
        let registry = Arc::new(LoaderRegistry::with_defaults(config.ocr_command.clone()));
        Self {
            config,
            registry,
            provider_override: None,
            embedder_override: None,
        }
    }

    /// Replace the selected provider (for tests and proxies). Model
    /// dispatch still runs, so selection errors surface as usual.
    pub fn with_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.provider_override = Some(provider);
        self
    }

    /// Replace the embedding backend (for tests).
    pub fn with_embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder_override = Some(embedder);
        self
    }

    /// Full pipeline: select, ground, assemble, generate.
    pub async fn handle_chat(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        info!(
            model = %request.model,
            files = request.files.len(),
            "Handling chat request"
        );

        let selected = select(&request.model, request.api_key.as_deref(), &self.config)?;
        let provider = self
            .provider_override
            .clone()
            .unwrap_or_else(|| selected.provider.clone());

        let built = self
            .build_index(&request.files, request.api_key.as_deref())
            .await?;

        let context = match &built {
            Some(built) => {
                built
                    .index
                    .query(&request.question, self.config.indexing.retrieval_k)
                    .await?
            }
            None => Vec::new(),
        };

        debug!(retrieved = context.len(), "Context retrieval complete");

        let messages = crate::assembler::assemble(&request.question, &context);
        let text = provider.generate(&messages, &request.files).await?;

        info!(answer_len = text.len(), "Chat request complete");

        Ok(ChatResponse {
            text,
            source_documents: context.into_iter().map(SourceDocument::from_chunk).collect(),
        })
    }

    /// Ingestion and indexing without generation, for pre-warming or
    /// inspecting what a set of files would contribute.
    pub async fn handle_upload(
        &self,
        files: &[FileRecord],
        api_key: Option<&str>,
    ) -> Result<UploadResponse, ChatError> {
        info!(files = files.len(), "Handling upload request");

        let context = match self.build_index(files, api_key).await? {
            Some(built) => built.index.chunks().map(|c| c.text.clone()).collect(),
            None => Vec::new(),
        };

        Ok(UploadResponse { context })
    }

    /// Build the request-scoped index, or `None` when there is nothing to
    /// index. The embedding credential is only needed once chunks exist.
    async fn build_index(
        &self,
        files: &[FileRecord],
        api_key: Option<&str>,
    ) -> Result<Option<BuiltIndex>, IndexError> {
        if files.is_empty() {
            return Ok(None);
        }

        let indexer = ContextIndexer::new(
            self.registry.clone(),
            self.embedder(api_key),
            self.config.indexing.window_chars,
            self.config.indexing.overlap_chars,
        );
        indexer.build(files).await
    }

    /// The embedding function for this request: the request's key wins,
    /// then the configured key. With neither, a placeholder is returned
    /// that fails on first use — files that yield no chunks never need a
    /// credential.
    fn embedder(&self, api_key: Option<&str>) -> Arc<dyn Embedder> {
        if let Some(embedder) = &self.embedder_override {
            return embedder.clone();
        }

        let key = api_key
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .or_else(|| self.config.providers.openai_api_key.clone());

        match key {
            Some(key) => Arc::new(OpenAiEmbedder::new(
                key,
                self.config.providers.embedding_model.clone(),
                Duration::from_secs(self.config.providers.request_timeout_secs),
            )),
            None => Arc::new(NoCredentialEmbedder),
        }
    }
}

/// Stand-in embedder for requests without any embedding credential.
struct NoCredentialEmbedder;

#[async_trait]
impl Embedder for NoCredentialEmbedder {
    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, IndexError> {
        Err(IndexError::BuildFailed(
            "no embedding credential available; set OPENAI_API_KEY or pass apiKey".into(),
        ))
    }
}
