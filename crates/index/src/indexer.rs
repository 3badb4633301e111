//! Request-scoped index construction and retrieval.

use std::sync::Arc;

use groundcrew_core::{Embedder, FileRecord, TextChunk, error::IndexError};
use groundcrew_loaders::{LoaderRegistry, SkippedFile, load_files};
use tracing::{debug, info};

use crate::similarity::rank;
use crate::split::split_text;

/// Builds ephemeral context indices over uploaded files.
///
/// Holds only read-only collaborators; every `build` call produces a fresh
/// index owned by the caller.
pub struct ContextIndexer {
    registry: Arc<LoaderRegistry>,
    embedder: Arc<dyn Embedder>,
    window_chars: usize,
    overlap_chars: usize,
}

/// A freshly built index plus the files that could not contribute.
pub struct BuiltIndex {
    pub index: ContextIndex,
    pub skipped: Vec<SkippedFile>,
}

/// An ephemeral similarity index: embedded chunks plus the embedding
/// function that produced them, kept together so queries embed the question
/// the same way the chunks were embedded.
pub struct ContextIndex {
    entries: Vec<(Vec<f32>, TextChunk)>,
    embedder: Arc<dyn Embedder>,
}

impl ContextIndexer {
    pub fn new(
        registry: Arc<LoaderRegistry>,
        embedder: Arc<dyn Embedder>,
        window_chars: usize,
        overlap_chars: usize,
    ) -> Self {
        Self {
            registry,
            embedder,
            window_chars,
            overlap_chars,
        }
    }

    /// Load, window, and embed every file into a fresh index.
    ///
    /// Returns `Ok(None)` when no file yields any text — callers treat that
    /// as "no context available", never as an error. Embedding failures are
    /// hard and abort the build.
    pub async fn build(
        &self,
        files: &[FileRecord],
    ) -> std::result::Result<Option<BuiltIndex>, IndexError> {
        let report = load_files(&self.registry, files).await;

        let mut chunks = Vec::new();
        for document in &report.documents {
            let mut sequence = 0usize;
            for block in &document.blocks {
                for window in split_text(block, self.window_chars, self.overlap_chars) {
                    chunks.push(TextChunk::new(window, document.file.clone(), sequence));
                    sequence += 1;
                }
            }
        }

        if chunks.is_empty() {
            debug!(
                files = files.len(),
                skipped = report.skipped.len(),
                "No extractable text, index not built"
            );
            return Ok(None);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(IndexError::BuildFailed(format!(
                "embedder returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        info!(
            chunks = chunks.len(),
            files = report.documents.len(),
            skipped = report.skipped.len(),
            "Context index built"
        );

        Ok(Some(BuiltIndex {
            index: ContextIndex {
                entries: embeddings.into_iter().zip(chunks).collect(),
                embedder: self.embedder.clone(),
            },
            skipped: report.skipped,
        }))
    }
}

impl ContextIndex {
    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The indexed chunks in insertion order.
    pub fn chunks(&self) -> impl Iterator<Item = &TextChunk> {
        self.entries.iter().map(|(_, chunk)| chunk)
    }

    /// Retrieve the `k` chunks most similar to the question.
    ///
    /// Descending similarity, ties stable on insertion order.
    pub async fn query(
        &self,
        question: &str,
        k: usize,
    ) -> std::result::Result<Vec<TextChunk>, IndexError> {
        let mut vectors = self.embedder.embed(&[question.to_string()]).await?;
        let query_embedding = match vectors.pop() {
            Some(v) if vectors.is_empty() => v,
            _ => {
                return Err(IndexError::BuildFailed(
                    "embedder did not return exactly one query vector".into(),
                ));
            }
        };

        Ok(rank(&self.entries, &query_embedding, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Deterministic embedder: maps each text to a tiny feature vector so
    /// ranking is predictable without any network.
    struct KeywordEmbedder;

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed(
            &self,
            texts: &[String],
        ) -> std::result::Result<Vec<Vec<f32>>, IndexError> {
            Ok(texts
                .iter()
                .map(|t| {
                    let lower = t.to_lowercase();
                    vec![
                        lower.matches("rust").count() as f32,
                        lower.matches("cooking").count() as f32,
                        1.0,
                    ]
                })
                .collect())
        }
    }

    /// Embedder that always fails, for hard-error paths.
    struct BrokenEmbedder;

    #[async_trait]
    impl Embedder for BrokenEmbedder {
        async fn embed(
            &self,
            _texts: &[String],
        ) -> std::result::Result<Vec<Vec<f32>>, IndexError> {
            Err(IndexError::BuildFailed("backend down".into()))
        }
    }

    fn indexer_with(embedder: Arc<dyn Embedder>) -> ContextIndexer {
        let registry = Arc::new(LoaderRegistry::with_defaults("/nonexistent/ocr"));
        ContextIndexer::new(registry, embedder, 1000, 200)
    }

    #[tokio::test]
    async fn no_files_builds_no_index() {
        let indexer = indexer_with(Arc::new(KeywordEmbedder));
        assert!(indexer.build(&[]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unresolvable_files_build_no_index() {
        let indexer = indexer_with(Arc::new(KeywordEmbedder));
        let files = vec![FileRecord::new("blob.xyz", b"??".to_vec())];
        assert!(indexer.build(&files).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn broken_file_does_not_block_the_rest() {
        let indexer = indexer_with(Arc::new(KeywordEmbedder));
        let files = vec![
            FileRecord::new("broken.pdf", b"junk".to_vec()),
            FileRecord::new("rust.txt", b"rust is a systems language".to_vec()),
        ];

        let built = indexer.build(&files).await.unwrap().unwrap();
        assert_eq!(built.index.len(), 1);
        assert_eq!(built.skipped.len(), 1);
        assert_eq!(built.index.chunks().next().unwrap().source, "rust.txt");
    }

    #[tokio::test]
    async fn query_ranks_relevant_chunks_first() {
        let indexer = indexer_with(Arc::new(KeywordEmbedder));
        let files = vec![
            FileRecord::new("cooking.txt", b"cooking cooking cooking".to_vec()),
            FileRecord::new("rust.txt", b"rust rust rust".to_vec()),
        ];

        let built = indexer.build(&files).await.unwrap().unwrap();
        let results = built.index.query("tell me about rust", 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source, "rust.txt");
    }

    #[tokio::test]
    async fn query_returns_at_most_k() {
        let indexer = indexer_with(Arc::new(KeywordEmbedder));
        let files: Vec<_> = (0..5)
            .map(|i| FileRecord::new(format!("f{i}.txt"), b"rust notes".to_vec()))
            .collect();

        let built = indexer.build(&files).await.unwrap().unwrap();
        let results = built.index.query("rust", 3).await.unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn identical_embeddings_keep_input_order() {
        let indexer = indexer_with(Arc::new(KeywordEmbedder));
        // Same content, so identical embeddings; stability keeps file order.
        let files = vec![
            FileRecord::new("a.txt", b"rust".to_vec()),
            FileRecord::new("b.txt", b"rust".to_vec()),
        ];

        let built = indexer.build(&files).await.unwrap().unwrap();
        let results = built.index.query("rust", 2).await.unwrap();
        assert_eq!(results[0].source, "a.txt");
        assert_eq!(results[1].source, "b.txt");
    }

    #[tokio::test]
    async fn embedding_failure_is_hard() {
        let indexer = indexer_with(Arc::new(BrokenEmbedder));
        let files = vec![FileRecord::new("a.txt", b"content".to_vec())];
        assert!(indexer.build(&files).await.is_err());
    }

    #[tokio::test]
    async fn sequences_run_per_file_across_blocks() {
        let embedder = Arc::new(KeywordEmbedder);
        let registry = Arc::new(LoaderRegistry::with_defaults("/nonexistent/ocr"));
        // Tiny windows force several chunks per file.
        let indexer = ContextIndexer::new(registry, embedder, 4, 1);
        let files = vec![FileRecord::new("a.txt", b"abcdefghij".to_vec())];

        let built = indexer.build(&files).await.unwrap().unwrap();
        let sequences: Vec<_> = built.index.chunks().map(|c| c.sequence).collect();
        assert_eq!(sequences, (0..sequences.len()).collect::<Vec<_>>());
    }
}
