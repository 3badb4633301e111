//! Batch ingestion over a set of uploaded files.
//!
//! Files are independent of each other, so extraction fans out
//! concurrently. Per-file failures are collected into the report instead of
//! propagating; the contract is best effort over files.

use futures::future::join_all;
use groundcrew_core::{FileRecord, error::IngestError};
use tracing::{debug, warn};

use crate::registry::LoaderRegistry;
use crate::sniff::resolve_media_type;

/// Text blocks successfully extracted from one file.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub file: String,
    pub blocks: Vec<String>,
}

/// A file that contributed nothing, and why.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub file: String,
    pub reason: IngestError,
}

/// Outcome of one batch: extracted documents in input order, plus the
/// files that were skipped.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub documents: Vec<ExtractedDocument>,
    pub skipped: Vec<SkippedFile>,
}

impl IngestReport {
    /// Total number of extracted text blocks across all documents.
    pub fn block_count(&self) -> usize {
        self.documents.iter().map(|d| d.blocks.len()).sum()
    }
}

/// Run every file through its resolved loader.
///
/// Output order follows input order regardless of which extraction
/// finishes first.
pub async fn load_files(registry: &LoaderRegistry, files: &[FileRecord]) -> IngestReport {
    let extractions = files.iter().map(|file| async move {
        let Some(loader) = registry.resolve(file) else {
            let media_type =
                resolve_media_type(file).unwrap_or_else(|| "unknown".into());
            return Err(IngestError::LoaderUnavailable {
                file: file.name.clone(),
                media_type,
            });
        };

        debug!(file = %file.name, loader = loader.name(), "Extracting");
        loader.extract(file).await.map(|blocks| ExtractedDocument {
            file: file.name.clone(),
            blocks,
        })
    });

    let mut report = IngestReport::default();
    for (file, outcome) in files.iter().zip(join_all(extractions).await) {
        match outcome {
            Ok(document) => report.documents.push(document),
            Err(reason) => {
                warn!(file = %file.name, %reason, "Skipping file");
                report.skipped.push(SkippedFile {
                    file: file.name.clone(),
                    reason,
                });
            }
        }
    }

    report
}
