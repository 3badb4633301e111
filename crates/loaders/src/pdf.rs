//! PDF loader.
//!
//! Text extraction is CPU-bound, so it runs under `spawn_blocking` to keep
//! the request task responsive.

use async_trait::async_trait;
use groundcrew_core::{FileRecord, error::IngestError};

use crate::registry::Loader;

/// Extracts text from PDF bytes via `pdf-extract`.
pub struct PdfLoader;

#[async_trait]
impl Loader for PdfLoader {
    fn name(&self) -> &str {
        "pdf"
    }

    async fn extract(
        &self,
        file: &FileRecord,
    ) -> std::result::Result<Vec<String>, IngestError> {
        let bytes = file.bytes.clone();
        let name = file.name.clone();

        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes)
        })
        .await
        .map_err(|e| IngestError::ExtractionFailed {
            file: name.clone(),
            reason: format!("extraction task panicked: {e}"),
        })?
        .map_err(|e| IngestError::ExtractionFailed {
            file: file.name.clone(),
            reason: e.to_string(),
        })?;

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![text])
    }
}
