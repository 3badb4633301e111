//! Plain-text loader for `text/*` uploads.

use async_trait::async_trait;
use groundcrew_core::{FileRecord, error::IngestError};

use crate::registry::Loader;

/// Decodes bytes as UTF-8 (lossy) and returns the content as one block.
pub struct TextLoader;

#[async_trait]
impl Loader for TextLoader {
    fn name(&self) -> &str {
        "text"
    }

    async fn extract(
        &self,
        file: &FileRecord,
    ) -> std::result::Result<Vec<String>, IngestError> {
        let text = String::from_utf8_lossy(&file.bytes);
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![text.into_owned()])
    }
}
