//! Image loader backed by an external OCR command.
//!
//! The OCR engine wants a file path, so the upload is spilled to a
//! temporary file for the duration of the call. Any failure — the command
//! missing, a crash, garbage input — is a soft per-file error.

use async_trait::async_trait;
use groundcrew_core::{FileRecord, error::IngestError};
use tracing::debug;

use crate::registry::Loader;

/// Runs `<command> <image> stdout` (tesseract calling convention) and
/// captures the recognized text.
pub struct OcrLoader {
    command: String,
}

impl OcrLoader {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl Loader for OcrLoader {
    fn name(&self) -> &str {
        "ocr"
    }

    async fn extract(
        &self,
        file: &FileRecord,
    ) -> std::result::Result<Vec<String>, IngestError> {
        let fail = |reason: String| IngestError::ExtractionFailed {
            file: file.name.clone(),
            reason,
        };

        let tmp = tempfile::NamedTempFile::new().map_err(|e| fail(e.to_string()))?;
        tokio::fs::write(tmp.path(), &file.bytes)
            .await
            .map_err(|e| fail(e.to_string()))?;

        debug!(command = %self.command, file = %file.name, "Running OCR");

        let output = tokio::process::Command::new(&self.command)
            .arg(tmp.path())
            .arg("stdout")
            .output()
            .await
            .map_err(|e| fail(format!("failed to run {}: {e}", self.command)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(fail(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![text.trim().to_string()])
    }
}
