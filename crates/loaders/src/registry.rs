//! Loader registry — media-type dispatch to extraction strategies.
//!
//! The dispatch table is an explicit immutable structure built at
//! construction, so tests can inject their own rules without touching any
//! global state.

use std::sync::Arc;

use async_trait::async_trait;
use groundcrew_core::{FileRecord, error::IngestError};

use crate::docx::DocxLoader;
use crate::ocr::OcrLoader;
use crate::pdf::PdfLoader;
use crate::sniff::resolve_media_type;
use crate::text::TextLoader;

pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// A document-extraction strategy.
///
/// `extract` turns a file's raw bytes into plain-text blocks. Failures are
/// soft and per-file; implementations return an error and the batch stage
/// skips the file.
#[async_trait]
pub trait Loader: Send + Sync {
    /// A short name for logging (e.g. "text", "pdf").
    fn name(&self) -> &str;

    /// Extract plain-text blocks from the file.
    async fn extract(
        &self,
        file: &FileRecord,
    ) -> std::result::Result<Vec<String>, IngestError>;
}

/// How one registry rule matches a resolved media type.
#[derive(Debug, Clone)]
pub enum MediaTypeRule {
    /// Matches any media type with this prefix (e.g. `text/`).
    Prefix(String),
    /// Matches exactly this media type.
    Exact(String),
}

impl MediaTypeRule {
    fn matches(&self, media_type: &str) -> bool {
        match self {
            MediaTypeRule::Prefix(p) => media_type.starts_with(p.as_str()),
            MediaTypeRule::Exact(e) => media_type == e,
        }
    }
}

/// Maps a file's media type to a loader.
///
/// Rules are evaluated in insertion order, first match wins.
pub struct LoaderRegistry {
    rules: Vec<(MediaTypeRule, Arc<dyn Loader>)>,
}

impl LoaderRegistry {
    /// Build a registry from an explicit rule table.
    pub fn new(rules: Vec<(MediaTypeRule, Arc<dyn Loader>)>) -> Self {
        Self { rules }
    }

    /// The default dispatch table: plain text, PDF, DOCX, and image OCR.
    pub fn with_defaults(ocr_command: impl Into<String>) -> Self {
        Self::new(vec![
            (
                MediaTypeRule::Prefix("text/".into()),
                Arc::new(TextLoader) as Arc<dyn Loader>,
            ),
            (
                MediaTypeRule::Exact("application/pdf".into()),
                Arc::new(PdfLoader),
            ),
            (
                MediaTypeRule::Exact(MIME_DOCX.into()),
                Arc::new(DocxLoader),
            ),
            (
                MediaTypeRule::Prefix("image/".into()),
                Arc::new(OcrLoader::new(ocr_command)),
            ),
        ])
    }

    /// Resolve a loader for the file, sniffing its media type if needed.
    ///
    /// Returns `None` when no rule matches; callers log and skip the file.
    pub fn resolve(&self, file: &FileRecord) -> Option<Arc<dyn Loader>> {
        let media_type = resolve_media_type(file)?;
        self.rules
            .iter()
            .find(|(rule, _)| rule.matches(&media_type))
            .map(|(_, loader)| loader.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_registry() -> LoaderRegistry {
        LoaderRegistry::with_defaults("tesseract")
    }

    #[test]
    fn text_files_resolve_to_text_loader() {
        let registry = default_registry();
        let file = FileRecord::new("notes.txt", vec![]);
        assert_eq!(registry.resolve(&file).unwrap().name(), "text");
    }

    #[test]
    fn markdown_resolves_via_text_prefix() {
        let registry = default_registry();
        let file = FileRecord::new("readme.md", vec![]);
        assert_eq!(registry.resolve(&file).unwrap().name(), "text");
    }

    #[test]
    fn pdf_resolves_to_pdf_loader() {
        let registry = default_registry();
        let file = FileRecord::new("paper.pdf", vec![]);
        assert_eq!(registry.resolve(&file).unwrap().name(), "pdf");
    }

    #[test]
    fn docx_resolves_to_docx_loader() {
        let registry = default_registry();
        let file = FileRecord::new("memo.docx", vec![]);
        assert_eq!(registry.resolve(&file).unwrap().name(), "docx");
    }

    #[test]
    fn images_resolve_to_ocr_loader() {
        let registry = default_registry();
        let file = FileRecord::new("scan.png", vec![]).with_media_type("image/png");
        assert_eq!(registry.resolve(&file).unwrap().name(), "ocr");
    }

    #[test]
    fn legacy_doc_has_no_loader() {
        // .doc sniffs to application/msword, which nothing handles
        let registry = default_registry();
        let file = FileRecord::new("old.doc", vec![]);
        assert!(registry.resolve(&file).is_none());
    }

    #[test]
    fn unknown_type_has_no_loader() {
        let registry = default_registry();
        let file = FileRecord::new("binary.xyz", vec![]);
        assert!(registry.resolve(&file).is_none());
    }

    #[test]
    fn declared_media_type_overrides_extension() {
        let registry = default_registry();
        let file = FileRecord::new("export.dat", vec![]).with_media_type("text/csv");
        assert_eq!(registry.resolve(&file).unwrap().name(), "text");
    }
}
