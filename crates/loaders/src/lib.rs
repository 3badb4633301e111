//! Document loading for GroundCrew.
//!
//! Maps an uploaded file's media type to an extraction strategy and turns
//! raw bytes into plain-text blocks. Unresolvable or broken files are soft
//! failures: they are logged, skipped, and reported — they never abort the
//! batch.

pub mod batch;
pub mod docx;
pub mod ocr;
pub mod pdf;
pub mod registry;
pub mod sniff;
pub mod text;

pub use batch::{ExtractedDocument, IngestReport, SkippedFile, load_files};
pub use docx::DocxLoader;
pub use ocr::OcrLoader;
pub use pdf::PdfLoader;
pub use registry::{Loader, LoaderRegistry, MediaTypeRule};
pub use sniff::resolve_media_type;
pub use text::TextLoader;
