//! Media-type sniffing from filename extensions.
//!
//! The transport layer usually declares a content type, but browsers are
//! sloppy about it: missing types and `application/octet-stream` both get
//! re-sniffed from the extension.

use groundcrew_core::FileRecord;

/// Extension → MIME table for the file categories we can load.
const EXTENSION_TABLE: &[(&str, &str)] = &[
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("csv", "text/csv"),
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
];

/// The catch-all type browsers send when they have no idea.
const OCTET_STREAM: &str = "application/octet-stream";

/// Resolve the effective media type of a file.
///
/// Declared type wins unless it is empty or `application/octet-stream`;
/// otherwise the extension table is consulted. Returns `None` when neither
/// source yields a type.
pub fn resolve_media_type(file: &FileRecord) -> Option<String> {
    if let Some(declared) = file.media_type.as_deref() {
        if !declared.is_empty() && declared != OCTET_STREAM {
            return Some(declared.to_string());
        }
    }

    let ext = file.extension()?;
    EXTENSION_TABLE
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| (*mime).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_type_wins() {
        let file = FileRecord::new("data.bin", vec![]).with_media_type("text/plain");
        assert_eq!(resolve_media_type(&file).as_deref(), Some("text/plain"));
    }

    #[test]
    fn octet_stream_falls_back_to_extension() {
        let file = FileRecord::new("notes.md", vec![]).with_media_type(OCTET_STREAM);
        assert_eq!(resolve_media_type(&file).as_deref(), Some("text/markdown"));
    }

    #[test]
    fn extension_sniffing_covers_categories() {
        for (name, expected) in [
            ("a.txt", "text/plain"),
            ("b.PDF", "application/pdf"),
            (
                "c.docx",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            ),
            ("d.png", "image/png"),
        ] {
            let file = FileRecord::new(name, vec![]);
            assert_eq!(resolve_media_type(&file).as_deref(), Some(expected), "{name}");
        }
    }

    #[test]
    fn unknown_extension_is_none() {
        let file = FileRecord::new("archive.tar.zst", vec![]);
        assert_eq!(resolve_media_type(&file), None);
    }

    #[test]
    fn no_extension_is_none() {
        let file = FileRecord::new("Makefile", vec![]);
        assert_eq!(resolve_media_type(&file), None);
    }
}
