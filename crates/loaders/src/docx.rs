//! DOCX loader.
//!
//! A .docx file is a ZIP archive; the document body lives in
//! `word/document.xml` as `<w:p>` paragraphs of `<w:t>` text runs. The
//! archive entry read is bounded so a hostile upload cannot decompress into
//! unbounded memory.

use std::io::Read;

use async_trait::async_trait;
use groundcrew_core::{FileRecord, error::IngestError};

use crate::registry::Loader;

/// Maximum decompressed bytes read from the document entry.
const MAX_DOCUMENT_XML_BYTES: u64 = 50 * 1024 * 1024;

/// Extracts paragraph text from Word (OOXML) documents.
///
/// Each non-empty paragraph becomes one block, which keeps paragraph
/// boundaries visible to the chunker downstream.
pub struct DocxLoader;

#[async_trait]
impl Loader for DocxLoader {
    fn name(&self) -> &str {
        "docx"
    }

    async fn extract(
        &self,
        file: &FileRecord,
    ) -> std::result::Result<Vec<String>, IngestError> {
        let fail = |reason: String| IngestError::ExtractionFailed {
            file: file.name.clone(),
            reason,
        };

        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(file.bytes.as_slice()))
            .map_err(|e| fail(e.to_string()))?;

        let entry = archive
            .by_name("word/document.xml")
            .map_err(|_| fail("word/document.xml not found".into()))?;

        let mut xml = Vec::new();
        entry
            .take(MAX_DOCUMENT_XML_BYTES)
            .read_to_end(&mut xml)
            .map_err(|e| fail(e.to_string()))?;
        if xml.len() as u64 >= MAX_DOCUMENT_XML_BYTES {
            return Err(fail("word/document.xml exceeds size limit".into()));
        }

        paragraphs(&xml).map_err(|reason| fail(reason))
    }
}

/// Walk the document XML and collect one string per `<w:p>` paragraph.
fn paragraphs(xml: &[u8]) -> std::result::Result<Vec<String>, String> {
    let mut reader = quick_xml::Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut blocks = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = true,
                b"p" => current.clear(),
                _ => {}
            },
            Ok(quick_xml::events::Event::Text(t)) if in_text_run => {
                current.push_str(t.unescape().map_err(|e| e.to_string())?.as_ref());
            }
            Ok(quick_xml::events::Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => {
                    if !current.trim().is_empty() {
                        blocks.push(std::mem::take(&mut current));
                    }
                }
                _ => {}
            },
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }
        buf.clear();
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Build a minimal .docx in memory.
    fn docx_bytes(body_xml: &str) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            let options = zip::write::SimpleFileOptions::default();
            writer.start_file("word/document.xml", options).unwrap();
            writer
                .write_all(
                    format!(
                        r#"<?xml version="1.0"?><w:document xmlns:w="ns"><w:body>{body_xml}</w:body></w:document>"#
                    )
                    .as_bytes(),
                )
                .unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[tokio::test]
    async fn extracts_one_block_per_paragraph() {
        let bytes = docx_bytes(
            "<w:p><w:r><w:t>First paragraph.</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Second </w:t></w:r><w:r><w:t>paragraph.</w:t></w:r></w:p>",
        );
        let file = FileRecord::new("memo.docx", bytes);
        let blocks = DocxLoader.extract(&file).await.unwrap();
        assert_eq!(blocks, vec!["First paragraph.", "Second paragraph."]);
    }

    #[tokio::test]
    async fn empty_paragraphs_are_dropped() {
        let bytes = docx_bytes("<w:p></w:p><w:p><w:r><w:t>Only one.</w:t></w:r></w:p>");
        let file = FileRecord::new("memo.docx", bytes);
        let blocks = DocxLoader.extract(&file).await.unwrap();
        assert_eq!(blocks, vec!["Only one."]);
    }

    #[tokio::test]
    async fn not_a_zip_is_a_soft_failure() {
        let file = FileRecord::new("memo.docx", b"plainly not a zip".to_vec());
        assert!(matches!(
            DocxLoader.extract(&file).await.unwrap_err(),
            IngestError::ExtractionFailed { .. }
        ));
    }

    #[tokio::test]
    async fn zip_without_document_xml_is_a_soft_failure() {
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            let options = zip::write::SimpleFileOptions::default();
            writer.start_file("other.txt", options).unwrap();
            writer.write_all(b"hi").unwrap();
            writer.finish().unwrap();
        }
        let file = FileRecord::new("memo.docx", cursor.into_inner());
        let err = DocxLoader.extract(&file).await.unwrap_err();
        assert!(err.to_string().contains("word/document.xml"));
    }
}
