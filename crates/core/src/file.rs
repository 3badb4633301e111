//! Uploaded file records.
//!
//! A `FileRecord` is the canonical in-memory form of one uploaded file:
//! raw bytes plus whatever the transport layer told us about them. Records
//! are created at ingestion, never mutated, and discarded when the request
//! completes — nothing about an upload survives the request.

use std::collections::HashMap;

/// One uploaded file, normalized at ingestion.
#[derive(Clone)]
pub struct FileRecord {
    /// The filename as declared by the uploader.
    pub name: String,

    /// Raw file content.
    pub bytes: Vec<u8>,

    /// Media type declared by the transport (e.g. multipart content-type),
    /// if any. Absent means the loader registry must sniff from the name.
    pub media_type: Option<String>,

    /// Free-form metadata carried alongside the file.
    pub metadata: HashMap<String, String>,
}

impl FileRecord {
    /// Create a record from a name and raw bytes.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
            media_type: None,
            metadata: HashMap::new(),
        }
    }

    /// Attach the declared media type.
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The lowercased filename extension, without the dot.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.name.rsplit_once('.')?;
        if ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

// Manual Debug: file bodies can be megabytes, print the length instead.
impl std::fmt::Debug for FileRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileRecord")
            .field("name", &self.name)
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .field("media_type", &self.media_type)
            .field("metadata", &self.metadata)
            .finish()
    }
}
