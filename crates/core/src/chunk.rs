//! Retrievable text passages.
//!
//! A `TextChunk` is one window of text cut from a file's extracted content.
//! Chunks are owned by the index built for a single request; the sequence
//! index preserves the original order within the source file so overlapping
//! windows can be reassembled.

use serde::{Deserialize, Serialize};

/// One window of extracted text, tagged with its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    /// The window's text content.
    pub text: String,

    /// Name of the file this chunk was cut from.
    pub source: String,

    /// Zero-based position of this window within its source file.
    pub sequence: usize,
}

impl TextChunk {
    pub fn new(text: impl Into<String>, source: impl Into<String>, sequence: usize) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_serialization_roundtrip() {
        let chunk = TextChunk::new("some passage", "notes.txt", 3);
        let json = serde_json::to_string(&chunk).unwrap();
        let back: TextChunk = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chunk);
        assert_eq!(back.sequence, 3);
    }
}
