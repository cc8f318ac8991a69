use crate::chunker;
use serde::Deserialize;
use serde::Serialize;

/// A named Markdown text plus its derived chunk sequence.
///
/// Chunks are contiguous substrings of `content` in order; concatenating them
/// reconstructs `content` exactly. They are persisted alongside the source so a
/// restored session can render without re-chunking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub content: String,
    pub chunks: Vec<String>,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>, chunk_size: usize) -> Self {
        let content = content.into();
        let chunks = chunker::chunk_text(&content, chunk_size);
        Self {
            name: name.into(),
            content,
            chunks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_reconstruct_content() {
        let doc = Document::new("notes.md", "A\n\nB", 1);
        assert_eq!(doc.chunks.concat(), doc.content);
    }

    #[test]
    fn serde_round_trip_preserves_chunks() {
        let doc = Document::new("a.md", "first\n\nsecond paragraph", 8);
        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
