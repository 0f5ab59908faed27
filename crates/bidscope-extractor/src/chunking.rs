//! Fixed-size word windows over document text

use bidscope_domain::{Chunk, Document};

/// Splits text into windows of whitespace-separated words
///
/// Each window holds exactly `chunk_size` words except possibly the last,
/// words are re-joined with a single space, and blank windows are dropped
/// before chunks are counted.
#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    chunk_size: usize,
}

impl TextChunker {
    /// Create a new text chunker; a `chunk_size` of 0 is treated as 1
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Words per window
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Split `text` into ordered window strings
    pub fn split(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        words
            .chunks(self.chunk_size)
            .map(|window| window.join(" "))
            .filter(|window| !window.trim().is_empty())
            .collect()
    }

    /// Split a document into numbered chunks
    pub fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let windows = self.split(document.full_text());
        let total_chunks = windows.len();
        windows
            .into_iter()
            .enumerate()
            .map(|(chunk_index, text)| Chunk::new(chunk_index, text, total_chunks))
            .collect()
    }
}
