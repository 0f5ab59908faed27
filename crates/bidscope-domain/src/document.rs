//! Documents and the chunks cut from them

/// Raw extracted text of one source file
///
/// Built once by a [`TextSource`](crate::TextSource) and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    source_id: String,
    full_text: String,
}

impl Document {
    /// Create a document from its source identifier and extracted text
    ///
    /// # Examples
    ///
    /// ```
    /// use bidscope_domain::Document;
    ///
    /// let doc = Document::new("rfp.pdf", "Request for proposal");
    /// assert_eq!(doc.source_id(), "rfp.pdf");
    /// assert!(!doc.is_blank());
    /// ```
    pub fn new(source_id: impl Into<String>, full_text: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            full_text: full_text.into(),
        }
    }

    /// File name or path the text came from
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// The full extracted text
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// True when the document contains no non-whitespace text
    pub fn is_blank(&self) -> bool {
        self.full_text.trim().is_empty()
    }

    /// Number of whitespace-separated words
    pub fn word_count(&self) -> usize {
        self.full_text.split_whitespace().count()
    }
}

/// A contiguous, order-preserving slice of a document's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 0-based position within the document
    pub chunk_index: usize,

    /// Window text, words re-joined with single spaces
    pub text: String,

    /// Number of chunks the document was split into
    pub total_chunks: usize,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(chunk_index: usize, text: impl Into<String>, total_chunks: usize) -> Self {
        Self {
            chunk_index,
            text: text.into(),
            total_chunks,
        }
    }

    /// True for the final chunk of its document
    pub fn is_last(&self) -> bool {
        self.chunk_index + 1 == self.total_chunks
    }
}
