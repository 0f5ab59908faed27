//! PDF text-layer extraction

use crate::error::{Result, SourceError};
use bidscope_domain::{Document, TextSource};
use lopdf::Document as PdfDocument;
use std::path::Path;
use tracing::{debug, info, warn};

/// Extracts the text layer of a PDF
///
/// Pages are read in page order and joined with a newline. Pages that
/// yield no text (scanned images, blank pages) are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextSource;

impl PdfTextSource {
    /// Create a new PDF source
    pub fn new() -> Self {
        Self
    }

    /// Extract text from PDF bytes already in memory
    pub fn extract_from_bytes(&self, source_id: &str, bytes: &[u8]) -> Result<Document> {
        let doc = PdfDocument::load_mem(bytes).map_err(|e| SourceError::Parse(e.to_string()))?;
        Ok(Document::new(source_id, pages_text(&doc, source_id)))
    }
}

fn pages_text(doc: &PdfDocument, source_id: &str) -> String {
    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    let mut text = String::new();
    let mut skipped = 0;

    for page_number in &page_numbers {
        match page_text(doc, *page_number, source_id) {
            Some(page_text) => {
                text.push_str(&page_text);
                text.push('\n');
            }
            None => skipped += 1,
        }
    }

    info!(
        "Extracted {} of {} pages from {}",
        page_numbers.len() - skipped,
        page_numbers.len(),
        source_id
    );

    text.trim().to_string()
}

/// Text of one page, or `None` when it has none or cannot be decoded
fn page_text(doc: &PdfDocument, page_number: u32, source_id: &str) -> Option<String> {
    match doc.extract_text(&[page_number]) {
        Ok(page_text) if page_text.trim().is_empty() => {
            debug!("Page {} of {} has no text layer, skipping", page_number, source_id);
            None
        }
        Ok(page_text) => Some(page_text),
        Err(e) => {
            warn!(
                "Page {} of {} could not be decoded, skipping: {}",
                page_number, source_id, e
            );
            None
        }
    }
}

impl TextSource for PdfTextSource {
    type Error = SourceError;

    fn extract_text(&self, path: &Path) -> Result<Document> {
        if !path.exists() {
            return Err(SourceError::NotFound(path.display().to_string()));
        }
        let doc = PdfDocument::load(path).map_err(|e| SourceError::Parse(e.to_string()))?;
        let source_id = path.display().to_string();
        Ok(Document::new(source_id.clone(), pages_text(&doc, &source_id)))
    }
}
