//! Extension-based source selection and plain text files

use crate::clean::clean_extracted_text;
use crate::error::{Result, SourceError};
use crate::pdf::PdfTextSource;
use bidscope_domain::{Document, TextSource};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads UTF-8 text files as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSource;

impl TextSource for PlainTextSource {
    type Error = SourceError;

    fn extract_text(&self, path: &Path) -> Result<Document> {
        if !path.exists() {
            return Err(SourceError::NotFound(path.display().to_string()));
        }
        let text = fs::read_to_string(path)?;
        Ok(Document::new(path.display().to_string(), text))
    }
}

/// Picks a source by file extension
///
/// `pdf` goes to [`PdfTextSource`]; `txt`, `text` and `md` go to
/// [`PlainTextSource`]. Anything else is `UnsupportedFormat`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTextSource {
    clean: bool,
}

impl FileTextSource {
    /// Create a source that returns text unmodified
    pub fn new() -> Self {
        Self::default()
    }

    /// Run [`clean_extracted_text`] over every extracted document
    pub fn with_cleaning(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }
}

impl TextSource for FileTextSource {
    type Error = SourceError;

    fn extract_text(&self, path: &Path) -> Result<Document> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let document = match extension.as_str() {
            "pdf" => PdfTextSource.extract_text(path)?,
            "txt" | "text" | "md" => PlainTextSource.extract_text(path)?,
            _ => return Err(SourceError::UnsupportedFormat(path.display().to_string())),
        };

        if !self.clean {
            return Ok(document);
        }

        let cleaned = clean_extracted_text(document.full_text());
        debug!(
            "Cleaning reduced {} from {} to {} chars",
            document.source_id(),
            document.full_text().len(),
            cleaned.len()
        );
        Ok(Document::new(document.source_id(), cleaned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn text_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_plain_text_is_read_verbatim() {
        let file = text_file(".txt", "Section 1\n\nScope of work");
        let doc = FileTextSource::new().extract_text(file.path()).unwrap();
        assert_eq!(doc.full_text(), "Section 1\n\nScope of work");
        assert_eq!(doc.source_id(), file.path().display().to_string());
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let file = text_file(".MD", "# Heading");
        assert!(FileTextSource::new().extract_text(file.path()).is_ok());
    }

    #[test]
    fn test_cleaning_applied_when_enabled() {
        let file = text_file(".txt", "Scope\n..........\nPage 4\nConcrete 120 CY");
        let doc = FileTextSource::new()
            .with_cleaning(true)
            .extract_text(file.path())
            .unwrap();
        assert_eq!(doc.full_text(), "Scope Concrete 120 CY");
    }

    #[test]
    fn test_unsupported_extension() {
        let file = text_file(".docx", "binary");
        let result = FileTextSource::new().extract_text(file.path());
        assert!(matches!(result, Err(SourceError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_text_file() {
        let result = FileTextSource::new().extract_text(Path::new("/no/such/rfp.txt"));
        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }
}
