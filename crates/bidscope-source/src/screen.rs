//! Heuristic check that a document is an RFP rather than an attachment

use bidscope_domain::Document;
use std::path::Path;

/// Filename fragments that suggest a primary solicitation document
const INCLUDE_WORDS: &[&str] = &["rfp", "solicitation", "statement", "sow", "requirement", "spec"];

/// Filename fragments that suggest amendments, forms and other attachments
const EXCLUDE_WORDS: &[&str] = &[
    "amend", "qa", "sf1449", "mod", "cover", "pricing", "addendum", "attachment",
];

/// Phrases typical of the first pages of an RFP
const CONTENT_KEYWORDS: &[&str] = &[
    "request for proposal",
    "solicitation",
    "statement of work",
    "section b",
    "section m",
    "proposals due",
    "closing date",
    "requirement",
    "specification",
];

/// Roughly the first three pages of text
const DEFAULT_SCAN_CHARS: usize = 12_000;

/// Decides whether a document looks like an RFP
///
/// Advisory only: a negative answer is worth a warning, not an abort.
#[derive(Debug, Clone, Copy)]
pub struct RfpScreen {
    scan_chars: usize,
}

impl RfpScreen {
    /// Create a screen that scans the first `scan_chars` characters of text
    pub fn new(scan_chars: usize) -> Self {
        Self { scan_chars }
    }

    /// Filename contains an include word and no exclude word
    ///
    /// # Examples
    ///
    /// ```
    /// use bidscope_source::RfpScreen;
    ///
    /// assert!(RfpScreen::filename_looks_like_rfp("Solicitation_W912.pdf"));
    /// assert!(!RfpScreen::filename_looks_like_rfp("RFP_amendment_2.pdf"));
    /// ```
    pub fn filename_looks_like_rfp(filename: &str) -> bool {
        let name = filename.to_lowercase();
        INCLUDE_WORDS.iter().any(|w| name.contains(w))
            && !EXCLUDE_WORDS.iter().any(|w| name.contains(w))
    }

    /// Opening text mentions at least one RFP keyword
    pub fn text_looks_like_rfp(&self, text: &str) -> bool {
        let head: String = text.chars().take(self.scan_chars).collect::<String>().to_lowercase();
        CONTENT_KEYWORDS.iter().any(|k| head.contains(k))
    }

    /// Either the file name or the opening text looks like an RFP
    pub fn screen(&self, document: &Document) -> bool {
        let filename = Path::new(document.source_id())
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(document.source_id());
        Self::filename_looks_like_rfp(filename) || self.text_looks_like_rfp(document.full_text())
    }
}

impl Default for RfpScreen {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_CHARS)
    }
}
