//! Error types for document sources

use thiserror::Error;

/// Errors that can occur while obtaining document text
#[derive(Debug, Error)]
pub enum SourceError {
    /// The path does not exist
    #[error("Document not found: {0}")]
    NotFound(String),

    /// The file could not be read
    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a readable PDF
    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    /// No source handles this file type
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// Result alias for this crate
pub type Result<T> = std::result::Result<T, SourceError>;
