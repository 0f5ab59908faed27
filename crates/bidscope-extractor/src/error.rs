//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractorError {
    /// Document text could not be obtained
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    /// Text-generation backend error
    #[error("Backend error: {0}")]
    Backend(String),

    /// Backend call exceeded the per-call timeout
    #[error("Backend call timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Worker thread failed
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_timeout_message_names_budget() {
        let err = ExtractorError::Timeout(Duration::from_millis(20));
        assert_eq!(err.to_string(), "Backend call timed out after 20ms");
    }
}
