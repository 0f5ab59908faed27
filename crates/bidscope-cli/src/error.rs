//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No API key in the environment or on the command line
    #[error("No API key: set OPENAI_API_KEY or pass --api-key")]
    MissingApiKey,

    /// Document could not be read
    #[error("Source error: {0}")]
    Source(#[from] bidscope_source::SourceError),

    /// Backend could not be constructed
    #[error("Backend error: {0}")]
    Backend(#[from] bidscope_llm::LlmError),

    /// Pipeline could not be constructed
    #[error("Extractor error: {0}")]
    Extractor(#[from] bidscope_extractor::ExtractorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
