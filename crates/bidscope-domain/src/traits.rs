//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and
//! infrastructure. Implementations live in other crates.

use crate::Document;
use std::path::Path;
use std::time::Duration;

/// One request to a text-generation backend
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System role instruction
    pub system_instruction: String,

    /// User prompt (schema instructions followed by chunk text)
    pub user_prompt: String,

    /// Upper bound on generated tokens
    pub max_output_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Backend model identifier
    pub model_id: String,

    /// Time budget for the whole call, retries included
    ///
    /// Backends that can abandon a call in progress should stop and fail
    /// once it is spent.
    pub timeout: Option<Duration>,
}

/// Text-generation backend
///
/// Implemented by the infrastructure layer (bidscope-llm). Calls are
/// synchronous and blocking; the caller decides which thread runs them.
pub trait CompletionBackend {
    /// Error type for backend operations
    type Error;

    /// Send one request and return the raw reply text
    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error>;

    /// Model identifier used when a request does not name one
    fn model_id(&self) -> &str;
}

/// Source of document text
///
/// Implemented by the infrastructure layer (bidscope-source)
pub trait TextSource {
    /// Error type for extraction operations
    type Error;

    /// Extract the full text of the document at `path`
    fn extract_text(&self, path: &Path) -> Result<Document, Self::Error>;
}
