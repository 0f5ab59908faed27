//! One chunk, end to end: prompt, backend call, parse

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_answer;
use crate::prompt::{ExtractionSchema, PromptBuilder};
use crate::types::ExtractionResult;
use bidscope_domain::{Chunk, CompletionBackend, CompletionRequest};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Turns a chunk into an [`ExtractionResult`]
///
/// Writes nothing; the only side effect is the backend call.
pub struct ChunkProcessor<B> {
    backend: Arc<B>,
    prompt_builder: PromptBuilder,
    system_instruction: String,
    model_id: String,
    max_output_tokens: u32,
    temperature: f32,
    call_timeout: Duration,
}

impl<B> ChunkProcessor<B>
where
    B: CompletionBackend + Send + Sync + 'static,
    B::Error: std::fmt::Display,
{
    /// Create a processor from configuration
    pub fn new(backend: B, config: &ExtractorConfig) -> Self {
        debug!(
            "Chunk processor: model {} (backend default {}), schema {:?}",
            config.model_id,
            backend.model_id(),
            config.schema
        );
        Self {
            backend: Arc::new(backend),
            prompt_builder: PromptBuilder::new(ExtractionSchema::for_kind(config.schema)),
            system_instruction: config.system_instruction.clone(),
            model_id: config.model_id.clone(),
            max_output_tokens: config.max_output_tokens,
            temperature: config.temperature,
            call_timeout: config.call_timeout(),
        }
    }

    /// Override the per-call timeout
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Render the backend request for a chunk
    pub fn request_for(&self, chunk: &Chunk) -> CompletionRequest {
        CompletionRequest {
            system_instruction: self.system_instruction.clone(),
            user_prompt: self.prompt_builder.build(&chunk.text),
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
            model_id: self.model_id.clone(),
            timeout: Some(self.call_timeout),
        }
    }

    /// Process one chunk
    ///
    /// # Errors
    ///
    /// `Backend` when the backend call fails, `Timeout` when it does not
    /// return within the per-call timeout. A reply that is not JSON is
    /// not an error: the result carries the raw text and no parsed answer.
    pub async fn process(&self, chunk: &Chunk) -> Result<ExtractionResult, ExtractorError> {
        let request = self.request_for(chunk);
        debug!(
            "Chunk {}/{}: prompt length {} chars",
            chunk.chunk_index + 1,
            chunk.total_chunks,
            request.user_prompt.len()
        );

        let raw = self.call_backend(request).await?;

        debug!(
            "Chunk {}/{}: reply length {} chars",
            chunk.chunk_index + 1,
            chunk.total_chunks,
            raw.len()
        );

        let raw_answer_text = raw.trim().to_string();
        let (parsed_answer, parse_failure) = match parse_answer(&raw_answer_text) {
            Ok(value) => (Some(value), None),
            Err(failure) => {
                warn!(
                    "Chunk {}/{}: {}",
                    chunk.chunk_index + 1,
                    chunk.total_chunks,
                    failure
                );
                (None, Some(failure.reason))
            }
        };

        Ok(ExtractionResult {
            chunk_index: chunk.chunk_index,
            chunk_text: chunk.text.clone(),
            raw_answer_text,
            parsed_answer,
            parse_failure,
            total_chunks: chunk.total_chunks,
        })
    }

    /// Call the backend on a blocking worker thread, bounded by the call timeout
    ///
    /// A synchronous call cannot be interrupted. On timeout the worker is
    /// waited for before returning, so at most one call is ever in flight;
    /// its late reply is discarded.
    async fn call_backend(&self, request: CompletionRequest) -> Result<String, ExtractorError> {
        let backend = Arc::clone(&self.backend);

        let mut handle = tokio::task::spawn_blocking(move || {
            backend
                .complete(&request)
                .map_err(|e| ExtractorError::Backend(e.to_string()))
        });

        match timeout(self.call_timeout, &mut handle).await {
            Ok(joined) => joined.map_err(join_error)?,
            Err(_) => {
                warn!(
                    "Backend call exceeded {:?}, waiting for it to return",
                    self.call_timeout
                );
                if let Err(e) = handle.await {
                    debug!("Timed-out call ended abnormally: {}", e);
                }
                Err(ExtractorError::Timeout(self.call_timeout))
            }
        }
    }
}

fn join_error(e: tokio::task::JoinError) -> ExtractorError {
    ExtractorError::Internal(format!("Task join error: {}", e))
}
