//! Bidscope LLM Provider Layer
//!
//! Text-generation backends behind the `CompletionBackend` trait from
//! `bidscope-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic, scriptable mock for testing
//! - `OpenAiProvider`: OpenAI-compatible chat-completions API
//!
//! # Examples
//!
//! ```
//! use bidscope_llm::MockProvider;
//! use bidscope_domain::{CompletionBackend, CompletionRequest};
//!
//! let provider = MockProvider::new(r#"{"total_bid": 100}"#);
//! let request = CompletionRequest {
//!     system_instruction: "You are an expert construction estimator.".to_string(),
//!     user_prompt: "test prompt".to_string(),
//!     max_output_tokens: 128,
//!     temperature: 0.2,
//!     model_id: "mock".to_string(),
//!     timeout: None,
//! };
//! let result = provider.complete(&request).unwrap();
//! assert_eq!(result, r#"{"total_bid": 100}"#);
//! ```

#![warn(missing_docs)]

pub mod openai;

use bidscope_domain::{CompletionBackend, CompletionRequest};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Credentials missing or rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Reply could not be decoded or carried no content
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Request did not finish in time
    #[error("Request timed out")]
    Timeout,

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LlmError::Communication(_) | LlmError::RateLimitExceeded | LlmError::Timeout
        )
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(LlmError),
}

#[derive(Debug, Default)]
struct MockState {
    scripted: HashMap<usize, Scripted>,
    requests: Vec<CompletionRequest>,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured replies without making any network calls.
/// Calls are numbered from 0 in the order they arrive; individual calls
/// can be scripted to return a specific reply or fail.
///
/// # Examples
///
/// ```
/// use bidscope_llm::{LlmError, MockProvider};
/// use bidscope_domain::{CompletionBackend, CompletionRequest};
///
/// let provider = MockProvider::new("default")
///     .with_reply_on_call(0, "first")
///     .with_failure_on_call(1, LlmError::RateLimitExceeded);
///
/// let request = CompletionRequest {
///     system_instruction: String::new(),
///     user_prompt: "prompt".to_string(),
///     max_output_tokens: 16,
///     temperature: 0.0,
///     model_id: "mock".to_string(),
///     timeout: None,
/// };
/// assert_eq!(provider.complete(&request).unwrap(), "first");
/// assert!(provider.complete(&request).is_err());
/// assert_eq!(provider.complete(&request).unwrap(), "default");
/// assert_eq!(provider.call_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    delay: Option<Duration>,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed reply for all calls
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            delay: None,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Return `response` for the call numbered `call`
    pub fn with_reply_on_call(self, call: usize, response: impl Into<String>) -> Self {
        self.lock()
            .scripted
            .insert(call, Scripted::Reply(response.into()));
        self
    }

    /// Fail the call numbered `call` with `error`
    pub fn with_failure_on_call(self, call: usize, error: LlmError) -> Self {
        self.lock().scripted.insert(call, Scripted::Fail(error));
        self
    }

    /// Sleep for `delay` before answering every call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl CompletionBackend for MockProvider {
    type Error = LlmError;

    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        let scripted = {
            let mut state = self.lock();
            let call = state.requests.len();
            state.requests.push(request.clone());
            state.scripted.get(&call).cloned()
        };

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        match scripted {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Fail(error)) => Err(error),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_id(&self) -> &str {
        "mock"
    }
}
