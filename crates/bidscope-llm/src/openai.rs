//! OpenAI Provider Implementation
//!
//! Talks to any OpenAI-compatible chat-completions endpoint.
//!
//! # Features
//!
//! - Async HTTP communication with the chat-completions API
//! - Configurable endpoint, model and request timeout
//! - Opt-in retry with exponential backoff for transient failures
//! - Blocking `CompletionBackend` wrapper for use from worker threads
//!
//! # Examples
//!
//! ```no_run
//! use bidscope_llm::OpenAiProvider;
//!
//! let provider = OpenAiProvider::new(
//!     "https://api.openai.com/v1",
//!     "sk-...",
//!     "gpt-4o-mini-2024-07-18",
//! )
//! .unwrap();
//! ```

use crate::LlmError;
use bidscope_domain::{CompletionBackend, CompletionRequest};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini-2024-07-18";

/// Default timeout for a single HTTP request (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts per request (no retry)
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// OpenAI-compatible chat-completions provider
pub struct OpenAiProvider {
    endpoint: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

/// Request body for the chat-completions API
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Response from the chat-completions API
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL, without the `/chat/completions` suffix
    /// - `api_key`: bearer token
    /// - `model`: default model for requests that do not name one
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Other` if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, api_key, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new provider with an explicit per-request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Set the maximum number of attempts per request
    ///
    /// Values below 1 are treated as 1.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Send one chat-completions request
    ///
    /// When the request carries a `timeout`, the whole exchange (retries
    /// and backoff included) is dropped once it elapses.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The endpoint is unreachable or the request times out
    /// - The API key is rejected
    /// - The model is not available
    /// - The reply is not a chat-completions payload
    pub async fn send(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        match request.timeout {
            Some(budget) => tokio::time::timeout(budget, self.send_with_retry(request))
                .await
                .map_err(|_| LlmError::Timeout)?,
            None => self.send_with_retry(request).await,
        }
    }

    async fn send_with_retry(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint);
        let model = if request.model_id.is_empty() {
            self.model.as_str()
        } else {
            request.model_id.as_str()
        };

        let body = ChatCompletionRequest {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            max_tokens: request.max_output_tokens,
            temperature: request.temperature,
        };

        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.send_once(&url, &body).await {
                Ok(content) => return Ok(content),
                Err(e) if e.is_transient() && attempts < self.max_retries => {
                    // Exponential backoff: 1s, 2s, 4s, etc.
                    let delay = Duration::from_secs(2u64.pow(attempts - 1));
                    warn!("Attempt {} failed ({}), retrying in {:?}", attempts, e, delay);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(
        &self,
        url: &str,
        body: &ChatCompletionRequest<'_>,
    ) -> Result<String, LlmError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Communication(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_error(status, &error_text, body.model));
        }

        let payload = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let content = first_choice_content(payload)?;
        debug!("Received {} chars from {}", content.len(), body.model);
        Ok(content)
    }
}

/// Map a non-success HTTP status to an `LlmError`
fn status_error(status: StatusCode, body: &str, model: &str) -> LlmError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            LlmError::Authentication(format!("HTTP {}", status))
        }
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => LlmError::Timeout,
        _ => LlmError::Communication(format!("HTTP {}: {}", status, body)),
    }
}

fn first_choice_content(payload: ChatCompletionResponse) -> Result<String, LlmError> {
    payload
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| LlmError::InvalidResponse("Response carried no message content".to_string()))
}

impl CompletionBackend for OpenAiProvider {
    type Error = LlmError;

    /// Blocking wrapper around [`OpenAiProvider::send`]
    ///
    /// Must be called from a thread that is not driving async tasks
    /// (for example a `spawn_blocking` worker). Uses the ambient tokio
    /// runtime when there is one, otherwise a private current-thread
    /// runtime.
    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle.block_on(self.send(request)),
            Err(_) => tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?
                .block_on(self.send(request)),
        }
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new("https://api.example.com/v1/", "key", DEFAULT_MODEL).unwrap()
    }

    #[test]
    fn test_openai_provider_creation() {
        let provider = provider();
        assert_eq!(provider.endpoint, "https://api.example.com/v1");
        assert_eq!(provider.model, DEFAULT_MODEL);
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_openai_provider_with_max_retries() {
        assert_eq!(provider().with_max_retries(5).max_retries, 5);
        assert_eq!(provider().with_max_retries(0).max_retries, 1);
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "", "m"),
            LlmError::Authentication(_)
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, "", "m"),
            LlmError::Authentication(_)
        ));
        assert_eq!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "", "m"),
            LlmError::RateLimitExceeded
        );
        assert_eq!(
            status_error(StatusCode::NOT_FOUND, "", "gpt-x"),
            LlmError::ModelNotAvailable("gpt-x".to_string())
        );
        match status_error(StatusCode::INTERNAL_SERVER_ERROR, "boom", "m") {
            LlmError::Communication(msg) => assert!(msg.contains("boom")),
            other => panic!("Expected Communication error, got {:?}", other),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatCompletionRequest {
            model: "gpt-test",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "hello",
                },
            ],
            max_tokens: 4096,
            temperature: 0.5,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-test");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_eq!(json["max_tokens"], 4096);
        assert_eq!(json["temperature"], 0.5);
    }

    #[test]
    fn test_first_choice_content() {
        let payload: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  {\"a\":1}\n"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice_content(payload).unwrap(), r#"{"a":1}"#);

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            first_choice_content(empty),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_request_timeout_abandons_call() {
        // Accepts connections into the backlog but never answers
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        let provider = OpenAiProvider::new(endpoint, "key", DEFAULT_MODEL).unwrap();
        let request = CompletionRequest {
            system_instruction: "s".to_string(),
            user_prompt: "u".to_string(),
            max_output_tokens: 8,
            temperature: 0.0,
            model_id: String::new(),
            timeout: Some(Duration::from_millis(100)),
        };

        let started = std::time::Instant::now();
        let result = provider.complete(&request);
        assert_eq!(result, Err(LlmError::Timeout));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_openai_error_handling() {
        // Nothing listens on port 9; the request must fail without a runtime present
        let provider = OpenAiProvider::new("http://127.0.0.1:9", "key", DEFAULT_MODEL).unwrap();
        let request = CompletionRequest {
            system_instruction: "s".to_string(),
            user_prompt: "u".to_string(),
            max_output_tokens: 8,
            temperature: 0.0,
            model_id: String::new(),
            timeout: None,
        };

        let result = provider.complete(&request);
        assert!(matches!(
            result,
            Err(LlmError::Communication(_)) | Err(LlmError::Timeout)
        ));
    }
}
