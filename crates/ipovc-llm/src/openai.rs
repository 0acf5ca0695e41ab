//! OpenAI-compatible chat completion provider
//!
//! Talks to `/chat/completions` on the official API or any compatible
//! gateway (set with [`OpenAiProvider::with_base_url`]).
//!
//! # Features
//!
//! - Non-streaming and SSE-streaming completions
//! - Deterministic sampling (temperature 0 by default)
//! - Request timeout
//! - Blocking [`LlmProvider`](ipovc_domain::traits::LlmProvider) facade over
//!   a private current-thread runtime, so callers stay synchronous
//!
//! # Examples
//!
//! ```no_run
//! use ipovc_llm::OpenAiProvider;
//! use ipovc_domain::traits::LlmProvider;
//!
//! let provider = OpenAiProvider::new("sk-...", "gpt-4o")?
//!     .with_base_url("https://gateway.example.com/v1");
//! let reply = provider.generate("只输出 JSON")?;
//! # Ok::<(), ipovc_llm::LlmError>(())
//! ```

use crate::sse::{ChatCompletionStream, StreamEvent};
use crate::types::{ChatRequest, ChatResponseRaw};
use crate::LlmError;
use futures::StreamExt;
use ipovc_domain::traits::LlmProvider as LlmProviderTrait;
use reqwest::header;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tracing::{debug, trace, warn};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default timeout for a whole completion request (5 minutes)
///
/// Full prospectus prompts are long and streamed replies arrive slowly.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Chat completion provider for OpenAI-compatible endpoints
pub struct OpenAiProvider {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    timeout: Duration,
    client: reqwest::Client,
    runtime: Runtime,
}

impl OpenAiProvider {
    /// Create a new provider
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Config`] if the API key is empty or the HTTP
    /// client or runtime cannot be built.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Config("API key is empty".to_string()));
        }

        let timeout = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to start runtime: {}", e)))?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model: model.into(),
            temperature: 0.0,
            timeout,
            client: build_client(timeout)?,
            runtime,
        })
    }

    /// Override the API base URL (trailing slashes are ignored)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = build_client(timeout)?;
        self.timeout = timeout;
        Ok(self)
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request(&self, prompt: &str) -> ChatRequest {
        ChatRequest::user_prompt(self.model.clone(), prompt).temperature(self.temperature)
    }

    async fn send(&self, request: &ChatRequest) -> Result<reqwest::Response, LlmError> {
        let response = self
            .client
            .post(self.completions_url())
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        warn!(status = %status, error = %error_text, "Chat completion API error");

        Err(match status {
            reqwest::StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
            reqwest::StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(self.model.clone()),
            _ => LlmError::Communication(format!("HTTP {}: {}", status, error_text)),
        })
    }

    /// Non-streaming chat completion
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The endpoint is unreachable or times out
    /// - The model is not available
    /// - The response body is not a chat completion
    pub async fn chat_completion(&self, prompt: &str) -> Result<String, LlmError> {
        let start = Instant::now();
        let response = self.send(&self.request(prompt)).await?;

        let raw: ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let content = raw
            .into_content()
            .ok_or_else(|| LlmError::InvalidResponse("Response has no choices".to_string()))?;

        debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis() as u64,
            chars = content.chars().count(),
            "Chat completion finished"
        );
        Ok(content)
    }

    /// Streaming chat completion
    ///
    /// Each content delta is passed to `on_delta` as it arrives; the full
    /// content is returned when the server sends `[DONE]` or closes the
    /// stream.
    pub async fn chat_completion_stream(
        &self,
        prompt: &str,
        on_delta: &mut dyn FnMut(&str),
    ) -> Result<String, LlmError> {
        let start = Instant::now();
        let response = self.send(&self.request(prompt).streaming()).await?;
        let mut stream = ChatCompletionStream::new(response.bytes_stream());

        let mut content = String::new();
        while let Some(event) = stream.next().await {
            match event? {
                StreamEvent::Delta(delta) => {
                    if !delta.is_empty() {
                        trace!(delta = %delta, "stream delta");
                        on_delta(&delta);
                        content.push_str(&delta);
                    }
                }
                StreamEvent::Done => break,
            }
        }

        debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis() as u64,
            chars = content.chars().count(),
            "Streamed chat completion finished"
        );
        Ok(content)
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))
}

impl LlmProviderTrait for OpenAiProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.runtime.block_on(self.chat_completion(prompt))
    }

    fn generate_stream(
        &self,
        prompt: &str,
        on_delta: &mut dyn FnMut(&str),
    ) -> Result<String, Self::Error> {
        self.runtime.block_on(self.chat_completion_stream(prompt, on_delta))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = OpenAiProvider::new("sk-test", "gpt-4o").unwrap();
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(provider.model, "gpt-4o");
        assert_eq!(provider.temperature, 0.0);
        assert_eq!(provider.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let result = OpenAiProvider::new("  ", "gpt-4o");
        assert!(matches!(result, Err(LlmError::Config(_))));
    }

    #[test]
    fn test_base_url_override() {
        let provider = OpenAiProvider::new("sk-test", "gpt-4o")
            .unwrap()
            .with_base_url("http://localhost:8000/v1/");
        assert_eq!(provider.base_url(), "http://localhost:8000/v1");
        assert_eq!(
            provider.completions_url(),
            "http://localhost:8000/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_is_deterministic() {
        let provider = OpenAiProvider::new("sk-test", "gpt-4o-mini").unwrap();
        let request = provider.request("prompt");
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.temperature, Some(0.0));
        assert!(!request.stream);
    }

    #[test]
    fn test_unreachable_endpoint_is_communication_error() {
        let provider = OpenAiProvider::new("sk-test", "gpt-4o")
            .unwrap()
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2))
            .unwrap();

        let result = provider.generate("test");
        assert!(matches!(result, Err(LlmError::Communication(_))));

        let mut deltas = 0;
        let result = provider.generate_stream("test", &mut |_| deltas += 1);
        assert!(matches!(result, Err(LlmError::Communication(_))));
        assert_eq!(deltas, 0);
    }
}
