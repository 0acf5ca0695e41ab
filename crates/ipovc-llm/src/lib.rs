//! ipovc LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `ipovc-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: OpenAI-compatible chat completions (streaming and not)
//!
//! # Examples
//!
//! ```
//! use ipovc_llm::MockProvider;
//! use ipovc_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("{}");
//! let result = provider.generate("test prompt").unwrap();
//! assert_eq!(result, "{}");
//! ```

#![warn(missing_docs)]

pub mod openai;
pub mod sse;
pub mod types;

use ipovc_domain::traits::LlmProvider as LlmProviderTrait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider could not be configured
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Default)]
struct MockState {
    responses: HashMap<String, Option<String>>,
    call_count: usize,
    stream_call_count: usize,
    last_prompt: Option<String>,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Streaming can be made to fail so callers can exercise their fallback.
///
/// # Examples
///
/// ```
/// use ipovc_llm::MockProvider;
/// use ipovc_domain::traits::LlmProvider;
///
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.generate("any prompt").unwrap(), "Fixed response");
///
/// // Streaming that breaks mid-way
/// let provider = MockProvider::new("{}").with_stream_failure();
/// assert!(provider.generate_stream("p", &mut |_| {}).is_err());
/// assert_eq!(provider.generate("p").unwrap(), "{}");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    model: String,
    fail_streaming: bool,
    stream_response: Option<String>,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            model: "mock".to_string(),
            fail_streaming: false,
            stream_response: None,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Make every streaming call fail with a communication error
    pub fn with_stream_failure(mut self) -> Self {
        self.fail_streaming = true;
        self
    }

    /// Stream a different reply than the non-streaming call returns
    pub fn with_stream_response(mut self, response: impl Into<String>) -> Self {
        self.stream_response = Some(response.into());
        self
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.state()
            .responses
            .insert(prompt.into(), Some(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.state().responses.insert(prompt.into(), None);
    }

    /// Number of non-streaming calls
    pub fn call_count(&self) -> usize {
        self.state().call_count
    }

    /// Number of streaming calls
    pub fn stream_call_count(&self) -> usize {
        self.state().stream_call_count
    }

    /// The most recent prompt, streaming or not
    pub fn last_prompt(&self) -> Option<String> {
        self.state().last_prompt.clone()
    }

    /// Reset the call counters
    pub fn reset_call_count(&self) {
        let mut state = self.state();
        state.call_count = 0;
        state.stream_call_count = 0;
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn respond(&self, prompt: &str) -> Result<String, LlmError> {
        let mut state = self.state();
        state.last_prompt = Some(prompt.to_string());
        match state.responses.get(prompt) {
            Some(Some(response)) => Ok(response.clone()),
            Some(None) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.state().call_count += 1;
        self.respond(prompt)
    }

    fn generate_stream(
        &self,
        prompt: &str,
        on_delta: &mut dyn FnMut(&str),
    ) -> Result<String, Self::Error> {
        self.state().stream_call_count += 1;
        if self.fail_streaming {
            self.state().last_prompt = Some(prompt.to_string());
            return Err(LlmError::Communication("Mock stream reset".to_string()));
        }

        let response = match &self.stream_response {
            Some(streamed) => {
                self.state().last_prompt = Some(prompt.to_string());
                streamed.clone()
            }
            None => self.respond(prompt)?,
        };
        // Deliver in two pieces to look like a real stream
        let mid = response
            .char_indices()
            .nth(response.chars().count() / 2)
            .map(|(i, _)| i)
            .unwrap_or(response.len());
        let (head, tail) = response.split_at(mid);
        for piece in [head, tail] {
            if !piece.is_empty() {
                on_delta(piece);
            }
        }
        Ok(response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
