//! Error types for the Extractor

use ipovc_llm::LlmError;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// A model reply that is not the expected JSON object
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}

impl ExtractorError {
    /// Whether the error concerns the shape of a model reply rather than
    /// getting the reply at all
    pub fn is_response_format(&self) -> bool {
        matches!(
            self,
            ExtractorError::InvalidFormat(_) | ExtractorError::JsonParse(_)
        )
    }
}
