//! Trait definitions for external interactions
//!
//! These traits define the boundaries between extraction logic and
//! infrastructure. Infrastructure implementations live in other crates.

use crate::record::ExtractionRecord;
use std::path::Path;

/// Trait for language-model chat completion
///
/// Implemented by the infrastructure layer (ipovc-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Complete a single user prompt in one blocking request
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Complete a prompt as a stream, passing each content delta to `on_delta`
    ///
    /// Returns the concatenated content once the stream completes. Providers
    /// without streaming support fall back to [`generate`](Self::generate)
    /// and report the whole reply as one delta.
    fn generate_stream(
        &self,
        prompt: &str,
        on_delta: &mut dyn FnMut(&str),
    ) -> Result<String, Self::Error> {
        let content = self.generate(prompt)?;
        on_delta(&content);
        Ok(content)
    }

    /// Name of the model answering requests
    fn model_name(&self) -> &str;
}

/// Trait for turning a document into linear text
///
/// Implemented by the application layer (ipovc-cli)
pub trait TextSource {
    /// Error type for extraction operations
    type Error;

    /// Extract the full text of the document at `path`
    fn extract_text(&self, path: &Path) -> Result<String, Self::Error>;
}

/// Trait for the append-only output of extracted records
///
/// Implemented by the application layer (ipovc-cli)
pub trait RecordSink {
    /// Error type for write operations
    type Error;

    /// Append one record and make it durable before returning
    fn write_record(&mut self, record: &ExtractionRecord) -> Result<(), Self::Error>;
}
