//! LLM refiner: one prompt in, one parsed record out

use crate::config::CompletionStrategy;
use crate::error::ExtractorError;
use crate::parser::parse_llm_response;
use ipovc_domain::traits::LlmProvider;
use ipovc_domain::ExtractionRecord;
use tracing::{debug, trace, warn};

/// Sends prompts to a provider and parses the replies
///
/// With [`CompletionStrategy::StreamThenDirect`] the prompt is first sent
/// as a streaming request. If that request fails, or its accumulated
/// content does not parse, the same prompt is sent once more without
/// streaming. No other retries happen.
pub struct LlmRefiner<L> {
    provider: L,
    strategy: CompletionStrategy,
}

impl<L> LlmRefiner<L>
where
    L: LlmProvider,
    L::Error: Into<ExtractorError>,
{
    /// Create a new refiner
    pub fn new(provider: L, strategy: CompletionStrategy) -> Self {
        Self { provider, strategy }
    }

    /// Complete `prompt` and parse the reply
    pub fn refine(&self, filename: &str, prompt: &str) -> Result<ExtractionRecord, ExtractorError> {
        debug!(
            filename,
            model = self.provider.model_name(),
            prompt_chars = prompt.chars().count(),
            "Calling model"
        );

        match self.strategy {
            CompletionStrategy::Direct => self.complete_direct(filename, prompt),
            CompletionStrategy::StreamThenDirect => {
                match self.complete_streaming(filename, prompt) {
                    Ok(record) => Ok(record),
                    Err(e) => {
                        warn!(filename, error = %e, "Streaming failed, retrying without streaming");
                        self.complete_direct(filename, prompt)
                    }
                }
            }
        }
    }

    fn complete_direct(
        &self,
        filename: &str,
        prompt: &str,
    ) -> Result<ExtractionRecord, ExtractorError> {
        let raw = self.provider.generate(prompt).map_err(Into::into)?;
        parse_reply(filename, &raw)
    }

    fn complete_streaming(
        &self,
        filename: &str,
        prompt: &str,
    ) -> Result<ExtractionRecord, ExtractorError> {
        let raw = self
            .provider
            .generate_stream(prompt, &mut |delta: &str| trace!(filename, delta, "Stream delta"))
            .map_err(Into::into)?;
        parse_reply(filename, &raw)
    }
}

fn parse_reply(filename: &str, raw: &str) -> Result<ExtractionRecord, ExtractorError> {
    debug!(filename, response_chars = raw.chars().count(), "Model replied");
    parse_llm_response(raw).map_err(|e| {
        warn!(filename, error = %e, response = raw, "Unparseable model reply");
        e
    })
}
