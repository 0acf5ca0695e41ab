//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Which producers contribute to the final record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Full text to the model; the model reply is the record
    Llm,
    /// Regex/keyword rules only
    Rules,
    /// Rules, then the model with the rule guess as context, then merge
    #[default]
    Hybrid,
}

impl ExtractionMode {
    /// Get the mode name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMode::Llm => "llm",
            ExtractionMode::Rules => "rules",
            ExtractionMode::Hybrid => "hybrid",
        }
    }

    /// Whether this mode cannot run without an API credential
    pub fn requires_llm(&self) -> bool {
        matches!(self, ExtractionMode::Llm)
    }

    /// Whether this mode calls the model at all
    pub fn uses_llm(&self) -> bool {
        !matches!(self, ExtractionMode::Rules)
    }

    /// Completion strategy used when none is configured
    pub fn default_strategy(&self) -> CompletionStrategy {
        match self {
            ExtractionMode::Llm => CompletionStrategy::StreamThenDirect,
            _ => CompletionStrategy::Direct,
        }
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a completion is requested from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStrategy {
    /// One non-streaming request
    Direct,
    /// A streaming request; on any failure, one non-streaming request with
    /// the same prompt
    StreamThenDirect,
}

/// Configuration for the Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Extraction mode
    pub mode: ExtractionMode,

    /// Maximum keyword-bearing lines sent to the model in hybrid mode
    pub excerpt_line_limit: usize,

    /// Maximum ranked candidates listed in the hybrid prompt
    pub prompt_candidate_limit: usize,

    /// Completion strategy; `None` picks the mode's default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_strategy: Option<CompletionStrategy>,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum time for a single model request (seconds)
    pub request_timeout_secs: u64,
}

impl ExtractorConfig {
    /// Default configuration for a given mode
    pub fn for_mode(mode: ExtractionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// The completion strategy in effect
    pub fn strategy(&self) -> CompletionStrategy {
        self.completion_strategy
            .unwrap_or_else(|| self.mode.default_strategy())
    }

    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.excerpt_line_limit == 0 {
            return Err("excerpt_line_limit must be greater than 0".to_string());
        }
        if self.prompt_candidate_limit == 0 {
            return Err("prompt_candidate_limit must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature {} out of range [0.0, 2.0]",
                self.temperature
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            mode: ExtractionMode::Hybrid,
            excerpt_line_limit: 120,
            prompt_candidate_limit: 5,
            completion_strategy: None,
            temperature: 0.0,
            request_timeout_secs: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mode, ExtractionMode::Hybrid);
        assert_eq!(config.excerpt_line_limit, 120);
        assert_eq!(config.prompt_candidate_limit, 5);
    }

    #[test]
    fn test_strategy_defaults_per_mode() {
        assert_eq!(
            ExtractorConfig::for_mode(ExtractionMode::Llm).strategy(),
            CompletionStrategy::StreamThenDirect
        );
        assert_eq!(
            ExtractorConfig::for_mode(ExtractionMode::Hybrid).strategy(),
            CompletionStrategy::Direct
        );

        let mut config = ExtractorConfig::for_mode(ExtractionMode::Hybrid);
        config.completion_strategy = Some(CompletionStrategy::StreamThenDirect);
        assert_eq!(config.strategy(), CompletionStrategy::StreamThenDirect);
    }

    #[test]
    fn test_invalid_limits() {
        let mut config = ExtractorConfig::default();
        config.excerpt_line_limit = 0;
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.prompt_candidate_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_temperature() {
        let mut config = ExtractorConfig::default();
        config.temperature = 3.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ExtractorConfig::from_toml(
            r#"
mode = "llm"
completion_strategy = "direct"
"#,
        )
        .unwrap();

        assert_eq!(config.mode, ExtractionMode::Llm);
        assert_eq!(config.strategy(), CompletionStrategy::Direct);
        assert_eq!(config.excerpt_line_limit, 120);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ExtractorConfig::for_mode(ExtractionMode::Rules);
        config.excerpt_line_limit = 40;
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(parsed.mode, ExtractionMode::Rules);
        assert_eq!(parsed.excerpt_line_limit, 40);
        assert_eq!(parsed.request_timeout_secs, config.request_timeout_secs);
    }
}
