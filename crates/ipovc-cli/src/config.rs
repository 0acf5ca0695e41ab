//! Configuration assembled at startup.
//!
//! Model credentials come from the environment (a `.env` file is loaded
//! first by `main`); extraction settings come from an optional TOML file;
//! command-line flags override both.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use ipovc_extractor::ExtractorConfig;
use ipovc_llm::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use ipovc_llm::OpenAiProvider;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Connection settings for an OpenAI-compatible endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiSettings {
    /// API key
    pub api_key: String,

    /// Endpoint override
    pub base_url: Option<String>,

    /// Model name
    pub model: String,
}

impl OpenAiSettings {
    /// Read `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `OPENAI_MODEL`.
    ///
    /// Returns `None` when no non-empty API key is set.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Some(Self {
            api_key: non_empty("OPENAI_API_KEY")?,
            base_url: non_empty("OPENAI_BASE_URL"),
            model: non_empty("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    /// The endpoint requests will go to
    pub fn endpoint(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Build a provider honouring the extractor's temperature and timeout.
    pub fn build_provider(&self, extractor: &ExtractorConfig) -> Result<OpenAiProvider> {
        let provider = OpenAiProvider::new(&self.api_key, &self.model)
            .and_then(|p| p.with_timeout(extractor.request_timeout()))
            .map_err(|e| CliError::Config(e.to_string()))?
            .with_temperature(extractor.temperature);

        Ok(match &self.base_url {
            Some(url) => provider.with_base_url(url),
            None => provider,
        })
    }
}

/// Everything a batch run needs, fixed before the first document.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory scanned for PDFs
    pub input_dir: PathBuf,

    /// CSV output path
    pub output_path: PathBuf,

    /// Extraction settings
    pub extractor: ExtractorConfig,

    /// Model settings; `None` without an API key
    pub openai: Option<OpenAiSettings>,

    /// Log field origins per document
    pub trace_origins: bool,
}

impl AppConfig {
    /// Combine flags, the optional config file and model settings.
    ///
    /// Fails on an unreadable or invalid config file, or when `llm` mode is
    /// selected without an API key.
    pub fn from_cli(cli: &Cli, openai: Option<OpenAiSettings>) -> Result<Self> {
        let mut extractor = match &cli.config {
            Some(path) => load_extractor_config(path)?,
            None => ExtractorConfig::default(),
        };
        if let Some(mode) = cli.mode {
            extractor.mode = mode.into();
        }
        extractor.validate().map_err(CliError::Config)?;

        if extractor.mode.requires_llm() && openai.is_none() {
            return Err(CliError::Config(
                "OPENAI_API_KEY must be set for llm mode".to_string(),
            ));
        }

        Ok(Self {
            input_dir: cli.input.clone(),
            output_path: cli.output.clone(),
            extractor,
            openai,
            trace_origins: cli.trace_origins,
        })
    }
}

/// Load an [`ExtractorConfig`] from a TOML file.
pub fn load_extractor_config(path: &Path) -> Result<ExtractorConfig> {
    let contents = fs::read_to_string(path).map_err(|e| {
        CliError::Config(format!("Cannot read config file {}: {}", path.display(), e))
    })?;
    Ok(toml::from_str(&contents)?)
}
