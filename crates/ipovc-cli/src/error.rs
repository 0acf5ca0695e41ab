//! Error types for the CLI application.

use ipovc_extractor::ExtractorError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The output file could not be truncated
    #[error(
        "Cannot clear {}: {source}. Close any program using it (e.g., Excel) and rerun.",
        .path.display()
    )]
    OutputLocked {
        /// Output path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Text could not be pulled out of a document
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Fatal extraction error
    #[error("Extraction error: {0}")]
    Extractor(#[from] ExtractorError),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
