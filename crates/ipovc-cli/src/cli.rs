//! Command-line argument parsing.

use clap::Parser;
use ipovc_extractor::ExtractionMode;
use std::path::PathBuf;

/// ipovc - Extract venture-capital shareholder data from IPO prospectus PDFs.
#[derive(Debug, Parser)]
#[command(name = "ipovc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory scanned for prospectus PDFs
    #[arg(short, long, default_value = "input")]
    pub input: PathBuf,

    /// CSV file to write (truncated at start)
    #[arg(short, long, default_value = "results.csv")]
    pub output: PathBuf,

    /// Extraction mode (overrides the config file)
    #[arg(short, long, value_enum)]
    pub mode: Option<CliMode>,

    /// Extractor configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log which producer supplied each field
    #[arg(long)]
    pub trace_origins: bool,
}

/// Extraction mode options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliMode {
    /// Whole document to the model
    Llm,
    /// Regex and keyword rules only
    Rules,
    /// Rules refined by the model (default)
    Hybrid,
}

impl From<CliMode> for ExtractionMode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Llm => ExtractionMode::Llm,
            CliMode::Rules => ExtractionMode::Rules,
            CliMode::Hybrid => ExtractionMode::Hybrid,
        }
    }
}
