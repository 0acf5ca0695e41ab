//! ipovc CLI library.
//!
//! This library provides the batch driver behind the `ipovc` binary:
//! configuration loading, PDF text extraction, CSV output and the
//! per-document loop.

pub mod app;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod pdf;

pub use app::{run, run_with};
pub use batch::{list_inputs, run_batch, BatchSummary};
pub use cli::{Cli, CliMode};
pub use config::{AppConfig, OpenAiSettings};
pub use error::{CliError, Result};
pub use output::CsvSink;
pub use pdf::PdfTextSource;
