//! Wiring: configuration to extractor to batch.

use crate::batch::{list_inputs, run_batch, BatchSummary};
use crate::cli::Cli;
use crate::config::{AppConfig, OpenAiSettings};
use crate::error::Result;
use crate::output::CsvSink;
use crate::pdf::PdfTextSource;
use ipovc_extractor::Extractor;
use ipovc_llm::OpenAiProvider;
use tracing::info;

/// Run a batch with model settings read from the environment.
pub fn run(cli: &Cli) -> Result<BatchSummary> {
    run_with(cli, OpenAiSettings::from_env())
}

/// Run a batch with explicit model settings.
///
/// The output file is truncated before the input directory is read, so a
/// locked output fails the run before any work is done.
pub fn run_with(cli: &Cli, openai: Option<OpenAiSettings>) -> Result<BatchSummary> {
    let config = AppConfig::from_cli(cli, openai)?;
    let mut sink = CsvSink::create(&config.output_path)?;
    let inputs = list_inputs(&config.input_dir)?;
    let source = PdfTextSource::new();

    info!(
        mode = %config.extractor.mode,
        input = %config.input_dir.display(),
        output = %config.output_path.display(),
        "Starting batch"
    );

    let summary = match &config.openai {
        Some(settings) if config.extractor.mode.uses_llm() => {
            info!(model = %settings.model, endpoint = settings.endpoint(), "Using model");
            let provider = settings.build_provider(&config.extractor)?;
            let extractor = Extractor::with_provider(provider, config.extractor.clone())?;
            run_batch(&inputs, &source, &extractor, &mut sink, config.trace_origins)?
        }
        _ => {
            if config.extractor.mode.uses_llm() {
                info!("OPENAI_API_KEY not set, running on rules only");
            }
            let extractor = Extractor::<OpenAiProvider>::new(config.extractor.clone())?;
            run_batch(&inputs, &source, &extractor, &mut sink, config.trace_origins)?
        }
    };

    info!(
        documents = summary.documents,
        llm_used = summary.llm_used,
        unreadable = summary.unreadable,
        output = %config.output_path.display(),
        "Batch finished"
    );
    Ok(summary)
}
