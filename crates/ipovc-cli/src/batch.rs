//! Sequential batch driver: one PDF in, one CSV row out.

use crate::error::{CliError, Result};
use ipovc_domain::traits::{LlmProvider, RecordSink, TextSource};
use ipovc_domain::Field;
use indicatif::{ProgressBar, ProgressStyle};
use ipovc_extractor::{Extractor, ExtractorError};
use std::fmt::Display;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Counters for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Rows written
    pub documents: usize,

    /// Rows that include a parsed model reply
    pub llm_used: usize,

    /// Documents whose text could not be extracted
    pub unreadable: usize,
}

/// PDF files directly inside `dir`, in directory order.
///
/// The extension check is case-insensitive; subdirectories are skipped.
pub fn list_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CliError::Config(format!(
            "Input directory {} does not exist",
            dir.display()
        )));
    }

    let mut inputs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            inputs.push(path);
        }
    }
    Ok(inputs)
}

/// Progress bar over `len` documents; hidden unless `visible`
fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} PDFs {msg}",
    ) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

/// Run every input through the extractor and write one row each.
///
/// Text extraction failures degrade to empty text. An extractor error
/// (only possible in `llm` mode) stops the batch; rows already written stay.
pub fn run_batch<S, L, K>(
    inputs: &[PathBuf],
    source: &S,
    extractor: &Extractor<L>,
    sink: &mut K,
    trace_origins: bool,
) -> Result<BatchSummary>
where
    S: TextSource,
    S::Error: Display,
    L: LlmProvider,
    L::Error: Into<ExtractorError>,
    K: RecordSink,
    K::Error: Into<CliError>,
{
    info!(count = inputs.len(), "Found PDF files");
    let mut summary = BatchSummary::default();
    let progress = progress_bar(inputs.len(), std::io::stderr().is_terminal());

    for path in inputs {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        progress.set_message(filename.clone());

        let text = match source.extract_text(path) {
            Ok(text) => text,
            Err(e) => {
                progress.suspend(|| {
                    warn!(
                        filename = %filename,
                        error = %e,
                        "Text extraction failed, continuing with empty text"
                    );
                });
                summary.unreadable += 1;
                String::new()
            }
        };

        let outcome = match extractor.extract(&filename, &text) {
            Ok(outcome) => outcome,
            Err(e) => {
                progress.abandon();
                return Err(e.into());
            }
        };
        progress.suspend(|| {
            if trace_origins {
                info!(filename = %filename, origins = %outcome.origins.summary(), "Field origins");
            } else {
                debug!(
                    filename = %filename,
                    candidates = outcome.candidate_count,
                    "Candidates found"
                );
            }
        });

        sink.write_record(&outcome.record).map_err(Into::into)?;
        summary.documents += 1;
        if outcome.llm_used {
            summary.llm_used += 1;
        }

        progress.suspend(|| {
            info!(
                filename = %filename,
                vc = outcome.record.get(Field::VcName),
                percent = outcome.record.get(Field::VcPercent),
                "Row written"
            );
        });
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(summary)
}
