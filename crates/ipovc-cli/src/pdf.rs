//! PDF text extraction.

use crate::error::CliError;
use ipovc_domain::traits::TextSource;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use tracing::debug;

/// Pulls the text layer out of a PDF with `pdf-extract`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextSource;

impl PdfTextSource {
    /// Create a new PDF text source
    pub fn new() -> Self {
        Self
    }
}

impl TextSource for PdfTextSource {
    type Error = CliError;

    fn extract_text(&self, path: &Path) -> Result<String, Self::Error> {
        let bytes = std::fs::read(path)?;

        // pdf-extract can panic on malformed files
        let text = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(&bytes)))
            .map_err(|_| CliError::Pdf(format!("{}: extraction panicked", path.display())))?
            .map_err(|e| CliError::Pdf(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), chars = text.chars().count(), "Extracted PDF text");
        Ok(text)
    }
}
