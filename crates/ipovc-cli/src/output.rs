//! CSV output.

use crate::error::{CliError, Result};
use ipovc_domain::traits::RecordSink;
use ipovc_domain::{ExtractionRecord, Field};
use std::fs::File;
use std::io::{self, ErrorKind, Write};
use std::path::Path;

/// UTF-8 byte order mark, so spreadsheet tools detect the encoding
const UTF8_BOM: &[u8] = "\u{feff}".as_bytes();

/// Writes one CSV row per record, flushing after each.
///
/// The file starts with a BOM and a header row of field labels.
#[derive(Debug)]
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    /// Truncate (or create) `path` and write the header.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| open_error(path, source))?;
        Self::from_writer(file)
    }
}

/// Classify a failure to open the output file
///
/// Another process holding the file shows up as `PermissionDenied`, or on
/// Windows as a sharing or lock violation.
fn open_error(path: &Path, source: io::Error) -> CliError {
    if is_locked(&source) {
        CliError::OutputLocked {
            path: path.to_path_buf(),
            source,
        }
    } else {
        CliError::Io(source)
    }
}

fn is_locked(err: &io::Error) -> bool {
    // ERROR_SHARING_VIOLATION and ERROR_LOCK_VIOLATION
    err.kind() == ErrorKind::PermissionDenied
        || (cfg!(windows) && matches!(err.raw_os_error(), Some(32 | 33)))
}

impl<W: Write> CsvSink<W> {
    /// Wrap any writer; the BOM and header are written immediately.
    pub fn from_writer(mut inner: W) -> Result<Self> {
        inner.write_all(UTF8_BOM)?;

        let mut writer = csv::Writer::from_writer(inner);
        writer.write_record(Field::ALL.iter().map(|f| f.label()))?;
        writer.flush()?;
        Ok(Self { writer })
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| CliError::Io(e.into_error()))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    type Error = CliError;

    fn write_record(&mut self, record: &ExtractionRecord) -> Result<()> {
        self.writer.write_record(record.values())?;
        self.writer.flush()?;
        Ok(())
    }
}
