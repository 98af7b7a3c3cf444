//! CSV sink - serializes records in fixed column order
//!
//! Thin wrapper over an RFC-4180 `csv::Writer`. The header row is written
//! eagerly at construction so an interrupted or empty run still produces a
//! parseable file.

use std::io::Write;

use crate::error::ScanError;
use crate::record::{COLUMNS, NodeRecord};

/// Serializes `NodeRecord`s to the destination stream.
///
/// Exclusively owned and written by the walker; nothing else touches the
/// output.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    /// Wrap a destination stream and write the header row.
    pub fn new(dest: W) -> Result<Self, ScanError> {
        // Headers are written by hand so they appear even when no record
        // ever gets serialized.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(dest);
        writer.write_record(COLUMNS)?;
        Ok(Self { writer })
    }

    pub fn write(&mut self, record: &NodeRecord) -> Result<(), ScanError> {
        self.writer.serialize(record)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), ScanError> {
        self.writer.flush()?;
        Ok(())
    }
}
