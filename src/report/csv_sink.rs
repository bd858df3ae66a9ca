// src/report/csv_sink.rs
// =============================================================================
// Writes broken links to a CSV file, one row per link.
//
// The file is created (and truncated) with its header row before the crawl
// starts, so an unwritable path fails the run before any request is made.
// Each record is flushed right away: if the crawl is interrupted, every
// broken link found so far is already on disk.
// =============================================================================

use super::{BrokenLinkSink, BrokenRecord};
use crate::error::CrawlError;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const CSV_HEADER: [&str; 3] = ["Source Page", "Broken Link", "Error/Status"];

pub struct CsvSink {
    path: PathBuf,
    writer: csv::Writer<File>,
    written: usize,
}

impl CsvSink {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, CrawlError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| CrawlError::Output {
            path: path.clone(),
            source,
        })?;

        // The header is written by hand so it is there even if no record
        // ever follows; serialize() must not add a second one
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(CSV_HEADER)?;

        let mut sink = CsvSink {
            path,
            writer,
            written: 0,
        };
        sink.flush()?;
        Ok(sink)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records written so far (header excluded)
    pub fn written(&self) -> usize {
        self.written
    }

    fn flush(&mut self) -> Result<(), CrawlError> {
        self.writer.flush().map_err(|source| CrawlError::Output {
            path: self.path.clone(),
            source,
        })
    }
}

impl BrokenLinkSink for CsvSink {
    fn record(&mut self, record: &BrokenRecord) -> Result<(), CrawlError> {
        self.writer.serialize(record)?;
        self.flush()?;
        self.written += 1;
        Ok(())
    }
}
