// src/report/mod.rs
// =============================================================================
// Everything the crawl engine tells the outside world.
//
// The engine does not print or write files itself. It pushes:
// - a CrawlStats snapshot to a ProgressReporter after every checked link
// - a BrokenRecord to a BrokenLinkSink for every broken link
//
// Submodules:
// - csv_sink: the BrokenLinkSink that writes the CSV report
// - progress: the single updating status line on the terminal
// =============================================================================

mod csv_sink;
mod progress;

pub use csv_sink::{CsvSink, CSV_HEADER};
pub use progress::{status_line, SilentProgress, TerminalProgress};

use crate::error::CrawlError;
use serde::{Deserialize, Serialize};

/// Running tally of one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    /// Links verified so far (the seed included)
    pub checked: u64,
    pub ok: u64,
    pub broken: u64,
    /// Pages whose links were extracted
    pub pages: u64,
    /// The link that was checked last
    pub current: Option<String>,
    /// True if the run was stopped before the frontier drained
    pub cancelled: bool,
}

/// One row of the report: which page links where, and what went wrong
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenRecord {
    #[serde(rename = "Source Page")]
    pub source_page: String,
    #[serde(rename = "Broken Link")]
    pub broken_link: String,
    #[serde(rename = "Error/Status")]
    pub reason: String,
}

/// Receives a snapshot after every processed link
pub trait ProgressReporter {
    fn update(&mut self, stats: &CrawlStats);

    /// Called once when the crawl ends
    fn finish(&mut self, _stats: &CrawlStats) {}
}

/// Durable destination for broken links
///
/// A record must be fully written (or the call must fail) before record()
/// returns; records are never rewritten afterwards.
pub trait BrokenLinkSink {
    fn record(&mut self, record: &BrokenRecord) -> Result<(), CrawlError>;
}

// In-memory implementations, handy wherever the results are inspected
// instead of displayed, such as tests

impl ProgressReporter for Vec<CrawlStats> {
    fn update(&mut self, stats: &CrawlStats) {
        self.push(stats.clone());
    }
}

impl BrokenLinkSink for Vec<BrokenRecord> {
    fn record(&mut self, record: &BrokenRecord) -> Result<(), CrawlError> {
        self.push(record.clone());
        Ok(())
    }
}
