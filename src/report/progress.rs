// src/report/progress.rs
// =============================================================================
// The single status line shown while crawling:
//
//   Checked: 42 | OK: 40 | Broken: 2 | Current: https://example.com/docs
//
// The line is rewritten in place with a carriage return. It goes to stderr
// so stdout stays clean for --json output. Broken links are never echoed
// here; they only go to the report file.
// =============================================================================

use super::{CrawlStats, ProgressReporter};
use std::io::{IsTerminal, Write};

const LINE_WIDTH: usize = 120;
const MAX_URL_CHARS: usize = 80;

const GREEN: &str = "\x1b[92m";
const RED: &str = "\x1b[91m";
const RESET: &str = "\x1b[0m";

// Builds the status line for a snapshot
pub fn status_line(stats: &CrawlStats, color: bool) -> String {
    let (green, red, reset) = if color { (GREEN, RED, RESET) } else { ("", "", "") };
    let current: String = stats
        .current
        .as_deref()
        .unwrap_or("")
        .chars()
        .take(MAX_URL_CHARS)
        .collect();

    format!(
        "Checked: {} | OK: {}{}{} | Broken: {}{}{} | Current: {}",
        stats.checked, green, stats.ok, reset, red, stats.broken, reset, current
    )
}

pub struct TerminalProgress {
    color: bool,
}

impl TerminalProgress {
    pub fn new() -> Self {
        TerminalProgress {
            color: std::io::stderr().is_terminal(),
        }
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for TerminalProgress {
    fn update(&mut self, stats: &CrawlStats) {
        let line = status_line(stats, self.color);
        let mut err = std::io::stderr().lock();
        // A failed status line is not worth stopping the crawl for
        let _ = write!(err, "\r{:<width$}", line, width = LINE_WIDTH);
        let _ = err.flush();
    }

    fn finish(&mut self, _stats: &CrawlStats) {
        let _ = writeln!(std::io::stderr());
    }
}

/// Used with --quiet
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn update(&mut self, _stats: &CrawlStats) {}
}
