// src/error.rs
// =============================================================================
// Fatal errors of a crawl run.
//
// Only things that stop the whole run live here: a bad seed URL, a bad
// configuration value, or a report file we cannot write. A single broken
// link is NOT an error; it is a FetchStatus::Broken value that gets
// recorded and the crawl moves on.
// =============================================================================

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// The seed could not be parsed as an absolute URL
    #[error("invalid seed URL '{url}': {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The seed parsed, but is not http or https
    #[error("only http(s) URLs are supported, got '{0}'")]
    UnsupportedSeedScheme(String),

    /// The seed has no host to compare links against
    #[error("seed URL has no host: {0}")]
    SeedWithoutHost(String),

    /// A configuration value is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The report file could not be created or written
    #[error("cannot write report file {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV writer failed while appending a record
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The HTTP client could not be built
    #[error("failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
