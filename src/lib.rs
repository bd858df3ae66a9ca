// src/lib.rs
// =============================================================================
// deadlink-crawler as a library.
//
// The binary (src/main.rs) is a thin shell around these modules; keeping
// them in a library lets the integration tests in tests/ drive a whole
// crawl against a local HTTP server.
//
// Modules:
// - checker: Fetcher (is this URL alive?) and LinkExtractor (what does it link to?)
// - crawl:   URL normalization, the frontier, and the crawl engine
// - report:  progress snapshots and the CSV report of broken links
// - config:  CrawlConfig and its defaults
// - cli:     command-line definitions
// - error:   fatal errors
// =============================================================================

pub mod checker;
pub mod cli;
pub mod config;
pub mod crawl;
pub mod error;
pub mod report;

pub use config::CrawlConfig;
pub use crawl::CrawlEngine;
pub use error::CrawlError;
