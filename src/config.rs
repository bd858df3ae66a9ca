// src/config.rs
// =============================================================================
// Crawl configuration.
//
// CrawlConfig holds every knob the crawl engine understands. The CLI builds
// one from the command line (see cli.rs), tests build them by hand with
// struct update syntax: CrawlConfig { check_external: true, ..Default::default() }
//
// Timing values are kept as f64 seconds because that is how users type
// them ("--delay 0.05"); validate() makes sure they convert cleanly into
// std::time::Duration before the crawl starts.
// =============================================================================

use crate::error::CrawlError;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_MAX_DEPTH_INTERNAL: usize = 5;
pub const DEFAULT_MAX_DEPTH_EXTERNAL: usize = 0;
pub const DEFAULT_REQUEST_DELAY_SECS: f64 = 0.05;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CrawlConfig {
    /// Where the CSV report goes. None = derive it from the seed host
    pub output_file: Option<PathBuf>,
    /// Verify links that leave the seed host
    pub check_external: bool,
    /// Internal pages are expanded while depth <= this value
    pub max_depth_internal: usize,
    /// External pages are expanded while depth <= this value. External
    /// links are at least one hop from the seed, so 0 = check only
    pub max_depth_external: usize,
    /// Pause between two requests, in seconds
    pub request_delay_seconds: f64,
    /// Upper bound for one request, in seconds
    pub request_timeout_seconds: f64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        CrawlConfig {
            output_file: None,
            check_external: false,
            max_depth_internal: DEFAULT_MAX_DEPTH_INTERNAL,
            max_depth_external: DEFAULT_MAX_DEPTH_EXTERNAL,
            request_delay_seconds: DEFAULT_REQUEST_DELAY_SECS,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: default_user_agent(),
        }
    }
}

impl CrawlConfig {
    /// Checks the numeric options. Called once, before anything is fetched.
    pub fn validate(&self) -> Result<(), CrawlError> {
        if !self.request_delay_seconds.is_finite() || self.request_delay_seconds < 0.0 {
            return Err(CrawlError::InvalidConfig(format!(
                "request delay must be a number >= 0, got {}",
                self.request_delay_seconds
            )));
        }
        if !self.request_timeout_seconds.is_finite() || self.request_timeout_seconds <= 0.0 {
            return Err(CrawlError::InvalidConfig(format!(
                "request timeout must be a number > 0, got {}",
                self.request_timeout_seconds
            )));
        }
        Ok(())
    }

    pub fn request_delay(&self) -> Result<Duration, CrawlError> {
        seconds(self.request_delay_seconds, "request delay")
    }

    pub fn request_timeout(&self) -> Result<Duration, CrawlError> {
        seconds(self.request_timeout_seconds, "request timeout")
    }

    /// The configured report path, or broken_links_<host>.csv for the seed
    pub fn output_path(&self, seed: &Url) -> PathBuf {
        self.output_file
            .clone()
            .unwrap_or_else(|| default_output_file(seed))
    }
}

fn seconds(value: f64, what: &str) -> Result<Duration, CrawlError> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| CrawlError::InvalidConfig(format!("{} of {} seconds: {}", what, value, e)))
}

pub fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

// broken_links_example.com.csv, broken_links_localhost_8080.csv
//
// The ':' before a port is replaced because it is not allowed in file
// names on every platform.
pub fn default_output_file(seed: &Url) -> PathBuf {
    let host = seed.host_str().unwrap_or("site");
    let domain = match seed.port() {
        Some(port) => format!("{}_{}", host, port),
        None => host.to_string(),
    };
    PathBuf::from(format!("broken_links_{}.csv", domain.replace(':', "_")))
}
