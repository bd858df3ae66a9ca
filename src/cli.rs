// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the Cli struct below IS the definition of the
// command line. Doc comments become --help text, #[arg(...)] attributes
// pick flag names and defaults.
//
//   deadlink-crawler https://example.com
//   deadlink-crawler https://example.com report.csv --check-external
//   deadlink-crawler https://example.com -o report.csv --max-depth-internal 2
// =============================================================================

use crate::config::{
    default_user_agent, CrawlConfig, DEFAULT_MAX_DEPTH_EXTERNAL, DEFAULT_MAX_DEPTH_INTERNAL,
    DEFAULT_REQUEST_DELAY_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "deadlink-crawler",
    version,
    about = "Crawl a website and record its broken links to a CSV file",
    long_about = "deadlink-crawler starts from a seed URL, follows every link on the same host \
                  (and optionally links to other hosts), checks that each one answers with a \
                  2xx/3xx status, and writes every broken link to a CSV report together with \
                  the page that links to it."
)]
pub struct Cli {
    /// Website to start from (must be http:// or https://)
    pub url: String,

    /// CSV report file [default: broken_links_<domain>.csv]
    #[arg(value_name = "OUTPUT_FILE")]
    pub output_file: Option<PathBuf>,

    /// Same as OUTPUT_FILE, as a flag
    #[arg(short, long, value_name = "FILE", conflicts_with = "output_file")]
    pub output: Option<PathBuf>,

    /// Also verify links that point to other hosts
    #[arg(long)]
    pub check_external: bool,

    /// Expand pages on the seed host up to this many hops from the seed
    ///
    /// 0 = only check the links found on the seed page itself
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH_INTERNAL)]
    pub max_depth_internal: usize,

    /// Follow links on other hosts up to this many hops (needs --check-external)
    ///
    /// 0 = check external links, but never crawl the pages they point to
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH_EXTERNAL)]
    pub max_depth_external: usize,

    /// Pause between two requests, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_REQUEST_DELAY_SECS)]
    pub delay: f64,

    /// Give up on a request after this many seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub timeout: f64,

    /// User-Agent header sent with every request
    #[arg(long, value_name = "STRING", default_value_t = default_user_agent())]
    pub user_agent: String,

    /// Print the final summary as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Do not show the progress line
    #[arg(short, long)]
    pub quiet: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn to_config(&self) -> CrawlConfig {
        CrawlConfig {
            output_file: self.output_file.clone().or_else(|| self.output.clone()),
            check_external: self.check_external,
            max_depth_internal: self.max_depth_internal,
            max_depth_external: self.max_depth_external,
            request_delay_seconds: self.delay,
            request_timeout_seconds: self.timeout,
            user_agent: self.user_agent.clone(),
        }
    }
}
