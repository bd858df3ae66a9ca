// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing) on stderr
// 3. Validate everything that can fail BEFORE the first request:
//    configuration, seed URL, report file
// 4. Run the crawl engine, with Ctrl-C wired to a cancellation token
// 5. Print the final report (or JSON) and exit (0 = done, 1 = fatal error)
//
// Broken links are not a process-level failure: they are the report.
// =============================================================================

use anyhow::Result;
use clap::Parser;
use deadlink_crawler::checker::{HtmlLinkExtractor, HttpFetcher};
use deadlink_crawler::cli::Cli;
use deadlink_crawler::crawl::{self, CrawlEngine};
use deadlink_crawler::CrawlError;
use deadlink_crawler::report::{
    CrawlStats, CsvSink, ProgressReporter, SilentProgress, TerminalProgress,
};
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.to_config();
    config.validate()?;

    let seed = crawl::normalize_seed(&cli.url)?;
    let output_path = config.output_path(seed.as_url());

    // Created up front: an unwritable path must fail before any crawling
    let mut sink = CsvSink::create(&output_path)?;

    let fetcher = HttpFetcher::new(config.request_timeout()?, &config.user_agent)
        .map_err(CrawlError::HttpClient)?;

    let cancel = CancellationToken::new();
    watch_ctrl_c(cancel.clone());

    let engine = CrawlEngine::new(seed, &config, fetcher, HtmlLinkExtractor::new())?
        .with_cancellation(cancel)
        .with_seed_label(&cli.url);

    if !cli.json {
        println!("🌐 Starting crawl from: {}", engine.seed());
        if !config.check_external {
            println!("⚠️  Only internal (same-host) links are checked. Use --check-external for the rest.");
        }
        println!();
    }

    let mut progress: Box<dyn ProgressReporter> = if cli.quiet {
        Box::new(SilentProgress)
    } else {
        Box::new(TerminalProgress::new())
    };

    let started = Instant::now();
    let stats = engine.run(progress.as_mut(), &mut sink).await?;
    let elapsed = started.elapsed();

    if cli.json {
        print_json(&stats, sink.path(), elapsed)?;
    } else {
        print_report(&stats, sink.path(), elapsed);
    }
    Ok(())
}

// RUST_LOG wins when it is set; otherwise -v decides
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

// The first Ctrl-C stops the crawl after the current request; the report
// written so far stays valid. A second one kills the process as usual.
fn watch_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, stopping after the current request");
            cancel.cancel();
        }
    });
}

fn print_report(stats: &CrawlStats, output: &Path, elapsed: Duration) {
    if stats.cancelled {
        println!("\n⏹️  Crawl interrupted.");
    } else {
        println!("\n✅ Crawl complete.");
    }
    println!("Pages crawled: {}", stats.pages);
    println!("Links checked: {}", stats.checked);
    println!("Working links: {}", stats.ok);
    println!("Broken links: {}", stats.broken);
    println!("Time: {:.1}s", elapsed.as_secs_f64());
    println!("📄 Broken link details saved to: {}", output.display());
}

#[derive(Serialize)]
struct Summary<'a> {
    #[serde(flatten)]
    stats: &'a CrawlStats,
    output_file: String,
    elapsed_seconds: f64,
}

fn print_json(stats: &CrawlStats, output: &Path, elapsed: Duration) -> Result<()> {
    let summary = Summary {
        stats,
        output_file: output.display().to_string(),
        elapsed_seconds: elapsed.as_secs_f64(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
