// src/crawl/engine.rs
// =============================================================================
// The crawl engine: one serial, depth-bounded, breadth-first traversal.
//
// For every target popped from the frontier:
// 1. Fetch it (one request, bounded by the timeout)
// 2. Update the stats and push a snapshot to the progress reporter
// 3. Broken?  -> write a record to the sink, stop here
// 4. Ok, HTML, and depth <= the max depth of its scope?
//             -> extract links, normalize them, queue the unseen ones at
//                depth + 1 with their own scope
// 5. Sleep for the configured delay before the next target
//
// Depth counts hops from the seed, so max_depth_internal = 0 still checks
// every link on the seed page. External links only enter the frontier when
// check_external is on; they are at least one hop away, so
// max_depth_external = 0 means "check that the link works, but never crawl
// the other site".
//
// Targets that will not be expanded are fetched without reading the body.
//
// All run state (frontier, visited set, stats) lives in the engine value,
// so two engines never share anything.
// =============================================================================

use super::normalize::{normalize, NormalizedUrl, Scope, SeedHost};
use super::queue::{CrawlTarget, Frontier};
use crate::checker::{FetchStatus, Fetcher, LinkExtractor};
use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::report::{BrokenLinkSink, BrokenRecord, CrawlStats, ProgressReporter};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

pub struct CrawlEngine<F, X> {
    seed: NormalizedUrl,
    /// The seed as the user typed it, used in the report instead of `seed`
    seed_label: Option<String>,
    seed_host: SeedHost,
    check_external: bool,
    max_depth_internal: usize,
    max_depth_external: usize,
    delay: Duration,
    fetcher: F,
    extractor: X,
    frontier: Frontier,
    stats: CrawlStats,
    cancel: CancellationToken,
}

impl<F: Fetcher, X: LinkExtractor> CrawlEngine<F, X> {
    pub fn new(
        seed: NormalizedUrl,
        config: &CrawlConfig,
        fetcher: F,
        extractor: X,
    ) -> Result<Self, CrawlError> {
        config.validate()?;

        Ok(CrawlEngine {
            seed_host: SeedHost::new(&seed),
            seed,
            seed_label: None,
            check_external: config.check_external,
            max_depth_internal: config.max_depth_internal,
            max_depth_external: config.max_depth_external,
            delay: config.request_delay()?,
            fetcher,
            extractor,
            frontier: Frontier::new(),
            stats: CrawlStats::default(),
            cancel: CancellationToken::new(),
        })
    }

    /// Lets another task stop the crawl between two requests
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Writes the seed to the report as typed ("https://a.com") rather
    /// than in normalized form ("https://a.com/"). The fragment is dropped.
    pub fn with_seed_label(mut self, label: &str) -> Self {
        let label = label.trim();
        let label = label.split_once('#').map_or(label, |(before, _)| before);
        self.seed_label = Some(label.to_string());
        self
    }

    pub fn seed(&self) -> &NormalizedUrl {
        &self.seed
    }

    /// Runs the crawl until the frontier is empty or the token is cancelled
    ///
    /// Individual broken links never make this fail. Only the sink can:
    /// a report we cannot write is fatal.
    pub async fn run(
        mut self,
        progress: &mut dyn ProgressReporter,
        sink: &mut dyn BrokenLinkSink,
    ) -> Result<CrawlStats, CrawlError> {
        info!(
            seed = %self.seed,
            check_external = self.check_external,
            max_depth_internal = self.max_depth_internal,
            max_depth_external = self.max_depth_external,
            "starting crawl"
        );

        self.frontier.push(CrawlTarget::seed(self.seed.clone()));

        while let Some(target) = self.frontier.pop() {
            if self.cancel.is_cancelled() {
                info!(pending = self.frontier.len() + 1, "crawl cancelled");
                self.stats.cancelled = true;
                break;
            }

            self.process(target, progress, sink).await?;

            if !self.frontier.is_empty() && !self.delay.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(self.delay) => {}
                    _ = self.cancel.cancelled() => {}
                }
            }
        }

        info!(
            checked = self.stats.checked,
            ok = self.stats.ok,
            broken = self.stats.broken,
            pages = self.stats.pages,
            distinct_urls = self.frontier.visited_count(),
            "crawl finished"
        );
        progress.finish(&self.stats);
        Ok(self.stats)
    }

    async fn process(
        &mut self,
        target: CrawlTarget,
        progress: &mut dyn ProgressReporter,
        sink: &mut dyn BrokenLinkSink,
    ) -> Result<(), CrawlError> {
        debug!(url = %target.url, depth = target.depth, scope = ?target.scope, "checking");
        let expand = self.may_expand(&target);
        let result = self.fetcher.fetch(target.url.as_url(), expand).await;

        self.stats.checked += 1;
        self.stats.current = Some(target.url.to_string());
        match &result.status {
            FetchStatus::Ok(_) => self.stats.ok += 1,
            FetchStatus::Broken(_) => self.stats.broken += 1,
        }
        progress.update(&self.stats);

        if let FetchStatus::Broken(reason) = &result.status {
            sink.record(&BrokenRecord {
                source_page: self.report_name(target.source_page()),
                broken_link: self.report_name(&target.url),
                reason: reason.to_string(),
            })?;
            return Ok(());
        }

        if !expand {
            return Ok(());
        }
        // Non-HTML responses come back without a body: verified, not expanded
        if let Some(body) = result.body {
            self.expand(&target, &body);
        }
        Ok(())
    }

    fn may_expand(&self, target: &CrawlTarget) -> bool {
        let max_depth = match target.scope {
            Scope::Internal => self.max_depth_internal,
            Scope::External => self.max_depth_external,
        };
        target.depth <= max_depth
    }

    fn report_name(&self, url: &NormalizedUrl) -> String {
        match &self.seed_label {
            Some(label) if *url == self.seed => label.clone(),
            _ => url.to_string(),
        }
    }

    fn expand(&mut self, page: &CrawlTarget, body: &str) {
        self.stats.pages += 1;
        let base = page.url.as_url();
        let mut queued = 0usize;

        for href in self.extractor.extract(body, base) {
            let url = match normalize(&href, base) {
                Ok(url) => url,
                Err(rejected) => {
                    trace!(page = %page.url, %rejected, "skipping link");
                    continue;
                }
            };

            let scope = self.seed_host.classify(&url);
            if scope == Scope::External && !self.check_external {
                continue;
            }

            let child = CrawlTarget {
                url,
                depth: page.depth + 1,
                scope,
                parent: Some(page.url.clone()),
            };
            if self.frontier.push(child) {
                queued += 1;
            }
        }

        debug!(page = %page.url, queued, "expanded");
    }
}
