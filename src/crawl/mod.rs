// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling starting from a seed URL (FIFO frontier)
// - Internal/external classification against the seed host
// - Separate depth limits for internal and external pages
// - Every URL is checked at most once (fragments ignored)
// - Polite crawling with a delay between requests
// - Cooperative cancellation between two requests
// =============================================================================

mod engine;
mod normalize;
mod queue;

pub use engine::CrawlEngine;
pub use normalize::{normalize, normalize_seed, NormalizedUrl, Rejected, Scope, SeedHost};
pub use queue::{CrawlTarget, Frontier};
