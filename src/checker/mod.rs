// src/checker/mod.rs
// =============================================================================
// This module contains the two leaf capabilities of the crawler.
//
// Submodules:
// - http: Verifies a URL with one HTTP request (the Fetcher)
// - html: Finds candidate links in a fetched page (the LinkExtractor)
//
// Both are traits, so the crawl engine never depends on reqwest or scraper
// directly and tests can plug in canned implementations.
// =============================================================================

mod html;
mod http;

pub use html::{HtmlLinkExtractor, LinkExtractor};
pub use http::{BrokenReason, FetchResult, FetchStatus, Fetcher, HttpFetcher};
