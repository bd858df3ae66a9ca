// src/checker/html.rs
// =============================================================================
// This module pulls candidate links out of an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever, so broken markup still parses
//
// The extractor returns RAW hrefs. Turning them into absolute, comparable
// URLs is the normalizer's job (crawl/normalize.rs). The one exception is a
// <base href="..."> element: when a page declares one, hrefs are resolved
// against it here, because only the document knows about it.
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Something that can find outbound links in page content
pub trait LinkExtractor {
    /// Returns hrefs in document order, without duplicates.
    /// Content that is not a hypertext document yields nothing.
    fn extract(&self, content: &str, base: &Url) -> Vec<String>;
}

pub struct HtmlLinkExtractor {
    links: Selector,
    base: Selector,
}

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        // Both selectors are constants; failing to parse them is a
        // programming error, not something a user can trigger
        HtmlLinkExtractor {
            links: Selector::parse("a[href], area[href]").expect("valid link selector"),
            base: Selector::parse("base[href]").expect("valid base selector"),
        }
    }

    // The effective base of the document: <base href> if present and valid
    fn document_base(&self, document: &Html, page: &Url) -> Option<Url> {
        let href = document
            .select(&self.base)
            .next()
            .and_then(|element| element.value().attr("href"))?;
        page.join(href.trim()).ok()
    }
}

impl Default for HtmlLinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract(&self, content: &str, base: &Url) -> Vec<String> {
        if !looks_like_markup(content) {
            return Vec::new();
        }

        let document = Html::parse_document(content);
        let doc_base = self.document_base(&document, base);

        let mut seen = HashSet::new();
        let mut hrefs = Vec::new();

        for element in document.select(&self.links) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let href = href.trim();
            if href.is_empty() {
                continue;
            }

            let href = match &doc_base {
                Some(doc_base) => match doc_base.join(href) {
                    Ok(resolved) => resolved.to_string(),
                    Err(_) => continue,
                },
                None => href.to_string(),
            };

            if seen.insert(href.clone()) {
                hrefs.push(href);
            }
        }

        hrefs
    }
}

// A document without a single '<' has no tags, hence no links
fn looks_like_markup(content: &str) -> bool {
    content.contains('<')
}
