// src/crawl/queue.rs
// =============================================================================
// The frontier: the queue of discovered-but-not-yet-checked links.
//
// How it works:
// 1. The seed goes in first, at depth 0
// 2. The engine pops from the front, checks the link, and pushes any new
//    links it finds on that page to the back (breadth-first, FIFO)
// 3. A URL is marked visited the moment it is pushed, so it can never be
//    queued (or fetched) a second time, no matter how many pages link to it
//
// Rust concepts:
// - HashSet: To track visited URLs (O(1) lookup)
// - VecDeque: Double-ended queue for breadth-first crawling
// =============================================================================

use super::normalize::{NormalizedUrl, Scope};
use std::collections::{HashSet, VecDeque};

/// One link waiting to be checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub url: NormalizedUrl,
    /// Link hops from the seed (the seed itself is 0)
    pub depth: usize,
    pub scope: Scope,
    /// The page this link was found on. None only for the seed
    pub parent: Option<NormalizedUrl>,
}

impl CrawlTarget {
    pub fn seed(url: NormalizedUrl) -> Self {
        CrawlTarget {
            url,
            depth: 0,
            scope: Scope::Internal,
            parent: None,
        }
    }

    /// The page to blame in the report if this target is broken
    pub fn source_page(&self) -> &NormalizedUrl {
        self.parent.as_ref().unwrap_or(&self.url)
    }
}

#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<CrawlTarget>,
    visited: HashSet<NormalizedUrl>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a target unless its URL was seen before
    ///
    /// Returns true if the target was queued. This is the only place the
    /// visited set grows, so test-and-insert is a single step.
    pub fn push(&mut self, target: CrawlTarget) -> bool {
        if !self.visited.insert(target.url.clone()) {
            return false;
        }
        self.queue.push_back(target);
        true
    }

    pub fn pop(&mut self) -> Option<CrawlTarget> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of distinct URLs ever queued
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why mark visited on push instead of on pop?
//    - Two pages linking to the same URL would otherwise queue it twice
//    - HashSet::insert returns false if the value was already there, so the
//      membership test and the insert are one call
//
// 2. Why an explicit queue instead of recursion?
//    - A recursive crawl_page(url, depth + 1) grows the call stack with
//      every hop; a VecDeque grows on the heap instead
//    - The depth lives in the CrawlTarget, where it can be checked and tested
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::normalize::normalize_seed;

    fn target(url: &str, depth: usize) -> CrawlTarget {
        CrawlTarget {
            url: normalize_seed(url).unwrap(),
            depth,
            scope: Scope::Internal,
            parent: None,
        }
    }

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::new();
        frontier.push(target("https://a.com/1", 0));
        frontier.push(target("https://a.com/2", 3));
        frontier.push(target("https://a.com/3", 1));

        let order: Vec<_> = std::iter::from_fn(|| frontier.pop())
            .map(|t| t.url.to_string())
            .collect();
        assert_eq!(
            order,
            vec!["https://a.com/1", "https://a.com/2", "https://a.com/3"]
        );
    }

    #[test]
    fn test_push_is_idempotent() {
        let mut frontier = Frontier::new();
        assert!(frontier.push(target("https://a.com/x", 1)));
        assert!(!frontier.push(target("https://a.com/x", 2)));
        assert_eq!(frontier.len(), 1);

        // Still rejected after it has been popped
        frontier.pop();
        assert!(!frontier.push(target("https://a.com/x", 1)));
        assert!(frontier.is_empty());
        assert_eq!(frontier.visited_count(), 1);
    }

    #[test]
    fn test_source_page_of_seed_is_itself() {
        let seed = CrawlTarget::seed(normalize_seed("https://a.com").unwrap());
        assert_eq!(seed.source_page(), &seed.url);
        assert!(seed.parent.is_none());
    }
}
