// src/crawl/normalize.rs
// =============================================================================
// URL normalization and internal/external classification.
//
// Every href we find goes through normalize() before it can enter the
// frontier. The result is:
// - absolute (relative, absolute-path, protocol-relative, query-only and
//   fragment-only references are resolved against the page URL)
// - fragment-free ("/page#a" and "/page#b" are the same resource)
// - http or https only (mailto:, tel:, javascript:, data: are rejected)
//
// The url crate does the heavy lifting: Url::join implements the WHATWG
// resolution rules and serializes to a canonical form (lowercase scheme and
// host, default port dropped, "/" path for bare hosts, dot segments
// removed). That canonical form is what makes two URLs comparable and what
// makes normalize() idempotent.
// =============================================================================

use crate::error::CrawlError;
use serde::Serialize;
use std::fmt;
use url::Url;

/// Which side of the seed host a URL lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Internal,
    External,
}

/// An absolute, fragment-free http(s) URL
///
/// The only way to build one is through normalize() or normalize_seed(),
/// so holding a NormalizedUrl proves the value went through the rules above.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedUrl(Url);

impl NormalizedUrl {
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Why an href never made it into the frontier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejected {
    #[error("cannot resolve '{0}'")]
    Unparseable(String),
    #[error("unsupported scheme '{0}'")]
    UnsupportedScheme(String),
    #[error("no host in '{0}'")]
    MissingHost(String),
}

// Resolves an href against the page it was found on
//
// Examples (base = "https://example.com/docs/intro"):
//   "setup"                 -> https://example.com/docs/setup
//   "/about#team"           -> https://example.com/about
//   "//cdn.example.org/x"   -> https://cdn.example.org/x
//   "?page=2"               -> https://example.com/docs/intro?page=2
//   "#top"                  -> https://example.com/docs/intro
//   "mailto:me@example.com" -> Rejected::UnsupportedScheme
pub fn normalize(raw_href: &str, base: &Url) -> Result<NormalizedUrl, Rejected> {
    let href = raw_href.trim();

    let mut url = base
        .join(href)
        .map_err(|_| Rejected::Unparseable(href.to_string()))?;

    check_http(&url).map_err(|scheme| Rejected::UnsupportedScheme(scheme.to_string()))?;

    if url.host_str().map_or(true, str::is_empty) {
        return Err(Rejected::MissingHost(href.to_string()));
    }

    url.set_fragment(None);
    Ok(NormalizedUrl(url))
}

/// Parses the seed URL given on the command line
///
/// Unlike normalize(), a bad seed is fatal: there is nothing to crawl.
pub fn normalize_seed(raw: &str) -> Result<NormalizedUrl, CrawlError> {
    let mut url = Url::parse(raw.trim()).map_err(|source| CrawlError::InvalidSeed {
        url: raw.to_string(),
        source,
    })?;

    if check_http(&url).is_err() {
        return Err(CrawlError::UnsupportedSeedScheme(raw.to_string()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(CrawlError::SeedWithoutHost(raw.to_string()));
    }

    url.set_fragment(None);
    Ok(NormalizedUrl(url))
}

fn check_http(url: &Url) -> Result<(), &str> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(other),
    }
}

/// The host every URL is compared against
///
/// Exact host match, case-insensitive, scheme and port ignored.
/// "docs.example.com" is External for a seed on "example.com".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedHost(String);

impl SeedHost {
    pub fn new(seed: &NormalizedUrl) -> Self {
        // normalize_seed() already guaranteed a host
        SeedHost(seed.as_url().host_str().unwrap_or_default().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn classify(&self, url: &NormalizedUrl) -> Scope {
        match url.as_url().host_str() {
            Some(host) if host.eq_ignore_ascii_case(&self.0) => Scope::Internal,
            _ => Scope::External,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/docs/intro").unwrap()
    }

    fn norm(href: &str) -> String {
        normalize(href, &base()).unwrap().to_string()
    }

    #[test]
    fn test_resolves_reference_forms() {
        assert_eq!(norm("setup"), "https://example.com/docs/setup");
        assert_eq!(norm("../about"), "https://example.com/about");
        assert_eq!(norm("/about"), "https://example.com/about");
        assert_eq!(norm("//cdn.example.org/lib.js"), "https://cdn.example.org/lib.js");
        assert_eq!(norm("?page=2"), "https://example.com/docs/intro?page=2");
        assert_eq!(norm("#top"), "https://example.com/docs/intro");
        assert_eq!(norm("http://other.org"), "http://other.org/");
    }

    #[test]
    fn test_fragment_equivalence() {
        let a = norm("http://a.com/p#x");
        let b = norm("http://a.com/p#y");
        let c = norm("http://a.com/p");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_idempotent() {
        let hrefs = [
            "setup",
            "/about#team",
            "//cdn.example.org/x?y=1#z",
            "HTTPS://Example.COM:443/a/./b/../c",
            "?q=a b",
            "https://example.com",
        ];
        for href in hrefs {
            let once = normalize(href, &base()).unwrap();
            let twice = normalize(once.as_str(), once.as_url()).unwrap();
            assert_eq!(once, twice, "normalize not idempotent for {href}");
            // Re-normalizing against an unrelated base must not change it either
            let other_base = Url::parse("http://unrelated.net/x/y").unwrap();
            assert_eq!(normalize(once.as_str(), &other_base).unwrap(), once);
        }
    }

    #[test]
    fn test_rejects_non_http_schemes() {
        for href in [
            "mailto:test@example.com",
            "tel:+123456",
            "javascript:void(0)",
            "data:text/plain,hello",
            "ftp://files.example.com/a",
        ] {
            assert!(
                matches!(normalize(href, &base()), Err(Rejected::UnsupportedScheme(_))),
                "{href} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_unparseable() {
        assert!(matches!(
            normalize("http://[broken", &base()),
            Err(Rejected::Unparseable(_))
        ));
    }

    #[test]
    fn test_classification() {
        let seed = normalize_seed("https://a.com").unwrap();
        let host = SeedHost::new(&seed);
        let base = seed.as_url().clone();

        let internal = normalize("https://a.com/x", &base).unwrap();
        let external = normalize("https://b.com", &base).unwrap();
        let other_scheme = normalize("http://A.COM/y", &base).unwrap();
        let subdomain = normalize("https://docs.a.com/", &base).unwrap();

        assert_eq!(host.classify(&internal), Scope::Internal);
        assert_eq!(host.classify(&external), Scope::External);
        assert_eq!(host.classify(&other_scheme), Scope::Internal);
        assert_eq!(host.classify(&subdomain), Scope::External);
    }

    #[test]
    fn test_seed_host_case_insensitive() {
        let seed = normalize_seed("https://WWW.Example.com/Start").unwrap();
        let host = SeedHost::new(&seed);
        assert_eq!(host.as_str(), "www.example.com");
        assert_eq!(host.classify(&seed), Scope::Internal);
    }

    #[test]
    fn test_seed_validation() {
        assert!(matches!(
            normalize_seed("example.com"),
            Err(CrawlError::InvalidSeed { .. })
        ));
        assert!(matches!(
            normalize_seed("ftp://example.com"),
            Err(CrawlError::UnsupportedSeedScheme(_))
        ));
        assert_eq!(
            normalize_seed("https://example.com/#intro").unwrap().as_str(),
            "https://example.com/"
        );
    }
}
