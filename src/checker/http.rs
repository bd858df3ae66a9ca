// src/checker/http.rs
// =============================================================================
// This module checks if a URL is alive by making one HTTP request.
//
// Key functionality:
// - One GET request per URL, bounded by the configured timeout
// - Redirects are followed transparently; the FINAL status decides
// - 2xx/3xx = ok, 4xx/5xx = broken with the status code as the reason
// - Timeouts, DNS failures, TLS failures etc. = broken with a short label
// - No retries: one failed attempt is final
//
// The body is only kept for HTML responses, because that is the only kind
// of content the crawler expands. Images, PDFs and friends are still
// verified, they just come back with `body: None`.
//
// Rust concepts:
// - Traits: Fetcher is the seam that lets tests swap the network out
// - async-trait: async methods on a trait used through generics
// =============================================================================

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Redirect hops followed before the link counts as broken
pub const MAX_REDIRECTS: usize = 10;

/// Why a link was classified as broken
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BrokenReason {
    /// The final response had a 4xx/5xx status code
    Status(u16),
    /// No response within the request timeout
    Timeout,
    /// Redirect loop or more than MAX_REDIRECTS hops
    TooManyRedirects,
    /// Could not resolve hostname
    DnsError,
    /// SSL/TLS certificate error
    SslError,
    /// Refused, reset, unreachable...
    ConnectionError,
    /// Anything else reqwest reports
    RequestError,
}

impl fmt::Display for BrokenReason {
    // These labels land in the "Error/Status" column of the CSV report
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrokenReason::Status(code) => write!(f, "{}", code),
            BrokenReason::Timeout => f.write_str("timeout"),
            BrokenReason::TooManyRedirects => f.write_str("too many redirects"),
            BrokenReason::DnsError => f.write_str("dns error"),
            BrokenReason::SslError => f.write_str("ssl error"),
            BrokenReason::ConnectionError => f.write_str("connection error"),
            BrokenReason::RequestError => f.write_str("request error"),
        }
    }
}

/// Verdict of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// Final HTTP status code (2xx or 3xx)
    Ok(u16),
    Broken(BrokenReason),
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStatus::Ok(code) => write!(f, "{}", code),
            FetchStatus::Broken(reason) => fmt::Display::fmt(reason, f),
        }
    }
}

/// Result of fetching a single URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub status: FetchStatus,
    /// Page content, only for ok HTML responses
    pub body: Option<String>,
}

impl FetchResult {
    pub fn ok(code: u16, body: Option<String>) -> Self {
        FetchResult {
            status: FetchStatus::Ok(code),
            body,
        }
    }

    pub fn broken(reason: BrokenReason) -> Self {
        FetchResult {
            status: FetchStatus::Broken(reason),
            body: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.status, FetchStatus::Ok(_))
    }
}

/// Something that can verify a URL
///
/// HttpFetcher is the real one; the crawl engine tests plug in a map of
/// canned responses instead. `want_body` is false for targets that will
/// only be checked, never expanded: their content is not downloaded.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url, want_body: bool) -> FetchResult;
}

/// Largest page body read for link extraction (10 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Fetcher backed by a reqwest Client
///
/// The client is built once and reused for every request (connection
/// pooling), with the timeout, redirect policy and User-Agent baked in.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(user_agent)
            .build()?;
        Ok(HttpFetcher {
            client,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        })
    }

    /// Bodies longer than this are cut off; links past the cut are not seen
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, want_body: bool) -> FetchResult {
        match self.client.get(url.clone()).send().await {
            Ok(response) => self.analyze_response(url, response, want_body).await,
            Err(e) => {
                let reason = categorize_error(&e);
                debug!(%url, %reason, error = %e, "request failed");
                FetchResult::broken(reason)
            }
        }
    }
}

impl HttpFetcher {
    // Turns a response into a verdict
    //
    // HTTP status codes:
    // - 200-299: Success
    // - 300-399: Redirect (only seen here if it had no usable Location)
    // - 400-499: Client error (404 not found, etc.)
    // - 500-599: Server error
    async fn analyze_response(
        &self,
        url: &Url,
        response: Response,
        want_body: bool,
    ) -> FetchResult {
        let status = response.status();
        let code = status.as_u16();

        if !(status.is_success() || status.is_redirection()) {
            debug!(%url, code, "broken status");
            return FetchResult::broken(BrokenReason::Status(code));
        }

        // Dropping the response closes the body unread
        if !want_body || !is_html(&response) {
            debug!(%url, code, want_body, "ok, body not needed");
            return FetchResult::ok(code, None);
        }

        // The link is alive whatever happens now; a body we cannot read just
        // means there is nothing to expand
        match read_capped(response, self.max_body_bytes).await {
            Ok(body) => {
                debug!(%url, code, bytes = body.len(), "ok");
                FetchResult::ok(code, Some(body))
            }
            Err(e) => {
                warn!(%url, error = %e, "could not read body of an ok response");
                FetchResult::ok(code, None)
            }
        }
    }
}

// Reads at most `limit` bytes of the body, chunk by chunk
async fn read_capped(mut response: Response, limit: usize) -> Result<String, reqwest::Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let room = limit - bytes.len();
        if chunk.len() >= room {
            bytes.extend_from_slice(&chunk[..room]);
            debug!(limit, "body truncated");
            break;
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// A missing Content-Type is treated as HTML; plenty of small servers omit it
fn is_html(response: &Response) -> bool {
    let Some(value) = response.headers().get(CONTENT_TYPE) else {
        return true;
    };
    let mime = value
        .to_str()
        .unwrap_or("")
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

// Categorizes the different ways reqwest can fail
//
// reqwest only exposes a few is_*() checks, so DNS and TLS failures are
// recognized from the messages of the underlying error chain.
fn categorize_error(error: &reqwest::Error) -> BrokenReason {
    if error.is_timeout() {
        return BrokenReason::Timeout;
    }
    if error.is_redirect() {
        return BrokenReason::TooManyRedirects;
    }

    let chain = error_chain(error);
    if chain.contains("certificate") || chain.contains("tls") || chain.contains("ssl") {
        BrokenReason::SslError
    } else if chain.contains("dns") || chain.contains("lookup address") {
        BrokenReason::DnsError
    } else if error.is_connect() {
        BrokenReason::ConnectionError
    } else {
        BrokenReason::RequestError
    }
}

fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text.to_ascii_lowercase()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait for fetching?
//    - The crawl engine only needs "give me a verdict for this URL"
//    - Tests implement the trait with a HashMap of canned answers, so the
//      engine can be tested without any network
//
// 2. Why #[async_trait]?
//    - It turns `async fn fetch` into a method returning a boxed future,
//      which works the same for every implementation
//
// 3. Why GET and not HEAD?
//    - Pages we expand need their HTML anyway, and quite a few servers
//      answer HEAD with 405 or 404 while GET works fine
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(timeout: Duration) -> HttpFetcher {
        HttpFetcher::new(timeout, "deadlink-crawler-test").unwrap()
    }

    fn url(server: &mockito::ServerGuard, path: &str) -> Url {
        Url::parse(&server.url()).unwrap().join(path).unwrap()
    }

    #[test]
    fn test_reason_labels() {
        assert_eq!(BrokenReason::Status(404).to_string(), "404");
        assert_eq!(BrokenReason::Timeout.to_string(), "timeout");
        assert_eq!(BrokenReason::ConnectionError.to_string(), "connection error");
    }

    #[tokio::test]
    async fn test_ok_html_keeps_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<a href=\"/next\">next</a>")
            .create_async()
            .await;

        let result = fetcher(Duration::from_secs(5)).fetch(&url(&server, "/page"), true).await;
        assert_eq!(result.status, FetchStatus::Ok(200));
        assert_eq!(result.body.as_deref(), Some("<a href=\"/next\">next</a>"));
    }

    #[tokio::test]
    async fn test_ok_non_html_has_no_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/logo.png")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body(vec![0x89, 0x50, 0x4e, 0x47])
            .create_async()
            .await;

        let result = fetcher(Duration::from_secs(5))
            .fetch(&url(&server, "/logo.png"), true)
            .await;
        assert!(result.is_ok());
        assert_eq!(result.body, None);
    }

    #[tokio::test]
    async fn test_check_only_skips_html_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/edge")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<a href=\"/deeper\">deeper</a>")
            .create_async()
            .await;

        let result = fetcher(Duration::from_secs(5))
            .fetch(&url(&server, "/edge"), false)
            .await;
        assert_eq!(result.status, FetchStatus::Ok(200));
        assert_eq!(result.body, None);
    }

    #[tokio::test]
    async fn test_body_truncated_at_limit() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/big")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(format!("<p>{}</p>", "x".repeat(4096)))
            .create_async()
            .await;

        let result = fetcher(Duration::from_secs(5))
            .with_max_body_bytes(16)
            .fetch(&url(&server, "/big"), true)
            .await;
        assert!(result.is_ok());
        assert_eq!(result.body.as_deref(), Some("<p>xxxxxxxxxxxxx"));
    }

    #[tokio::test]
    async fn test_not_found_is_broken_with_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let result = fetcher(Duration::from_secs(5))
            .fetch(&url(&server, "/missing"), true)
            .await;
        assert_eq!(result.status, FetchStatus::Broken(BrokenReason::Status(404)));
        assert_eq!(result.body, None);
    }

    #[tokio::test]
    async fn test_server_error_is_broken() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/boom")
            .with_status(503)
            .create_async()
            .await;

        let result = fetcher(Duration::from_secs(5)).fetch(&url(&server, "/boom"), true).await;
        assert_eq!(result.status, FetchStatus::Broken(BrokenReason::Status(503)));
    }

    #[tokio::test]
    async fn test_redirect_uses_final_status() {
        let mut server = mockito::Server::new_async().await;
        let _old = server
            .mock("GET", "/old")
            .with_status(301)
            .with_header("location", "/new")
            .create_async()
            .await;
        let _new = server
            .mock("GET", "/new")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<p>moved</p>")
            .create_async()
            .await;
        let _gone = server
            .mock("GET", "/gone")
            .with_status(302)
            .with_header("location", "/nowhere")
            .create_async()
            .await;
        let _nowhere = server
            .mock("GET", "/nowhere")
            .with_status(410)
            .create_async()
            .await;

        let fetcher = fetcher(Duration::from_secs(5));
        let moved = fetcher.fetch(&url(&server, "/old"), true).await;
        assert_eq!(moved.status, FetchStatus::Ok(200));
        assert_eq!(moved.body.as_deref(), Some("<p>moved</p>"));

        let gone = fetcher.fetch(&url(&server, "/gone"), true).await;
        assert_eq!(gone.status, FetchStatus::Broken(BrokenReason::Status(410)));
    }

    #[tokio::test]
    async fn test_redirect_loop_is_broken() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/loop")
            .with_status(302)
            .with_header("location", "/loop")
            .expect_at_least(1)
            .create_async()
            .await;

        let result = fetcher(Duration::from_secs(5)).fetch(&url(&server, "/loop"), true).await;
        assert_eq!(
            result.status,
            FetchStatus::Broken(BrokenReason::TooManyRedirects)
        );
    }

    #[tokio::test]
    async fn test_timeout_is_broken_not_a_crash() {
        // Accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let holder = tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        let target = Url::parse(&format!("http://{}/slow", addr)).unwrap();
        let result = fetcher(Duration::from_millis(200)).fetch(&target, true).await;
        assert_eq!(result.status, FetchStatus::Broken(BrokenReason::Timeout));
        assert_eq!(result.status.to_string(), "timeout");

        holder.abort();
    }

    #[tokio::test]
    async fn test_refused_connection_is_broken() {
        // Bind then drop to get a port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let target = Url::parse(&format!("http://{}/", addr)).unwrap();
        let result = fetcher(Duration::from_secs(5)).fetch(&target, true).await;
        assert!(!result.is_ok());
        assert_eq!(result.body, None);
    }
}
