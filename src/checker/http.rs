// src/checker/http.rs
// =============================================================================
// This module makes every outbound HTTP request of an audit.
//
// Key functionality:
// - GET a page as text (robots.txt)
// - HEAD a URL and keep ok/status/headers (sitemap, legal pages, links)
// - GET a page in full: status, headers and body (the audited page itself)
// - HEAD a whole list of URLs concurrently, keeping the input order
//
// Failure is data, not an error: a timeout, a DNS failure, a TLS failure or a
// body that cannot be decoded all come back as `FetchResult::default()` (or an
// empty string). Callers never have to handle a network error.
//
// Rust concepts:
// - async/await: For concurrent network I/O
// - tokio::time::timeout: Races a future against a timer and drops it on expiry
// - Default trait: The "failed" value of a fetch
// =============================================================================

use crate::config::AuditSettings;
use anyhow::{Context, Result};
use futures::future::join_all;
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

// Matches the redirect ceiling of browser fetch
const MAX_REDIRECTS: usize = 20;

/// Outcome of one outbound request.
///
/// `ok` is the discriminant: true only for a 2xx final response. On any
/// transport failure or timeout every field keeps its default value
/// (ok=false, status=0, no headers, empty body).
#[derive(Debug, Clone, Default)]
pub struct FetchResult {
    pub ok: bool,
    pub status: u16,
    /// Header names are case-insensitive, so `headers.contains_key("x-frame-options")`
    /// finds `X-Frame-Options` too
    pub headers: HeaderMap,
    pub body: String,
}

// Shared HTTP client plus the per-request timeout
//
// Client is cheap to clone (it's just a reference counter internally), so the
// whole Fetcher is Clone and can be handed to the axum state.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(settings: &AuditSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            client,
            timeout: settings.timeout,
        })
    }

    /// GET `url` and return its body when the status is 2xx, otherwise ""
    pub async fn fetch_text(&self, url: &str) -> String {
        let request = async {
            let response = self.client.get(url).send().await?;
            if !response.status().is_success() {
                return Ok(String::new());
            }
            response.text().await
        };

        self.bounded(url, request).await.unwrap_or_default()
    }

    /// HEAD `url`, following redirects; the body is always empty
    pub async fn fetch_head(&self, url: &str) -> FetchResult {
        let request = async {
            let response = self.client.head(url).send().await?;
            Ok::<_, reqwest::Error>(FetchResult {
                ok: response.status().is_success(),
                status: response.status().as_u16(),
                headers: response.headers().clone(),
                body: String::new(),
            })
        };

        self.bounded(url, request).await.unwrap_or_default()
    }

    /// GET `url`, following redirects, and read the whole body as text
    pub async fn fetch_full(&self, url: &str) -> FetchResult {
        let request = async {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            // A body that fails mid-read discards the whole result
            let body = response.text().await?;
            Ok::<_, reqwest::Error>(FetchResult {
                ok: status.is_success(),
                status: status.as_u16(),
                headers,
                body,
            })
        };

        self.bounded(url, request).await.unwrap_or_default()
    }

    /// HEAD every URL concurrently.
    ///
    /// Returns one result per input, in input order. The call settles only
    /// once the slowest request has finished or timed out.
    pub async fn fetch_head_all(&self, urls: &[String]) -> Vec<FetchResult> {
        join_all(urls.iter().map(|url| self.fetch_head(url))).await
    }

    // Runs one request under the timeout. Dropping the future on expiry
    // aborts the in-flight request.
    async fn bounded<T, F>(&self, url: &str, request: F) -> Option<T>
    where
        F: Future<Output = reqwest::Result<T>>,
    {
        match timeout(self.timeout, request).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                debug!(url, error = %e, "request failed");
                None
            }
            Err(_) => {
                debug!(url, timeout_ms = self.timeout.as_millis() as u64, "request timed out");
                None
            }
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why tokio::time::timeout instead of Client::builder().timeout()?
//    - Both work, but wrapping the future makes the deadline cover exactly
//      what we await: sending the request AND reading the body
//    - When the timer wins, the request future is dropped, which closes the
//      connection. Nothing keeps running in the background
//
// 2. Why join_all and not buffer_unordered?
//    - join_all returns results in the same order as the input futures
//    - The report lists links in discovery order, so order matters
//    - The lists are short (16 legal paths, at most 30 links), so no
//      concurrency cap is needed
//
// 3. Why unwrap_or_default()?
//    - bounded() returns None for any failure
//    - FetchResult::default() / String::default() IS the failure value
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher_with_timeout(ms: u64) -> Fetcher {
        let settings = AuditSettings {
            timeout: Duration::from_millis(ms),
            ..AuditSettings::default()
        };
        Fetcher::new(&settings).unwrap()
    }

    #[test]
    fn test_failed_result_is_default() {
        let failed = FetchResult::default();
        assert!(!failed.ok);
        assert_eq!(failed.status, 0);
        assert!(failed.headers.is_empty());
        assert!(failed.body.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_text_success_and_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\n"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gone.txt"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
            .mount(&server)
            .await;

        let fetcher = fetcher_with_timeout(5_000);
        let found = fetcher.fetch_text(&format!("{}/robots.txt", server.uri())).await;
        assert_eq!(found, "User-agent: *\n");

        // A 404 body is never returned
        let missing = fetcher.fetch_text(&format!("{}/gone.txt", server.uri())).await;
        assert_eq!(missing, "");
    }

    #[tokio::test]
    async fn test_fetch_full_reads_status_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Frame-Options", "DENY")
                    .set_body_string("<html>hi</html>"),
            )
            .mount(&server)
            .await;

        let page = fetcher_with_timeout(5_000).fetch_full(&format!("{}/", server.uri())).await;
        assert!(page.ok);
        assert_eq!(page.status, 200);
        assert!(page.headers.contains_key("x-frame-options"));
        assert_eq!(page.body, "<html>hi</html>");
    }

    #[tokio::test]
    async fn test_fetch_full_keeps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let page = fetcher_with_timeout(5_000).fetch_full(&server.uri()).await;
        assert!(!page.ok);
        assert_eq!(page.status, 500);
        assert_eq!(page.body, "boom");
    }

    #[tokio::test]
    async fn test_timeout_degrades_to_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let fetcher = fetcher_with_timeout(150);
        let page = fetcher.fetch_full(&server.uri()).await;
        assert!(!page.ok);
        assert_eq!(page.status, 0);
        assert!(page.headers.is_empty());

        let head = fetcher.fetch_head(&server.uri()).await;
        assert_eq!(head.status, 0);

        assert_eq!(fetcher.fetch_text(&server.uri()).await, "");
    }

    #[tokio::test]
    async fn test_unreachable_host_degrades_to_default() {
        // Port 9 (discard) on localhost is essentially never listening
        let head = fetcher_with_timeout(2_000).fetch_head("http://127.0.0.1:9/").await;
        assert!(!head.ok);
        assert_eq!(head.status, 0);
    }

    #[tokio::test]
    async fn test_fetch_head_all_keeps_input_order() {
        let server = MockServer::start().await;
        // The first URL is the slowest one, yet it must stay first
        Mock::given(method("HEAD"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/fast"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let urls = vec![
            format!("{}/slow", server.uri()),
            format!("{}/fast", server.uri()),
            format!("{}/missing", server.uri()),
        ];
        let results = fetcher_with_timeout(5_000).fetch_head_all(&urls).await;
        let statuses: Vec<u16> = results.iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec![200, 204, 404]);
    }
}
