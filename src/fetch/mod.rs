//! Network retrieval with a bounded blocked-retry policy
//!
//! The fetcher never fails for ordinary HTTP conditions: 4xx/5xx statuses,
//! timeouts and connection errors are all folded into [`FetchOutcome`] so the
//! collector can record them per URL and move on. Exactly two attempts are
//! made per URL: the default headers first, then one retry with browser-like
//! headers if the first attempt came back HTTP 403.

mod transport;

pub use transport::{HttpTransport, RawResponse, Transport, TransportError};

use crate::config::CrawlerSettings;
use std::time::Duration;
use url::Url;

/// Result of a complete fetch attempt chain for one URL
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// The URL that was fetched
    pub url: String,

    /// Status of the last attempt; 0 when the transport itself failed
    pub status_code: u16,

    /// Response body of the last attempt (empty on transport failure)
    pub body: String,

    /// Content-Type of the last response, if the server sent one
    pub content_type: Option<String>,

    /// Number of attempts made (1 or 2)
    pub attempt_count: u32,

    /// True when no attempt produced a 2xx response
    pub blocked: bool,
}

impl FetchOutcome {
    /// True when the fetch produced a usable response body
    pub fn ok(&self) -> bool {
        !self.blocked
    }

    fn blocked_at(url: &str, status: u16, attempt_count: u32) -> Self {
        Self {
            url: url.to_string(),
            status_code: status,
            body: String::new(),
            content_type: None,
            attempt_count,
            blocked: true,
        }
    }
}

/// Fetches URLs through an injected [`Transport`], applying the retry policy
pub struct Fetcher<T: Transport> {
    transport: T,
    user_agent: String,
    browser_user_agent: String,
    request_delay: Duration,
}

impl Fetcher<HttpTransport> {
    /// Builds a production fetcher from crawler settings
    pub fn from_settings(settings: &CrawlerSettings) -> Result<Self, reqwest::Error> {
        let transport = HttpTransport::new(Duration::from_secs(settings.fetch_timeout_secs))?;
        Ok(Self::new(transport, settings))
    }
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, settings: &CrawlerSettings) -> Self {
        Self {
            transport,
            user_agent: settings.user_agent.clone(),
            browser_user_agent: settings.browser_user_agent.clone(),
            request_delay: Duration::from_millis(settings.request_delay_ms),
        }
    }

    /// Fetches a URL, retrying once with browser-like headers on HTTP 403
    ///
    /// Attempt flow: `Attempt1 -> (ok | blocked -> Attempt2) -> (ok | blocked)`.
    /// Statuses other than 403 never trigger the second attempt; they are
    /// reported as blocked with `attempt_count = 1`.
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        let default_headers = vec![("User-Agent".to_string(), self.user_agent.clone())];

        let first = match self.transport.get(url, &default_headers).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Transport failure for {}: {}", url, e);
                return FetchOutcome::blocked_at(url, 0, 1);
            }
        };

        match first.status {
            200..=299 => FetchOutcome {
                url: url.to_string(),
                status_code: first.status,
                body: first.body,
                content_type: first.content_type,
                attempt_count: 1,
                blocked: false,
            },
            403 => self.retry_as_browser(url).await,
            status => {
                tracing::debug!("HTTP {} for {}", status, url);
                FetchOutcome::blocked_at(url, status, 1)
            }
        }
    }

    /// Second attempt with a browser-like identity after a 403
    async fn retry_as_browser(&self, url: &str) -> FetchOutcome {
        tracing::debug!("HTTP 403 for {}, retrying with browser headers", url);

        let headers = self.browser_headers(url);
        let second = match self.transport.get(url, &headers).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Transport failure on retry for {}: {}", url, e);
                return FetchOutcome::blocked_at(url, 0, 2);
            }
        };

        if (200..=299).contains(&second.status) {
            FetchOutcome {
                url: url.to_string(),
                status_code: second.status,
                body: second.body,
                content_type: second.content_type,
                attempt_count: 2,
                blocked: false,
            }
        } else {
            tracing::debug!("Still blocked after retry: HTTP {} for {}", second.status, url);
            FetchOutcome::blocked_at(url, second.status, 2)
        }
    }

    fn browser_headers(&self, url: &str) -> Vec<(String, String)> {
        let mut headers = vec![
            ("User-Agent".to_string(), self.browser_user_agent.clone()),
            (
                "Accept".to_string(),
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
            ),
        ];

        // A plausible Referer from the URL's own origin
        if let Ok(parsed) = Url::parse(url) {
            if let Some(host) = parsed.host_str() {
                headers.push((
                    "Referer".to_string(),
                    format!("{}://{}/", parsed.scheme(), host),
                ));
            }
        }

        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted transport returning canned responses in order
    struct ScriptedTransport {
        responses: Mutex<Vec<Result<RawResponse, TransportError>>>,
        seen_headers: Mutex<Vec<Vec<(String, String)>>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<Result<RawResponse, TransportError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                seen_headers: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn get(
            &self,
            _url: &str,
            headers: &[(String, String)],
        ) -> Result<RawResponse, TransportError> {
            self.seen_headers.lock().unwrap().push(headers.to_vec());
            let mut responses = self.responses.lock().unwrap();
            responses.remove(0)
        }
    }

    fn test_settings() -> CrawlerSettings {
        CrawlerSettings {
            user_agent: "gleaner-test/0.1".to_string(),
            browser_user_agent: "Mozilla/5.0 (test)".to_string(),
            fetch_timeout_secs: 5,
            request_delay_ms: 0,
            max_concurrent_sources: 1,
            rich_extraction: true,
        }
    }

    fn ok_response(body: &str) -> Result<RawResponse, TransportError> {
        Ok(RawResponse {
            status: 200,
            body: body.to_string(),
            content_type: Some("text/html".to_string()),
        })
    }

    fn status_response(status: u16) -> Result<RawResponse, TransportError> {
        Ok(RawResponse {
            status,
            body: String::new(),
            content_type: None,
        })
    }

    #[tokio::test]
    async fn test_success_first_attempt() {
        let transport = ScriptedTransport::new(vec![ok_response("hello")]);
        let fetcher = Fetcher::new(transport, &test_settings());

        let outcome = fetcher.fetch("https://example.test/a").await;

        assert!(!outcome.blocked);
        assert_eq!(outcome.attempt_count, 1);
        assert_eq!(outcome.status_code, 200);
        assert_eq!(outcome.body, "hello");
    }

    #[tokio::test]
    async fn test_blocked_then_success() {
        let transport = ScriptedTransport::new(vec![status_response(403), ok_response("body")]);
        let fetcher = Fetcher::new(transport, &test_settings());

        let outcome = fetcher.fetch("https://example.test/a").await;

        assert!(!outcome.blocked);
        assert_eq!(outcome.attempt_count, 2);
        assert_eq!(outcome.body, "body");
    }

    #[tokio::test]
    async fn test_retry_uses_browser_headers() {
        let transport = ScriptedTransport::new(vec![status_response(403), ok_response("body")]);
        let fetcher = Fetcher::new(transport, &test_settings());
        let outcome = fetcher.fetch("https://example.test/articles/1").await;
        assert_eq!(outcome.attempt_count, 2);

        let seen = fetcher.transport.seen_headers.lock().unwrap();
        assert_eq!(seen.len(), 2);

        let first_ua = &seen[0].iter().find(|(k, _)| k == "User-Agent").unwrap().1;
        assert_eq!(first_ua, "gleaner-test/0.1");

        let second_ua = &seen[1].iter().find(|(k, _)| k == "User-Agent").unwrap().1;
        assert_eq!(second_ua, "Mozilla/5.0 (test)");

        let referer = &seen[1].iter().find(|(k, _)| k == "Referer").unwrap().1;
        assert_eq!(referer, "https://example.test/");
    }

    #[tokio::test]
    async fn test_blocked_twice() {
        let transport = ScriptedTransport::new(vec![status_response(403), status_response(403)]);
        let fetcher = Fetcher::new(transport, &test_settings());

        let outcome = fetcher.fetch("https://example.test/a").await;

        assert!(outcome.blocked);
        assert_eq!(outcome.attempt_count, 2);
        assert_eq!(outcome.status_code, 403);
    }

    #[tokio::test]
    async fn test_non_403_error_no_retry() {
        let transport = ScriptedTransport::new(vec![status_response(500)]);
        let fetcher = Fetcher::new(transport, &test_settings());

        let outcome = fetcher.fetch("https://example.test/a").await;

        assert!(outcome.blocked);
        assert_eq!(outcome.attempt_count, 1);
        assert_eq!(outcome.status_code, 500);
    }

    #[tokio::test]
    async fn test_transport_failure_is_blocked_status_zero() {
        let transport = ScriptedTransport::new(vec![Err(TransportError {
            message: "timed out".to_string(),
            timed_out: true,
        })]);
        let fetcher = Fetcher::new(transport, &test_settings());

        let outcome = fetcher.fetch("https://example.test/a").await;

        assert!(outcome.blocked);
        assert_eq!(outcome.status_code, 0);
        assert_eq!(outcome.attempt_count, 1);
    }
}
