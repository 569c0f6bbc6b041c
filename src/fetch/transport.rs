//! Injected HTTP capability behind the fetcher
//!
//! The retry state machine in [`crate::fetch::Fetcher`] is written against
//! this trait so it can be exercised in tests with a scripted transport
//! instead of the network.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// A raw HTTP response as seen by the fetcher
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
    pub content_type: Option<String>,
}

/// Transport-level failure (timeout, DNS, connection refused)
///
/// HTTP-level failures are not errors at this layer; they come back as a
/// [`RawResponse`] with the status code set.
#[derive(Debug, Clone)]
pub struct TransportError {
    pub message: String,
    pub timed_out: bool,
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TransportError {}

/// Abstract `get(url, headers) -> (status, body, headers)` capability
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<RawResponse, TransportError>;
}

/// Reqwest-backed transport used in production
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds the underlying client with bounded timeouts
    ///
    /// Redirects are followed by the client; the user agent is supplied
    /// per-request by the fetcher so the blocked-retry can swap it.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<RawResponse, TransportError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| TransportError {
            message: e.to_string(),
            timed_out: e.is_timeout(),
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response.text().await.map_err(|e| TransportError {
            message: e.to_string(),
            timed_out: e.is_timeout(),
        })?;

        Ok(RawResponse {
            status,
            body,
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_transport() {
        let transport = HttpTransport::new(Duration::from_secs(30));
        assert!(transport.is_ok());
    }
}
