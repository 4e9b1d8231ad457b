//! Cloud disk API client
//!
//! Wraps `reqwest::Client` with the authorization header scheme the disk
//! API expects, the configured connect/read timeout pair, and a bounded
//! retry loop with fixed backoff. Every transport call in this crate goes
//! through [`DiskClient::execute_with_retry`].

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use cloudbak_core::config::TransportConfig;

/// HTTP client for the cloud disk REST API
///
/// The base URL is configurable so integration tests can point the client
/// at a mock server.
pub struct DiskClient {
    /// The underlying HTTP client, carrying the timeout configuration
    client: Client,
    /// Base URL for API requests
    base_url: String,
    /// Retry attempts after the first failure
    retries: u32,
    /// Fixed pause between attempts
    backoff: Duration,
}

impl DiskClient {
    /// Creates a new DiskClient for the given API base URL.
    pub fn new(base_url: impl Into<String>, transport: &TransportConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(transport.connect_timeout_secs))
            .timeout(Duration::from_secs(transport.read_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            retries: transport.retries,
            backoff: Duration::from_secs(transport.backoff_secs),
        })
    }

    /// Creates an authenticated request builder for the given method and
    /// path, relative to the base URL.
    pub fn request(&self, method: Method, path: &str, access_token: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .header("Authorization", format!("OAuth {access_token}"))
    }

    /// Executes a request with bounded retry and fixed backoff.
    ///
    /// `build` is called once per attempt to produce a fresh request.
    /// Connection errors and retryable statuses (5xx, 429) are retried up
    /// to the configured count; when the budget is exhausted the last
    /// response (or error) is returned for the caller to map. Client errors
    /// (4xx) are returned immediately.
    pub async fn execute_with_retry<F>(&self, what: &str, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt: u32 = 0;
        loop {
            match build().send().await {
                Ok(response) if !retryable_status(response.status()) => {
                    if attempt > 0 {
                        debug!(what, attempt, "Request succeeded after retry");
                    }
                    return Ok(response);
                }
                Ok(response) => {
                    if attempt >= self.retries {
                        warn!(
                            what,
                            status = %response.status(),
                            attempts = attempt + 1,
                            "Retry budget exhausted"
                        );
                        return Ok(response);
                    }
                    warn!(
                        what,
                        status = %response.status(),
                        attempt,
                        backoff_secs = self.backoff.as_secs(),
                        "Retryable status, backing off"
                    );
                }
                Err(e) => {
                    if attempt >= self.retries {
                        return Err(e)
                            .with_context(|| format!("{what} failed after {} attempts", attempt + 1));
                    }
                    warn!(
                        what,
                        error = %e,
                        attempt,
                        backoff_secs = self.backoff.as_secs(),
                        "Request error, backing off"
                    );
                }
            }

            attempt += 1;
            tokio::time::sleep(self.backoff).await;
        }
    }

    /// The underlying HTTP client, for requests to absolute URLs
    /// (e.g. upload hrefs handed out by the API).
    pub(crate) fn http_client(&self) -> &Client {
        &self.client
    }
}

/// Statuses worth retrying: transient server trouble and throttling.
fn retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}
