//! HTTP client with built-in timeout and retry support.

use std::time::Duration;

use reqwest::{Client as ReqwestClient, Response};
use staysync_domain::StaySyncError;
use tracing::debug;

use crate::errors::InfraError;

/// HTTP client wrapper applying a request timeout and bounded retries with
/// exponential backoff on transient failures.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Issue a GET request with retry semantics.
    ///
    /// Server errors (5xx) and transient network failures are retried up to
    /// the configured attempt budget; client errors are returned as-is for
    /// the caller to interpret.
    pub async fn get(&self, url: &str) -> Result<Response, StaySyncError> {
        let attempts = self.max_attempts.max(1);
        let mut last_error: Option<StaySyncError> = None;

        for attempt in 1..=attempts {
            debug!(attempt, url, "sending HTTP request");

            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, url, %status, "received HTTP response");

                    if status.is_server_error() && attempt < attempts {
                        self.sleep_with_backoff(attempt).await;
                        continue;
                    }

                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt, url, error = %err, "HTTP request failed");
                    let retryable = err.is_timeout() || err.is_connect() || err.is_request();
                    let converted: StaySyncError = InfraError::from(err).into();

                    if attempt < attempts && retryable {
                        last_error = Some(converted);
                        self.sleep_with_backoff(attempt).await;
                        continue;
                    }

                    return Err(converted);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            StaySyncError::Internal("http client exhausted retries without a result".into())
        }))
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        let delay = self.base_backoff.saturating_mul(1 << shift);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn build(self) -> Result<HttpClient, StaySyncError> {
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| StaySyncError::from(InfraError::from(err)))?;

        Ok(HttpClient {
            client,
            max_attempts: self.max_attempts,
            base_backoff: self.base_backoff,
        })
    }
}
