//! HTTP implementation of the FeedFetcher port.

use std::time::Duration;

use async_trait::async_trait;
use staysync_core::calendar::ports::FeedFetcher;
use staysync_domain::{Result, StaySyncError};
use tracing::debug;

use crate::errors::InfraError;
use crate::http::HttpClient;

/// Fetches raw feed text over plain HTTP GET.
pub struct HttpFeedFetcher {
    client: HttpClient,
}

impl HttpFeedFetcher {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Fetcher with the given per-request timeout and default retries.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self { client: HttpClient::builder().timeout(timeout).build()? })
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).await?;
        let status = response.status();

        if !status.is_success() {
            return Err(StaySyncError::Network(format!(
                "feed fetch returned status {status} for {url}"
            )));
        }

        let body = response.text().await.map_err(InfraError::from)?;
        debug!(url, bytes = body.len(), "feed fetched");

        Ok(body)
    }
}
