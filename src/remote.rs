//! HTTP probing and fetching
//!
//! [`RemoteClient`] exposes the two network primitives the pipeline needs: a bounded-timeout
//! reachability probe that never downloads a body, and an unbounded full-content fetch that
//! retries transient failures.

use crate::config::{NetworkConfig, RetryConfig};
use crate::error::{AssetError, Error, Result};
use crate::retry::fetch_with_retry;
use crate::utils::url_host;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// HTTP client shared by every probe and fetch of a build
#[derive(Clone, Debug)]
pub struct RemoteClient {
    http: reqwest::Client,
    probe_timeout: Duration,
    retry: RetryConfig,
    known_forges: Vec<String>,
}

impl RemoteClient {
    /// Create a client from the network configuration
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            probe_timeout: config.probe_timeout,
            retry: config.retry.clone(),
            known_forges: config
                .known_forges
                .iter()
                .map(|h| h.trim().to_ascii_lowercase())
                .collect(),
        })
    }

    /// Whether the URL is hosted on one of the configured forges
    pub fn is_known_forge(&self, url: &str) -> bool {
        url_host(url).is_some_and(|host| {
            self.known_forges
                .iter()
                .any(|forge| host == *forge || host.ends_with(&format!(".{forge}")))
        })
    }

    /// Check that a URL exists without downloading it
    ///
    /// Issues a single `HEAD` request bounded by the probe timeout.
    ///
    /// # Errors
    /// - [`AssetError::NotFound`] when the server answers 404 or 410
    /// - [`AssetError::HttpStatus`] for any other non-success status
    /// - [`AssetError::Unreachable`] when the request itself fails or times out
    pub async fn probe(&self, url: &str) -> std::result::Result<(), AssetError> {
        let response = self
            .http
            .head(url)
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(|source| AssetError::Unreachable {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        debug!(url = %url, status = %status, "Probed remote resource");
        classify_status(url, status)
    }

    /// Download the full body of a URL, retrying transient failures
    ///
    /// Fetches have no timeout; only probes are bounded.
    pub async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, AssetError> {
        fetch_with_retry(&self.retry, || self.fetch_once(url)).await
    }

    async fn fetch_once(&self, url: &str) -> std::result::Result<Vec<u8>, AssetError> {
        let unreachable = |source| AssetError::Unreachable {
            url: url.to_string(),
            source,
        };

        let response = self.http.get(url).send().await.map_err(unreachable)?;
        classify_status(url, response.status())?;

        let body = response.bytes().await.map_err(unreachable)?;
        debug!(url = %url, bytes = body.len(), "Fetched remote resource");
        Ok(body.to_vec())
    }
}

fn classify_status(url: &str, status: StatusCode) -> std::result::Result<(), AssetError> {
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
        Err(AssetError::NotFound {
            url: url.to_string(),
        })
    } else {
        Err(AssetError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}
