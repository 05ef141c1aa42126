//! Network access for the offline cache

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};

use super::response::AssetResponse;

/// Anything that can fetch a URL from the network
pub trait Fetcher: Send + Sync {
    /// Fetch `url`. Non-2xx statuses are responses, not errors; only
    /// transport failures are reported as `Err`.
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<AssetResponse, FetchError>> + Send;
}

/// reqwest-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("glass-player/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<AssetResponse, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?
            .to_vec();

        tracing::debug!("Fetched {} ({}, {} bytes)", url, status, body.len());

        Ok(AssetResponse {
            url: url.to_string(),
            status,
            headers,
            body,
        })
    }
}

/// Fetch errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport failure (offline, DNS, timeout, ...)
    Network(String),
    /// Request path could not be resolved to a URL
    InvalidUrl(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network(e) => write!(f, "Network error: {}", e),
            FetchError::InvalidUrl(e) => write!(f, "Invalid URL: {}", e),
        }
    }
}

impl std::error::Error for FetchError {}
