//! HTTP client for catalogue requests.

use crate::config::Config;
use crate::error::ScrapeError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use wreq::Client;

/// Trait for page/asset fetching - enables mocking for tests.
#[async_trait]
pub trait CatalogueFetch: Send + Sync {
    /// Fetches an HTML page and returns its body.
    async fn page(&self, url: &str) -> Result<String>;

    /// Fetches a binary asset (product image).
    async fn bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// Catalogue HTTP client. Requests are issued one at a time and never retried.
pub struct CatalogueClient {
    client: Client,
}

impl CatalogueClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self { client })
    }

    /// Sends a GET and fails on anything but a 2xx status.
    async fn get(&self, url: &str, accept: &str) -> Result<wreq::Response> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", accept)
            .header("Accept-Language", "en-GB,en;q=0.9")
            .header("User-Agent", concat!("books-crawler/", env!("CARGO_PKG_VERSION")))
            .send()
            .await
            .map_err(|e| ScrapeError::Transport { url: url.to_string(), reason: e.to_string() })?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            let err = ScrapeError::Status { url: url.to_string(), status: status.as_u16() };
            if err.is_transient() {
                warn!("Server-side failure for {} ({}); not retrying", url, status);
            }
            return Err(err.into());
        }

        Ok(response)
    }
}

#[async_trait]
impl CatalogueFetch for CatalogueClient {
    async fn page(&self, url: &str) -> Result<String> {
        let response =
            self.get(url, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8").await?;
        response.text().await.context("Failed to read response body")
    }

    async fn bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url, "image/avif,image/webp,image/*,*/*;q=0.8").await?;
        let body = response.bytes().await.context("Failed to read response body")?;
        Ok(body.to_vec())
    }
}
