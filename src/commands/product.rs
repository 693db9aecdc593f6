//! Single product extraction command.

use crate::catalogue::{CatalogueClient, CatalogueFetch, Extractor, Parser};
use crate::config::{Config, OutputFormat};
use crate::output;
use anyhow::{Context, Result};
use tracing::info;
use url::Url;

/// Extracts one product page outside of any category crawl.
pub struct ProductCommand {
    config: Config,
}

impl ProductCommand {
    /// Creates a new product command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches a product page and returns formatted output.
    pub async fn execute(&self, product_url: &str) -> Result<String> {
        let client = CatalogueClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(&client, product_url).await
    }

    /// Fetches a product with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl CatalogueFetch,
        product_url: &str,
    ) -> Result<String> {
        let product_url = self.resolve(product_url)?;
        info!("Extracting product: {}", product_url);

        let parser =
            Parser::new(self.config.base_url.clone()).with_category_source(self.config.category_source);
        let record = Extractor::new(client, &parser).extract(&product_url).await?;

        match self.config.format {
            OutputFormat::Csv => output::csv_string(std::slice::from_ref(&record)),
            OutputFormat::Json => {
                serde_json::to_string_pretty(&record).context("Failed to serialize product")
            }
        }
    }

    /// Accepts absolute URLs or paths relative to the base URL.
    fn resolve(&self, product_url: &str) -> Result<String> {
        let trimmed = product_url.trim();
        if trimmed.is_empty() {
            anyhow::bail!("Product URL is empty");
        }

        let url = match Url::parse(trimmed) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .config
                .base_url
                .join(trimmed)
                .with_context(|| format!("Invalid product URL: '{}'", trimmed))?,
            Err(e) => anyhow::bail!("Invalid product URL '{}': {}", trimmed, e),
        };

        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("Invalid product URL '{}': only http(s) is supported", trimmed);
        }
        Ok(url.into())
    }
}
