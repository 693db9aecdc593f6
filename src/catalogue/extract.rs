//! Product extraction, with optional image download.

use crate::catalogue::client::CatalogueFetch;
use crate::catalogue::models::ProductRecord;
use crate::catalogue::parser::Parser;
use crate::catalogue::urls;
use crate::error::status_of;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Turns product pages into records.
pub struct Extractor<'a, C: ?Sized> {
    client: &'a C,
    parser: &'a Parser,
    image_dir: Option<PathBuf>,
}

impl<'a, C: CatalogueFetch + ?Sized> Extractor<'a, C> {
    pub fn new(client: &'a C, parser: &'a Parser) -> Self {
        Self { client, parser, image_dir: None }
    }

    /// Saves each product's image into `dir` as it is extracted.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(dir.into());
        self
    }

    /// Fetches and parses one product page.
    ///
    /// Fetch failures propagate; a failed image download does not.
    pub async fn extract(&self, product_url: &str) -> Result<ProductRecord> {
        let html = self
            .client
            .page(product_url)
            .await
            .with_context(|| format!("Failed to fetch product page {}", product_url))?;

        let record = self.parser.parse_product(&html, product_url)?;
        debug!("Extracted '{}' ({})", record.title, record.upc);

        if let Some(dir) = &self.image_dir {
            if record.has_image() {
                match self.download_image(&record.image_url, dir).await {
                    Ok(path) => info!("Saved image {}", path.display()),
                    Err(e) => match status_of(&e) {
                        Some(status) => {
                            warn!("Image request for {} failed ({}), skipping", record.image_url, status)
                        }
                        None => warn!("Could not save image {}: {:#}", record.image_url, e),
                    },
                }
            }
        }

        Ok(record)
    }

    /// Downloads `image_url` into `dir` under its original file name.
    pub async fn download_image(&self, image_url: &str, dir: &Path) -> Result<PathBuf> {
        let name = urls::file_name(image_url)
            .with_context(|| format!("No file name in image URL {}", image_url))?;

        let bytes = self.client.bytes(image_url).await?;

        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;

        let path = dir.join(name);
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(path)
    }
}
