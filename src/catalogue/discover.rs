//! Category discovery from the index navigation list.

use crate::catalogue::client::CatalogueFetch;
use crate::catalogue::models::CategoryLink;
use crate::catalogue::parser::Parser;
use anyhow::{Context, Result};
use tracing::info;

/// Reads the category list once per run.
pub struct Discoverer<'a, C: ?Sized> {
    client: &'a C,
    parser: &'a Parser,
}

impl<'a, C: CatalogueFetch + ?Sized> Discoverer<'a, C> {
    pub fn new(client: &'a C, parser: &'a Parser) -> Self {
        Self { client, parser }
    }

    /// Fetches `index_url` and returns every category in navigation order.
    ///
    /// A page without the navigation list is an error: nothing can be
    /// crawled without it.
    pub async fn discover(&self, index_url: &str) -> Result<Vec<CategoryLink>> {
        let html = self
            .client
            .page(index_url)
            .await
            .with_context(|| format!("Failed to fetch index page {}", index_url))?;

        let categories = self.parser.parse_categories(&html, index_url)?;
        info!("Discovered {} categories", categories.len());
        Ok(categories)
    }
}
