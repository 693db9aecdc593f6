//! Category listing command.

use crate::catalogue::{CatalogueClient, CatalogueFetch, CategoryLink, Discoverer, Parser};
use crate::config::{Config, OutputFormat};
use anyhow::{Context, Result};

/// Lists the categories found on the index page.
pub struct CategoriesCommand {
    config: Config,
}

impl CategoriesCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Discovers categories and returns formatted output.
    pub async fn execute(&self) -> Result<String> {
        let client = CatalogueClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(&client).await
    }

    /// Discovers categories with a provided client (for testing).
    pub async fn execute_with_client(&self, client: &impl CatalogueFetch) -> Result<String> {
        let parser = Parser::new(self.config.base_url.clone());
        let index_url = self.config.index_url()?;
        let categories = Discoverer::new(client, &parser).discover(index_url.as_str()).await?;

        match self.config.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&categories).context("Failed to serialize categories")
            }
            OutputFormat::Csv => Ok(format_table(&categories)),
        }
    }
}

fn format_table(categories: &[CategoryLink]) -> String {
    if categories.is_empty() {
        return "No categories found.".to_string();
    }

    let mut lines = Vec::with_capacity(categories.len() + 2);
    lines.push(format!("{:<28} {}", "Category", "URL"));
    lines.push(format!("{:-<28} {:-<3}", "", ""));
    for category in categories {
        lines.push(format!("{:<28} {}", category.name, category.url));
    }
    lines.join("\n")
}
