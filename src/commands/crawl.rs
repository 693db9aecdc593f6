//! Crawl command: every category, every page, every product.

use crate::catalogue::{
    CatalogueClient, CatalogueFetch, CategoryLink, Discoverer, Extractor, Paginator, Parser,
};
use crate::config::Config;
use crate::error::ScrapeError;
use crate::output::CategoryWriter;
use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Outcome of one category.
#[derive(Debug, Clone)]
pub struct CategoryReport {
    pub name: String,
    pub url: String,
    /// Listing pages walked
    pub pages: usize,
    /// Records written
    pub products: usize,
    /// Products dropped after a fetch/parse failure
    pub skipped: usize,
    /// Written file, `None` if the category produced no output
    pub output: Option<PathBuf>,
    /// Why the category has no output
    pub error: Option<String>,
}

impl CategoryReport {
    fn failed(category: &CategoryLink, error: &anyhow::Error) -> Self {
        Self {
            name: category.name.clone(),
            url: category.url.clone(),
            pages: 0,
            products: 0,
            skipped: 0,
            output: None,
            error: Some(format!("{:#}", error)),
        }
    }
}

/// Per-category results of a run, in crawl order.
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    pub categories: Vec<CategoryReport>,
}

impl CrawlSummary {
    pub fn total_products(&self) -> usize {
        self.categories.iter().map(|c| c.products).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.categories.iter().map(|c| c.skipped).sum()
    }

    /// Categories without an output file.
    pub fn failed(&self) -> impl Iterator<Item = &CategoryReport> {
        self.categories.iter().filter(|c| c.output.is_none())
    }
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<28} {:>6} {:>9} {:>8}  {}", "Category", "Pages", "Products", "Skipped", "Output")?;
        writeln!(f, "{:-<28} {:->6} {:->9} {:->8}  {:-<6}", "", "", "", "", "")?;

        for report in &self.categories {
            let output = match (&report.output, &report.error) {
                (Some(path), _) => path.display().to_string(),
                (None, Some(err)) => format!("FAILED: {}", err),
                (None, None) => "FAILED".to_string(),
            };
            writeln!(
                f,
                "{:<28} {:>6} {:>9} {:>8}  {}",
                report.name, report.pages, report.products, report.skipped, output
            )?;
        }

        write!(
            f,
            "\n{} products in {} categories ({} skipped)",
            self.total_products(),
            self.categories.len(),
            self.total_skipped()
        )
    }
}

/// Drives discovery, pagination, extraction, and output for a whole run.
pub struct CrawlCommand {
    config: Config,
}

impl CrawlCommand {
    /// Creates a new crawl command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Crawls the configured site.
    pub async fn execute(&self) -> Result<CrawlSummary> {
        let client = CatalogueClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(&client).await
    }

    /// Crawls with a provided client (for testing).
    pub async fn execute_with_client(&self, client: &impl CatalogueFetch) -> Result<CrawlSummary> {
        let parser = self.parser();
        let index_url = self.config.index_url()?;

        let categories = Discoverer::new(client, &parser).discover(index_url.as_str()).await?;
        let selected: Vec<CategoryLink> =
            categories.into_iter().filter(|c| self.config.wants_category(&c.name)).collect();

        if selected.is_empty() && !self.config.categories.is_empty() {
            warn!("No category matches {:?}", self.config.categories);
        }

        self.run(client, &selected).await
    }

    /// Crawls `categories` in order, writing one file each.
    pub async fn run(
        &self,
        client: &impl CatalogueFetch,
        categories: &[CategoryLink],
    ) -> Result<CrawlSummary> {
        let parser = self.parser();
        let writer = CategoryWriter::new(&self.config.output_dir, self.config.format)
            .nested(self.config.download_images);

        let mut summary = CrawlSummary::default();

        for (i, category) in categories.iter().enumerate() {
            info!("[{}/{}] Crawling category {}", i + 1, categories.len(), category.name);

            match self.crawl_category(client, &parser, &writer, category).await {
                Ok(report) => summary.categories.push(report),
                Err(e) if self.config.skip_failed => {
                    warn!("Skipping category {}: {:#}", category.name, e);
                    summary.categories.push(CategoryReport::failed(category, &e));
                }
                Err(e) => return Err(e.context(format!("Crawl aborted in category '{}'", category.name))),
            }
        }

        info!(
            "Crawled {} products across {} categories",
            summary.total_products(),
            summary.categories.len()
        );
        Ok(summary)
    }

    async fn crawl_category(
        &self,
        client: &impl CatalogueFetch,
        parser: &Parser,
        writer: &CategoryWriter,
        category: &CategoryLink,
    ) -> Result<CategoryReport> {
        let mut extractor = Extractor::new(client, parser);
        if self.config.download_images {
            extractor = extractor.with_image_dir(writer.directory_for(category));
        }

        let mut paginator = Paginator::new(client, parser, category.url.clone());
        let mut records = Vec::new();
        let mut skipped = 0;

        while let Some(entry) = paginator.next_entry().await? {
            match extractor.extract(&entry.url).await {
                Ok(mut record) => {
                    let in_page = record.assign_category(category);
                    if in_page != category.name {
                        debug!(
                            "In-page category '{}' differs from '{}' for {}",
                            in_page, category.name, entry.url
                        );
                    }
                    info!("{} - {}", category.name, record.title);
                    records.push(record);
                }
                Err(e) if self.config.skip_failed => {
                    let transient = e
                        .chain()
                        .find_map(|cause| cause.downcast_ref::<ScrapeError>())
                        .is_some_and(ScrapeError::is_transient);
                    warn!("Skipping product {} (transient: {}): {:#}", entry.url, transient, e);
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        let (output, error) = match writer.write(category, &records) {
            Ok(path) => {
                info!("Wrote {} products to {}", records.len(), path.display());
                (Some(path), None)
            }
            Err(e) => {
                error!("Could not write output for {}: {:#}", category.name, e);
                (None, Some(format!("{:#}", e)))
            }
        };

        Ok(CategoryReport {
            name: category.name.clone(),
            url: category.url.clone(),
            pages: paginator.pages_fetched(),
            products: records.len(),
            skipped,
            output,
            error,
        })
    }

    fn parser(&self) -> Parser {
        Parser::new(self.config.base_url.clone()).with_category_source(self.config.category_source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::mock::{listing_page, product_page, MockCatalogue};
    use crate::output::read_csv_file;
    use tempfile::TempDir;

    const BASE: &str = "http://books.toscrape.com/";
    const INDEX: &str = "http://books.toscrape.com/index.html";
    const POETRY: &str = "http://books.toscrape.com/catalogue/category/books/poetry_23/index.html";
    const POETRY_2: &str = "http://books.toscrape.com/catalogue/category/books/poetry_23/page-2.html";
    const TRAVEL: &str = "http://books.toscrape.com/catalogue/category/books/travel_2/index.html";

    fn detail(slug: &str) -> String {
        format!("{}catalogue/{}/index.html", BASE, slug)
    }

    fn index_html() -> &'static str {
        r#"<ul class="nav nav-list">
            <li><a href="catalogue/category/books/poetry_23/index.html">
                Poetry
            </a></li>
            <li><a href="catalogue/category/books/travel_2/index.html">
                Travel
            </a></li>
        </ul>"#
    }

    fn make_test_config(output_dir: &std::path::Path) -> Config {
        Config { output_dir: output_dir.to_path_buf(), ..Config::default() }
    }

    /// Two poetry pages (three books), one travel page (one book).
    fn make_site() -> MockCatalogue {
        MockCatalogue::new()
            .page(INDEX, index_html())
            .page(
                POETRY,
                listing_page(
                    &["../../../a-light_1/index.html", "../../tipping_2/index.html"],
                    Some("page-2.html"),
                ),
            )
            .page(POETRY_2, listing_page(&["../../../olio_3/index.html"], None))
            .page(TRAVEL, listing_page(&["../../../himalayas_4/index.html"], None))
            .page(&detail("a-light_1"), product_page("A Light", "u1", "Three", "../../media/a.jpg"))
            .page(&detail("tipping_2"), product_page("Tipping", "u2", "One", "../../media/b.jpg"))
            .page(&detail("olio_3"), product_page("Olio", "u3", "Five", "../../media/c.jpg"))
            .page(&detail("himalayas_4"), product_page("Himalayas", "u4", "Two", "../../media/d.jpg"))
    }

    #[tokio::test]
    async fn test_crawl_writes_one_file_per_category() {
        let tmp = TempDir::new().unwrap();
        let client = make_site();
        let cmd = CrawlCommand::new(make_test_config(tmp.path()));

        let summary = cmd.execute_with_client(&client).await.unwrap();

        assert_eq!(summary.categories.len(), 2);
        assert_eq!(summary.total_products(), 4);
        assert_eq!(summary.categories[0].pages, 2);

        let poetry = read_csv_file(&tmp.path().join("Poetry.csv")).unwrap();
        let titles: Vec<_> = poetry.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A Light", "Tipping", "Olio"]);

        let travel = read_csv_file(&tmp.path().join("Travel.csv")).unwrap();
        assert_eq!(travel.len(), 1);
        assert_eq!(travel[0].product_page_url, detail("himalayas_4"));
    }

    #[tokio::test]
    async fn test_category_is_assigned_from_enclosing_category() {
        let tmp = TempDir::new().unwrap();
        let client = make_site();
        let cmd = CrawlCommand::new(make_test_config(tmp.path()));

        cmd.execute_with_client(&client).await.unwrap();

        // The product pages' breadcrumbs all say "Poetry".
        let travel = read_csv_file(&tmp.path().join("Travel.csv")).unwrap();
        assert!(travel.iter().all(|r| r.category == "Travel"));
        assert!(travel.iter().all(|r| r.category_url == TRAVEL));

        let poetry = read_csv_file(&tmp.path().join("Poetry.csv")).unwrap();
        assert!(poetry.iter().all(|r| r.category == "Poetry" && r.category_url == POETRY));
    }

    #[tokio::test]
    async fn test_request_order_is_sequential() {
        let tmp = TempDir::new().unwrap();
        let client = make_site();
        let cmd = CrawlCommand::new(make_test_config(tmp.path()));

        cmd.execute_with_client(&client).await.unwrap();

        assert_eq!(
            client.requests(),
            vec![
                INDEX.to_string(),
                POETRY.to_string(),
                detail("a-light_1"),
                detail("tipping_2"),
                POETRY_2.to_string(),
                detail("olio_3"),
                TRAVEL.to_string(),
                detail("himalayas_4"),
            ]
        );
    }

    #[tokio::test]
    async fn test_category_filter() {
        let tmp = TempDir::new().unwrap();
        let client = make_site();
        let mut config = make_test_config(tmp.path());
        config.categories = vec!["travel".to_string()];

        let summary = CrawlCommand::new(config).execute_with_client(&client).await.unwrap();

        assert_eq!(summary.categories.len(), 1);
        assert_eq!(summary.categories[0].name, "Travel");
        assert!(!tmp.path().join("Poetry.csv").exists());
    }

    #[tokio::test]
    async fn test_product_failure_aborts_by_default() {
        let tmp = TempDir::new().unwrap();
        let client = make_site().failing(&detail("tipping_2"), 500);
        let cmd = CrawlCommand::new(make_test_config(tmp.path()));

        let err = cmd.execute_with_client(&client).await.unwrap_err();
        assert!(err.to_string().contains("Poetry"));
        assert!(!tmp.path().join("Poetry.csv").exists());
    }

    #[tokio::test]
    async fn test_product_failure_skipped_when_configured() {
        let tmp = TempDir::new().unwrap();
        let client = make_site().failing(&detail("tipping_2"), 500);
        let mut config = make_test_config(tmp.path());
        config.skip_failed = true;

        let summary = CrawlCommand::new(config).execute_with_client(&client).await.unwrap();

        assert_eq!(summary.categories[0].products, 2);
        assert_eq!(summary.categories[0].skipped, 1);
        assert_eq!(summary.total_skipped(), 1);
        let poetry = read_csv_file(&tmp.path().join("Poetry.csv")).unwrap();
        assert_eq!(poetry.len(), 2);
    }

    #[tokio::test]
    async fn test_listing_failure_skips_category_when_configured() {
        let tmp = TempDir::new().unwrap();
        let client = make_site().failing(POETRY_2, 404);
        let mut config = make_test_config(tmp.path());
        config.skip_failed = true;

        let summary = CrawlCommand::new(config).execute_with_client(&client).await.unwrap();

        let failed: Vec<_> = summary.failed().map(|c| c.name.as_str()).collect();
        assert_eq!(failed, vec!["Poetry"]);
        assert!(tmp.path().join("Travel.csv").exists());
    }

    #[tokio::test]
    async fn test_missing_nav_list_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let client = MockCatalogue::new().page(INDEX, "<html><body></body></html>");
        let mut config = make_test_config(tmp.path());
        config.skip_failed = true;

        let err = CrawlCommand::new(config).execute_with_client(&client).await.unwrap_err();
        assert!(err.to_string().contains("navigation list"));
    }

    #[tokio::test]
    async fn test_write_failure_only_affects_its_category() {
        let tmp = TempDir::new().unwrap();
        // A directory where Poetry.csv should go makes File::create fail.
        std::fs::create_dir_all(tmp.path().join("Poetry.csv")).unwrap();
        let client = make_site();
        let cmd = CrawlCommand::new(make_test_config(tmp.path()));

        let summary = cmd.execute_with_client(&client).await.unwrap();

        assert!(summary.categories[0].output.is_none());
        assert!(summary.categories[0].error.is_some());
        assert!(summary.categories[1].output.is_some());
    }

    #[tokio::test]
    async fn test_images_nested_per_category() {
        let tmp = TempDir::new().unwrap();
        let client = make_site()
            .asset(&format!("{}media/d.jpg", BASE), 200, b"d")
            .asset(&format!("{}media/a.jpg", BASE), 404, b"");
        let mut config = make_test_config(tmp.path());
        config.download_images = true;

        let summary = CrawlCommand::new(config).execute_with_client(&client).await.unwrap();

        assert_eq!(summary.total_products(), 4);
        assert!(tmp.path().join("Travel").join("Travel.csv").exists());
        assert_eq!(std::fs::read(tmp.path().join("Travel").join("d.jpg")).unwrap(), b"d");
        assert!(!tmp.path().join("Poetry").join("a.jpg").exists());
        assert!(tmp.path().join("Poetry").join("Poetry.csv").exists());
    }

    #[tokio::test]
    async fn test_rerun_is_byte_identical() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();

        CrawlCommand::new(make_test_config(first.path()))
            .execute_with_client(&make_site())
            .await
            .unwrap();
        CrawlCommand::new(make_test_config(second.path()))
            .execute_with_client(&make_site())
            .await
            .unwrap();

        for name in ["Poetry.csv", "Travel.csv"] {
            let a = std::fs::read(first.path().join(name)).unwrap();
            let b = std::fs::read(second.path().join(name)).unwrap();
            assert_eq!(a, b, "{} differs between runs", name);
        }
    }

    #[test]
    fn test_summary_display() {
        let summary = CrawlSummary {
            categories: vec![
                CategoryReport {
                    name: "Poetry".to_string(),
                    url: POETRY.to_string(),
                    pages: 1,
                    products: 19,
                    skipped: 0,
                    output: Some(PathBuf::from("Poetry.csv")),
                    error: None,
                },
                CategoryReport::failed(
                    &CategoryLink::new("Travel", TRAVEL),
                    &anyhow::anyhow!("boom"),
                ),
            ],
        };

        let text = summary.to_string();
        assert!(text.contains("Poetry.csv"));
        assert!(text.contains("FAILED: boom"));
        assert!(text.contains("19 products in 2 categories (0 skipped)"));
    }
}
