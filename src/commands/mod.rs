//! CLI command implementations.

pub mod categories;
pub mod crawl;
pub mod product;

pub use categories::CategoriesCommand;
pub use crawl::{CategoryReport, CrawlCommand, CrawlSummary};
pub use product::ProductCommand;
