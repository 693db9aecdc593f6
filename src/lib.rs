//! books-crawler - category-by-category product crawler for the
//! books.toscrape.com catalogue.
//!
//! Discovers the categories on the index page, walks each category's
//! paginated listing, extracts every product page into a flat record, and
//! writes one CSV (or JSON) file per category.

pub mod catalogue;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use catalogue::models::{CategoryLink, ListingEntry, ProductRecord};
pub use config::Config;
pub use error::ScrapeError;
