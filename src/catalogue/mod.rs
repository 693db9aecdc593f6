//! Catalogue-specific modules: HTTP client, parsing, data models, and the
//! discover / paginate / extract pipeline stages.

pub mod client;
pub mod discover;
pub mod extract;
pub mod models;
pub mod paginate;
pub mod parser;
pub mod selectors;
pub mod urls;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{CatalogueClient, CatalogueFetch};
pub use discover::Discoverer;
pub use extract::Extractor;
pub use models::{CategoryLink, ListingEntry, ListingPage, ProductRecord, COLUMNS, NOT_AVAILABLE};
pub use paginate::Paginator;
pub use parser::Parser;
