//! Data models for catalogue products, categories, and listing entries.

use serde::{Deserialize, Serialize};

/// Placeholder stored in a field whose element was missing or malformed.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for the in-page category when neither source element exists.
pub const UNKNOWN_CATEGORY: &str = "Unknown category";

/// Output columns, in file order.
pub const COLUMNS: [&str; 11] = [
    "product_page_url",
    "upc",
    "title",
    "price_including_tax",
    "price_excluding_tax",
    "number_available",
    "product_description",
    "category",
    "review_rating",
    "image_url",
    "category_url",
];

/// One product detail page, flattened.
///
/// Every field is always populated: either with the extracted text or with
/// [`NOT_AVAILABLE`] (or [`UNKNOWN_CATEGORY`] for `category`). Field order
/// matches [`COLUMNS`] so the record serializes straight into a CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_page_url: String,
    pub upc: String,
    pub title: String,
    pub price_including_tax: String,
    pub price_excluding_tax: String,
    #[serde(rename = "number_available")]
    pub availability_count: String,
    #[serde(rename = "product_description")]
    pub description: String,
    pub category: String,
    #[serde(rename = "review_rating")]
    pub rating: String,
    pub image_url: String,
    pub category_url: String,
}

impl ProductRecord {
    /// Creates a record for `product_page_url` with every other field set to
    /// its placeholder.
    pub fn new(product_page_url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            product_page_url: product_page_url.into(),
            upc: NOT_AVAILABLE.to_string(),
            title: title.into(),
            price_including_tax: NOT_AVAILABLE.to_string(),
            price_excluding_tax: NOT_AVAILABLE.to_string(),
            availability_count: NOT_AVAILABLE.to_string(),
            description: NOT_AVAILABLE.to_string(),
            category: UNKNOWN_CATEGORY.to_string(),
            rating: NOT_AVAILABLE.to_string(),
            image_url: NOT_AVAILABLE.to_string(),
            category_url: NOT_AVAILABLE.to_string(),
        }
    }

    /// Overwrites the category fields with the enclosing category.
    ///
    /// Returns the in-page category that was replaced.
    pub fn assign_category(&mut self, category: &CategoryLink) -> String {
        self.category_url = category.url.clone();
        std::mem::replace(&mut self.category, category.name.clone())
    }

    /// Star count for the ordinal rating label ("One" to "Five").
    pub fn stars(&self) -> Option<u8> {
        match self.rating.as_str() {
            "One" => Some(1),
            "Two" => Some(2),
            "Three" => Some(3),
            "Four" => Some(4),
            "Five" => Some(5),
            _ => None,
        }
    }

    /// Returns true when the image URL was resolved.
    pub fn has_image(&self) -> bool {
        self.image_url != NOT_AVAILABLE
    }

    /// Values in [`COLUMNS`] order.
    pub fn values(&self) -> [&str; 11] {
        [
            &self.product_page_url,
            &self.upc,
            &self.title,
            &self.price_including_tax,
            &self.price_excluding_tax,
            &self.availability_count,
            &self.description,
            &self.category,
            &self.rating,
            &self.image_url,
            &self.category_url,
        ]
    }
}

/// A category from the index navigation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLink {
    /// Display name, whitespace-trimmed
    pub name: String,
    /// Absolute URL of the first listing page
    pub url: String,
}

impl CategoryLink {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self { name: name.into(), url: url.into() }
    }
}

/// A product card found on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Absolute detail-page URL
    pub url: String,
    /// Full title from the card, when present
    pub title: Option<String>,
}

/// One parsed listing page.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    /// Cards in document order
    pub entries: Vec<ListingEntry>,
    /// Absolute URL of the following page
    pub next_page: Option<String>,
}

impl ListingPage {
    /// Returns number of entries.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the page had no product cards.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
