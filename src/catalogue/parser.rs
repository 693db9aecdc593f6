//! HTML parser for the index, listing, and product pages.

use crate::catalogue::models::{
    CategoryLink, ListingEntry, ListingPage, ProductRecord, NOT_AVAILABLE, UNKNOWN_CATEGORY,
};
use crate::catalogue::selectors::{index, listing, product};
use crate::catalogue::urls;
use crate::config::CategorySource;
use crate::error::ScrapeError;
use anyhow::{Context, Result};
use scraper::{ElementRef, Html};
use tracing::{debug, trace, warn};
use url::Url;

/// Characters of currency symbol in front of a price.
const PRICE_PREFIX_LEN: usize = 1;

/// Characters dropped from the availability text (`"In stock ("`).
const AVAILABILITY_PREFIX_LEN: usize = 10;

/// Characters dropped from an image src (`"../../"`).
const IMAGE_PREFIX_LEN: usize = 6;

/// Position of the category link in the breadcrumb (Home > Books > Category).
const BREADCRUMB_CATEGORY_INDEX: usize = 2;

/// Parser for catalogue HTML pages.
#[derive(Debug, Clone)]
pub struct Parser {
    base_url: Url,
    category_source: CategorySource,
}

impl Parser {
    /// Creates a new parser resolving links against `base_url`.
    pub fn new(base_url: Url) -> Self {
        Self { base_url, category_source: CategorySource::default() }
    }

    /// Selects which in-page element provides the product category.
    pub fn with_category_source(mut self, source: CategorySource) -> Self {
        self.category_source = source;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Parses the category navigation list of the index page.
    pub fn parse_categories(&self, html: &str, page_url: &str) -> Result<Vec<CategoryLink>> {
        let document = Html::parse_document(html);

        let nav = document.select(&index::NAV_LIST).next().ok_or_else(|| {
            ScrapeError::MissingElement { what: "category navigation list", url: page_url.to_string() }
        })?;

        let mut categories = Vec::new();
        for anchor in nav.select(&index::CATEGORY_LINK) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let name = anchor.text().collect::<String>().trim().to_string();
            let url = urls::join(&self.base_url, href)
                .with_context(|| format!("Bad link for category '{}'", name))?;

            trace!("Category: {} -> {}", name, url);
            categories.push(CategoryLink { name, url });
        }

        debug!("Parsed {} categories from {}", categories.len(), page_url);
        Ok(categories)
    }

    /// Parses one listing page into its product entries and next-page link.
    pub fn parse_listing(&self, html: &str, page_url: &str) -> Result<ListingPage> {
        let document = Html::parse_document(html);
        let page = Url::parse(page_url).map_err(|e| ScrapeError::InvalidUrl {
            href: page_url.to_string(),
            reason: e.to_string(),
        })?;

        let mut result = ListingPage::default();

        for card in document.select(&listing::PRODUCT_CARD) {
            match self.parse_card(card) {
                Ok(entry) => {
                    trace!("Listing entry: {}", entry.url);
                    result.entries.push(entry);
                }
                Err(e) => {
                    warn!("Skipping product card on {}: {}", page_url, e);
                }
            }
        }

        result.next_page = match document
            .select(&listing::NEXT_PAGE)
            .next()
            .and_then(|a| a.value().attr("href"))
        {
            Some(href) => Some(urls::join(&page, href)?),
            None => None,
        };

        debug!(
            "Parsed {} entries from {} (next: {})",
            result.count(),
            page_url,
            result.next_page.as_deref().unwrap_or("none")
        );

        Ok(result)
    }

    fn parse_card(&self, card: ElementRef) -> Result<ListingEntry> {
        let href = card
            .select(&listing::CARD_LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
            .context("card has no link")?;

        let url = urls::detail_url(&self.base_url, href)?;
        let title = card
            .select(&listing::CARD_TITLE)
            .next()
            .and_then(|a| a.value().attr("title"))
            .map(String::from);

        Ok(ListingEntry { url, title })
    }

    /// Parses a product detail page.
    ///
    /// Only the title is mandatory; every other field falls back to its
    /// placeholder on its own.
    pub fn parse_product(&self, html: &str, product_url: &str) -> Result<ProductRecord> {
        let document = Html::parse_document(html);

        let title = document
            .select(&product::TITLE)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string())
            .ok_or_else(|| ScrapeError::MissingElement {
                what: "product title",
                url: product_url.to_string(),
            })?;

        let mut record = ProductRecord::new(product_url, title);

        if let Some(upc) = table_value(&document, "UPC") {
            record.upc = upc;
        }
        if let Some(price) = table_value(&document, "Price (excl. tax)") {
            record.price_excluding_tax = urls::skip_chars(&price, PRICE_PREFIX_LEN).to_string();
        }
        if let Some(price) = table_value(&document, "Price (incl. tax)") {
            record.price_including_tax = urls::skip_chars(&price, PRICE_PREFIX_LEN).to_string();
        }
        if let Some(availability) = table_value(&document, "Availability") {
            record.availability_count =
                urls::skip_chars(availability.trim(), AVAILABILITY_PREFIX_LEN).to_string();
        }
        if let Some(description) = description(&document) {
            record.description = description;
        }
        if let Some(category) = self.page_category(&document) {
            record.category = category;
        }
        if let Some(rating) = rating(&document) {
            record.rating = rating;
        }
        if let Some(image_url) = self.image_url(&document) {
            record.image_url = image_url;
        }

        for (column, value) in [
            ("upc", &record.upc),
            ("number_available", &record.availability_count),
            ("review_rating", &record.rating),
            ("image_url", &record.image_url),
        ] {
            if value == NOT_AVAILABLE {
                debug!("{} missing on {}", column, product_url);
            }
        }

        Ok(record)
    }

    fn page_category(&self, document: &Html) -> Option<String> {
        let anchor = match self.category_source {
            CategorySource::Breadcrumb => {
                document.select(&product::BREADCRUMB_LINK).nth(BREADCRUMB_CATEGORY_INDEX)
            }
            CategorySource::BooksAnchor => document.select(&product::BOOKS_ANCHOR).next(),
        };

        let text = anchor?.text().collect::<String>().trim().to_string();
        if text.is_empty() {
            trace!("Empty category anchor, keeping {}", UNKNOWN_CATEGORY);
            return None;
        }
        Some(text)
    }

    fn image_url(&self, document: &Html) -> Option<String> {
        let src = document.select(&product::IMAGE).next()?.value().attr("src")?;
        let relative = urls::skip_chars(src, IMAGE_PREFIX_LEN);
        if relative.is_empty() {
            return None;
        }
        urls::join(&self.base_url, relative).ok()
    }
}

/// Text of the `td` following the `th` labelled `label`.
fn table_value(document: &Html, label: &str) -> Option<String> {
    let header = document
        .select(&product::TABLE_HEADER)
        .find(|th| th.text().collect::<String>().trim() == label)?;

    find_next(document, header, "td").map(|td| td.text().collect())
}

/// Text of the first paragraph after the description marker.
fn description(document: &Html) -> Option<String> {
    let marker = document.select(&product::DESCRIPTION_MARKER).next()?;
    find_next(document, marker, "p").map(|p| p.text().collect())
}

/// Second class token of the star-rating paragraph ("star-rating Three").
fn rating(document: &Html) -> Option<String> {
    let classes = document.select(&product::RATING).next()?.value().attr("class")?;
    classes.split_whitespace().nth(1).map(String::from)
}

/// First element named `tag` after `from` in document order.
fn find_next<'a>(document: &'a Html, from: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    let start = from.id();
    document
        .tree
        .root()
        .descendants()
        .skip_while(|node| node.id() != start)
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == tag)
}
