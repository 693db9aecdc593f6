//! Lazy walk over a category's paginated listing.

use crate::catalogue::client::CatalogueFetch;
use crate::catalogue::models::ListingEntry;
use crate::catalogue::parser::Parser;
use anyhow::{Context, Result};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, warn};

/// Yields listing entries page by page, fetching the next page only once
/// the current one is drained.
///
/// Single pass: once exhausted it stays exhausted. Build a new paginator to
/// walk the category again.
pub struct Paginator<'a, C: ?Sized> {
    client: &'a C,
    parser: &'a Parser,
    next_url: Option<String>,
    buffered: VecDeque<ListingEntry>,
    visited: HashSet<String>,
}

impl<'a, C: CatalogueFetch + ?Sized> Paginator<'a, C> {
    /// Starts a walk at the category's first listing page.
    pub fn new(client: &'a C, parser: &'a Parser, start_url: impl Into<String>) -> Self {
        Self {
            client,
            parser,
            next_url: Some(start_url.into()),
            buffered: VecDeque::new(),
            visited: HashSet::new(),
        }
    }

    /// Returns the next entry, or `None` once the last page is drained.
    pub async fn next_entry(&mut self) -> Result<Option<ListingEntry>> {
        loop {
            if let Some(entry) = self.buffered.pop_front() {
                return Ok(Some(entry));
            }

            let Some(url) = self.next_url.take() else {
                return Ok(None);
            };

            if !self.visited.insert(url.clone()) {
                warn!("Listing page {} already visited, stopping pagination", url);
                return Ok(None);
            }

            let html = self
                .client
                .page(&url)
                .await
                .with_context(|| format!("Failed to fetch listing page {}", url))?;
            let page = self.parser.parse_listing(&html, &url)?;

            debug!("Listing page {} holds {} products", self.visited.len(), page.count());
            self.buffered.extend(page.entries);
            self.next_url = page.next_page;
        }
    }

    /// Drains the walk into a vector.
    pub async fn collect(mut self) -> Result<Vec<ListingEntry>> {
        let mut entries = Vec::new();
        while let Some(entry) = self.next_entry().await? {
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Number of listing pages fetched so far.
    pub fn pages_fetched(&self) -> usize {
        self.visited.len()
    }
}
