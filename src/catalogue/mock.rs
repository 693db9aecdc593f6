//! In-memory `CatalogueFetch` serving canned pages.

use crate::catalogue::client::CatalogueFetch;
use crate::error::ScrapeError;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Mock catalogue keyed by absolute URL. Unknown URLs answer 404.
#[derive(Default)]
pub struct MockCatalogue {
    pages: HashMap<String, String>,
    assets: HashMap<String, (u16, Vec<u8>)>,
    failing: HashMap<String, u16>,
    requests: Mutex<Vec<String>>,
}

impl MockCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    pub fn asset(mut self, url: &str, status: u16, body: &[u8]) -> Self {
        self.assets.insert(url.to_string(), (status, body.to_vec()));
        self
    }

    /// Makes `url` answer with `status`.
    pub fn failing(mut self, url: &str, status: u16) -> Self {
        self.failing.insert(url.to_string(), status);
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, url: &str) {
        self.requests.lock().unwrap().push(url.to_string());
    }

    fn status_error(url: &str, status: u16) -> anyhow::Error {
        ScrapeError::Status { url: url.to_string(), status }.into()
    }
}

#[async_trait]
impl CatalogueFetch for MockCatalogue {
    async fn page(&self, url: &str) -> Result<String> {
        self.record(url);
        if let Some(status) = self.failing.get(url) {
            return Err(Self::status_error(url, *status));
        }
        self.pages.get(url).cloned().ok_or_else(|| Self::status_error(url, 404))
    }

    async fn bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.record(url);
        match self.assets.get(url) {
            Some((200, body)) => Ok(body.clone()),
            Some((status, _)) => Err(Self::status_error(url, *status)),
            None => Err(Self::status_error(url, 404)),
        }
    }
}

/// Product page with every field present.
pub fn product_page(title: &str, upc: &str, rating: &str, image_src: &str) -> String {
    format!(
        r#"<html><body>
            <ul class="breadcrumb">
                <li><a href="../../index.html">Home</a></li>
                <li><a href="../category/books_1/index.html">Books</a></li>
                <li><a href="../category/books/poetry_23/index.html">Poetry</a></li>
                <li class="active">{title}</li>
            </ul>
            <div class="item active"><img src="{image_src}" alt="{title}" /></div>
            <h1>{title}</h1>
            <p class="star-rating {rating}"></p>
            <div id="product_description"><h2>Product Description</h2></div>
            <p>About {title}.</p>
            <table>
                <tr><th>UPC</th><td>{upc}</td></tr>
                <tr><th>Price (excl. tax)</th><td>£10.00</td></tr>
                <tr><th>Price (incl. tax)</th><td>£12.00</td></tr>
                <tr><th>Availability</th><td>In stock (5 available)</td></tr>
            </table>
        </body></html>"#
    )
}

/// Listing page with one card per href and an optional next link.
pub fn listing_page(hrefs: &[&str], next: Option<&str>) -> String {
    let mut html = String::from("<html><body><ol class=\"row\">");
    for href in hrefs {
        html.push_str(&format!(
            r#"<li><article class="product_pod"><a href="{href}"><img src="x.jpg"></a><h3><a href="{href}" title="{href}">t</a></h3></article></li>"#
        ));
    }
    html.push_str("</ol>");
    if let Some(next) = next {
        html.push_str(&format!(r#"<ul class="pager"><li class="next"><a href="{next}">next</a></li></ul>"#));
    }
    html.push_str("</body></html>");
    html
}
