//! CSS selectors for catalogue HTML parsing.
//!
//! This file contains all CSS selectors used for parsing catalogue pages.
//! Update this file when the site changes its HTML structure.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for the index page.
pub mod index {
    use super::*;

    /// Category navigation list.
    pub static NAV_LIST: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("ul.nav-list").unwrap());

    /// Category links inside the navigation list.
    pub static CATEGORY_LINK: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("a[href]").unwrap());
}

/// Selectors for paginated category listings.
pub mod listing {
    use super::*;

    /// Product card.
    pub static PRODUCT_CARD: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("article.product_pod").unwrap());

    /// First link of a card, pointing at the detail page.
    pub static CARD_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

    /// Title link carrying the full (untruncated) title.
    pub static CARD_TITLE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("h3 a[title]").unwrap());

    /// "next" pager control.
    pub static NEXT_PAGE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("li.next a").unwrap());
}

/// Selectors for product detail pages.
pub mod product {
    use super::*;

    pub static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());

    /// Header cells of the product information table.
    pub static TABLE_HEADER: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());

    /// Marker preceding the description paragraph.
    pub static DESCRIPTION_MARKER: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div#product_description").unwrap());

    pub static BREADCRUMB_LINK: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("ul.breadcrumb a").unwrap());

    /// Anchor pointing at the top-level books category.
    pub static BOOKS_ANCHOR: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(r#"a[href="../category/books/"]"#).unwrap());

    pub static RATING: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("p.star-rating").unwrap());

    pub static IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());
}
