//! Link normalization for catalogue hrefs.
//!
//! Listing pages link to detail pages with hrefs climbing a varying number of
//! directories (`../../../slug_1/index.html` from a category page,
//! `../../slug_1/index.html` from shallower pages). All detail pages live
//! under `<base>catalogue/`, so the climb is stripped and the remainder
//! re-rooted there.

use crate::error::ScrapeError;
use url::Url;

/// Directory holding every product detail page.
pub const CATALOGUE_DIR: &str = "catalogue/";

const PARENT: &str = "../";

/// Length of the leading run of `../` segments in `href`.
pub fn parent_prefix_len(href: &str) -> usize {
    let mut rest = href;
    let mut len = 0;
    while let Some(stripped) = rest.strip_prefix(PARENT) {
        rest = stripped;
        len += PARENT.len();
    }
    len
}

/// Maps a product-card href to the absolute detail-page URL.
pub fn detail_url(base: &Url, href: &str) -> Result<String, ScrapeError> {
    let href = href.trim();
    let rest = &href[parent_prefix_len(href)..];
    let rest = rest.strip_prefix('/').unwrap_or(rest);

    let path = if rest.starts_with(CATALOGUE_DIR) {
        rest.to_string()
    } else {
        format!("{}{}", CATALOGUE_DIR, rest)
    };

    join(base, &path)
}

/// Resolves `href` against `page` the way a browser would.
pub fn join(page: &Url, href: &str) -> Result<String, ScrapeError> {
    page.join(href.trim()).map(String::from).map_err(|e| ScrapeError::InvalidUrl {
        href: href.to_string(),
        reason: e.to_string(),
    })
}

/// Drops the first `n` characters (not bytes) of `text`.
pub fn skip_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[idx..],
        None => "",
    }
}

/// Last path segment of `url`, used as the on-disk image name.
pub fn file_name(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let name = parsed.path_segments()?.next_back()?;
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
