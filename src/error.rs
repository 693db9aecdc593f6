//! Typed errors for conditions callers branch on.
//!
//! Everything else travels as `anyhow::Error`; these variants are wrapped in
//! it and recovered with `downcast_ref` where a policy decision is needed.

use thiserror::Error;

/// Failure while fetching or interpreting a catalogue page.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The server answered with a non-2xx status.
    #[error("Request to {url} failed with status: {status}")]
    Status { url: String, status: u16 },

    /// The request never produced a response (connect failure, timeout, ...).
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// A page lacks an element the crawl cannot proceed without.
    #[error("Could not find {what} on {url}")]
    MissingElement { what: &'static str, url: String },

    /// A link could not be turned into an absolute URL.
    #[error("Invalid URL '{href}': {reason}")]
    InvalidUrl { href: String, reason: String },
}

impl ScrapeError {
    /// Returns true for failures worth retrying later (5xx, 429, timeouts).
    ///
    /// No retry is performed by this crate; the classification is exposed so
    /// callers and logs can tell a flaky server from a missing page.
    pub fn is_transient(&self) -> bool {
        match self {
            ScrapeError::Status { status, .. } => *status >= 500 || *status == 429,
            ScrapeError::Transport { .. } => true,
            ScrapeError::MissingElement { .. } | ScrapeError::InvalidUrl { .. } => false,
        }
    }
}

/// Returns the HTTP status carried by an error chain, if any.
pub fn status_of(err: &anyhow::Error) -> Option<u16> {
    err.chain().find_map(|cause| match cause.downcast_ref::<ScrapeError>() {
        Some(ScrapeError::Status { status, .. }) => Some(*status),
        _ => None,
    })
}
