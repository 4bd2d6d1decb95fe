//! Core types for Pagesum

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use url::Url;

/// Placeholder used when a page has no `<title>`
pub const NO_TITLE: &str = "No title found for this url";

/// Placeholder used when a page has no meta description
pub const NO_DESCRIPTION: &str = "No description found for this url";

/// Placeholder used when a page has no paragraph text
pub const NO_CONTENT: &str = "No content found on this url";

/// Maximum number of characters kept in [`ExtractedPage::content`]
pub const MAX_CONTENT_CHARS: usize = 1000;

/// Structured summary of a fetched page.
///
/// Every field is always populated: missing values are replaced by the
/// `NO_*` placeholders, and `content` never exceeds [`MAX_CONTENT_CHARS`]
/// characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPage {
    /// Request URL, verbatim
    pub url: String,
    /// Trimmed `<title>` text
    pub title: String,
    /// Trimmed meta description
    pub description: String,
    /// Space-joined paragraph text
    pub content: String,
}

/// Raw result of a single page fetch
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: Url,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value
    pub content_type: Option<String>,
    /// Response body
    pub body: Bytes,
}

impl FetchedPage {
    /// Body decoded as UTF-8, with invalid sequences replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body size in bytes
    pub fn size(&self) -> usize {
        self.body.len()
    }
}
