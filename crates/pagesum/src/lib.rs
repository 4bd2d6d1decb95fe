//! Pagesum - fetch a web page and have a language model summarize it
//!
//! The pipeline runs strictly in sequence for each request:
//!
//! 1. [`UrlPolicy`] rejects malformed or disallowed URLs before any network call
//! 2. [`PageFetcher`] performs one bounded GET (timeout, redirect cap, size limit)
//! 3. [`extract_page`] builds an [`ExtractedPage`] with placeholder fallbacks
//! 4. a [`Summarizer`] turns the page into Markdown
//! 5. [`markdown_to_html`] renders and sanitizes the result
//!
//! [`PageSummarizer`] wires the stages together.

pub mod client;
pub mod completion;
mod error;
pub mod extract;
pub mod pipeline;
pub mod prompt;
pub mod render;
mod types;
pub mod validate;

pub use client::{fetch, FetchOptions, PageFetcher};
pub use completion::{ChatCompletionClient, ChatCompletionClientBuilder, Summarizer};
pub use error::{
    CompletionError, ExtractionError, FetchError, SummarizeError, TemplateError, ValidationError,
};
pub use extract::extract_page;
pub use pipeline::{extract_url, PageSummarizer, Summary};
pub use prompt::PromptTemplate;
pub use render::markdown_to_html;
pub use types::{
    ExtractedPage, FetchedPage, MAX_CONTENT_CHARS, NO_CONTENT, NO_DESCRIPTION, NO_TITLE,
};
pub use validate::UrlPolicy;

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; pagesum/",
    env!("CARGO_PKG_VERSION"),
    ")"
);
