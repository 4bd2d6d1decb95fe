//! Request pipeline
//!
//! Validate → fetch → extract → summarize → render, strictly in sequence.
//! Collaborators are built once and injected; each call owns its own fetch
//! and extraction buffers.

use crate::client::PageFetcher;
use crate::completion::Summarizer;
use crate::error::SummarizeError;
use crate::extract::extract_page;
use crate::render::markdown_to_html;
use crate::types::ExtractedPage;
use crate::validate::UrlPolicy;
use std::sync::Arc;
use tracing::{debug, info};

/// Output of a full pipeline run
#[derive(Debug, Clone)]
pub struct Summary {
    /// Fields the summary was built from
    pub page: ExtractedPage,
    /// Raw model output
    pub markdown: String,
    /// Rendered, sanitized HTML
    pub html: String,
}

/// The page summarizing pipeline
#[derive(Clone)]
pub struct PageSummarizer {
    policy: UrlPolicy,
    fetcher: PageFetcher,
    summarizer: Arc<dyn Summarizer>,
}

impl PageSummarizer {
    /// Assemble a pipeline from its collaborators
    pub fn new(policy: UrlPolicy, fetcher: PageFetcher, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            policy,
            fetcher,
            summarizer,
        }
    }

    /// URL policy in use
    pub fn policy(&self) -> &UrlPolicy {
        &self.policy
    }

    /// Validate, fetch and extract without calling the model
    pub async fn extract(&self, raw_url: &str) -> Result<ExtractedPage, SummarizeError> {
        extract_url(&self.policy, &self.fetcher, raw_url).await
    }

    /// Run the whole pipeline for one URL
    pub async fn summarize(&self, raw_url: &str) -> Result<Summary, SummarizeError> {
        let page = self.extract(raw_url).await?;
        let markdown = self.summarizer.summarize(&page).await?;
        let html = markdown_to_html(&markdown);
        info!(url = %raw_url, summary_bytes = markdown.len(), "Summarized page");
        Ok(Summary {
            page,
            markdown,
            html,
        })
    }
}

/// Validate, fetch and extract a single URL
pub async fn extract_url(
    policy: &UrlPolicy,
    fetcher: &PageFetcher,
    raw_url: &str,
) -> Result<ExtractedPage, SummarizeError> {
    let url = policy.check(raw_url)?;
    let fetched = fetcher.fetch(&url).await?;
    let page = extract_page(&fetched.text(), raw_url)?;
    debug!(
        url = %raw_url,
        title = %page.title,
        content_chars = page.content.chars().count(),
        "Extracted page"
    );
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FetchOptions;
    use crate::error::CompletionError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct EchoSummarizer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Summarizer for EchoSummarizer {
        async fn summarize(&self, page: &ExtractedPage) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("# {}\n\n{}", page.title, page.content))
        }
    }

    fn pipeline(summarizer: Arc<EchoSummarizer>) -> PageSummarizer {
        PageSummarizer::new(
            UrlPolicy::new().scheme("http").clear_denied_hosts(),
            PageFetcher::new(FetchOptions::default()),
            summarizer,
        )
    }

    #[tokio::test]
    async fn test_summarize_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "<title>Example Domain</title><p>Hello there.</p>",
                "text/html",
            ))
            .mount(&server)
            .await;

        let summarizer = Arc::new(EchoSummarizer {
            calls: AtomicUsize::new(0),
        });
        let url = format!("{}/", server.uri());
        let summary = pipeline(summarizer.clone()).summarize(&url).await.unwrap();

        assert_eq!(summary.page.url, url);
        assert_eq!(summary.page.title, "Example Domain");
        assert_eq!(summary.markdown, "# Example Domain\n\nHello there.");
        assert!(summary.html.contains("<h1>Example Domain</h1>"));
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_url_makes_no_calls() {
        let summarizer = Arc::new(EchoSummarizer {
            calls: AtomicUsize::new(0),
        });
        let pipeline = PageSummarizer::new(
            UrlPolicy::default(),
            PageFetcher::default(),
            summarizer.clone(),
        );

        let err = pipeline.summarize("http://example.com").await.unwrap_err();
        assert!(matches!(err, SummarizeError::Validation(_)));
        assert_eq!(err.status_code(), 400);
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_summarizer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let summarizer = Arc::new(EchoSummarizer {
            calls: AtomicUsize::new(0),
        });
        let err = pipeline(summarizer.clone())
            .summarize(&server.uri())
            .await
            .unwrap_err();
        assert!(matches!(err, SummarizeError::Fetch(_)));
        assert_eq!(err.status_code(), 400);
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
    }
}
