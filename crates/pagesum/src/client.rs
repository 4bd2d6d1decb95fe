//! HTTP page fetcher
//!
//! A single bounded GET per call: fixed user agent, total timeout, capped
//! redirects, non-2xx rejected, and a body size limit enforced while the
//! body streams in.

use crate::error::FetchError;
use crate::types::FetchedPage;
use crate::DEFAULT_USER_AGENT;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default total request timeout (connect + read)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default body size limit in bytes
pub const DEFAULT_MAX_BODY_BYTES: usize = 1_000_000;

/// Default redirect cap
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Fetch options
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// User-Agent header sent with the request
    pub user_agent: String,
    /// Total request timeout
    pub timeout: Duration,
    /// Largest accepted body, inclusive
    pub max_body_bytes: usize,
    /// Redirects followed before giving up
    pub max_redirects: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl FetchOptions {
    /// Set a custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the body size limit
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Set the redirect cap
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }
}

/// Page fetcher configured once and shared by request handlers.
///
/// Each call builds its own client, so no connection is reused across
/// requests.
#[derive(Debug, Clone, Default)]
pub struct PageFetcher {
    options: FetchOptions,
}

impl PageFetcher {
    /// Create a fetcher with the given options
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }

    /// Current options
    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Fetch a validated URL
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        fetch(url, &self.options).await
    }
}

/// Fetch a URL with the given options
pub async fn fetch(url: &Url, options: &FetchOptions) -> Result<FetchedPage, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&options.user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html, application/xhtml+xml, */*;q=0.8"),
    );

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(options.timeout)
        .redirect(reqwest::redirect::Policy::limited(options.max_redirects))
        .build()
        .map_err(FetchError::ClientBuildError)?;

    let deadline = tokio::time::Instant::now() + options.timeout;

    debug!(url = %url, "Fetching page");
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(e, options.timeout))?;

    let status = response.status();
    if !status.is_success() {
        warn!(url = %url, status = status.as_u16(), "Target returned error status");
        return Err(FetchError::Status(status.as_u16()));
    }

    let final_url = response.url().clone();
    let resp_headers = response.headers();

    let content_type = resp_headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let content_length: Option<u64> = resp_headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok());

    if let Some(len) = content_length {
        if len > options.max_body_bytes as u64 {
            warn!(url = %url, content_length = len, "Declared body exceeds size limit");
            return Err(FetchError::TooLarge {
                limit: options.max_body_bytes,
            });
        }
    }

    let body =
        read_body_limited(response, options.max_body_bytes, deadline, options.timeout).await?;
    debug!(url = %final_url, status = status.as_u16(), bytes = body.len(), "Fetched page");

    Ok(FetchedPage {
        url: final_url,
        status_code: status.as_u16(),
        content_type,
        body,
    })
}

/// Stream the body, failing as soon as it grows past `limit` or the
/// deadline passes
async fn read_body_limited(
    response: reqwest::Response,
    limit: usize,
    deadline: tokio::time::Instant,
    timeout: Duration,
) -> Result<Bytes, FetchError> {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();

    loop {
        let chunk_future = stream.next();
        let timeout_future = tokio::time::sleep_until(deadline);

        tokio::select! {
            chunk = chunk_future => {
                match chunk {
                    Some(Ok(bytes)) => {
                        if body.len() + bytes.len() > limit {
                            warn!(limit, "Body exceeded size limit while streaming");
                            return Err(FetchError::TooLarge { limit });
                        }
                        body.extend_from_slice(&bytes);
                    }
                    Some(Err(e)) => {
                        return Err(FetchError::from_reqwest(e, timeout));
                    }
                    None => {
                        return Ok(Bytes::from(body));
                    }
                }
            }
            _ = timeout_future => {
                warn!("Body timeout reached");
                return Err(FetchError::Timeout(timeout));
            }
        }
    }
}
