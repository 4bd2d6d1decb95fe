//! Error types for Pagesum

use std::time::Duration;
use thiserror::Error;

/// Reasons a candidate URL is rejected before any network call
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// URL could not be parsed at all
    #[error("Invalid URL: {0}")]
    Malformed(String),

    /// URL parsed but has no host
    #[error("Invalid URL: missing host")]
    MissingHost,

    /// URL scheme is not the allowed one
    #[error("Invalid URL: scheme '{0}' is not allowed")]
    DisallowedScheme(String),

    /// Host is on the denylist
    #[error("Invalid URL: host '{0}' is not allowed")]
    DeniedHost(String),
}

/// Errors that can occur while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request did not complete within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Failed to connect to server
    #[error("Failed to connect to server")]
    ConnectError(#[source] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("Target responded with HTTP {0}")]
    Status(u16),

    /// Redirect chain exceeded the configured cap
    #[error("Too many redirects")]
    TooManyRedirects,

    /// Body exceeded the configured size limit
    #[error("Page too large (max {limit} bytes)")]
    TooLarge { limit: usize },

    /// Other request error
    #[error("Request failed: {0}")]
    RequestError(String),
}

impl FetchError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else if err.is_redirect() {
            FetchError::TooManyRedirects
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else if err.is_connect() {
            FetchError::ConnectError(err)
        } else {
            FetchError::RequestError(err.to_string())
        }
    }

    /// True for the size-exceeded condition
    pub fn is_too_large(&self) -> bool {
        matches!(self, FetchError::TooLarge { .. })
    }

    /// True for the timeout condition
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout(_))
    }
}

/// Extraction failures. The extractor degrades to sentinels on bad markup,
/// so this only surfaces when a built-in selector cannot be compiled.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

/// Errors from the completion collaborator
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Failed to build HTTP client
    #[error("Failed to create completion client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Completion call timed out
    #[error("Completion request timed out")]
    Timeout,

    /// Network failure reaching the API
    #[error("Completion request failed: {0}")]
    Network(String),

    /// API answered with a non-2xx status
    #[error("Completion API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("Failed to parse completion response: {0}")]
    Parse(String),

    /// Response carried no message content
    #[error("Completion response contained no message")]
    EmptyResponse,
}

/// Errors loading or parsing a prompt template
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template file could not be read
    #[error("Failed to read prompt template '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Template lacks a required placeholder
    #[error("Prompt template is missing placeholder '{{{{ {0} }}}}'")]
    MissingPlaceholder(&'static str),
}

/// Any failure of a single summarize request
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl SummarizeError {
    /// HTTP status this error maps to at the service boundary
    pub fn status_code(&self) -> u16 {
        match self {
            SummarizeError::Validation(_) => 400,
            SummarizeError::Fetch(e) if e.is_too_large() => 413,
            SummarizeError::Fetch(_) => 400,
            SummarizeError::Extraction(_) | SummarizeError::Completion(_) => 500,
        }
    }

    /// Message safe to return to the caller.
    ///
    /// Upstream completion detail may contain credentials or request echoes,
    /// so it is replaced by a fixed message.
    pub fn public_message(&self) -> String {
        match self {
            SummarizeError::Validation(_) => "invalid url".to_string(),
            SummarizeError::Fetch(e) if e.is_too_large() => e.to_string(),
            SummarizeError::Fetch(e) => format!(
                "err while sending request to target url: {}: network issue or url doesn't exist.",
                e
            ),
            SummarizeError::Extraction(_) => "failed to extract page content".to_string(),
            SummarizeError::Completion(_) => "error while generating summary".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::MissingHost.to_string(),
            "Invalid URL: missing host"
        );
        assert_eq!(
            ValidationError::DisallowedScheme("http".to_string()).to_string(),
            "Invalid URL: scheme 'http' is not allowed"
        );
        assert_eq!(
            FetchError::TooLarge { limit: 1_000_000 }.to_string(),
            "Page too large (max 1000000 bytes)"
        );
        assert_eq!(
            FetchError::Timeout(Duration::from_secs(15)).to_string(),
            "Request timed out after 15s"
        );
        assert_eq!(
            TemplateError::MissingPlaceholder("url").to_string(),
            "Prompt template is missing placeholder '{{ url }}'"
        );
    }

    #[test]
    fn test_status_codes() {
        let err: SummarizeError = ValidationError::MissingHost.into();
        assert_eq!(err.status_code(), 400);

        let err: SummarizeError = FetchError::Status(404).into();
        assert_eq!(err.status_code(), 400);

        let err: SummarizeError = FetchError::Timeout(Duration::from_secs(15)).into();
        assert_eq!(err.status_code(), 400);

        let err: SummarizeError = FetchError::TooLarge { limit: 10 }.into();
        assert_eq!(err.status_code(), 413);

        let err: SummarizeError = CompletionError::EmptyResponse.into();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_completion_detail_not_public() {
        let err: SummarizeError = CompletionError::Api {
            status: 401,
            body: "invalid api key gsk_secret".to_string(),
        }
        .into();
        assert!(!err.public_message().contains("gsk_secret"));
        assert_eq!(err.public_message(), "error while generating summary");
    }

    #[test]
    fn test_validation_message_is_fixed() {
        let err: SummarizeError = ValidationError::DeniedHost("localhost".to_string()).into();
        assert_eq!(err.public_message(), "invalid url");
    }
}
