//! Summary requester
//!
//! The [`Summarizer`] trait is the seam between the pipeline and the
//! language model. [`ChatCompletionClient`] talks to any OpenAI-compatible
//! `/chat/completions` endpoint (Groq by default).

use crate::error::CompletionError;
use crate::prompt::PromptTemplate;
use crate::types::ExtractedPage;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Default completion timeout
pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);

/// Produces a text summary for an extracted page
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize the page; the result is usually Markdown
    async fn summarize(&self, page: &ExtractedPage) -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Builder for [`ChatCompletionClient`]
#[derive(Clone)]
pub struct ChatCompletionClientBuilder {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
    template: PromptTemplate,
}

impl ChatCompletionClientBuilder {
    /// Set the API base URL (no trailing `/chat/completions`)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model name
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the prompt template
    pub fn template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ChatCompletionClient, CompletionError> {
        let http_client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(CompletionError::ClientBuildError)?;

        Ok(ChatCompletionClient {
            http_client,
            api_key: self.api_key,
            base_url: self.base_url,
            model: self.model,
            template: self.template,
        })
    }
}

/// OpenAI-compatible chat-completion client
#[derive(Clone)]
pub struct ChatCompletionClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    template: PromptTemplate,
}

impl ChatCompletionClient {
    /// Start building a client for the given API key
    pub fn builder(api_key: impl Into<String>) -> ChatCompletionClientBuilder {
        ChatCompletionClientBuilder {
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_COMPLETION_TIMEOUT,
            template: PromptTemplate::default(),
        }
    }

    /// Model name sent with each request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// API base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a single user message and return the first choice's content
    pub async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let start = std::time::Instant::now();
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Completion request failed");
                if e.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, error = %body, "Completion API error");
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Unexpected completion response");
            CompletionError::Parse(e.to_string())
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(CompletionError::EmptyResponse)?;

        debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis() as u64,
            "Chat completion"
        );

        Ok(content)
    }
}

impl std::fmt::Debug for ChatCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Summarizer for ChatCompletionClient {
    async fn summarize(&self, page: &ExtractedPage) -> Result<String, CompletionError> {
        let prompt = self.template.render(page);
        self.complete(&prompt).await
    }
}
