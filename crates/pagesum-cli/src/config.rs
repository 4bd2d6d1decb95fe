//! Environment configuration
//!
//! Read once at startup. A `.env` file in the working directory is loaded
//! first if present; real environment variables take precedence.

use pagesum::completion::{DEFAULT_API_BASE, DEFAULT_COMPLETION_TIMEOUT, DEFAULT_MODEL};
use pagesum::{ChatCompletionClient, PromptTemplate, TemplateError, UrlPolicy};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default prompt template location
pub const DEFAULT_PROMPT_PATH: &str = "prompts/prompt.txt";

/// Default listen address
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

/// Configuration errors; all of them are fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// API key variable unset or blank
    #[error("{0} must be set")]
    MissingApiKey(&'static str),

    /// A variable could not be parsed
    #[error("{name} has an invalid value '{value}'")]
    InvalidValue { name: &'static str, value: String },

    /// Prompt template could not be loaded
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Completion client could not be built
    #[error("Failed to build completion client: {0}")]
    Client(String),
}

/// Service configuration.
///
/// The listen address and completion timeout are kept as raw strings and
/// parsed on use, so subcommands that never bind or call the model do not
/// fail on them.
#[derive(Clone)]
pub struct Config {
    /// Completion API key, trimmed
    pub api_key: Option<String>,
    /// Prompt template path
    pub prompt_path: PathBuf,
    /// Listen address for `serve`
    pub bind: String,
    /// Completion API base URL
    pub api_base: String,
    /// Completion model
    pub model: String,
    /// Completion request timeout in seconds, if set
    pub completion_timeout_secs: Option<String>,
    /// Hosts denied on top of the built-in list
    pub denied_hosts: Vec<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("prompt_path", &self.prompt_path)
            .field("bind", &self.bind)
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("completion_timeout_secs", &self.completion_timeout_secs)
            .field("denied_hosts", &self.denied_hosts)
            .finish()
    }
}

impl Config {
    /// Environment variable holding the API key
    pub const API_KEY_VAR: &'static str = "GROQ_API_KEY";

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let denied_hosts = get("PAGESUM_DENIED_HOSTS")
            .map(|raw| {
                raw.split(',')
                    .map(|h| h.trim().to_string())
                    .filter(|h| !h.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            api_key: get(Self::API_KEY_VAR),
            prompt_path: get("PAGESUM_PROMPT_PATH")
                .unwrap_or_else(|| DEFAULT_PROMPT_PATH.to_string())
                .into(),
            bind: get("PAGESUM_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            api_base: get("PAGESUM_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model: get("PAGESUM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            completion_timeout_secs: get("PAGESUM_COMPLETION_TIMEOUT_SECS"),
            denied_hosts,
        })
    }

    /// Parsed listen address
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind.parse().map_err(|_| ConfigError::InvalidValue {
            name: "PAGESUM_BIND",
            value: self.bind.clone(),
        })
    }

    /// Parsed completion timeout, defaulting when unset
    pub fn completion_timeout(&self) -> Result<Duration, ConfigError> {
        match &self.completion_timeout_secs {
            Some(raw) => raw
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidValue {
                    name: "PAGESUM_COMPLETION_TIMEOUT_SECS",
                    value: raw.clone(),
                }),
            None => Ok(DEFAULT_COMPLETION_TIMEOUT),
        }
    }

    /// The API key, or an error if it was not configured
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or(ConfigError::MissingApiKey(Self::API_KEY_VAR))
    }

    /// URL policy with the configured extra denied hosts
    pub fn url_policy(&self) -> UrlPolicy {
        self.denied_hosts
            .iter()
            .fold(UrlPolicy::new(), |policy, host| policy.deny_host(host))
    }

    /// Read and validate the prompt template
    pub fn load_template(&self) -> Result<PromptTemplate, ConfigError> {
        Ok(PromptTemplate::from_file(&self.prompt_path)?)
    }

    /// Build the completion client: requires the API key and the template
    pub fn completion_client(&self) -> Result<ChatCompletionClient, ConfigError> {
        let api_key = self.require_api_key()?;
        let timeout = self.completion_timeout()?;
        let template = self.load_template()?;
        ChatCompletionClient::builder(api_key)
            .base_url(&self.api_base)
            .model(&self.model)
            .timeout(timeout)
            .template(template)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))
    }
}
