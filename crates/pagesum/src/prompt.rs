//! Prompt templates
//!
//! Templates use `{{ name }}` placeholders. Four are required:
//! `title`, `desc`, `page_content` and `url`. Unknown names render as an
//! empty string.

use crate::error::TemplateError;
use crate::types::ExtractedPage;
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;

/// Placeholders every template must reference
pub const REQUIRED_PLACEHOLDERS: &[&str] = &["title", "desc", "page_content", "url"];

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder regex is valid")
});

/// Built-in prompt used when none is configured
pub const DEFAULT_TEMPLATE: &str = include_str!("../prompts/default.txt");

/// A parsed prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    source: String,
}

impl PromptTemplate {
    /// Parse a template from its source text
    pub fn new(source: impl Into<String>) -> Result<Self, TemplateError> {
        let source = source.into();
        for &required in REQUIRED_PLACEHOLDERS {
            let present = PLACEHOLDER
                .captures_iter(&source)
                .any(|c| &c[1] == required);
            if !present {
                return Err(TemplateError::MissingPlaceholder(required));
            }
        }
        Ok(Self { source })
    }

    /// Read and parse a template file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::new(source)
    }

    /// Raw template text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Fill the placeholders from an extracted page
    pub fn render(&self, page: &ExtractedPage) -> String {
        PLACEHOLDER
            .replace_all(&self.source, |caps: &Captures| match &caps[1] {
                "title" => page.title.clone(),
                "desc" => page.description.clone(),
                "page_content" => page.content.clone(),
                "url" => page.url.clone(),
                _ => String::new(),
            })
            .into_owned()
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_TEMPLATE.to_string(),
        }
    }
}
