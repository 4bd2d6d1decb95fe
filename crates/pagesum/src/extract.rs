//! Content extraction
//!
//! Turns fetched HTML into an [`ExtractedPage`]. Parsing is lenient: broken
//! markup never fails, it only leaves fields at their placeholders.
//! Boilerplate elements are detached from the tree before paragraph text is
//! collected, so their text never reaches `content`.

use crate::error::ExtractionError;
use crate::types::{ExtractedPage, MAX_CONTENT_CHARS, NO_CONTENT, NO_DESCRIPTION, NO_TITLE};
use scraper::{ElementRef, Html, Selector};

/// Elements removed before any text is read
pub const STRIPPED_TAGS: &[&str] = &[
    "script",
    "style",
    "nav",
    "footer",
    "aside",
    "advertisement",
];

/// Extract title, description and paragraph text from an HTML document.
///
/// `url` is copied into the result unchanged.
pub fn extract_page(html: &str, url: &str) -> Result<ExtractedPage, ExtractionError> {
    let mut document = Html::parse_document(html);
    strip_boilerplate(&mut document)?;

    let title = extract_title(&document)?.unwrap_or_else(|| NO_TITLE.to_string());
    let description =
        extract_description(&document)?.unwrap_or_else(|| NO_DESCRIPTION.to_string());
    let content = extract_paragraphs(&document)?;
    let content = if content.is_empty() {
        NO_CONTENT.to_string()
    } else {
        truncate_chars(&content, MAX_CONTENT_CHARS).to_string()
    };

    Ok(ExtractedPage {
        url: url.to_string(),
        title,
        description,
        content,
    })
}

fn selector(css: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|e| ExtractionError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// Detach every boilerplate element from the tree
fn strip_boilerplate(document: &mut Html) -> Result<(), ExtractionError> {
    let stripped = selector(&STRIPPED_TAGS.join(", "))?;
    let ids: Vec<_> = document.select(&stripped).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
    Ok(())
}

/// First `<title>`, trimmed; empty titles count as missing
fn extract_title(document: &Html) -> Result<Option<String>, ExtractionError> {
    let title = selector("title")?;
    Ok(document
        .select(&title)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty()))
}

/// `meta[name=description]`, falling back to `meta[property=og:description]`
/// only when no such tag exists. A chosen tag with a missing or blank
/// `content` counts as no description.
fn extract_description(document: &Html) -> Result<Option<String>, ExtractionError> {
    let meta = selector("meta")?;
    let metas: Vec<ElementRef> = document.select(&meta).collect();

    let tag_with = |attr: &str, value: &str| {
        metas.iter().find(|m| {
            m.value()
                .attr(attr)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case(value))
        })
    };

    Ok(tag_with("name", "description")
        .or_else(|| tag_with("property", "og:description"))
        .and_then(|m| m.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty()))
}

/// Text of every `<p>`, whitespace-collapsed, joined by single spaces
fn extract_paragraphs(document: &Html) -> Result<String, ExtractionError> {
    let p = selector("p")?;
    let paragraphs: Vec<String> = document
        .select(&p)
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .collect();
    Ok(paragraphs.join(" "))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max` characters of `s`
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
