//! Markdown to HTML rendering
//!
//! Model output is untrusted, so the rendered HTML goes through `ammonia`
//! before it is returned.

use pulldown_cmark::{html, Options, Parser};

/// Render Markdown to sanitized HTML
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut unsafe_html = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut unsafe_html, parser);

    ammonia::clean(&unsafe_html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_and_lists() {
        let html = markdown_to_html("# Summary\n\n- one\n- two\n");
        assert!(html.contains("<h1>Summary</h1>"));
        assert!(html.contains("<li>one</li>"));
        assert!(html.contains("<li>two</li>"));
    }

    #[test]
    fn test_emphasis() {
        let html = markdown_to_html("**bold** and *italic*");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>italic</em>"));
    }

    #[test]
    fn test_plain_text_becomes_paragraph() {
        assert_eq!(markdown_to_html("hello").trim(), "<p>hello</p>");
    }

    #[test]
    fn test_script_removed() {
        let html = markdown_to_html("hi <script>alert(1)</script>\n\n<img src=x onerror=alert(1)>");
        assert!(!html.contains("<script"));
        assert!(!html.contains("onerror"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(markdown_to_html(""), "");
    }
}
