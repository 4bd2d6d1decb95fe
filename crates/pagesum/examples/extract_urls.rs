//! Example: Extract a few live pages and check the fields
//!
//! Run with: cargo run -p pagesum --example extract_urls
//!
//! No API key is needed; the language model is never called.

use pagesum::{extract_url, ExtractedPage, PageFetcher, UrlPolicy, NO_CONTENT, NO_TITLE};

/// Live page expectation
struct Case {
    url: &'static str,
    description: &'static str,
    expect_title: Option<&'static str>,
    expect_content: Option<&'static str>,
}

const CASES: &[Case] = &[
    Case {
        url: "https://example.com",
        description: "Simple HTML page",
        expect_title: Some("Example Domain"),
        expect_content: Some("documentation examples"),
    },
    Case {
        url: "https://httpbin.org/html",
        description: "Paragraph-only page without a title",
        expect_title: Some(NO_TITLE),
        expect_content: Some("Herman Melville"),
    },
    Case {
        url: "https://httpbin.org/json",
        description: "Non-HTML body falls back to placeholders",
        expect_title: Some(NO_TITLE),
        expect_content: Some(NO_CONTENT),
    },
];

#[tokio::main]
async fn main() {
    println!("Pagesum extraction examples");
    println!("===========================\n");

    let policy = UrlPolicy::default();
    let fetcher = PageFetcher::default();
    let mut failed = 0;

    for (i, case) in CASES.iter().enumerate() {
        println!("{}. {}", i + 1, case.description);
        println!("   URL: {}", case.url);

        match extract_url(&policy, &fetcher, case.url).await {
            Ok(page) => {
                print_page(&page);
                if check(case, &page) {
                    println!("   ✓ PASS\n");
                } else {
                    println!("   ✗ FAIL\n");
                    failed += 1;
                }
            }
            Err(e) => {
                println!("   Error: {} ({})", e, e.status_code());
                println!("   ✗ FAIL\n");
                failed += 1;
            }
        }
    }

    println!("Results: {} passed, {} failed", CASES.len() - failed, failed);
    if failed > 0 {
        std::process::exit(1);
    }
}

fn print_page(page: &ExtractedPage) {
    println!("   Title: {}", page.title);
    println!("   Description: {}", page.description);
    let preview: String = page.content.chars().take(100).collect();
    println!(
        "   Content: {}{}",
        preview,
        if page.content.chars().count() > 100 { "..." } else { "" }
    );
}

fn check(case: &Case, page: &ExtractedPage) -> bool {
    if let Some(title) = case.expect_title {
        if page.title != title {
            println!("   Expected title '{}'", title);
            return false;
        }
    }
    if let Some(text) = case.expect_content {
        if !page.content.contains(text) {
            println!("   Expected content to contain '{}'", text);
            return false;
        }
    }
    true
}
