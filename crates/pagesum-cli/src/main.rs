//! Pagesum CLI - serve the summarizer over HTTP or run it once from the shell

mod config;
mod server;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use pagesum::{ExtractedPage, PageFetcher, PageSummarizer, Summary};
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Pagesum - summarize web pages with a language model
#[derive(Parser, Debug)]
#[command(name = "pagesum")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Listen address (overrides PAGESUM_BIND)
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Prompt template file (overrides PAGESUM_PROMPT_PATH)
        #[arg(long)]
        prompt: Option<PathBuf>,
    },
    /// Fetch a URL and print the extracted fields as JSON
    Extract {
        /// URL to extract
        url: String,
    },
    /// Fetch a URL and print its summary
    Summarize {
        /// URL to summarize
        url: String,

        /// Print rendered HTML instead of Markdown
        #[arg(long)]
        html: bool,

        /// Prompt template file (overrides PAGESUM_PROMPT_PATH)
        #[arg(long)]
        prompt: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve { bind, prompt } => {
            if let Some(bind) = bind {
                config.bind = bind.to_string();
            }
            if let Some(prompt) = prompt {
                config.prompt_path = prompt;
            }
            let addr = config.bind_addr()?;
            let pipeline = build_pipeline(&config)?;
            tracing::info!(model = %config.model, prompt = %config.prompt_path.display(), "Starting pagesum");
            server::run_server(addr, pipeline)
                .await
                .context("Server error")?;
        }
        Commands::Extract { url } => {
            let page = pagesum::extract_url(&config.url_policy(), &PageFetcher::default(), &url)
                .await
                .context("Extraction failed")?;
            writeln_safe(&format_extracted(&page)?);
        }
        Commands::Summarize { url, html, prompt } => {
            if let Some(prompt) = prompt {
                config.prompt_path = prompt;
            }
            let summary = build_pipeline(&config)?
                .summarize(&url)
                .await
                .context("Summarization failed")?;
            writeln_safe(&format_summary(&summary, html));
        }
    }

    Ok(())
}

/// Logs go to stderr so command output on stdout stays clean
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pagesum=debug,pagesum_cli=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn build_pipeline(config: &Config) -> Result<PageSummarizer> {
    let client = config
        .completion_client()
        .context("Failed to initialize summarizer")?;
    Ok(PageSummarizer::new(
        config.url_policy(),
        PageFetcher::default(),
        Arc::new(client),
    ))
}

fn format_extracted(page: &ExtractedPage) -> Result<String> {
    serde_json::to_string_pretty(page).context("Error serializing page")
}

fn format_summary(summary: &Summary, html: bool) -> &str {
    if html {
        summary.html.trim_end()
    } else {
        summary.markdown.trim_end()
    }
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> ExtractedPage {
        ExtractedPage {
            url: "https://example.com".to_string(),
            title: "Example Domain".to_string(),
            description: pagesum::NO_DESCRIPTION.to_string(),
            content: "Some text".to_string(),
        }
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["pagesum", "serve", "--bind", "127.0.0.1:3000"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve { bind: Some(addr), prompt: None } if addr.port() == 3000
        ));

        let cli = Cli::try_parse_from(["pagesum", "summarize", "https://example.com", "--html"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Summarize { html: true, .. }));

        assert!(Cli::try_parse_from(["pagesum"]).is_err());
        assert!(Cli::try_parse_from(["pagesum", "serve", "--bind", "nope"]).is_err());
    }

    #[test]
    fn test_format_extracted_json() {
        let output = format_extracted(&page()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["url"], "https://example.com");
        assert_eq!(value["title"], "Example Domain");
        assert_eq!(value["description"], pagesum::NO_DESCRIPTION);
        assert_eq!(value["content"], "Some text");
    }

    #[test]
    fn test_format_summary() {
        let summary = Summary {
            page: page(),
            markdown: "# Title\n".to_string(),
            html: "<h1>Title</h1>\n".to_string(),
        };
        assert_eq!(format_summary(&summary, false), "# Title");
        assert_eq!(format_summary(&summary, true), "<h1>Title</h1>");
    }
}
