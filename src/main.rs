//! wolmcp: Command-line interface for the online-library MCP server

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use rmcp::{
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tokio::io::{stdin, stdout};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wolmcp::client::{DocumentFormat, WolClient};
use wolmcp::config::{path_resolver, AppConfig};
use wolmcp::extract::SearchResponse;
use wolmcp::resolver::{SearchOptions, SortOrder};
use wolmcp::subtitles::SubtitleFormat;

// ============================================================================
// Parameter Vocabulary Helpers
// ============================================================================

fn parse_sort(value: &str) -> SortOrder {
    match value {
        "newest" => SortOrder::Newest,
        "oldest" => SortOrder::Oldest,
        _ => SortOrder::Occurrences,
    }
}

fn parse_document_format(value: &str) -> DocumentFormat {
    match value {
        "text" => DocumentFormat::Text,
        "html" => DocumentFormat::Html,
        _ => DocumentFormat::Markdown,
    }
}

fn parse_subtitle_format(value: &str) -> SubtitleFormat {
    match value {
        "vtt" => SubtitleFormat::Vtt,
        "text" => SubtitleFormat::Text,
        _ => SubtitleFormat::Both,
    }
}

// ============================================================================
// MCP Server Implementation
// ============================================================================

/// MCP server for online-library research
#[derive(Clone)]
struct WolMcpServer {
    client: Arc<WolClient>,
}

/// Request parameters for search_library tool
#[derive(Debug, Deserialize, JsonSchema)]
struct SearchLibraryParams {
    /// Search query string
    query: String,
    /// Language tag, e.g. "en", "es", "pt-br" (default: "en")
    language: Option<String>,
    /// 1-based result page (default: 1)
    #[serde(default = "default_page")]
    page: u32,
    /// Maximum results to return (default: 10)
    #[serde(default = "default_limit")]
    limit: usize,
    /// Sort order: "newest", "oldest", or "occurrences" (default)
    #[serde(default = "default_sort")]
    sort: String,
    /// Publication codes to filter by, e.g. ["w", "g"]
    #[serde(default)]
    publications: Vec<String>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> usize {
    10
}

fn default_sort() -> String {
    "occurrences".to_string()
}

/// Request parameters for get_document tool
#[derive(Debug, Deserialize, JsonSchema)]
struct GetDocumentParams {
    /// Document URL on the online library
    url: String,
    /// Content format: "markdown" (default), "text", or "html"
    #[serde(default = "default_document_format")]
    format: String,
}

fn default_document_format() -> String {
    "markdown".to_string()
}

/// Request parameters for browse_publications tool
#[derive(Debug, Deserialize, JsonSchema)]
struct BrowsePublicationsParams {
    /// Category filter, e.g. "magazine", "book", "bible"
    category: Option<String>,
    /// Language tag (default: "en")
    language: Option<String>,
    /// Only publications current in this year
    year: Option<u16>,
}

/// Request parameters for get_video_subtitles tool
#[derive(Debug, Deserialize, JsonSchema)]
struct GetVideoSubtitlesParams {
    /// Shareable video URL carrying a "lank" or "docid" identifier
    url: String,
    /// Output format: "vtt", "text", or "both" (default)
    #[serde(default = "default_subtitle_format")]
    format: String,
    /// Window start in seconds
    start_time: Option<f64>,
    /// Window end in seconds
    end_time: Option<f64>,
}

fn default_subtitle_format() -> String {
    "both".to_string()
}

fn format_search_response(query: &str, response: &SearchResponse) -> String {
    let mut output = format!(
        "Found {} results for '{}' (page {} of {}):\n\n",
        response.pagination.total_results,
        query,
        response.pagination.current_page,
        response.pagination.total_pages
    );

    for (i, result) in response.results.iter().enumerate() {
        output.push_str(&format!("{}. {}\n   {}\n", i + 1, result.title, result.url));
        if !result.publication.is_empty() {
            output.push_str(&format!("   Publication: {}\n", result.publication));
        }
        if let Some(occurrences) = result.occurrences {
            output.push_str(&format!("   Occurrences: {}\n", occurrences));
        }
        if !result.snippet.is_empty() {
            output.push_str(&format!("   {}\n", result.snippet));
        }
        output.push('\n');
    }

    output
}

#[tool(tool_box)]
impl WolMcpServer {
    fn new(config: &AppConfig) -> Self {
        Self {
            client: Arc::new(WolClient::from_config(config)),
        }
    }

    /// Search the online library
    #[tool(description = "Search the Watchtower Online Library for articles and publications")]
    async fn search_library(
        &self,
        #[tool(aggr)] params: SearchLibraryParams,
    ) -> Result<CallToolResult, rmcp::Error> {
        let mut options = SearchOptions::new()
            .with_page(params.page)
            .with_limit(params.limit)
            .with_sort(parse_sort(&params.sort))
            .with_publications(params.publications)
            .with_operator_validation(true);
        if let Some(language) = params.language {
            options = options.with_language(language);
        }

        let response = self
            .client
            .search(&params.query, &options)
            .await
            .map_err(|e| rmcp::Error::internal_error(e.to_string(), None))?;

        Ok(CallToolResult::success(vec![Content::text(
            format_search_response(&params.query, &response),
        )]))
    }

    /// Fetch a document and convert its content
    #[tool(description = "Fetch a library document by URL and return its content as markdown, plain text, or HTML")]
    async fn get_document(
        &self,
        #[tool(aggr)] params: GetDocumentParams,
    ) -> Result<CallToolResult, rmcp::Error> {
        let document = self
            .client
            .get_document_by_url(&params.url, parse_document_format(&params.format))
            .await
            .map_err(|e| rmcp::Error::internal_error(e.to_string(), None))?;

        let mut output = format!("# {}\n\n", document.title);
        if !document.publication.is_empty() {
            output.push_str(&format!("Publication: {}\n", document.publication));
        }
        if let Some(date) = &document.metadata.date {
            output.push_str(&format!("Date: {}\n", date));
        }
        output.push_str(&format!("URL: {}\n\n", document.url));
        output.push_str(&document.content);

        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    /// Browse the publication catalog
    #[tool(description = "Browse available publications, optionally filtered by category and year")]
    async fn browse_publications(
        &self,
        #[tool(aggr)] params: BrowsePublicationsParams,
    ) -> Result<CallToolResult, rmcp::Error> {
        let publications = self
            .client
            .browse_publications(
                params.category.as_deref(),
                params.language.as_deref(),
                params.year,
            )
            .await
            .map_err(|e| rmcp::Error::internal_error(e.to_string(), None))?;

        let mut output = format!("Found {} publications:\n\n", publications.len());
        for publication in &publications {
            output.push_str(&format!("- [{}] {}", publication.code, publication.name));
            if let Some(years) = &publication.years {
                output.push_str(&format!(" ({})", years));
            }
            output.push_str(&format!("\n  {}\n", publication.description));
        }

        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    /// Fetch video subtitles
    #[tool(description = "Fetch subtitles for a shareable video URL, optionally limited to a time window")]
    async fn get_video_subtitles(
        &self,
        #[tool(aggr)] params: GetVideoSubtitlesParams,
    ) -> Result<CallToolResult, rmcp::Error> {
        let result = self
            .client
            .get_video_subtitles(
                &params.url,
                parse_subtitle_format(&params.format),
                params.start_time,
                params.end_time,
            )
            .await
            .map_err(|e| rmcp::Error::internal_error(e.to_string(), None))?;

        let mut output = format!(
            "Title: {}\nTrack: {} ({})\nDuration: {:.1}s\nSubtitle file: {}\n\n",
            result.metadata.title,
            result.metadata.track,
            result.metadata.language,
            result.metadata.duration,
            result.vtt_url
        );
        if !result.plain_text.is_empty() {
            output.push_str("--- Text ---\n");
            output.push_str(&result.plain_text);
            output.push('\n');
        }
        if !result.raw_vtt.is_empty() {
            output.push_str("--- VTT ---\n");
            output.push_str(&result.raw_vtt);
        }

        Ok(CallToolResult::success(vec![Content::text(output)]))
    }
}

#[tool(tool_box)]
impl ServerHandler for WolMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Read-only research tools for the Watchtower Online Library: search, document retrieval, publication browsing, and video subtitles".into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ============================================================================
// CLI Implementation
// ============================================================================

/// wolmcp: Rust-based MCP server for online-library research
#[derive(Parser)]
#[command(name = "wolmcp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a configuration file (default: XDG config dir, ~ expanded)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize wolmcp configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
    /// Start the MCP server
    Serve,
    /// Search the library (for testing)
    Search {
        /// Search query
        query: String,

        /// Language tag
        #[arg(short, long)]
        language: Option<String>,

        /// 1-based page number
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Maximum results to print
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Sort order: newest, oldest, or occurrences
        #[arg(short, long, default_value = "occurrences")]
        sort: String,

        /// Publication code filter - can be specified multiple times
        #[arg(long = "pub", action = ArgAction::Append)]
        publications: Vec<String>,
    },
    /// Fetch a document by URL
    Document {
        /// Document URL
        url: String,

        /// Content format: markdown, text, or html
        #[arg(short, long, default_value = "markdown")]
        format: String,
    },
    /// Fetch subtitles for a video URL
    Subtitles {
        /// Shareable video URL
        url: String,

        /// Output format: vtt, text, or both
        #[arg(short, long, default_value = "both")]
        format: String,

        /// Window start in seconds
        #[arg(long)]
        start: Option<f64>,

        /// Window end in seconds
        #[arg(long)]
        end: Option<f64>,
    },
    /// Browse the publication catalog
    Publications {
        /// Category filter, e.g. magazine, book, bible
        #[arg(short, long)]
        category: Option<String>,

        /// Language tag
        #[arg(short, long)]
        language: Option<String>,

        /// Only publications current in this year
        #[arg(short, long)]
        year: Option<u16>,
    },
}

/// Load configuration: file (when present) overridden by environment.
///
/// An explicit path is tilde-expanded and must exist; the default path is
/// optional.
fn load_config(override_path: Option<&str>) -> Result<AppConfig> {
    let config_path = match override_path {
        Some(path) => path_resolver::expand_home(path)?,
        None => path_resolver::get_default_config_path(),
    };
    let config = if config_path.exists() {
        AppConfig::from_file(&config_path)?.merge_with(&AppConfig::from_env())
    } else if override_path.is_some() {
        return Err(anyhow::anyhow!(
            "Config file not found: {}",
            config_path.display()
        ));
    } else {
        AppConfig::from_env()
    };
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (to stderr to not interfere with MCP stdio)
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config_flag = cli.config.clone();

    match cli.command {
        Commands::Init { force } => {
            let config_dir = path_resolver::get_config_dir();
            let config_path = config_dir.join("config.toml");

            eprintln!("Initializing wolmcp configuration...");
            eprintln!("Config directory: {}", config_dir.display());

            if !config_dir.exists() {
                std::fs::create_dir_all(&config_dir)?;
                eprintln!("Created config directory");
            }

            if config_path.exists() && !force {
                eprintln!("Configuration file already exists: {}", config_path.display());
                eprintln!("Use --force to overwrite");
                return Ok(());
            }

            let default_config = AppConfig::default();
            let toml_content = default_config.to_toml()?;
            std::fs::write(&config_path, &toml_content)?;

            eprintln!("Created configuration file: {}", config_path.display());
            eprintln!("\nConfiguration initialized successfully!");
            eprintln!("Edit {} to customize settings.", config_path.display());

            Ok(())
        }
        Commands::Serve => {
            let config = load_config(config_flag.as_deref())?;
            tracing::info!(
                "Starting MCP server (library: {})",
                config.library_base_url()
            );
            eprintln!("wolmcp MCP server starting...");

            let server = WolMcpServer::new(&config);
            eprintln!("Starting MCP stdio transport...");

            let transport = (stdin(), stdout());
            let service = server.serve(transport).await?;

            let _quit_reason = service.waiting().await?;
            Ok(())
        }
        Commands::Search {
            query,
            language,
            page,
            limit,
            sort,
            publications,
        } => {
            let config = load_config(config_flag.as_deref())?;
            let client = WolClient::from_config(&config);

            let mut options = SearchOptions::new()
                .with_page(page)
                .with_limit(limit)
                .with_sort(parse_sort(&sort))
                .with_publications(publications)
                .with_operator_validation(true)
                .with_language(config.default_language());
            if let Some(language) = language {
                options = options.with_language(language);
            }

            let response = client.search(&query, &options).await?;

            if response.results.is_empty() {
                println!("No results found for '{}'", query);
            } else {
                print!("{}", format_search_response(&query, &response));
            }
            Ok(())
        }
        Commands::Document { url, format } => {
            let config = load_config(config_flag.as_deref())?;
            let client = WolClient::from_config(&config);

            let document = client
                .get_document_by_url(&url, parse_document_format(&format))
                .await?;

            println!("Title: {}", document.title);
            if !document.publication.is_empty() {
                println!("Publication: {}", document.publication);
            }
            if let Some(date) = &document.metadata.date {
                println!("Date: {}", date);
            }
            println!("URL: {}\n", document.url);
            println!("{}", document.content);
            Ok(())
        }
        Commands::Subtitles {
            url,
            format,
            start,
            end,
        } => {
            let config = load_config(config_flag.as_deref())?;
            let client = WolClient::from_config(&config);

            let result = client
                .get_video_subtitles(&url, parse_subtitle_format(&format), start, end)
                .await?;

            println!("Title: {}", result.metadata.title);
            println!(
                "Track: {} ({})",
                result.metadata.track, result.metadata.language
            );
            println!("Duration: {:.1}s", result.metadata.duration);
            println!("Subtitle file: {}\n", result.vtt_url);
            if !result.plain_text.is_empty() {
                println!("{}", result.plain_text);
            }
            if !result.raw_vtt.is_empty() {
                println!("{}", result.raw_vtt);
            }
            Ok(())
        }
        Commands::Publications {
            category,
            language,
            year,
        } => {
            let config = load_config(config_flag.as_deref())?;
            let client = WolClient::from_config(&config);

            let publications = client
                .browse_publications(
                    category.as_deref(),
                    language.as_deref().or(Some(config.default_language())),
                    year,
                )
                .await?;

            println!("Found {} publications:\n", publications.len());
            for publication in &publications {
                print!("[{}] {}", publication.code, publication.name);
                if let Some(years) = &publication.years {
                    print!(" ({})", years);
                }
                println!("\n  {}", publication.description);
            }
            Ok(())
        }
    }
}
