//! wolmcp: Watchtower Online Library MCP server
//!
//! This library exposes read-only research access to the Watchtower Online
//! Library (wol.jw.org) and the publication-media API: full-text search,
//! document extraction with markdown conversion, publication browsing, and
//! video subtitle retrieval.
//!
//! # Features
//!
//! - Library search with language routing and operator validation
//! - Document extraction with citation unwrapping and link absolutization
//! - HTML-to-markdown and HTML-to-plain-text conversion
//! - Static publication catalog browsing
//! - WebVTT subtitle fetching, time-window filtering, and cleanup
//! - MCP server for AI assistant integration
//!
//! # Modules
//!
//! - `config`: Application configuration and config-path resolution
//! - `error`: The typed error union shared by every operation
//! - `fetch`: HTTP client with retry and exponential backoff
//! - `resolver`: Language routing, search URL building, document URL validation
//! - `extract`: HTML extraction for search result pages and documents
//! - `convert`: Markup-to-markdown/plain-text conversion
//! - `subtitles`: Video identifier parsing, media metadata, VTT processing
//! - `catalog`: Static publication table
//! - `client`: The facade combining the above into the four public operations

pub mod catalog;
pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod resolver;
pub mod subtitles;

// Re-export commonly used types
pub use client::{DocumentFormat, WolClient};
pub use error::{ErrorKind, WolError};
pub use extract::{Document, SearchResponse, SearchResult};
pub use resolver::{SearchOptions, SortOrder};
pub use subtitles::{SubtitleFormat, VideoSubtitleResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
