//! Library client
//!
//! `WolClient` is the facade behind every tool: it owns the fetch layer,
//! the routing/publication tables, and the converter, and exposes the four
//! public operations. Typed errors raised by inner layers pass through
//! unchanged; anything else is wrapped into `WolError::Network` with the
//! offending query or URL. The single recovery special case: an upstream
//! 404 on search maps to an empty successful result set, since an empty
//! page is a valid outcome for a sparse query.

use crate::catalog::{Publication, PublicationCatalog};
use crate::config::AppConfig;
use crate::convert::{MarkupConverter, RegexConverter};
use crate::error::WolError;
use crate::extract::{extract_document, extract_search_results, Document, SearchResponse};
use crate::fetch::{FetchClient, RetryPolicy};
use crate::resolver::{
    build_search_url, normalize_language, validate_document_url, LanguageRouter, SearchOptions,
};
use crate::subtitles::{self, SubtitleFormat, VideoSubtitleResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Output format for document content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Markdown,
    Text,
    /// Extracted fragment as-is
    Html,
}

/// Facade over the extraction/fetch core
pub struct WolClient {
    fetch: FetchClient,
    router: LanguageRouter,
    catalog: PublicationCatalog,
    converter: RegexConverter,
    library_base: String,
    media_api_base: String,
}

impl Default for WolClient {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl WolClient {
    /// Build a client from application configuration
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            fetch: FetchClient::new(
                RetryPolicy::new(config.max_attempts()),
                Duration::from_secs(config.timeout_secs()),
            ),
            router: LanguageRouter::new(),
            catalog: PublicationCatalog::new(),
            converter: RegexConverter::new(),
            library_base: config.library_base_url().to_string(),
            media_api_base: config.media_api_base_url().to_string(),
        }
    }

    /// Substitute the routing table (testing)
    pub fn with_router(mut self, router: LanguageRouter) -> Self {
        self.router = router;
        self
    }

    /// Substitute the publication table (testing)
    pub fn with_catalog(mut self, catalog: PublicationCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Search the library.
    ///
    /// An upstream 404 yields an empty response with the requested page as
    /// `current_page`.
    pub async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResponse, WolError> {
        let url = build_search_url(&self.library_base, query, options, &self.router)?;
        tracing::debug!("Searching: {}", url);

        let response = self.fetch.fetch_with_retry(url.as_str(), "text/html").await?;
        let status = response.status();

        if status.as_u16() == 404 {
            return Ok(SearchResponse::empty(options.page));
        }
        if matches!(status.as_u16(), 502 | 503) {
            return Err(WolError::service_unavailable(format!(
                "Search returned status {} for '{}'",
                status, query
            )));
        }
        if !status.is_success() {
            return Err(WolError::network(format!(
                "Search returned unexpected status {} for '{}'",
                status, query
            )));
        }

        let html = response.text().await.map_err(|e| {
            WolError::network(format!("Failed to read search page for '{}': {}", query, e))
        })?;

        let mut parsed = extract_search_results(&html);
        if let Some(limit) = options.limit {
            parsed.results.truncate(limit);
        }
        Ok(parsed)
    }

    /// Fetch one document by its library URL and convert its content.
    pub async fn get_document_by_url(
        &self,
        url: &str,
        format: DocumentFormat,
    ) -> Result<Document, WolError> {
        let canonical = validate_document_url(url)?;
        tracing::debug!("Fetching document: {}", canonical);

        let response = self
            .fetch
            .fetch_with_retry(canonical.as_str(), "text/html")
            .await?;
        let status = response.status();

        if status.as_u16() == 404 {
            return Err(WolError::not_found(format!("Document not found: {}", canonical)));
        }
        if matches!(status.as_u16(), 502 | 503) {
            return Err(WolError::service_unavailable(format!(
                "Document fetch returned status {} for {}",
                status, canonical
            )));
        }
        if !status.is_success() {
            return Err(WolError::network(format!(
                "Document fetch returned unexpected status {} for {}",
                status, canonical
            )));
        }

        let html = response.text().await.map_err(|e| {
            WolError::network(format!("Failed to read document page {}: {}", canonical, e))
        })?;

        let mut document = extract_document(&html, &canonical)?;
        document.url = canonical.to_string();

        // Non-breaking spaces (entity and Unicode forms) before conversion
        let content = document
            .content
            .replace("&nbsp;", " ")
            .replace('\u{a0}', " ");
        document.content = match format {
            DocumentFormat::Markdown => self.converter.to_markdown(&content),
            DocumentFormat::Text => self.converter.to_plain_text(&content),
            DocumentFormat::Html => content,
        };

        Ok(document)
    }

    /// Browse the static publication catalog.
    pub async fn browse_publications(
        &self,
        category: Option<&str>,
        language: Option<&str>,
        year: Option<u16>,
    ) -> Result<Vec<Publication>, WolError> {
        let language = normalize_language(language);
        Ok(self.catalog.browse(category, &language, year))
    }

    /// Fetch subtitles for a shareable video URL.
    pub async fn get_video_subtitles(
        &self,
        url: &str,
        format: SubtitleFormat,
        start: Option<f64>,
        end: Option<f64>,
    ) -> Result<VideoSubtitleResult, WolError> {
        subtitles::fetch_video_subtitles(&self.fetch, &self.media_api_base, url, format, start, end)
            .await
    }
}
