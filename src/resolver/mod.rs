//! URL resolver
//!
//! Builds and validates upstream URLs from logical parameters:
//! - search URLs from a query plus `SearchOptions` (routing pair looked up
//!   per language)
//! - document URLs validated against the recognized library host and the
//!   document-path pattern, then canonicalized

pub mod routing;

pub use routing::{normalize_language, LanguageRouter, RoutingEntry};

use crate::error::WolError;
use serde::{Deserialize, Serialize};
use url::Url;

/// Hosts recognized as the document library
const LIBRARY_HOSTS: &[&str] = &["wol.jw.org"];

/// Path marker every document URL carries
const DOCUMENT_PATH_MARKER: &str = "/wol/d/";

/// Query parameters preserved by document-URL canonicalization
const ALLOWED_DOCUMENT_PARAMS: &[&str] = &["q", "p"];

/// Sort order for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recent content first
    Newest,
    /// Oldest content first
    Oldest,
    /// Most occurrences of the query first
    #[default]
    Occurrences,
}

impl SortOrder {
    /// Upstream vocabulary for the `r` query field
    pub fn as_query_value(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::Occurrences => "occ",
        }
    }
}

/// Options controlling a library search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Search scope (upstream `p` field; vocabulary is upstream-defined)
    pub scope: String,
    /// Publication filters, emitted as repeated `fc[]` fields
    pub publications: Vec<String>,
    /// Language tag; normalized before routing lookup
    pub language: Option<String>,
    /// Result ordering
    pub sort: SortOrder,
    /// 1-based page number
    pub page: u32,
    /// Cap on returned results (applied after extraction)
    pub limit: Option<usize>,
    /// Reject queries with malformed search operators
    pub validate_operators: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            scope: "par".to_string(),
            publications: Vec::new(),
            language: None,
            sort: SortOrder::default(),
            page: 1,
            limit: None,
            validate_operators: false,
        }
    }
}

impl SearchOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the language tag
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the page number
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the sort order
    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Set publication filters
    pub fn with_publications(mut self, publications: Vec<String>) -> Self {
        self.publications = publications;
        self
    }

    /// Set the result cap
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Enable operator validation
    pub fn with_operator_validation(mut self, validate: bool) -> Self {
        self.validate_operators = validate;
        self
    }
}

/// Build the upstream search URL for a query.
///
/// Path shape: `{base}/{lang}/wol/s/{rsconf}/lp-{lp}`. The `pg` field is
/// omitted for page 1.
pub fn build_search_url(
    base: &str,
    query: &str,
    options: &SearchOptions,
    router: &LanguageRouter,
) -> Result<Url, WolError> {
    if options.validate_operators {
        validate_search_operators(query)?;
    }

    let (lang, entry) = router.resolve(options.language.as_deref());

    let mut url = Url::parse(base)
        .map_err(|e| WolError::invalid_query(format!("Bad base URL '{}': {}", base, e)))?;
    url.set_path(&format!(
        "/{}/wol/s/{}/lp-{}",
        lang, entry.rsconf, entry.lp
    ));

    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("q", query);
        pairs.append_pair("p", &options.scope);
        pairs.append_pair("r", options.sort.as_query_value());
        pairs.append_pair("st", "a");
        for publication in &options.publications {
            pairs.append_pair("fc[]", publication);
        }
        if options.page > 1 {
            pairs.append_pair("pg", &options.page.to_string());
        }
    }

    Ok(url)
}

/// Validate a document URL and canonicalize it.
///
/// Rejects non-URLs, hosts outside the library, and paths without the
/// document marker. Strips every query parameter except `q` and `p` and
/// drops the fragment.
pub fn validate_document_url(input: &str) -> Result<Url, WolError> {
    let mut url = Url::parse(input)
        .map_err(|_| WolError::invalid_query(format!("Not a valid URL: '{}'", input)))?;

    let host = url
        .host_str()
        .ok_or_else(|| WolError::invalid_query(format!("URL has no host: '{}'", input)))?;
    if !LIBRARY_HOSTS.contains(&host) {
        return Err(WolError::invalid_query(format!(
            "'{}' is not a recognized document-library host",
            host
        )));
    }

    if !url.path().contains(DOCUMENT_PATH_MARKER) {
        return Err(WolError::invalid_query(format!(
            "'{}' is not a document path (missing {})",
            url.path(),
            DOCUMENT_PATH_MARKER
        )));
    }

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| ALLOWED_DOCUMENT_PARAMS.contains(&k.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.set_query(None);
    url.set_fragment(None);
    if !kept.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
    }

    Ok(url)
}

/// Extract the document id: the last all-digit path segment, scanned from
/// the end.
pub fn extract_document_id(url: &Url) -> Option<String> {
    url.path_segments()?
        .rev()
        .find(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_digit()))
        .map(|seg| seg.to_string())
}

/// Reject queries whose search operators are malformed: unbalanced double
/// quotes, or a boolean operator with nothing on one side.
pub fn validate_search_operators(query: &str) -> Result<(), WolError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(WolError::invalid_query("Search query is empty"));
    }

    if trimmed.matches('"').count() % 2 != 0 {
        return Err(WolError::invalid_query(format!(
            "Unbalanced quotes in query: '{}'",
            trimmed
        )));
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if let Some(first) = tokens.first() {
        if matches!(*first, "AND" | "OR" | "NOT") {
            return Err(WolError::invalid_query(format!(
                "Query starts with operator '{}'",
                first
            )));
        }
    }
    if let Some(last) = tokens.last() {
        if matches!(*last, "AND" | "OR" | "NOT") {
            return Err(WolError::invalid_query(format!(
                "Query ends with operator '{}'",
                last
            )));
        }
    }

    Ok(())
}
