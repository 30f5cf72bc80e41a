//! Search-results page extractor
//!
//! Scans two disjoint container classes on the upstream search page:
//! "key publication" cards and ordinary document results. Each category has
//! its own markup shape; a container without a caption link never emits a
//! partial result.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

/// Fixed upstream page size
pub const PAGE_SIZE: u32 = 40;

/// Snippet truncation length
const SNIPPET_MAX_CHARS: usize = 150;

static KEY_PUBLICATION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".searchResult.publication").expect("valid selector"));
static DOCUMENT_RESULT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".searchResult.document").expect("valid selector"));
static CAPTION_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".caption a").expect("valid selector"));
static PUBLICATION_REF: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".ref").expect("valid selector"));
static SUBHEADING: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".subheadings a").expect("valid selector"));
static OCCURRENCES: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".occurrences").expect("valid selector"));
static EXCERPT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".excerpts p").expect("valid selector"));
static RESULTS_COUNT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".resultsCount").expect("valid selector"));
static SELECTED_PAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".pagination .selected").expect("valid selector"));

static FIRST_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d[\d,]*)").unwrap());

/// Upstream-defined result categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    /// Featured publication card with its own subheading list
    KeyPublication,
    /// Ordinary document hit with occurrence count and excerpts
    DocumentResult,
}

/// One extracted search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    /// Summary text; for document results this is the first excerpt
    pub snippet: String,
    pub publication: String,
    /// Occurrence count badge, when present and numeric
    pub occurrences: Option<u32>,
    /// Numeric trailing path segment of the result URL, when present
    pub document_id: Option<String>,
    pub result_type: ResultType,
    /// Ordered subheading texts (key publications only)
    #[serde(default)]
    pub subheadings: Vec<String>,
    /// All excerpt snippets (document results only)
    #[serde(default)]
    pub context_snippets: Vec<String>,
}

/// Pagination derived from the results-count badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPagination {
    pub total_results: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub current_page: u32,
}

impl SearchPagination {
    /// Derive pagination from a result total; `total_pages` is never zero.
    pub fn from_total(total_results: u32, current_page: u32) -> Self {
        Self {
            total_results,
            page_size: PAGE_SIZE,
            total_pages: total_results.div_ceil(PAGE_SIZE).max(1),
            current_page,
        }
    }

    /// Empty pagination for a page with no results
    pub fn empty(current_page: u32) -> Self {
        Self::from_total(0, current_page)
    }
}

/// Extracted search page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub pagination: SearchPagination,
}

impl SearchResponse {
    /// Response for an empty (or 404) results page
    pub fn empty(current_page: u32) -> Self {
        Self {
            results: Vec::new(),
            pagination: SearchPagination::empty(current_page),
        }
    }
}

/// Parse a search-results page.
///
/// Never fails: missing pieces fall back to defaults and containers without
/// a caption link are skipped entirely.
pub fn extract_search_results(html: &str) -> SearchResponse {
    let page = Html::parse_document(html);

    let mut results = Vec::new();

    for container in page.select(&KEY_PUBLICATION) {
        if let Some(result) = extract_key_publication(container) {
            results.push(result);
        }
    }

    for container in page.select(&DOCUMENT_RESULT) {
        if let Some(result) = extract_document_result(container) {
            results.push(result);
        }
    }

    let total_results = page
        .select(&RESULTS_COUNT)
        .next()
        .and_then(|el| parse_count(&element_text(el)))
        .unwrap_or(0);

    let current_page = page
        .select(&SELECTED_PAGE)
        .next()
        .and_then(|el| element_text(el).trim().parse::<u32>().ok())
        .unwrap_or(1);

    SearchResponse {
        results,
        pagination: SearchPagination::from_total(total_results, current_page),
    }
}

fn extract_key_publication(container: ElementRef) -> Option<SearchResult> {
    let caption = container.select(&CAPTION_LINK).next()?;
    let title = element_text(caption).trim().to_string();
    let url = caption.value().attr("href")?.to_string();

    let publication = container
        .select(&PUBLICATION_REF)
        .next()
        .map(|el| element_text(el).trim().to_string())
        .unwrap_or_default();

    let subheadings: Vec<String> = container
        .select(&SUBHEADING)
        .map(|el| element_text(el).trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    Some(SearchResult {
        title,
        snippet: String::new(),
        publication,
        occurrences: None,
        document_id: trailing_digit_segment(&url),
        result_type: ResultType::KeyPublication,
        subheadings,
        context_snippets: Vec::new(),
        url,
    })
}

fn extract_document_result(container: ElementRef) -> Option<SearchResult> {
    let caption = container.select(&CAPTION_LINK).next()?;
    let title = element_text(caption).trim().to_string();
    let url = caption.value().attr("href")?.to_string();

    let occurrences = container
        .select(&OCCURRENCES)
        .next()
        .and_then(|el| parse_count(&element_text(el)));

    let publication = container
        .select(&PUBLICATION_REF)
        .next()
        .map(|el| element_text(el).trim().to_string())
        .unwrap_or_default();

    let context_snippets: Vec<String> = container
        .select(&EXCERPT)
        .map(|el| truncate_snippet(element_text(el).trim()))
        .filter(|text| !text.is_empty())
        .collect();

    let snippet = context_snippets.first().cloned().unwrap_or_default();

    Some(SearchResult {
        title,
        snippet,
        publication,
        occurrences,
        document_id: trailing_digit_segment(&url),
        result_type: ResultType::DocumentResult,
        subheadings: Vec::new(),
        context_snippets,
        url,
    })
}

/// Collect an element's text content
fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>()
}

/// Parse a count badge: first integer, thousands separators stripped
fn parse_count(text: &str) -> Option<u32> {
    let raw = FIRST_INTEGER.captures(text)?.get(1)?.as_str();
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Truncate a snippet to the display length, marking truncation
fn truncate_snippet(text: &str) -> String {
    if text.chars().count() <= SNIPPET_MAX_CHARS {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(SNIPPET_MAX_CHARS).collect();
        format!("{}...", truncated)
    }
}

/// Last all-digit path segment of a (possibly relative) URL
fn trailing_digit_segment(href: &str) -> Option<String> {
    let path = href
        .split(['?', '#'])
        .next()
        .unwrap_or(href);
    path.rsplit('/')
        .find(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_digit()))
        .map(|seg| seg.to_string())
}
