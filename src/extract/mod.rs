//! Content extraction engine
//!
//! Translates loosely-structured upstream HTML into typed records:
//! - `search_results`: search pages → categorized, paginated results
//! - `document`: document pages → structured content with absolutized
//!   links and inlined citation references
//!
//! Extraction degrades gracefully: containers missing required pieces are
//! skipped, counts and texts fall back to defaults, and only a page with no
//! usable content root fails (loudly, as a parse error).

pub mod document;
pub mod search_results;

pub use document::{
    extract_document, Document, DocumentMetadata, SimilarMaterial, Subheading,
};
pub use search_results::{
    extract_search_results, ResultType, SearchPagination, SearchResponse, SearchResult, PAGE_SIZE,
};
