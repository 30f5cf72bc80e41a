//! Error types for upstream access and extraction
//!
//! All public operations return `WolError`, a tagged union of the failure
//! classes the upstream can produce. Callers can branch exhaustively on
//! `ErrorKind` instead of probing for bolted-on fields.

use thiserror::Error;

/// Failure classes for library operations
#[derive(Debug, Error)]
pub enum WolError {
    /// Malformed query, URL, or identifier supplied by the caller
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Upstream has no content for the request (404, missing track, etc.)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream answered but is unable to serve (502/503)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Connection, DNS, timeout, or any unclassified failure
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream markup could not be turned into a structured result
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Discriminant for exhaustive error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidQuery,
    NotFound,
    ServiceUnavailable,
    Network,
    Parse,
}

impl WolError {
    /// Create an invalid-query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        WolError::InvalidQuery(message.into())
    }

    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        WolError::NotFound(message.into())
    }

    /// Create a service-unavailable error
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        WolError::ServiceUnavailable(message.into())
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        WolError::Network(message.into())
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        WolError::Parse(message.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            WolError::InvalidQuery(_) => ErrorKind::InvalidQuery,
            WolError::NotFound(_) => ErrorKind::NotFound,
            WolError::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            WolError::Network(_) => ErrorKind::Network,
            WolError::Parse(_) => ErrorKind::Parse,
        }
    }
}

impl From<reqwest::Error> for WolError {
    fn from(err: reqwest::Error) -> Self {
        WolError::Network(err.to_string())
    }
}

impl From<url::ParseError> for WolError {
    fn from(err: url::ParseError) -> Self {
        WolError::InvalidQuery(format!("Malformed URL: {}", err))
    }
}
