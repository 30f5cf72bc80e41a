//! Shareable video URL parsing
//!
//! Share links carry the video identity in the `lank` query parameter and
//! the language in `wtlocale` (or `appLanguage`). Two identifier shapes are
//! recognized: `pub-{id}_{track}_VIDEO` (publication code; the id itself
//! may contain hyphens or underscores) and `docid-{id}_{track}_VIDEO`
//! (numeric document id).

use crate::error::WolError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

static PUB_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^pub-(.+)_([^_]+)_VIDEO$").unwrap());
static DOCID_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^docid-(\d+)_([^_]+)_VIDEO$").unwrap());

/// Which media-API parameter carries the identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierType {
    /// Publication code (`pub` parameter)
    Pub,
    /// Numeric document id (`docid` parameter)
    DocId,
}

impl IdentifierType {
    /// Media-API query parameter name for this identifier type
    pub fn as_query_param(&self) -> &'static str {
        match self {
            IdentifierType::Pub => "pub",
            IdentifierType::DocId => "docid",
        }
    }
}

/// Parsed video identity from a share link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoIdentifier {
    pub id: String,
    pub track: String,
    pub language: String,
    pub id_type: IdentifierType,
}

/// Parse a shareable video URL into its identifier.
///
/// Unrecognized identifiers fail with an error naming the string; a missing
/// language parameter is fatal.
pub fn parse_finder_url(input: &str) -> Result<VideoIdentifier, WolError> {
    let url = Url::parse(input)
        .map_err(|_| WolError::invalid_query(format!("Not a valid video URL: '{}'", input)))?;

    let query_param = |name: &str| {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
    };

    let lank = query_param("lank").ok_or_else(|| {
        WolError::invalid_query(format!("Video URL is missing the 'lank' parameter: '{}'", input))
    })?;

    let language = query_param("wtlocale")
        .or_else(|| query_param("appLanguage"))
        .ok_or_else(|| {
            WolError::invalid_query(format!(
                "Video URL has no 'wtlocale' or 'appLanguage' parameter: '{}'",
                input
            ))
        })?;

    let (id, track, id_type) = if let Some(caps) = PUB_IDENTIFIER.captures(&lank) {
        (caps[1].to_string(), caps[2].to_string(), IdentifierType::Pub)
    } else if let Some(caps) = DOCID_IDENTIFIER.captures(&lank) {
        (caps[1].to_string(), caps[2].to_string(), IdentifierType::DocId)
    } else {
        return Err(WolError::invalid_query(format!(
            "Unrecognized video identifier: '{}'",
            lank
        )));
    };

    Ok(VideoIdentifier {
        id,
        track,
        language,
        id_type,
    })
}
