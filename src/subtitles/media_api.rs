//! Publication-media metadata API client
//!
//! Queries the fixed JSON endpoint for a video's file variants. The
//! identifier goes under its type-specific parameter name (`pub` or
//! `docid`) and the language under two parameter aliases.

use crate::error::WolError;
use crate::fetch::FetchClient;
use crate::subtitles::finder::VideoIdentifier;
use serde::Deserialize;
use std::collections::HashMap;
use url::Url;

/// Endpoint path under the media API base
const MEDIA_ENDPOINT: &str = "GETPUBMEDIALINKS";

/// Top-level media metadata response
#[derive(Debug, Clone, Deserialize)]
pub struct MediaMetadataResponse {
    /// Publication display name
    #[serde(rename = "pubName", default)]
    pub pub_name: Option<String>,
    /// Per-language file variants, keyed by language code
    #[serde(default)]
    pub files: HashMap<String, LanguageFiles>,
}

/// File variants for one language
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LanguageFiles {
    #[serde(rename = "MP4", default)]
    pub mp4: Vec<MediaFile>,
}

/// One video variant
#[derive(Debug, Clone, Deserialize)]
pub struct MediaFile {
    #[serde(default)]
    pub title: Option<String>,
    /// Resolution label, e.g. "720p"
    #[serde(default)]
    pub label: Option<String>,
    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub subtitles: Option<SubtitleTrack>,
    #[serde(rename = "trackImage", default)]
    pub track_image: Option<ImageRef>,
}

/// Subtitle track reference
#[derive(Debug, Clone, Deserialize)]
pub struct SubtitleTrack {
    pub url: String,
}

/// Image reference
#[derive(Debug, Clone, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub url: Option<String>,
}

/// Fetch media metadata for a parsed video identifier.
///
/// A 404 means the video does not exist (`NotFound`); any other non-OK
/// status is `ServiceUnavailable`.
pub async fn fetch_media_metadata(
    fetch: &FetchClient,
    base_url: &str,
    ident: &VideoIdentifier,
) -> Result<MediaMetadataResponse, WolError> {
    let url = build_media_url(base_url, ident)?;

    let response = fetch
        .fetch_with_retry(url.as_str(), "application/json")
        .await?;
    let status = response.status();

    if status.as_u16() == 404 {
        return Err(WolError::not_found(format!(
            "No media found for {} (track {}, language {})",
            ident.id, ident.track, ident.language
        )));
    }
    if !status.is_success() {
        return Err(WolError::service_unavailable(format!(
            "Media API returned status {} for {}",
            status, ident.id
        )));
    }

    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| WolError::parse(format!("Malformed media metadata for {}: {}", ident.id, e)))
}

/// Build the metadata endpoint URL with percent-encoded query values
fn build_media_url(base_url: &str, ident: &VideoIdentifier) -> Result<Url, WolError> {
    let mut url = Url::parse(base_url).map_err(|e| {
        WolError::invalid_query(format!("Bad media API base URL '{}': {}", base_url, e))
    })?;
    url.path_segments_mut()
        .map_err(|_| {
            WolError::invalid_query(format!(
                "Media API base URL cannot carry a path: '{}'",
                base_url
            ))
        })?
        .pop_if_empty()
        .push(MEDIA_ENDPOINT);
    url.query_pairs_mut()
        .append_pair("output", "json")
        .append_pair(ident.id_type.as_query_param(), &ident.id)
        .append_pair("track", &ident.track)
        .append_pair("langwritten", &ident.language)
        .append_pair("txtCMSLang", &ident.language);
    Ok(url)
}

/// Select the first video variant for the requested language.
///
/// Returns the variant plus the labels of every variant (the available
/// resolutions). Missing language files are `NotFound`.
pub fn select_video<'a>(
    metadata: &'a MediaMetadataResponse,
    ident: &VideoIdentifier,
) -> Result<(&'a MediaFile, Vec<String>), WolError> {
    let language_files = metadata.files.get(&ident.language).ok_or_else(|| {
        WolError::not_found(format!(
            "No video files for language '{}' on {}",
            ident.language, ident.id
        ))
    })?;

    let first = language_files.mp4.first().ok_or_else(|| {
        WolError::not_found(format!(
            "No video variants for language '{}' on {}",
            ident.language, ident.id
        ))
    })?;

    let resolutions = language_files
        .mp4
        .iter()
        .filter_map(|f| f.label.clone())
        .collect();

    Ok((first, resolutions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtitles::finder::IdentifierType;

    fn ident() -> VideoIdentifier {
        VideoIdentifier {
            id: "jwbvod25".to_string(),
            track: "41".to_string(),
            language: "E".to_string(),
            id_type: IdentifierType::Pub,
        }
    }

    const METADATA_JSON: &str = r#"{
        "pubName": "JW Broadcasting",
        "files": {
            "E": {
                "MP4": [
                    {"title": "Clip", "label": "240p", "duration": 95.5,
                     "subtitles": {"url": "https://cdn.example.org/clip.vtt"},
                     "trackImage": {"url": "https://cdn.example.org/clip.jpg"}},
                    {"title": "Clip", "label": "720p", "duration": 95.5}
                ]
            }
        }
    }"#;

    #[test]
    fn test_build_media_url_shape() {
        let url = build_media_url("https://api.example.org/apis/pub-media", &ident()).unwrap();
        assert_eq!(url.path(), "/apis/pub-media/GETPUBMEDIALINKS");
        let query = url.query().unwrap();
        assert!(query.contains("output=json"));
        assert!(query.contains("pub=jwbvod25"));
        assert!(query.contains("track=41"));
        assert!(query.contains("langwritten=E"));
        assert!(query.contains("txtCMSLang=E"));
    }

    #[test]
    fn test_build_media_url_percent_encodes_values() {
        let mut odd = ident();
        odd.track = "4 1&x".to_string();
        let url = build_media_url("https://api.example.org", &odd).unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("track=4+1%26x"));
        assert!(!query.contains(' '));
    }

    #[test]
    fn test_build_media_url_trailing_slash_base() {
        let url = build_media_url("https://api.example.org/apis/pub-media/", &ident()).unwrap();
        assert_eq!(url.path(), "/apis/pub-media/GETPUBMEDIALINKS");
    }

    #[test]
    fn test_metadata_deserialization() {
        let metadata: MediaMetadataResponse = serde_json::from_str(METADATA_JSON).unwrap();
        assert_eq!(metadata.pub_name.as_deref(), Some("JW Broadcasting"));
        assert_eq!(metadata.files["E"].mp4.len(), 2);
    }

    #[test]
    fn test_select_video_picks_first_variant() {
        let metadata: MediaMetadataResponse = serde_json::from_str(METADATA_JSON).unwrap();
        let (file, resolutions) = select_video(&metadata, &ident()).unwrap();
        assert_eq!(file.label.as_deref(), Some("240p"));
        assert!(file.subtitles.is_some());
        assert_eq!(resolutions, vec!["240p", "720p"]);
    }

    #[test]
    fn test_select_video_missing_language() {
        let metadata: MediaMetadataResponse = serde_json::from_str(METADATA_JSON).unwrap();
        let mut wrong = ident();
        wrong.language = "X".to_string();
        let err = select_video(&metadata, &wrong).unwrap_err();
        assert!(matches!(err, WolError::NotFound(_)));
        assert!(err.to_string().contains("X"));
    }

    #[test]
    fn test_select_video_empty_variants() {
        let metadata: MediaMetadataResponse =
            serde_json::from_str(r#"{"files": {"E": {"MP4": []}}}"#).unwrap();
        assert!(matches!(
            select_video(&metadata, &ident()),
            Err(WolError::NotFound(_))
        ));
    }
}
