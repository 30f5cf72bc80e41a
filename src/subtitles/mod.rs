//! Video subtitle extraction
//!
//! Pipeline: parse the share URL, resolve the identifier type, fetch media
//! metadata, select the first variant for the requested language, require a
//! subtitle track, fetch the VTT text, optionally time-filter, then clean
//! and convert per the requested output format.

pub mod finder;
pub mod media_api;
pub mod vtt;

pub use finder::{parse_finder_url, IdentifierType, VideoIdentifier};
pub use media_api::{fetch_media_metadata, select_video, MediaMetadataResponse};

use crate::error::WolError;
use crate::fetch::FetchClient;
use serde::{Deserialize, Serialize};

/// Which subtitle representations to fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    /// Cleaned cue markup only (`plain_text` left empty)
    Vtt,
    /// Plain text only (`raw_vtt` left empty)
    Text,
    /// Both representations
    #[default]
    Both,
}

/// Descriptive metadata for the selected video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub publication: String,
    /// Publication code or document id, as parsed from the share URL
    pub pub_code: String,
    pub track: String,
    pub language: String,
    /// Duration in seconds
    pub duration: f64,
    pub available_resolutions: Vec<String>,
    pub thumbnail_url: Option<String>,
}

/// Subtitles plus the metadata they belong to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSubtitleResult {
    pub metadata: VideoMetadata,
    pub vtt_url: String,
    pub raw_vtt: String,
    pub plain_text: String,
}

/// Fetch and transform subtitles for a shareable video URL.
///
/// `start`/`end` bound the retained cues in seconds; the window defaults to
/// the full video. Format masking: `vtt` zeroes `plain_text`, `text` zeroes
/// `raw_vtt`, `both` fills both.
pub async fn fetch_video_subtitles(
    fetch: &FetchClient,
    media_api_base: &str,
    url: &str,
    format: SubtitleFormat,
    start: Option<f64>,
    end: Option<f64>,
) -> Result<VideoSubtitleResult, WolError> {
    let ident = parse_finder_url(url)?;
    let metadata = fetch_media_metadata(fetch, media_api_base, &ident).await?;
    let (video, available_resolutions) = select_video(&metadata, &ident)?;

    let subtitle_url = video
        .subtitles
        .as_ref()
        .map(|track| track.url.clone())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| {
            WolError::not_found(format!(
                "Video {} (track {}) has no subtitle track for language '{}'",
                ident.id, ident.track, ident.language
            ))
        })?;

    let response = fetch
        .fetch_with_retry(&subtitle_url, "text/vtt")
        .await
        .map_err(|e| WolError::not_found(format!("Subtitle file unreachable: {}", e)))?;
    if !response.status().is_success() {
        return Err(WolError::not_found(format!(
            "Subtitle file fetch failed with status {} for {}",
            response.status(),
            subtitle_url
        )));
    }
    let vtt_text = response
        .text()
        .await
        .map_err(|e| WolError::not_found(format!("Subtitle file unreadable: {}", e)))?;

    let duration = video.duration.unwrap_or(0.0);
    let filtered = if start.is_some() || end.is_some() {
        let window_start = start.unwrap_or(0.0);
        let window_end = end.unwrap_or(if duration > 0.0 { duration } else { f64::MAX });
        vtt::filter_by_time(&vtt_text, window_start, window_end)
    } else {
        vtt_text
    };

    let raw_vtt = match format {
        SubtitleFormat::Text => String::new(),
        _ => vtt::clean_positioning(&filtered),
    };
    let plain_text = match format {
        SubtitleFormat::Vtt => String::new(),
        _ => vtt::to_plain_text(&filtered),
    };

    let video_metadata = VideoMetadata {
        title: video
            .title
            .clone()
            .or_else(|| metadata.pub_name.clone())
            .unwrap_or_default(),
        publication: metadata.pub_name.clone().unwrap_or_default(),
        pub_code: ident.id.clone(),
        track: ident.track.clone(),
        language: ident.language.clone(),
        duration,
        available_resolutions,
        thumbnail_url: video.track_image.as_ref().and_then(|img| img.url.clone()),
    };

    Ok(VideoSubtitleResult {
        metadata: video_metadata,
        vtt_url: subtitle_url,
        raw_vtt,
        plain_text,
    })
}
