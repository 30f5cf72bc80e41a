//! Subtitle pipeline integration tests
//!
//! Exercises the full flow against a mock media API: identifier parsing,
//! metadata fetch, variant selection, VTT fetch, time-window filtering, and
//! output-format masking.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wolmcp::client::WolClient;
use wolmcp::config::AppConfig;
use wolmcp::error::WolError;
use wolmcp::subtitles::SubtitleFormat;

const SHARE_URL: &str = "https://www.jw.org/finder?lank=pub-jwbvod25_41_VIDEO&wtlocale=E";

const VTT_BODY: &str = "WEBVTT\n\n1\n00:00:05.000 --> 00:00:08.000 line:85% align:center\nFirst caption,\n\n2\n00:00:08.000 --> 00:00:12.000\ncontinued here.\n\n3\n00:01:30.000 --> 00:01:35.000\nA late caption.\n";

fn metadata_json(server_uri: &str) -> String {
    format!(
        r#"{{
            "pubName": "Sample Series",
            "files": {{
                "E": {{
                    "MP4": [
                        {{"title": "Sample Video", "label": "240p", "duration": 120.0,
                         "subtitles": {{"url": "{uri}/subs/clip.vtt"}},
                         "trackImage": {{"url": "{uri}/img/clip.jpg"}}}},
                        {{"title": "Sample Video", "label": "720p", "duration": 120.0}}
                    ]
                }}
            }}
        }}"#,
        uri = server_uri
    )
}

async fn mount_happy_path(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/GETPUBMEDIALINKS"))
        .and(query_param("pub", "jwbvod25"))
        .and(query_param("track", "41"))
        .and(query_param("langwritten", "E"))
        .respond_with(ResponseTemplate::new(200).set_body_string(metadata_json(&server.uri())))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/subs/clip.vtt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(VTT_BODY))
        .mount(server)
        .await;
}

fn client_for(server: &MockServer) -> WolClient {
    let config = AppConfig::default().with_media_api_base_url(&server.uri());
    WolClient::from_config(&config)
}

#[tokio::test]
async fn test_full_pipeline_both_formats() {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;

    let client = client_for(&server);
    let result = client
        .get_video_subtitles(SHARE_URL, SubtitleFormat::Both, None, None)
        .await
        .unwrap();

    assert_eq!(result.metadata.title, "Sample Video");
    assert_eq!(result.metadata.publication, "Sample Series");
    assert_eq!(result.metadata.pub_code, "jwbvod25");
    assert_eq!(result.metadata.track, "41");
    assert_eq!(result.metadata.language, "E");
    assert_eq!(result.metadata.duration, 120.0);
    assert_eq!(result.metadata.available_resolutions, vec!["240p", "720p"]);
    assert!(result.vtt_url.ends_with("/subs/clip.vtt"));

    // Both representations filled, with positioning stripped from the VTT
    assert!(result.raw_vtt.contains("-->"));
    assert!(!result.raw_vtt.contains("line:"));
    assert_eq!(
        result.plain_text,
        "First caption, continued here.\nA late caption."
    );
}

#[tokio::test]
async fn test_vtt_format_masks_plain_text() {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;

    let client = client_for(&server);
    let result = client
        .get_video_subtitles(SHARE_URL, SubtitleFormat::Vtt, None, None)
        .await
        .unwrap();

    assert!(!result.raw_vtt.is_empty());
    assert!(result.plain_text.is_empty());
}

#[tokio::test]
async fn test_text_format_masks_raw_vtt() {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;

    let client = client_for(&server);
    let result = client
        .get_video_subtitles(SHARE_URL, SubtitleFormat::Text, None, None)
        .await
        .unwrap();

    assert!(result.raw_vtt.is_empty());
    assert!(!result.plain_text.is_empty());
}

#[tokio::test]
async fn test_time_window_drops_cues_outside() {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;

    let client = client_for(&server);
    let result = client
        .get_video_subtitles(SHARE_URL, SubtitleFormat::Both, Some(0.0), Some(15.0))
        .await
        .unwrap();

    assert!(result.plain_text.contains("First caption"));
    assert!(!result.plain_text.contains("late caption"));
}

#[tokio::test]
async fn test_start_only_window_runs_to_end() {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;

    let client = client_for(&server);
    let result = client
        .get_video_subtitles(SHARE_URL, SubtitleFormat::Both, Some(60.0), None)
        .await
        .unwrap();

    assert!(!result.plain_text.contains("First caption"));
    assert!(result.plain_text.contains("late caption"));
}

#[tokio::test]
async fn test_media_api_404_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/GETPUBMEDIALINKS"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .get_video_subtitles(SHARE_URL, SubtitleFormat::Both, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, WolError::NotFound(_)));
}

#[tokio::test]
async fn test_media_api_503_is_service_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/GETPUBMEDIALINKS"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .get_video_subtitles(SHARE_URL, SubtitleFormat::Both, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, WolError::ServiceUnavailable(_)));
}

#[tokio::test]
async fn test_unreachable_subtitle_file_is_not_found() {
    let server = MockServer::start().await;
    // Port 1 is reserved and nothing listens on it.
    Mock::given(method("GET"))
        .and(path("/GETPUBMEDIALINKS"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"pubName": "Sample", "files": {"E": {"MP4": [{"title": "x", "label": "240p", "duration": 10.0, "subtitles": {"url": "http://127.0.0.1:1/clip.vtt"}}]}}}"#,
        ))
        .mount(&server)
        .await;

    let config = AppConfig::default()
        .with_media_api_base_url(&server.uri())
        .with_max_attempts(1);
    let client = WolClient::from_config(&config);
    let err = client
        .get_video_subtitles(SHARE_URL, SubtitleFormat::Both, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, WolError::NotFound(_)));
}

#[tokio::test]
async fn test_variant_without_subtitles_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/GETPUBMEDIALINKS"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"pubName": "Sample", "files": {"E": {"MP4": [{"title": "x", "label": "240p", "duration": 10.0}]}}}"#,
        ))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .get_video_subtitles(SHARE_URL, SubtitleFormat::Both, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, WolError::NotFound(_)));
}

#[tokio::test]
async fn test_malformed_metadata_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/GETPUBMEDIALINKS"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .get_video_subtitles(SHARE_URL, SubtitleFormat::Both, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, WolError::Parse(_)));
}

#[tokio::test]
async fn test_bad_share_url_skips_request() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let err = client
        .get_video_subtitles(
            "https://www.jw.org/finder?lank=garbage&wtlocale=E",
            SubtitleFormat::Both,
            None,
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WolError::InvalidQuery(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
