//! Document pipeline tests
//!
//! Covers the extraction-plus-conversion path a document request takes:
//! URL validation up front, structured extraction, then markdown or
//! plain-text conversion of the content fragment.

use url::Url;
use wolmcp::client::{DocumentFormat, WolClient};
use wolmcp::convert::{MarkupConverter, RegexConverter};
use wolmcp::error::WolError;
use wolmcp::extract::extract_document;

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><title>Keep Your Hope Strong</title><meta name="date" content="2024-02-01"></head>
<body>
  <span id="publicationTitle">The Watchtower (2024)</span>
  <div id="article">
    <h2>Why Hope Matters</h2>
    <p>Hope anchors us. See <a href="/en/wol/bc/r1/lp-e/1001061103/12">Hebrews 6:19</a> again.</p>
    <p><strong>Real</strong> hope rests on <em>evidence</em>.</p>
  </div>
</body>
</html>"#;

fn canonical() -> Url {
    Url::parse("https://wol.jw.org/en/wol/d/r1/lp-e/2024100").unwrap()
}

#[test]
fn test_extract_then_markdown() {
    let doc = extract_document(PAGE, &canonical()).unwrap();
    let converter = RegexConverter::new();
    let markdown = converter.to_markdown(&doc.content);

    assert!(markdown.contains("## Why Hope Matters"));
    assert!(markdown.contains("**Real** hope rests on *evidence*."));
    // Citation anchors are unwrapped before conversion
    assert!(markdown.contains("Hebrews 6:19"));
    assert!(!markdown.contains("/wol/bc/"));
    assert!(!markdown.contains('<'));
}

#[test]
fn test_extract_then_plain_text() {
    let doc = extract_document(PAGE, &canonical()).unwrap();
    let converter = RegexConverter::new();
    let text = converter.to_plain_text(&doc.content);

    assert!(text.contains("Why Hope Matters"));
    assert!(text.contains("Hope anchors us."));
    assert!(!text.contains('<'));
    assert!(!text.contains("**"));
}

#[test]
fn test_document_fields_survive_pipeline() {
    let doc = extract_document(PAGE, &canonical()).unwrap();
    assert_eq!(doc.id, Some("2024100".to_string()));
    assert_eq!(doc.title, "Keep Your Hope Strong");
    assert_eq!(doc.publication, "The Watchtower (2024)");
    assert_eq!(doc.metadata.date, Some("2024-02-01".to_string()));
}

#[test]
fn test_missing_content_root_is_parse_error() {
    let err = extract_document("<html><head></head><body></body></html>", &canonical())
        .unwrap_err();
    assert!(matches!(err, WolError::Parse(_)));
}

#[tokio::test]
async fn test_client_rejects_foreign_host_without_fetching() {
    let client = WolClient::default();
    let err = client
        .get_document_by_url(
            "https://example.com/en/wol/d/r1/lp-e/2024100",
            DocumentFormat::Markdown,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WolError::InvalidQuery(_)));
}

#[tokio::test]
async fn test_client_rejects_non_document_path() {
    let client = WolClient::default();
    let err = client
        .get_document_by_url("https://wol.jw.org/en/wol/s/r1/lp-e", DocumentFormat::Text)
        .await
        .unwrap_err();
    assert!(matches!(err, WolError::InvalidQuery(_)));
}
