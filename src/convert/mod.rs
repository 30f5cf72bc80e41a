//! HTML → Markdown / plain-text conversion
//!
//! Rule-based, order-sensitive textual substitution over extracted HTML
//! fragments. This is deliberately not a full HTML parse: the fragments it
//! sees come pre-selected by the extractors, and the original pipeline
//! converts them the same way. Non-greedy tag matching only handles
//! unnested constructs. The `MarkupConverter` trait keeps the seam open for
//! a DOM-backed implementation.

use once_cell::sync::Lazy;
use regex::Regex;

/// Conversion seam between extractors and output formatting
pub trait MarkupConverter: Send + Sync {
    /// Convert an HTML fragment to Markdown
    fn to_markdown(&self, html: &str) -> String;

    /// Convert an HTML fragment to plain text
    fn to_plain_text(&self, html: &str) -> String;
}

static IMG_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<img\b[^>]*>").unwrap());
static IMG_SRC: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)src="([^"]*)""#).unwrap());
static IMG_ALT: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)alt="([^"]*)""#).unwrap());
static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h([1-6])[^>]*>(.*?)</h[1-6]>").unwrap());
static PARAGRAPH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p>").unwrap());
static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(?:strong|b)\b[^>]*>(.*?)</(?:strong|b)>").unwrap());
static ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(?:em|i)\b[^>]*>(.*?)</(?:em|i)>").unwrap());
static ANCHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<a\b[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#).unwrap());
static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]+>").unwrap());
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Regex-substitution converter
#[derive(Debug, Default, Clone)]
pub struct RegexConverter;

impl RegexConverter {
    /// Create a converter
    pub fn new() -> Self {
        Self
    }

    /// Markdown conversion without the final surrounding trim
    fn markdown_untrimmed(html: &str) -> String {
        let text = IMG_TAG.replace_all(html, |caps: &regex::Captures| {
            let tag = caps.get(0).map(|m| m.as_str()).unwrap_or("");
            match IMG_SRC.captures(tag).and_then(|c| c.get(1)) {
                Some(src) => {
                    let alt = IMG_ALT
                        .captures(tag)
                        .and_then(|c| c.get(1))
                        .map(|m| m.as_str())
                        .unwrap_or("");
                    format!("![{}]({})", alt, src.as_str())
                }
                // No source to link; leave the tag for the strip pass
                None => tag.to_string(),
            }
        });

        let text = HEADING.replace_all(&text, |caps: &regex::Captures| {
            let level: usize = caps[1].parse().unwrap_or(1);
            format!("{} {}\n\n", "#".repeat(level), caps[2].trim())
        });

        let text = PARAGRAPH.replace_all(&text, "$1\n\n");
        let text = BOLD.replace_all(&text, "**$1**");
        let text = ITALIC.replace_all(&text, "*$1*");
        let text = ANCHOR.replace_all(&text, "[$2]($1)");
        let text = LINE_BREAK.replace_all(&text, "\n");
        let text = ANY_TAG.replace_all(&text, "");
        EXCESS_NEWLINES.replace_all(&text, "\n\n").into_owned()
    }

    /// Decode the five standard HTML entities
    fn decode_entities(text: &str) -> String {
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&")
    }
}

impl MarkupConverter for RegexConverter {
    fn to_markdown(&self, html: &str) -> String {
        Self::markdown_untrimmed(html).trim().to_string()
    }

    fn to_plain_text(&self, html: &str) -> String {
        let stripped = ANY_TAG.replace_all(html, " ");
        let decoded = Self::decode_entities(&stripped);
        WHITESPACE_RUN.replace_all(&decoded, " ").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_and_paragraph_before_trim() {
        let raw = RegexConverter::markdown_untrimmed("<h2>Title</h2><p>Body</p>");
        assert_eq!(raw, "## Title\n\nBody\n\n");
    }

    #[test]
    fn test_markdown_trims_surrounding_whitespace() {
        let converter = RegexConverter::new();
        assert_eq!(
            converter.to_markdown("<h2>Title</h2><p>Body</p>"),
            "## Title\n\nBody"
        );
    }

    #[test]
    fn test_heading_levels() {
        let converter = RegexConverter::new();
        assert_eq!(converter.to_markdown("<h1>Top</h1>"), "# Top");
        assert_eq!(converter.to_markdown("<h4 class=\"x\">Deep</h4>"), "#### Deep");
    }

    #[test]
    fn test_image_with_src() {
        let converter = RegexConverter::new();
        let md = converter.to_markdown(r#"<img src="/img/a.png" alt="A chart">"#);
        assert_eq!(md, "![A chart](/img/a.png)");
    }

    #[test]
    fn test_image_without_src_is_stripped_with_other_tags() {
        let converter = RegexConverter::new();
        let md = converter.to_markdown(r#"before <img data-x="1"> after"#);
        assert_eq!(md, "before  after");
    }

    #[test]
    fn test_inline_markup() {
        let converter = RegexConverter::new();
        let md = converter.to_markdown(
            r#"<p><strong>bold</strong> and <em>italic</em> and <a href="/x">link</a></p>"#,
        );
        assert_eq!(md, "**bold** and *italic* and [link](/x)");
    }

    #[test]
    fn test_br_becomes_newline_and_runs_collapse() {
        let converter = RegexConverter::new();
        let md = converter.to_markdown("<p>a</p>\n\n\n\n<p>b<br>c</p>");
        assert_eq!(md, "a\n\nb\nc");
    }

    #[test]
    fn test_unknown_tags_stripped() {
        let converter = RegexConverter::new();
        assert_eq!(
            converter.to_markdown("<div class=\"wrap\"><span>text</span></div>"),
            "text"
        );
    }

    #[test]
    fn test_plain_text_decodes_entities() {
        let converter = RegexConverter::new();
        let text = converter.to_plain_text("<p>Tom &amp; Jerry &lt;3 &quot;cheese&quot;&#39;s</p>");
        assert_eq!(text, "Tom & Jerry <3 \"cheese\"'s");
    }

    #[test]
    fn test_plain_text_collapses_whitespace() {
        let converter = RegexConverter::new();
        let text = converter.to_plain_text("<div>one\n\n  two\t three</div>");
        assert_eq!(text, "one two three");
    }
}
