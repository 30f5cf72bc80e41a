//! Document page extractor
//!
//! Turns a document HTML page into a structured `Document`. Content comes
//! from the first structural selector candidate that exists and has
//! children, so even unusual markup yields output. The selected fragment is
//! post-processed at the string level: root-relative links and image
//! sources are absolutized (idempotently) and citation anchors are
//! unwrapped to their visible text. The citation path marker is fixed
//! across locales, so the unwrapping is language independent.

use crate::error::WolError;
use crate::resolver::{extract_document_id, normalize_language};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

/// Title used when the page's title element is empty or missing
const TITLE_PLACEHOLDER: &str = "Untitled Document";

/// Structural candidates for the content root, in preference order
const CONTENT_ROOT_SELECTORS: &[&str] =
    &["#article", "article", ".contentArea", "#content", "main", "body"];

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("valid selector"));
static PUBLICATION_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#publicationTitle").expect("valid selector"));
static BREADCRUMBS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#breadcrumbs li").expect("valid selector"));
static SUBHEADING_LINKS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".subheadings a").expect("valid selector"));
static SIMILAR_ITEMS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".similarMaterials a").expect("valid selector"));
static ITEM_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".title").expect("valid selector"));
static ITEM_SUBTITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".subtitle").expect("valid selector"));
static META_DATE: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        r#"meta[name="date"]"#,
        r#"meta[property="article:published_time"]"#,
        r#"meta[name="DC.Date"]"#,
    ]
    .iter()
    .map(|s| Selector::parse(s).expect("valid selector"))
    .collect()
});
static META_VOLUME: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="volume"]"#).expect("valid selector"));
static META_ISSUE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="issue"]"#).expect("valid selector"));
static TIME_ELEMENT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("time").expect("valid selector"));

static CITATION_ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*href="[^"]*/wol/bc/[^"]*"[^>]*>(.*?)</a>"#).unwrap()
});
static ROOT_RELATIVE_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="(/(?:[^/"][^"]*)?)""#).unwrap());
static IMG_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<img\b[^>]*/?>").unwrap());
static SRC_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)\bsrc="([^"]*)""#).unwrap());
static DATA_SRC_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bdata-src="([^"]*)""#).unwrap());
static DATA_SMALL_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bdata-img-size-sm="([^"]*)""#).unwrap());

/// Optional bibliographic details scraped from meta tags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub date: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
}

/// In-document navigation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subheading {
    pub title: String,
    pub url: String,
}

/// Related-content entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarMaterial {
    pub title: String,
    pub subtitle: Option<String>,
    pub url: String,
}

/// Structured document content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Last all-digit path segment of the canonical URL
    pub id: Option<String>,
    pub title: String,
    /// Selected root node's serialization, links/images absolutized and
    /// citation anchors unwrapped
    pub content: String,
    pub publication: String,
    /// Canonical URL; left blank here and filled by the retrieval layer
    pub url: String,
    pub language: String,
    pub metadata: DocumentMetadata,
    pub subheadings: Vec<Subheading>,
    pub similar_materials: Vec<SimilarMaterial>,
}

/// Parse a document page.
///
/// Fails loudly with `WolError::Parse` when no usable content root exists;
/// everything else degrades to defaults.
pub fn extract_document(html: &str, canonical_url: &Url) -> Result<Document, WolError> {
    let page = Html::parse_document(html);
    let origin = canonical_url.origin().ascii_serialization();

    let title = page
        .select(&TITLE)
        .next()
        .map(|el| element_text(el).trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| TITLE_PLACEHOLDER.to_string());

    let root = select_content_root(&page).ok_or_else(|| {
        WolError::parse(format!(
            "No content root found in document page {}",
            canonical_url
        ))
    })?;

    let content = rewrite_images(
        &absolutize_links(&unwrap_citations(&root.html()), &origin),
        &origin,
    );

    let publication = page
        .select(&PUBLICATION_TITLE)
        .next()
        .map(|el| element_text(el).trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| {
            page.select(&BREADCRUMBS)
                .map(|el| element_text(el).trim().to_string())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" > ")
        });

    let subheadings = page
        .select(&SUBHEADING_LINKS)
        .filter_map(|el| {
            let title = element_text(el).trim().to_string();
            let url = el.value().attr("href")?.to_string();
            (!title.is_empty() && !url.is_empty()).then_some(Subheading { title, url })
        })
        .collect();

    let similar_materials = page
        .select(&SIMILAR_ITEMS)
        .filter_map(|el| {
            let title = el
                .select(&ITEM_TITLE)
                .next()
                .map(element_text)
                .unwrap_or_else(|| element_text(el))
                .trim()
                .to_string();
            let subtitle = el
                .select(&ITEM_SUBTITLE)
                .next()
                .map(|s| element_text(s).trim().to_string())
                .filter(|s| !s.is_empty());
            let url = el.value().attr("href")?.to_string();
            (!title.is_empty() && !url.is_empty()).then_some(SimilarMaterial {
                title,
                subtitle,
                url,
            })
        })
        .collect();

    let metadata = DocumentMetadata {
        date: extract_date(&page),
        volume: meta_content(&page, &META_VOLUME),
        issue: meta_content(&page, &META_ISSUE),
    };

    let language = page
        .root_element()
        .value()
        .attr("lang")
        .map(|lang| normalize_language(Some(lang)))
        .or_else(|| {
            canonical_url
                .path_segments()
                .and_then(|mut segs| segs.next())
                .filter(|seg| !seg.is_empty())
                .map(|seg| seg.to_string())
        })
        .unwrap_or_else(|| "en".to_string());

    Ok(Document {
        id: extract_document_id(canonical_url),
        title,
        content,
        publication,
        url: String::new(),
        language,
        metadata,
        subheadings,
        similar_materials,
    })
}

/// First structural candidate that exists and has at least one child
fn select_content_root(page: &Html) -> Option<ElementRef<'_>> {
    for candidate in CONTENT_ROOT_SELECTORS {
        let selector = Selector::parse(candidate).expect("valid selector");
        if let Some(el) = page.select(&selector).next() {
            if el.children().next().is_some() {
                return Some(el);
            }
        }
    }
    None
}

/// Replace citation anchors with their own visible text
fn unwrap_citations(fragment: &str) -> String {
    CITATION_ANCHOR.replace_all(fragment, "$1").into_owned()
}

/// Prefix root-relative hrefs with the document origin. Absolute and
/// protocol-relative values are untouched, so the rewrite is idempotent.
fn absolutize_links(fragment: &str, origin: &str) -> String {
    ROOT_RELATIVE_HREF
        .replace_all(fragment, |caps: &regex::Captures| {
            format!(r#"href="{}{}""#, origin, &caps[1])
        })
        .into_owned()
}

/// Resolve each image to an absolute source, trying the source attributes
/// in priority order.
fn rewrite_images(fragment: &str, origin: &str) -> String {
    IMG_TAG
        .replace_all(fragment, |caps: &regex::Captures| {
            let tag = caps.get(0).map(|m| m.as_str()).unwrap_or("");
            rewrite_image_tag(tag, origin)
        })
        .into_owned()
}

fn rewrite_image_tag(tag: &str, origin: &str) -> String {
    // Priority order: explicit source, lazy-load source, small-variant source
    let attrs = [&*SRC_ATTR, &*DATA_SRC_ATTR, &*DATA_SMALL_ATTR];

    let chosen = attrs
        .iter()
        .find_map(|re| re.captures(tag).and_then(|c| c.get(1)))
        .map(|m| m.as_str().to_string());

    let Some(source) = chosen.filter(|s| !s.is_empty()) else {
        return tag.to_string();
    };

    let absolute = if source.starts_with('/') && !source.starts_with("//") {
        format!("{}{}", origin, source)
    } else {
        source
    };

    if SRC_ATTR.is_match(tag) {
        SRC_ATTR
            .replace(tag, format!(r#"src="{}""#, absolute).as_str())
            .into_owned()
    } else if let Some(pos) = tag.find('>') {
        // No src attribute at all; add one from the fallback source
        let (head, tail) = tag.split_at(pos);
        let head = head.trim_end().strip_suffix('/').unwrap_or(head).trim_end();
        format!(r#"{} src="{}"{}"#, head, absolute, tail)
    } else {
        tag.to_string()
    }
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>()
}

fn meta_content(page: &Html, selector: &Selector) -> Option<String> {
    page.select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

/// Date preference: meta tags, then a `<time>` element's datetime or text
fn extract_date(page: &Html) -> Option<String> {
    for selector in META_DATE.iter() {
        if let Some(date) = meta_content(page, selector) {
            return Some(date);
        }
    }
    page.select(&TIME_ELEMENT).next().and_then(|el| {
        el.value()
            .attr("datetime")
            .map(|d| d.trim().to_string())
            .or_else(|| Some(element_text(el).trim().to_string()))
            .filter(|d| !d.is_empty())
    })
}
