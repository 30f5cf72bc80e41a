//! WebVTT processing
//!
//! Time-window filtering, positioning cleanup, and plain-text conversion
//! for subtitle tracks. Cues are blocks separated by blank lines; a cue's
//! interval `[start, end]` is read from its timing line.

use once_cell::sync::Lazy;
use regex::Regex;

static TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(\d+):)?(\d{1,2}):(\d{2})\.(\d{3})$").unwrap());
static POSITIONING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*(?:line|position|align):\S+").unwrap());
static INLINE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Parse `HH:MM:SS.mmm` or `MM:SS.mmm` into seconds
pub fn parse_timestamp(token: &str) -> Option<f64> {
    let caps = TIMESTAMP.captures(token.trim())?;
    let hours: f64 = caps
        .get(1)
        .map(|m| m.as_str().parse().unwrap_or(0.0))
        .unwrap_or(0.0);
    let minutes: f64 = caps[2].parse().ok()?;
    let seconds: f64 = caps[3].parse().ok()?;
    let millis: f64 = caps[4].parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds + millis / 1000.0)
}

/// Cue interval from a timing line, when both endpoints parse
fn cue_interval(timing_line: &str) -> Option<(f64, f64)> {
    let (start_part, end_part) = timing_line.split_once("-->")?;
    let start = parse_timestamp(start_part.trim())?;
    let end_token = end_part.trim().split_whitespace().next()?;
    let end = parse_timestamp(end_token)?;
    Some((start, end))
}

/// Retain only cues overlapping `[start, end]`.
///
/// A cue overlaps when `cue_end >= start && cue_start <= end`. The header
/// block is preserved verbatim; cues whose timing line does not parse are
/// retained rather than silently dropped.
pub fn filter_by_time(vtt: &str, start: f64, end: f64) -> String {
    let normalized = vtt.replace("\r\n", "\n");
    let mut kept: Vec<&str> = Vec::new();

    for block in normalized.split("\n\n") {
        let trimmed = block.trim();
        if trimmed.is_empty() {
            continue;
        }
        let timing = trimmed.lines().find(|line| line.contains("-->"));
        match timing.and_then(cue_interval) {
            Some((cue_start, cue_end)) => {
                if cue_end >= start && cue_start <= end {
                    kept.push(trimmed);
                }
            }
            // Header, NOTE, or unparseable cue: keep it
            None => kept.push(trimmed),
        }
    }

    let mut out = kept.join("\n\n");
    out.push('\n');
    out
}

/// Strip positioning directives (`line:`, `position:`, `align:`) from cue
/// timing lines.
pub fn clean_positioning(vtt: &str) -> String {
    vtt.lines()
        .map(|line| {
            if line.contains("-->") {
                POSITIONING.replace_all(line, "").into_owned()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Does the accumulated line already end a sentence? Terminal punctuation,
/// optionally followed by a closing quote.
fn ends_sentence(text: &str) -> bool {
    let trimmed = text.trim_end();
    let trimmed = trimmed
        .strip_suffix(['"', '\'', '\u{201d}', '\u{2019}'])
        .unwrap_or(trimmed);
    matches!(trimmed.chars().last(), Some('.' | '!' | '?' | ':' | ';'))
}

/// Clean one cue text line: inline tags, style escapes, directional marks
fn clean_fragment(line: &str) -> String {
    let no_tags = INLINE_TAG.replace_all(line, "");
    no_tags
        .replace("&nbsp;", " ")
        .replace("&lrm;", "")
        .replace("&rlm;", "")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .trim()
        .to_string()
}

/// Convert a VTT track to sentence-like plain-text lines.
///
/// Header, timing, and numeric-id lines are dropped, as are STYLE/NOTE
/// blocks. Fragments accumulate into a line until the line ends a
/// sentence; immediate repeats of the same fragment are suppressed
/// (overlapping cues duplicate captions).
pub fn to_plain_text(vtt: &str) -> String {
    let normalized = vtt.replace("\r\n", "\n");
    let mut lines_out: Vec<String> = Vec::new();
    let mut acc = String::new();
    let mut last_fragment = String::new();
    let mut in_ignored_block = false;

    for line in normalized.lines() {
        let trimmed = line.trim();

        if in_ignored_block {
            if trimmed.is_empty() {
                in_ignored_block = false;
            }
            continue;
        }
        if trimmed.starts_with("STYLE") || trimmed.starts_with("NOTE") {
            in_ignored_block = true;
            continue;
        }
        if trimmed.is_empty()
            || trimmed.starts_with("WEBVTT")
            || trimmed.contains("-->")
            || trimmed.chars().all(|c| c.is_ascii_digit())
        {
            continue;
        }

        let fragment = clean_fragment(trimmed);
        if fragment.is_empty() || fragment == last_fragment {
            continue;
        }
        last_fragment = fragment.clone();

        if acc.is_empty() {
            acc = fragment;
        } else if ends_sentence(&acc) {
            lines_out.push(std::mem::replace(&mut acc, fragment));
        } else {
            acc.push(' ');
            acc.push_str(&fragment);
        }
    }

    if !acc.is_empty() {
        lines_out.push(acc);
    }

    lines_out.join("\n")
}
