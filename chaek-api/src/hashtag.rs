//! Hashtag token grammar: a `#` marker followed by one or more word
//! characters (letters of any script, digits, underscore). Tokens are stored
//! without the marker and compared case-sensitively.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HASHTAG_RE: Regex = Regex::new(r"#([\p{L}\p{N}_]+)").expect("hashtag regex");
}

/// Extracts the hashtag tokens of `text`, in first-occurrence order, with
/// later duplicates dropped. No count cap is applied here; callers that
/// persist tags truncate to [`crate::MAX_HASHTAGS`] themselves.
pub fn extract(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    HASHTAG_RE
        .captures_iter(text)
        .filter_map(|c| {
            let tag = c[1].to_string();
            seen.insert(tag.clone()).then_some(tag)
        })
        .collect()
}

/// One run of a highlighted text: either plain text passed through unchanged,
/// or a hashtag token (marker stripped).
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum Segment {
    Text(String),
    Hashtag(String),
}

/// Splits `text` into plain and hashtag segments, in source order. Duplicate
/// tags are kept here: every occurrence gets its own segment.
pub fn highlight(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;
    for m in HASHTAG_RE.find_iter(text) {
        if m.start() > last {
            segments.push(Segment::Text(text[last..m.start()].to_string()));
        }
        // skip the one-byte `#` marker
        segments.push(Segment::Hashtag(text[m.start() + 1..m.end()].to_string()));
        last = m.end();
    }
    if last < text.len() {
        segments.push(Segment::Text(text[last..].to_string()));
    }
    segments
}

/// Reconstructs the exact source text of a [`highlight`] output.
pub fn plain_text(segments: &[Segment]) -> String {
    let mut res = String::new();
    for s in segments {
        match s {
            Segment::Text(t) => res.push_str(t),
            Segment::Hashtag(t) => {
                res.push('#');
                res.push_str(t);
            }
        }
    }
    res
}

/// Whether `tag` is a well-formed token value (marker already stripped).
pub fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty() && tag.chars().all(|c| c == '_' || c.is_alphanumeric())
}
