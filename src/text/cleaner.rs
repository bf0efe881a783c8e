//! HTML cleaning by lexical pattern matching
//!
//! This is not an HTML parser. Comments, a fixed set of block elements, tags and
//! entities are removed with regular expressions, which is enough to recover the
//! visible text of ordinary pages.
//!
//! Block elements are matched non-nested: `<div><div>a</div>b</div>` removal
//! for `div` stops at the first `</div>`, leaving `b</div>` behind for
//! `strip_tags`. Pages that nest `svg` or `noscript` inside themselves lose the
//! same way.

use regex::Regex;
use std::sync::LazyLock;

/// Elements whose content is never visible text
const BLOCK_ELEMENTS: [&str; 6] = ["head", "style", "script", "noscript", "iframe", "svg"];

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern"));

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<>]+>").expect("tag pattern"));

static LEFTOVER_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&[^;\s]+;").expect("entity pattern"));

static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a\s+[^>]*?\bhref\s*=\s*"([^"]*)"[^>]*>"#).expect("anchor pattern")
});

static BLOCK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    BLOCK_ELEMENTS
        .iter()
        .filter_map(|name| element_pattern(name))
        .collect()
});

/// Builds the removal pattern for one element name
fn element_pattern(name: &str) -> Option<Regex> {
    let name = regex::escape(name);
    let pattern = format!(r"(?is)<\s*{name}\b[^>]*>.*?</\s*{name}\s*>");
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!("Cannot build element pattern for {}: {}", name, e);
            None
        }
    }
}

/// Removes every `<!-- ... -->` comment, including multi-line ones
///
/// ```
/// use sumi_lens::text::cleaner::strip_comments;
///
/// assert_eq!(strip_comments("A<!--\nB -->C"), "AC");
/// ```
pub fn strip_comments(html: &str) -> String {
    COMMENT.replace_all(html, "").into_owned()
}

/// Removes the named element together with everything between its tags
///
/// Matching ignores case and spans lines. The first closing tag of that name
/// ends the match.
pub fn strip_element(html: &str, name: &str) -> String {
    match element_pattern(name) {
        Some(re) => re.replace_all(html, "").into_owned(),
        None => html.to_string(),
    }
}

/// Removes comments and the head, style, script, noscript, iframe and svg elements
pub fn strip_block_elements(html: &str) -> String {
    let mut text = strip_comments(html);
    for re in BLOCK_PATTERNS.iter() {
        text = re.replace_all(&text, "").into_owned();
    }
    text
}

/// Removes every remaining `<...>` tag
pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, "").into_owned()
}

/// Decodes HTML entities and deletes the ones that do not decode
///
/// `2010&ndash;2012` becomes `2010–2012`; an unknown `&zzz;` is removed.
/// Numeric forms (`&#8211;`, `&#x2013;`) are decoded too.
pub fn strip_entities(html: &str) -> String {
    let decoded = html_escape::decode_html_entities(html);
    LEFTOVER_ENTITY.replace_all(&decoded, "").into_owned()
}

/// Reduces markup to its visible text
///
/// Block elements go first, then tags, then entities. Decoding runs last, so an
/// escaped `&lt;` in page text comes out as a literal `<`.
pub fn strip_html(html: &str) -> String {
    let text = strip_block_elements(html);
    let text = strip_tags(&text);
    strip_entities(&text)
}

/// Returns the `href` of every anchor tag, in document order
///
/// Only double-quoted attribute values are recognised: `<a href='x'>` and
/// `<a href=x>` are not links to this function. Values are returned as written;
/// the caller resolves them against the page URL.
///
/// ```
/// use sumi_lens::text::extract_hyperlinks;
///
/// let links = extract_hyperlinks(r#"<a href="https://x.com/a">t</a><a HREF='skip'>u</a>"#);
/// assert_eq!(links, vec!["https://x.com/a".to_string()]);
/// ```
pub fn extract_hyperlinks(html: &str) -> Vec<String> {
    ANCHOR_HREF
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
