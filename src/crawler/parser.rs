//! Turns a fetched page into index entries and links to follow
//!
//! This runs inside the fetch task, so each page is indexed into its own
//! partial [`InvertedIndex`] that the coordinator merges afterwards.

use crate::crawler::fetcher::FetchedPage;
use crate::index::InvertedIndex;
use crate::text::{extract_hyperlinks, strip_html, TextStemmer};
use crate::url::{resolve_link, strip_fragment};
use url::Url;

/// What one page contributes to the crawl
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Index key: the requested URL without its fragment
    pub location: String,

    /// Index holding only this page's words
    pub index: InvertedIndex,

    /// Number of words indexed
    pub words: usize,

    /// Absolute links, in document order
    pub links: Vec<Url>,

    /// Links that could not be resolved
    pub malformed_links: usize,
}

/// Parses a fetched page
///
/// Links are resolved against the requested URL, the same URL the page is
/// indexed under.
///
/// # Example
///
/// ```
/// use sumi_lens::crawler::{parse_page, FetchedPage};
/// use sumi_lens::text::TextStemmer;
/// use url::Url;
///
/// let url = Url::parse("http://example.com/dir/").unwrap();
/// let page = FetchedPage {
///     url: url.clone(),
///     final_url: url,
///     status: 200,
///     body: r#"<p>Running dogs</p> <a href="next.html">more</a>"#.to_string(),
/// };
/// let parsed = parse_page(&page, &TextStemmer::new());
/// assert_eq!(parsed.words, 3);
/// assert_eq!(parsed.links[0].as_str(), "http://example.com/dir/next.html");
/// ```
pub fn parse_page(page: &FetchedPage, stemmer: &TextStemmer) -> ParsedPage {
    let base = strip_fragment(&page.url);
    let location = base.to_string();

    let mut index = InvertedIndex::new();
    let words = index.add_text(&strip_html(&page.body), &location, stemmer);

    let (links, malformed_links) = resolve_links(&extract_hyperlinks(&page.body), &base);

    ParsedPage {
        location,
        index,
        words,
        links,
        malformed_links,
    }
}

/// Resolves raw `href` values, counting the ones that fail
pub fn resolve_links(hrefs: &[String], base: &Url) -> (Vec<Url>, usize) {
    let mut links = Vec::with_capacity(hrefs.len());
    let mut malformed = 0;

    for href in hrefs {
        match resolve_link(href, base) {
            Ok(url) => links.push(url),
            Err(e) => {
                tracing::debug!("Skipping malformed link on {}: {}", base, e);
                malformed += 1;
            }
        }
    }

    (links, malformed)
}
