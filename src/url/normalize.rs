use crate::UrlError;
use url::Url;

/// Parses a URL string into its canonical crawl form
///
/// Canonicalization only removes the fragment: `page#a` and `page#b` name the
/// same document. Scheme, host case and path are left to the `url` crate's own
/// parsing rules, so the resulting string is what the index stores as the
/// location.
///
/// # Examples
///
/// ```
/// use sumi_lens::url::canonicalize;
///
/// let url = canonicalize("https://example.com/page#section1").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn canonicalize(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))?;
    Ok(strip_fragment(&url))
}

/// Returns a copy of the URL without its fragment
pub fn strip_fragment(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}
