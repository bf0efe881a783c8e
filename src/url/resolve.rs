use crate::url::normalize::strip_fragment;
use crate::UrlError;
use url::Url;

/// Resolves a hyperlink found on a page into a canonical absolute URL
///
/// Relative links are joined onto `base`; absolute links replace it. The
/// fragment is always removed. The scheme is not checked here: a `mailto:`
/// link resolves successfully and is rejected later by the crawler, which
/// records it as skipped.
///
/// # Arguments
///
/// * `href` - The raw `href` attribute value
/// * `base` - The URL of the page the link appeared on
///
/// # Returns
///
/// * `Ok(Url)` - The absolute, fragment-free URL
/// * `Err(UrlError)` - The link could not be parsed
pub fn resolve_link(href: &str, base: &Url) -> Result<Url, UrlError> {
    let href = href.trim();
    let joined = base
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;
    Ok(strip_fragment(&joined))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/docs/page.html").unwrap()
    }

    #[test]
    fn test_absolute_link() {
        let url = resolve_link("https://other.com/page", &base_url()).unwrap();
        assert_eq!(url.as_str(), "https://other.com/page");
    }

    #[test]
    fn test_root_relative_link() {
        let url = resolve_link("/other", &base_url()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/other");
    }

    #[test]
    fn test_path_relative_link() {
        let url = resolve_link("next.html", &base_url()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/docs/next.html");
    }

    #[test]
    fn test_parent_relative_link() {
        let url = resolve_link("../up.html", &base_url()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/up.html");
    }

    #[test]
    fn test_fragment_only_link_is_the_page() {
        let url = resolve_link("#section", &base_url()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/docs/page.html");
    }

    #[test]
    fn test_other_scheme_resolves() {
        let url = resolve_link("mailto:test@example.com", &base_url()).unwrap();
        assert_eq!(url.scheme(), "mailto");
    }

    #[test]
    fn test_malformed_link() {
        assert!(resolve_link("http://[::1", &base_url()).is_err());
    }
}
