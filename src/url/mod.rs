//! URL handling module for Sumi-Lens
//!
//! Locations in the index are plain strings, so two spellings of the same page
//! must be collapsed before they reach the crawler's visited set. This module
//! provides fragment canonicalization, link resolution, and scheme checks.

mod normalize;
mod resolve;

pub use normalize::{canonicalize, strip_fragment};
pub use resolve::resolve_link;

use url::Url;

/// Returns true if the URL uses a scheme the fetcher can speak (`http`/`https`)
pub fn has_web_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
