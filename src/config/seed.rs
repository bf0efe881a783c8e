//! Interpretation of the seed a run starts from

use crate::url::has_web_scheme;
use crate::ConfigError;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Where an index is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    /// Crawl the web starting at this URL
    Web(Url),
    /// Index a file or a directory tree
    Path(PathBuf),
}

impl Seed {
    /// Interprets a seed argument
    ///
    /// An `http`/`https` URL becomes a web seed. Anything else must name an
    /// existing file or directory. A URL with another scheme that is not also an
    /// existing path is rejected as a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_lens::config::Seed;
    ///
    /// let seed = Seed::parse("https://example.com/start").unwrap();
    /// assert!(matches!(seed, Seed::Web(_)));
    /// assert!(Seed::parse("ftp://example.com/").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ConfigError::InvalidSeed("seed cannot be empty".to_string()));
        }

        let parsed = Url::parse(raw);
        if let Ok(url) = &parsed {
            if has_web_scheme(url) {
                if url.host_str().is_none() {
                    return Err(ConfigError::InvalidSeed(format!("missing host in '{}'", raw)));
                }
                return Ok(Seed::Web(url.clone()));
            }
        }

        let path = Path::new(raw);
        if path.exists() {
            return Ok(Seed::Path(path.to_path_buf()));
        }

        match parsed {
            Ok(url) => Err(ConfigError::InvalidSeed(format!(
                "unsupported scheme '{}' in '{}'",
                url.scheme(),
                raw
            ))),
            Err(_) => Err(ConfigError::InvalidSeed(format!(
                "'{}' is neither an http(s) URL nor an existing path",
                raw
            ))),
        }
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seed::Web(url) => write!(f, "{}", url),
            Seed::Path(path) => write!(f, "{}", path.display()),
        }
    }
}
