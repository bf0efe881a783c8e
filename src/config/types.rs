use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Sumi-Lens
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    pub search: SearchConfig,
}

/// Order in which discovered links are crawled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalOrder {
    /// Most recently discovered link first (stack)
    #[default]
    DepthFirst,
    /// Oldest discovered link first (queue)
    BreadthFirst,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages to index
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Maximum number of redirects followed for a single fetch
    #[serde(rename = "max-redirects")]
    pub max_redirects: u32,

    /// Maximum number of fetches in flight at once
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: usize,

    /// Order in which discovered links are visited
    pub traversal: TraversalOrder,

    /// Time allowed to establish a connection (milliseconds)
    #[serde(rename = "connect-timeout-ms")]
    pub connect_timeout_ms: u64,

    /// Time allowed to read a full response (milliseconds)
    #[serde(rename = "read-timeout-ms")]
    pub read_timeout_ms: u64,

    /// Largest response body read from one page (bytes)
    #[serde(rename = "max-body-bytes")]
    pub max_body_bytes: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 50,
            max_redirects: 3,
            max_concurrent_fetches: 1,
            traversal: TraversalOrder::DepthFirst,
            connect_timeout_ms: 10_000,
            read_timeout_ms: 30_000,
            max_body_bytes: 8 * 1024 * 1024,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SumiLens".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`, with the
    /// parenthesised part omitted when no contact details are configured.
    pub fn header_value(&self) -> String {
        let base = format!("{}/{}", self.crawler_name, self.crawler_version);
        match (&self.contact_url, &self.contact_email) {
            (Some(url), Some(email)) => format!("{} (+{}; {})", base, url, email),
            (Some(url), None) => format!("{} (+{})", base, url),
            (None, Some(email)) => format!("{} ({})", base, email),
            (None, None) => base,
        }
    }
}

/// Output destinations; each one is written only when configured
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON inverted index
    #[serde(rename = "index-path")]
    pub index_path: Option<PathBuf>,

    /// Path of the JSON word counts
    #[serde(rename = "counts-path")]
    pub counts_path: Option<PathBuf>,

    /// Path of the JSON search results
    #[serde(rename = "results-path")]
    pub results_path: Option<PathBuf>,

    /// Path of the markdown crawl summary
    #[serde(rename = "summary-path")]
    pub summary_path: Option<PathBuf>,
}

/// Query settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// File with one query per line
    #[serde(rename = "queries-path")]
    pub queries_path: Option<PathBuf>,

    /// Use prefix matching instead of exact matching
    pub partial: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.crawler.max_pages, 50);
        assert_eq!(config.crawler.max_redirects, 3);
        assert_eq!(config.crawler.max_concurrent_fetches, 1);
        assert_eq!(config.crawler.traversal, TraversalOrder::DepthFirst);
        assert!(config.output.index_path.is_none());
        assert!(!config.search.partial);
    }

    #[test]
    fn test_user_agent_with_contacts() {
        let agent = UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: Some("https://example.com/about".to_string()),
            contact_email: Some("admin@example.com".to_string()),
        };
        assert_eq!(
            agent.header_value(),
            "TestCrawler/1.0 (+https://example.com/about; admin@example.com)"
        );
    }

    #[test]
    fn test_user_agent_without_contacts() {
        let agent = UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "2.1".to_string(),
            contact_url: None,
            contact_email: None,
        };
        assert_eq!(agent.header_value(), "TestCrawler/2.1");
    }

    #[test]
    fn test_traversal_from_toml() {
        let config: CrawlerConfig = toml::from_str(r#"traversal = "breadth-first""#).unwrap();
        assert_eq!(config.traversal, TraversalOrder::BreadthFirst);
        assert_eq!(config.max_pages, 50);
    }
}
