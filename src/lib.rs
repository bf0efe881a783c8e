//! Sumi-Lens: a small crawling search engine
//!
//! This crate builds a ranked full-text index over a local file tree or over
//! pages crawled from a seed URL. It fetches HTML with its own HTTP/1.1 client,
//! cleans and stems page text, and answers exact and prefix queries against an
//! in-memory inverted index.

pub mod config;
pub mod crawler;
pub mod index;
pub mod output;
pub mod state;
pub mod text;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Lens operations
#[derive(Debug, Error)]
pub enum LensError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid seed: {0}")]
    InvalidSeed(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),
}

/// Result type alias for Sumi-Lens operations
pub type Result<T> = std::result::Result<T, LensError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, FetchError, WireFetcher};
pub use index::{IndexBuilder, InvertedIndex, QueryProcessor, SearchResult};
pub use state::{PageState, SkipReason};
pub use url::{canonicalize, has_web_scheme, resolve_link};
