//! Output module for index files, search results and crawl reports
//!
//! This module handles:
//! - Writing the index, word counts and search results as pretty JSON
//! - Generating markdown summaries of a crawl
//! - Recording and printing crawl statistics

mod json;
mod markdown;
pub mod stats;

pub use json::{write_counts, write_index, write_results};
pub use markdown::{format_markdown_summary, generate_markdown_summary, SummaryContext};
pub use stats::{log_statistics, print_statistics, CrawlStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
