//! Configuration module for Sumi-Lens
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and interpreting the seed a run starts from. Every setting has a default, so a
//! configuration file is optional.
//!
//! # Example
//!
//! ```no_run
//! use sumi_lens::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("lens.toml")).unwrap();
//! println!("Crawler will index at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod seed;
mod types;
mod validation;

// Re-export types
pub use seed::Seed;
pub use types::{
    Config, CrawlerConfig, OutputConfig, SearchConfig, TraversalOrder, UserAgentConfig,
};
pub use validation::validate;

// Re-export parser functions
pub use parser::{
    compute_config_hash, hash_config_text, load_config, load_config_with_hash, parse_config,
};
