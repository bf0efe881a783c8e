//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Raw-socket HTTP/1.1 fetching with bounded redirects
//! - Turning fetched HTML into index entries and links
//! - Frontier, visited-set and budget bookkeeping
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::Coordinator;
pub use fetcher::{
    build_request, join_lines, parse_status_line, read_body, read_chunked, read_head, Connection,
    FetchError, FetchedPage, ResponseHead, WireFetcher, DEFAULT_MAX_REDIRECTS,
};
pub use parser::{parse_page, resolve_links, ParsedPage};
pub use scheduler::Scheduler;
