//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: where a single URL is in its crawl lifecycle
//! - `SkipReason`: why a URL ended up skipped instead of indexed

mod page_state;
mod skip_reason;

// Re-export main types
pub use page_state::PageState;
pub use skip_reason::SkipReason;
