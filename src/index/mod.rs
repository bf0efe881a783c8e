//! Inverted index, ranked search and the file-based builders around them

pub mod builder;
pub mod inverted;
pub mod query;
pub mod search;

pub use builder::{BuildSummary, IndexBuilder};
pub use inverted::{InvertedIndex, Positions, Postings};
pub use query::QueryProcessor;
pub use search::{SchemeClass, SearchResult};
