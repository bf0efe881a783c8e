//! Text processing for indexing
//!
//! - `cleaner`: turns raw markup into plain text and pulls out hyperlinks
//! - `stemmer`: splits plain text into normalized, stemmed tokens

pub mod cleaner;
pub mod stemmer;

pub use cleaner::{extract_hyperlinks, strip_html};
pub use stemmer::{parse_words, TextStemmer};
