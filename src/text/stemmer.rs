//! Tokenizing and stemming
//!
//! Text is decomposed (NFD) so accents separate from their letters, everything
//! except letters and whitespace is dropped, the rest is lower-cased and split
//! on whitespace. Each word is then reduced with the Snowball English stemmer.

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::BTreeSet;
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Splits text into cleaned, lower-cased words without stemming
///
/// ```
/// use sumi_lens::text::parse_words;
///
/// assert_eq!(parse_words("Hello, Wörld! 42 times"), vec!["hello", "world", "times"]);
/// ```
pub fn parse_words(text: &str) -> Vec<String> {
    let cleaned: String = text
        .nfd()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    cleaned.split_whitespace().map(str::to_string).collect()
}

/// English stemmer applied to cleaned words
pub struct TextStemmer {
    stemmer: Stemmer,
}

impl TextStemmer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Stems a single already-cleaned word
    pub fn stem(&self, word: &str) -> String {
        self.stemmer.stem(word).into_owned()
    }

    /// Cleans and stems text, keeping every occurrence in order
    pub fn stem_all(&self, text: &str) -> Vec<String> {
        parse_words(text).iter().map(|word| self.stem(word)).collect()
    }

    /// Cleans and stems text into a sorted set of unique stems
    pub fn unique_stems(&self, text: &str) -> BTreeSet<String> {
        parse_words(text).iter().map(|word| self.stem(word)).collect()
    }
}

impl Default for TextStemmer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TextStemmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextStemmer")
            .field("algorithm", &"english")
            .finish()
    }
}
