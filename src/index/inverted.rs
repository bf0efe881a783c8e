//! The inverted index
//!
//! Maps every stem to the locations it occurs in and, per location, the set of
//! 1-based positions. A parallel map keeps each location's word count, taken as
//! the largest position recorded there.

use crate::text::TextStemmer;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Positions of one stem at one location
pub type Positions = BTreeSet<usize>;

/// Locations (and their positions) of one stem
pub type Postings = BTreeMap<String, Positions>;

/// Stem → location → positions, plus location → word count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    pub(crate) index: BTreeMap<String, Postings>,
    pub(crate) counts: BTreeMap<String, usize>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one occurrence of `word` at `position` in `location`
    ///
    /// Adding the same triple twice has no further effect. Position 0 is not a
    /// valid 1-based position and is ignored.
    pub fn add_word(&mut self, word: &str, location: &str, position: usize) {
        if position == 0 {
            tracing::trace!("Ignoring position 0 for '{}' in {}", word, location);
            return;
        }

        self.index
            .entry(word.to_string())
            .or_default()
            .entry(location.to_string())
            .or_default()
            .insert(position);

        let count = self.counts.entry(location.to_string()).or_insert(0);
        if position > *count {
            *count = position;
        }
    }

    /// Records a sequence of words at consecutive positions starting at `start`
    ///
    /// Returns the position after the last word, so a caller feeding a file line
    /// by line can continue from it.
    pub fn add_words<I, S>(&mut self, words: I, location: &str, start: usize) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut position = start.max(1);
        for word in words {
            self.add_word(word.as_ref(), location, position);
            position += 1;
        }
        position
    }

    /// Cleans, stems and adds a page of plain text under `location`
    ///
    /// Returns the number of tokens added.
    pub fn add_text(&mut self, text: &str, location: &str, stemmer: &TextStemmer) -> usize {
        let stems = stemmer.stem_all(text);
        let added = stems.len();
        self.add_words(stems, location, 1);
        added
    }

    /// Merges another index into this one
    ///
    /// Position sets are unioned. Word counts of locations present in both
    /// indexes are summed, which is exact when the two builds covered disjoint
    /// parts of a location's text.
    pub fn merge(&mut self, other: InvertedIndex) {
        for (word, postings) in other.index {
            match self.index.get_mut(&word) {
                None => {
                    self.index.insert(word, postings);
                }
                Some(existing) => {
                    for (location, positions) in postings {
                        existing.entry(location).or_default().extend(positions);
                    }
                }
            }
        }

        for (location, count) in other.counts {
            *self.counts.entry(location).or_insert(0) += count;
        }
    }

    /// Word count for every location
    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    /// Word count of one location, 0 if it is not indexed
    pub fn count(&self, location: &str) -> usize {
        self.counts.get(location).copied().unwrap_or(0)
    }

    pub fn has_count(&self, location: &str) -> bool {
        self.counts.contains_key(location)
    }

    /// Every stem in sorted order
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    pub fn num_words(&self) -> usize {
        self.index.len()
    }

    pub fn has_word(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Every indexed location in sorted order
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn num_locations(&self) -> usize {
        self.counts.len()
    }

    pub fn has_location(&self, location: &str) -> bool {
        self.counts.contains_key(location)
    }

    /// Locations a stem occurs in, in sorted order
    pub fn locations_of<'a>(&'a self, word: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.index
            .get(word)
            .into_iter()
            .flat_map(|postings| postings.keys().map(String::as_str))
    }

    pub fn num_locations_of(&self, word: &str) -> usize {
        self.index.get(word).map_or(0, BTreeMap::len)
    }

    pub fn has_word_at(&self, word: &str, location: &str) -> bool {
        self.index
            .get(word)
            .is_some_and(|postings| postings.contains_key(location))
    }

    /// Positions of a stem at a location, empty if either is unknown
    pub fn positions(&self, word: &str, location: &str) -> Option<&Positions> {
        self.index.get(word).and_then(|postings| postings.get(location))
    }

    pub fn num_positions(&self, word: &str, location: &str) -> usize {
        self.positions(word, location).map_or(0, BTreeSet::len)
    }

    pub fn has_position(&self, word: &str, location: &str, position: usize) -> bool {
        self.positions(word, location)
            .is_some_and(|positions| positions.contains(&position))
    }

    /// Full stem → location → positions mapping
    pub fn postings(&self) -> &BTreeMap<String, Postings> {
        &self.index
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl fmt::Display for InvertedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} words across {} locations",
            self.num_words(),
            self.num_locations()
        )
    }
}
