//! Exact and prefix search with deterministic ranking

use crate::index::inverted::{InvertedIndex, Postings};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Ranking class of a location, derived from its scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SchemeClass {
    Https,
    Http,
    Other,
}

impl SchemeClass {
    /// Classifies a location by a case-insensitive scheme prefix
    pub fn of(location: &str) -> Self {
        let has_prefix = |prefix: &str| {
            location
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        };

        if has_prefix("https://") {
            Self::Https
        } else if has_prefix("http://") {
            Self::Http
        } else {
            Self::Other
        }
    }
}

/// One location's accumulated matches for a query
///
/// Serializes as `{count, score, where}`.
#[derive(Debug, Clone)]
pub struct SearchResult {
    matches: usize,
    location: String,
    total_words: usize,
}

impl SearchResult {
    /// Starts an empty result for a location with the given word count
    pub fn new(location: impl Into<String>, total_words: usize) -> Self {
        Self {
            matches: 0,
            location: location.into(),
            total_words,
        }
    }

    pub fn add_matches(&mut self, occurrences: usize) {
        self.matches += occurrences;
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn matches(&self) -> usize {
        self.matches
    }

    pub fn total_words(&self) -> usize {
        self.total_words
    }

    /// Matches divided by the location's word count
    pub fn score(&self) -> f64 {
        if self.total_words == 0 {
            0.0
        } else {
            self.matches as f64 / self.total_words as f64
        }
    }

    pub fn scheme_class(&self) -> SchemeClass {
        SchemeClass::of(&self.location)
    }
}

/// Rank order: https locations, then http, then everything else; within a class
/// higher score first, then more words, then location case-insensitively.
impl Ord for SearchResult {
    fn cmp(&self, other: &Self) -> Ordering {
        self.scheme_class()
            .cmp(&other.scheme_class())
            .then_with(|| other.score().total_cmp(&self.score()))
            .then_with(|| other.total_words.cmp(&self.total_words))
            .then_with(|| {
                self.location
                    .to_lowercase()
                    .cmp(&other.location.to_lowercase())
            })
            .then_with(|| self.location.cmp(&other.location))
    }
}

impl Serialize for SearchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SearchResult", 3)?;
        state.serialize_field("count", &self.matches)?;
        state.serialize_field("score", &self.score())?;
        state.serialize_field("where", &self.location)?;
        state.end()
    }
}

impl PartialOrd for SearchResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SearchResult {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchResult {}

impl InvertedIndex {
    /// Searches by exact stem and returns ranked results
    pub fn exact_search(&self, terms: &BTreeSet<String>) -> Vec<SearchResult> {
        let mut results = HashMap::new();
        for term in terms {
            if let Some(postings) = self.index.get(term) {
                self.accumulate(postings, &mut results);
            }
        }
        Self::rank(results)
    }

    /// Searches for every stem that starts with a query term
    pub fn partial_search(&self, terms: &BTreeSet<String>) -> Vec<SearchResult> {
        let mut results = HashMap::new();
        for term in terms {
            let matching = self
                .index
                .range::<String, _>(term..)
                .take_while(|(word, _)| word.starts_with(term.as_str()));

            for (_, postings) in matching {
                self.accumulate(postings, &mut results);
            }
        }
        Self::rank(results)
    }

    /// Runs a partial or exact search
    pub fn search(&self, terms: &BTreeSet<String>, partial: bool) -> Vec<SearchResult> {
        if partial {
            self.partial_search(terms)
        } else {
            self.exact_search(terms)
        }
    }

    fn accumulate<'a>(&self, postings: &'a Postings, results: &mut HashMap<&'a str, SearchResult>) {
        for (location, positions) in postings {
            results
                .entry(location.as_str())
                .or_insert_with(|| SearchResult::new(location.as_str(), self.count(location)))
                .add_matches(positions.len());
        }
    }

    fn rank(results: HashMap<&str, SearchResult>) -> Vec<SearchResult> {
        let mut ranked: Vec<SearchResult> = results.into_values().collect();
        ranked.sort();
        ranked
    }
}
