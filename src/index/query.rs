//! Query file processing
//!
//! Each query line is cleaned and stemmed into a sorted set of unique stems.
//! The stems joined by single spaces form the query's key, so lines that differ
//! only in case, punctuation, word order or inflection share one result list.

use crate::index::inverted::InvertedIndex;
use crate::index::search::SearchResult;
use crate::text::TextStemmer;
use crate::{LensError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Runs queries against an index and keeps their ranked results by key
#[derive(Debug)]
pub struct QueryProcessor {
    partial: bool,
    stemmer: TextStemmer,
    results: BTreeMap<String, Vec<SearchResult>>,
}

impl QueryProcessor {
    pub fn new(partial: bool) -> Self {
        Self {
            partial,
            stemmer: TextStemmer::new(),
            results: BTreeMap::new(),
        }
    }

    /// Builds the key a set of stems is stored under
    pub fn query_key(stems: &BTreeSet<String>) -> String {
        stems.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
    }

    /// Processes one query line
    ///
    /// Returns the key the results were stored under, or `None` when the line
    /// has no searchable words. A key that was already answered is not searched
    /// again.
    pub fn process_line(&mut self, index: &InvertedIndex, line: &str) -> Option<String> {
        let stems = self.stemmer.unique_stems(line);
        if stems.is_empty() {
            return None;
        }

        let key = Self::query_key(&stems);
        if !self.results.contains_key(&key) {
            let ranked = index.search(&stems, self.partial);
            tracing::debug!("Query '{}' matched {} locations", key, ranked.len());
            self.results.insert(key.clone(), ranked);
        }
        Some(key)
    }

    /// Processes every line of a query file
    ///
    /// Returns the number of distinct queries answered so far.
    pub fn process_file(&mut self, index: &InvertedIndex, path: &Path) -> Result<usize> {
        let read_error = |source| LensError::Read {
            path: path.display().to_string(),
            source,
        };

        let reader = BufReader::new(File::open(path).map_err(read_error)?);
        for line in reader.lines() {
            let line = line.map_err(read_error)?;
            self.process_line(index, &line);
        }

        tracing::info!(
            "Answered {} distinct queries from {}",
            self.results.len(),
            path.display()
        );
        Ok(self.results.len())
    }

    /// Ranked results for a processed key
    pub fn get(&self, key: &str) -> Option<&[SearchResult]> {
        self.results.get(key).map(Vec::as_slice)
    }

    /// All results, keyed and sorted by query key
    pub fn results(&self) -> &BTreeMap<String, Vec<SearchResult>> {
        &self.results
    }

    pub fn is_partial(&self) -> bool {
        self.partial
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_index() -> InvertedIndex {
        let stemmer = TextStemmer::new();
        let mut index = InvertedIndex::new();
        index.add_text("Falcons hunt from the sky", "birds.txt", &stemmer);
        index.add_text("Falconry is an old sport of falcons", "sport.txt", &stemmer);
        index
    }

    #[test]
    fn test_query_key_sorted_unique() {
        let mut processor = QueryProcessor::new(false);
        let key = processor
            .process_line(&sample_index(), "Sky FALCONS falcon")
            .unwrap();
        assert_eq!(key, "falcon sky");
    }

    #[test]
    fn test_blank_query_skipped() {
        let mut processor = QueryProcessor::new(false);
        assert!(processor.process_line(&sample_index(), "  42 !!").is_none());
        assert!(processor.is_empty());
    }

    #[test]
    fn test_equivalent_lines_share_results() {
        let index = sample_index();
        let mut processor = QueryProcessor::new(false);
        processor.process_line(&index, "falcons");
        processor.process_line(&index, "Falcon!");
        assert_eq!(processor.len(), 1);
        assert_eq!(processor.get("falcon").unwrap().len(), 2);
    }

    #[test]
    fn test_partial_mode() {
        let index = sample_index();
        let mut exact = QueryProcessor::new(false);
        let mut partial = QueryProcessor::new(true);

        exact.process_line(&index, "falc");
        partial.process_line(&index, "falc");

        assert!(exact.get("falc").unwrap().is_empty());
        let found = partial.get("falc").unwrap();
        assert_eq!(found.len(), 2);
        // "falconri" and "falcon" both match in sport.txt
        assert_eq!(found[0].location(), "sport.txt");
        assert_eq!(found[0].matches(), 2);
    }

    #[test]
    fn test_process_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "falcon").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "sky sport").unwrap();
        writeln!(file, "FALCONS").unwrap();
        file.flush().unwrap();

        let mut processor = QueryProcessor::new(false);
        let answered = processor.process_file(&sample_index(), file.path()).unwrap();

        assert_eq!(answered, 2);
        let keys: Vec<&String> = processor.results().keys().collect();
        assert_eq!(keys, vec!["falcon", "sky sport"]);
    }

    #[test]
    fn test_missing_query_file() {
        let mut processor = QueryProcessor::new(false);
        let result = processor.process_file(&sample_index(), Path::new("/no/such/queries.txt"));
        assert!(matches!(result, Err(LensError::Read { .. })));
    }
}
