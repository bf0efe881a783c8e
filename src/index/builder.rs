//! Builds an index from text files on disk
//!
//! A single file is indexed directly. A directory is walked recursively and
//! every file with a `.txt` or `.text` extension (any case) is indexed. Files
//! are processed on the blocking pool, each into its own partial index, and the
//! partials are merged as they complete.

use crate::index::inverted::InvertedIndex;
use crate::text::TextStemmer;
use crate::{LensError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use walkdir::WalkDir;

const TEXT_EXTENSIONS: [&str; 2] = ["txt", "text"];

/// Outcome of a directory build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub files_indexed: usize,
    pub files_failed: usize,
}

/// Indexes text files with a bounded number of concurrent readers
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    workers: usize,
}

impl IndexBuilder {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// True if the path has a text file extension
    pub fn is_text_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                TEXT_EXTENSIONS
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            })
            .unwrap_or(false)
    }

    /// Lists the text files under `root`, sorted by path
    ///
    /// Entries below the root that cannot be walked (dangling links, unreadable
    /// directories, link loops) are logged and counted in the second value.
    /// Only a root that cannot be read is an error.
    pub fn collect_files(root: &Path) -> Result<(Vec<PathBuf>, usize)> {
        let mut files = Vec::new();
        let mut unreadable = 0;
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    unreadable += 1;
                    continue;
                }
            };
            if entry.file_type().is_file() && Self::is_text_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok((files, unreadable))
    }

    /// Reads one file into a fresh index keyed by the file's path
    ///
    /// Positions start at 1 and continue across lines.
    pub fn index_file(path: &Path) -> Result<InvertedIndex> {
        let read_error = |source| LensError::Read {
            path: path.display().to_string(),
            source,
        };

        let location = path.display().to_string();
        let stemmer = TextStemmer::new();
        let reader = BufReader::new(File::open(path).map_err(read_error)?);

        let mut index = InvertedIndex::new();
        let mut position = 1;
        for line in reader.lines() {
            let line = line.map_err(read_error)?;
            position = index.add_words(stemmer.stem_all(&line), &location, position);
        }

        tracing::trace!("Indexed {} words from {}", position - 1, location);
        Ok(index)
    }

    /// Indexes a file or directory tree into `index`
    ///
    /// A file given directly is indexed whatever its extension. Files inside a
    /// directory that cannot be read are logged and counted, not fatal.
    pub async fn build_path(
        &self,
        path: &Path,
        index: &mut InvertedIndex,
    ) -> Result<BuildSummary> {
        let metadata = std::fs::metadata(path).map_err(|source| LensError::Read {
            path: path.display().to_string(),
            source,
        })?;

        if metadata.is_file() {
            let owned = path.to_path_buf();
            let partial = tokio::task::spawn_blocking(move || Self::index_file(&owned)).await??;
            index.merge(partial);
            return Ok(BuildSummary {
                files_indexed: 1,
                files_failed: 0,
            });
        }

        let (files, unreadable) = Self::collect_files(path)?;
        tracing::info!(
            "Indexing {} text files under {} with {} workers",
            files.len(),
            path.display(),
            self.workers
        );

        let permits = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();
        for file in files {
            let permit = Arc::clone(&permits)
                .acquire_owned()
                .await
                .map_err(|e| LensError::Io(std::io::Error::other(e)))?;
            tasks.spawn_blocking(move || {
                let _permit = permit;
                let result = Self::index_file(&file);
                (file, result)
            });
        }

        let mut summary = BuildSummary {
            files_indexed: 0,
            files_failed: unreadable,
        };
        while let Some(joined) = tasks.join_next().await {
            let (file, result) = joined?;
            match result {
                Ok(partial) => {
                    index.merge(partial);
                    summary.files_indexed += 1;
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", file.display(), e);
                    summary.files_failed += 1;
                }
            }
        }

        tracing::info!(
            "Indexed {} files ({} failed), {}",
            summary.files_indexed,
            summary.files_failed,
            index
        );
        Ok(summary)
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new(1)
    }
}
