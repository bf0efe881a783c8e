//! Pretty JSON writers for the index, word counts and search results
//!
//! All maps are ordered, so keys come out sorted. Result lists keep their rank
//! order.

use crate::index::{InvertedIndex, SearchResult};
use crate::output::OutputResult;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

fn write_pretty<T: Serialize + ?Sized>(value: &T, path: &Path) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Writes stem → location → positions
pub fn write_index(index: &InvertedIndex, path: &Path) -> OutputResult<()> {
    write_pretty(index.postings(), path)?;
    tracing::info!("Wrote index ({}) to {}", index, path.display());
    Ok(())
}

/// Writes location → word count
pub fn write_counts(index: &InvertedIndex, path: &Path) -> OutputResult<()> {
    write_pretty(index.counts(), path)?;
    tracing::info!("Wrote {} word counts to {}", index.num_locations(), path.display());
    Ok(())
}

/// Writes query → ranked results
pub fn write_results(results: &BTreeMap<String, Vec<SearchResult>>, path: &Path) -> OutputResult<()> {
    write_pretty(results, path)?;
    tracing::info!("Wrote results for {} queries to {}", results.len(), path.display());
    Ok(())
}
