//! Crawl statistics
//!
//! Counters collected by the coordinator while a crawl runs, and the helpers
//! that report them at the end.

use crate::state::SkipReason;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// The seed the crawl started from
    pub seed: String,

    /// Maximum number of pages to index
    pub budget: usize,

    /// Pages handed to the fetcher
    pub dispatched: u64,

    /// Pages fetched and merged into the index
    pub indexed: u64,

    /// Words added to the index across all pages
    pub words_indexed: u64,

    /// Links extracted from indexed pages, before any filtering
    pub links_found: u64,

    /// Skipped URLs by reason
    pub skipped: BTreeMap<SkipReason, u64>,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlStatistics {
    /// Starts the statistics for a crawl beginning now
    pub fn new(seed: impl Into<String>, budget: usize) -> Self {
        Self {
            seed: seed.into(),
            budget,
            dispatched: 0,
            indexed: 0,
            words_indexed: 0,
            links_found: 0,
            skipped: BTreeMap::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record_skip(&mut self, reason: SkipReason) {
        self.record_skips(reason, 1);
    }

    pub fn record_skips(&mut self, reason: SkipReason, count: u64) {
        if count > 0 {
            *self.skipped.entry(reason).or_insert(0) += count;
        }
    }

    pub fn skip_count(&self, reason: SkipReason) -> u64 {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    pub fn total_skipped(&self) -> u64 {
        self.skipped.values().sum()
    }

    /// Pages that were dispatched but produced no index entry
    pub fn failed(&self) -> u64 {
        self.dispatched.saturating_sub(self.indexed)
    }

    /// Marks the crawl finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds() as f64 / 1000.0)
    }

    /// Share of dispatched pages that were indexed, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.dispatched == 0 {
            return 0.0;
        }
        (self.indexed as f64 / self.dispatched as f64) * 100.0
    }
}

/// Logs the final statistics of a crawl
pub fn log_statistics(stats: &CrawlStatistics) {
    tracing::info!(
        "Crawl of {} finished: {} indexed, {} dispatched, {} words, {} links",
        stats.seed,
        stats.indexed,
        stats.dispatched,
        stats.words_indexed,
        stats.links_found
    );
    for (reason, count) in &stats.skipped {
        tracing::info!("  skipped ({}): {}", reason, count);
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Seed: {}", stats.seed);
    println!("  Page budget: {}", stats.budget);
    println!("  Pages dispatched: {}", stats.dispatched);
    println!("  Pages indexed: {}", stats.indexed);
    println!("  Words indexed: {}", stats.words_indexed);
    println!("  Links found: {}", stats.links_found);
    if let Some(seconds) = stats.duration_seconds() {
        println!("  Duration: {:.2}s", seconds);
    }
    println!();

    if !stats.skipped.is_empty() {
        println!("Skipped:");
        let mut counts: Vec<_> = stats.skipped.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        for (reason, count) in counts {
            println!("  {}: {}", reason, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} dispatched pages indexed)",
        stats.success_rate(),
        stats.indexed,
        stats.dispatched
    );
}
