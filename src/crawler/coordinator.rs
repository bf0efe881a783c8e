//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop. The coordinator owns the
//! [`Scheduler`], so it alone decides what gets dispatched; fetch tasks only
//! get a clone of the [`WireFetcher`] and hand back what they found:
//! - Dispatching admitted URLs onto tokio tasks, bounded by the worker count
//! - Merging each page's partial index into the shared index
//! - Queuing the links of indexed pages
//! - Counting every skipped URL by reason

use crate::config::{Config, CrawlerConfig, TraversalOrder};
use crate::crawler::fetcher::{FetchError, WireFetcher};
use crate::crawler::parser::{parse_page, ParsedPage};
use crate::crawler::scheduler::Scheduler;
use crate::index::InvertedIndex;
use crate::output::CrawlStatistics;
use crate::state::{PageState, SkipReason};
use crate::text::TextStemmer;
use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

/// What a fetch task hands back to the coordinator
struct PageOutcome {
    url: Url,
    result: Result<ParsedPage, FetchError>,
}

/// Main crawler coordinator structure
#[derive(Debug)]
pub struct Coordinator {
    fetcher: WireFetcher,
    stemmer: Arc<TextStemmer>,
    budget: usize,
    max_redirects: u32,
    workers: usize,
    traversal: TraversalOrder,
}

impl Coordinator {
    /// Creates a coordinator that fetches with `fetcher`
    pub fn new(fetcher: WireFetcher, config: &CrawlerConfig) -> Self {
        Self {
            fetcher,
            stemmer: Arc::new(TextStemmer::new()),
            budget: config.max_pages,
            max_redirects: config.max_redirects,
            workers: config.max_concurrent_fetches.max(1),
            traversal: config.traversal,
        }
    }

    /// Creates a coordinator and its fetcher from a full configuration
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Ok(Self::new(WireFetcher::from_config(config)?, &config.crawler))
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Crawls from `seed`, merging every indexed page into `index`
    ///
    /// The crawl ends when the page budget is met, or when the frontier is
    /// empty and nothing is in flight. Pages that fail are skipped, never
    /// retried, and never abort the crawl.
    pub async fn crawl(&self, seed: Url, index: &mut InvertedIndex) -> CrawlStatistics {
        let mut stats = CrawlStatistics::new(seed.as_str(), self.budget);
        let mut scheduler = Scheduler::new(self.traversal, self.budget);
        let mut tasks: JoinSet<PageOutcome> = JoinSet::new();

        tracing::info!(
            "Starting crawl of {} (budget {}, {} workers, {:?})",
            seed,
            self.budget,
            self.workers,
            self.traversal
        );
        scheduler.enqueue(seed);

        loop {
            self.dispatch(&mut scheduler, &mut tasks, &mut stats);

            let Some(joined) = tasks.join_next().await else {
                break;
            };

            match joined {
                Ok(outcome) => self.handle_outcome(outcome, &mut scheduler, index, &mut stats),
                Err(e) => {
                    tracing::error!("Fetch task failed: {}", e);
                    scheduler.release();
                    stats.record_skip(SkipReason::NetworkError);
                }
            }
        }

        if scheduler.is_budget_met() {
            tracing::debug!(
                "Budget met with {} URLs left in the frontier",
                scheduler.frontier_size()
            );
        }
        let abandoned = scheduler.drain_frontier() as u64;
        stats.record_skips(SkipReason::BudgetExhausted, abandoned);

        stats.finish();
        tracing::info!(
            "Crawl complete: {} pages indexed, {} visited, {:?}",
            scheduler.indexed(),
            scheduler.visited_count(),
            stats.duration_seconds()
        );
        stats
    }

    /// Starts fetches until the worker pool or the budget is full
    fn dispatch(
        &self,
        scheduler: &mut Scheduler,
        tasks: &mut JoinSet<PageOutcome>,
        stats: &mut CrawlStatistics,
    ) {
        while tasks.len() < self.workers && scheduler.has_capacity() {
            let Some(candidate) = scheduler.next_candidate() else {
                break;
            };

            let url = match scheduler.admit(&candidate) {
                Ok(url) => url,
                Err(reason) => {
                    tracing::debug!("{} {}: {}", candidate, PageState::Skipped, reason);
                    stats.record_skip(reason);
                    continue;
                }
            };

            tracing::debug!("Dispatching {} ({} in flight)", url, scheduler.in_flight());
            stats.dispatched += 1;

            let fetcher = self.fetcher.clone();
            let stemmer = Arc::clone(&self.stemmer);
            let max_redirects = self.max_redirects;
            tasks.spawn(async move {
                let result = fetcher
                    .fetch(&url, max_redirects)
                    .await
                    .map(|page| parse_page(&page, &stemmer));
                PageOutcome { url, result }
            });
        }
    }

    fn handle_outcome(
        &self,
        outcome: PageOutcome,
        scheduler: &mut Scheduler,
        index: &mut InvertedIndex,
        stats: &mut CrawlStatistics,
    ) {
        let PageOutcome { url, result } = outcome;

        match result {
            Ok(page) => {
                scheduler.complete();
                stats.indexed += 1;
                stats.words_indexed += page.words as u64;
                stats.links_found += (page.links.len() + page.malformed_links) as u64;
                stats.record_skips(SkipReason::MalformedLink, page.malformed_links as u64);

                tracing::info!(
                    "{} {} ({} words, {} links) [{}/{}]",
                    PageState::Indexed,
                    page.location,
                    page.words,
                    page.links.len(),
                    scheduler.indexed(),
                    self.budget
                );

                index.merge(page.index);
                scheduler.enqueue_links(page.links);
            }
            Err(e) => {
                scheduler.release();
                let reason = e.skip_reason();
                tracing::warn!("{} {}: {}", PageState::Skipped, url, e);
                stats.record_skip(reason);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> CrawlerConfig {
        CrawlerConfig {
            max_pages: 3,
            max_concurrent_fetches: 2,
            ..CrawlerConfig::default()
        }
    }

    #[test]
    fn test_coordinator_creation() {
        let fetcher = WireFetcher::new("TestCrawler/1.0").unwrap();
        let coordinator = Coordinator::new(fetcher, &create_test_config());

        assert_eq!(coordinator.budget(), 3);
        assert_eq!(coordinator.workers, 2);
        assert_eq!(coordinator.traversal, TraversalOrder::DepthFirst);
    }

    #[test]
    fn test_from_config() {
        let config = Config::default();
        let coordinator = Coordinator::from_config(&config).unwrap();
        assert_eq!(coordinator.budget(), config.crawler.max_pages);
        assert_eq!(coordinator.max_redirects, 3);
    }

    #[tokio::test]
    async fn test_invalid_seed_scheme_is_skipped() {
        let fetcher = WireFetcher::new("TestCrawler/1.0").unwrap();
        let coordinator = Coordinator::new(fetcher, &create_test_config());
        let mut index = InvertedIndex::new();

        let stats = coordinator
            .crawl(Url::parse("ftp://example.com/").unwrap(), &mut index)
            .await;

        assert_eq!(stats.dispatched, 0);
        assert_eq!(stats.skip_count(SkipReason::InvalidScheme), 1);
        assert!(index.is_empty());
        assert!(stats.finished_at.is_some());
    }
}
