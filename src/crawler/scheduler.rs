//! Scheduler for the crawl frontier, visited set and page budget
//!
//! This module handles:
//! - The frontier of URLs waiting to be fetched, as a stack (depth-first) or
//!   a FIFO queue (breadth-first)
//! - The visited set of canonical URL strings, marked at dispatch
//! - Budget reservations: a dispatch reserves a slot, a failure releases it
//!   and a success converts it into an indexed page

use crate::config::TraversalOrder;
use crate::state::SkipReason;
use crate::url::{has_web_scheme, strip_fragment};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Scheduler owns all crawl-session bookkeeping
///
/// Only the coordinator touches it, so checking and marking the visited set,
/// and checking and reserving budget, happen as single steps.
#[derive(Debug)]
pub struct Scheduler {
    /// URLs waiting to be considered for dispatch
    frontier: VecDeque<Url>,

    /// Canonical URL strings that have been dispatched
    visited: HashSet<String>,

    traversal: TraversalOrder,

    /// Maximum number of pages to index
    budget: usize,

    indexed: usize,
    in_flight: usize,
}

impl Scheduler {
    pub fn new(traversal: TraversalOrder, budget: usize) -> Self {
        Self {
            frontier: VecDeque::new(),
            visited: HashSet::new(),
            traversal,
            budget,
            indexed: 0,
            in_flight: 0,
        }
    }

    /// Adds one URL to the frontier
    pub fn enqueue(&mut self, url: Url) {
        self.frontier.push_back(url);
    }

    /// Adds the links of one page to the frontier
    ///
    /// Either traversal order takes the links in document order: depth-first
    /// pushes them reversed onto the stack, breadth-first appends them.
    pub fn enqueue_links<I>(&mut self, links: I)
    where
        I: IntoIterator<Item = Url>,
        I::IntoIter: DoubleEndedIterator,
    {
        match self.traversal {
            TraversalOrder::DepthFirst => self.frontier.extend(links.into_iter().rev()),
            TraversalOrder::BreadthFirst => self.frontier.extend(links),
        }
    }

    /// Takes the next URL from the frontier
    pub fn next_candidate(&mut self) -> Option<Url> {
        match self.traversal {
            TraversalOrder::DepthFirst => self.frontier.pop_back(),
            TraversalOrder::BreadthFirst => self.frontier.pop_front(),
        }
    }

    /// Decides whether a candidate may be fetched
    ///
    /// On success the canonical URL is marked visited and a budget slot is
    /// reserved for it. Invalid schemes are rejected without being marked.
    pub fn admit(&mut self, candidate: &Url) -> Result<Url, SkipReason> {
        let url = strip_fragment(candidate);

        if !has_web_scheme(&url) {
            return Err(SkipReason::InvalidScheme);
        }
        if self.visited.contains(url.as_str()) {
            return Err(SkipReason::AlreadyVisited);
        }
        if !self.has_capacity() {
            return Err(SkipReason::BudgetExhausted);
        }

        self.visited.insert(url.to_string());
        self.in_flight += 1;
        Ok(url)
    }

    /// Converts a reservation into an indexed page
    pub fn complete(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.indexed += 1;
    }

    /// Releases the reservation of a failed fetch
    pub fn release(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// True while another dispatch would fit in the budget
    pub fn has_capacity(&self) -> bool {
        self.indexed + self.in_flight < self.budget
    }

    pub fn is_budget_met(&self) -> bool {
        self.indexed >= self.budget
    }

    /// Empties the frontier, returning how many URLs were left in it
    pub fn drain_frontier(&mut self) -> usize {
        let left = self.frontier.len();
        self.frontier.clear();
        left
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(strip_fragment(url).as_str())
    }

    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn indexed(&self) -> usize {
        self.indexed
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn budget(&self) -> usize {
        self.budget
    }
}
