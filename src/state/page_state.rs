/// Page state definitions for tracking crawl progress
///
/// A URL starts `Pending` when it is taken off the work queue. It becomes
/// `Fetched` once its HTML has been retrieved and ends either `Indexed` or
/// `Skipped`. A pending URL can also be skipped directly (already visited,
/// invalid scheme, failed fetch, budget exhausted).
use std::fmt;

/// Represents the current state of a URL in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    /// Taken from the work queue, not yet fetched
    Pending,

    /// HTML retrieved, not yet indexed
    Fetched,

    /// Cleaned, stemmed and added to the index
    Indexed,

    /// Dropped without indexing
    Skipped,
}

impl PageState {
    /// Returns true if no further processing will happen
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Indexed | Self::Skipped)
    }

    /// Returns true if the transition is part of the crawl lifecycle
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Fetched)
                | (Self::Pending, Self::Skipped)
                | (Self::Fetched, Self::Indexed)
                | (Self::Fetched, Self::Skipped)
        )
    }

    /// Short lower-case label used in logs and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetched => "fetched",
            Self::Indexed => "indexed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
