use std::fmt;

/// Why a URL was skipped instead of indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipReason {
    /// The canonical URL was already dispatched
    AlreadyVisited,
    /// The scheme is not `http` or `https`
    InvalidScheme,
    /// The `href` could not be resolved into a URL
    MalformedLink,
    /// The page budget was already met
    BudgetExhausted,
    /// A 200 response that was not `text/html`
    NotHtml,
    /// A status other than 200 or a followable redirect
    StatusRejected,
    /// The redirect budget ran out before reaching HTML
    RedirectExhausted,
    /// Connection, TLS or socket failure
    NetworkError,
    /// Connect or read timed out
    Timeout,
    /// The response could not be parsed as HTTP/1.x
    MalformedResponse,
}

impl SkipReason {
    /// Every reason, in reporting order
    pub const ALL: [SkipReason; 10] = [
        Self::AlreadyVisited,
        Self::InvalidScheme,
        Self::MalformedLink,
        Self::BudgetExhausted,
        Self::NotHtml,
        Self::StatusRejected,
        Self::RedirectExhausted,
        Self::NetworkError,
        Self::Timeout,
        Self::MalformedResponse,
    ];

    /// Returns true if the URL was dropped before any network I/O
    pub fn is_before_fetch(&self) -> bool {
        matches!(
            self,
            Self::AlreadyVisited | Self::InvalidScheme | Self::MalformedLink | Self::BudgetExhausted
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AlreadyVisited => "already_visited",
            Self::InvalidScheme => "invalid_scheme",
            Self::MalformedLink => "malformed_link",
            Self::BudgetExhausted => "budget_exhausted",
            Self::NotHtml => "not_html",
            Self::StatusRejected => "status_rejected",
            Self::RedirectExhausted => "redirect_exhausted",
            Self::NetworkError => "network_error",
            Self::Timeout => "timeout",
            Self::MalformedResponse => "malformed_response",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
