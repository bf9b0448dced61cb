//! Subscription fetch/decode/aggregate pipeline

pub mod aggregator;
pub mod decoder;
pub mod fetch;

use std::fmt;

use thiserror::Error;

pub use aggregator::{
    import_subscription, import_subscription_sync, import_uri, parse_subscription_body, parse_uri,
};

/// Why a fetch failed at the network layer. The tags are stable text
/// ("timeout" | "connection" | "cancelled") so collaborators can branch on
/// them without string-matching full messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchCause {
    Timeout,
    Connection,
    Cancelled,
}

impl fmt::Display for FetchCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FetchCause::Timeout => "timeout",
            FetchCause::Connection => "connection",
            FetchCause::Cancelled => "cancelled",
        })
    }
}

/// Failures that kill one whole subscription import, as opposed to the
/// per-line parse errors collected inside a `SubscriptionParseResult`.
///
/// Fetch errors are never retried here; retry policy belongs to the
/// network collaborator.
#[derive(Error, Debug)]
pub enum SubscriptionError {
    /// The subscription URL itself is unusable; rejected before any
    /// network I/O.
    #[error("invalid subscription URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The server answered with a non-2xx status. No partial body is
    /// usable, so this is fatal to the fetch.
    #[error("subscription fetch for '{url}' failed with HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    /// The request never produced a usable response.
    #[error("subscription fetch for '{url}' failed ({cause}): {detail}")]
    Network {
        url: String,
        cause: FetchCause,
        detail: String,
    },

    /// The fetched body is neither recognizable plain text nor valid
    /// base64. Fatal to the import: yields zero configs and this single
    /// descriptive error, not a per-line error list.
    #[error("{0}")]
    Decode(String),
}
