// src/error.rs
// =============================================================================
// Typed errors for the fetcher and the traversal engine.
//
// None of the fetch errors are fatal to a crawl: the engine records them,
// abandons the one job, and keeps going. Only a broken configuration or a
// counting bug in the termination detector surfaces as a CrawlError.
// =============================================================================

use std::time::Duration;
use thiserror::Error;

// Why a single page could not be fetched.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The fetch did not finish before the per-fetch deadline
    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),

    /// DNS resolution or TCP/TLS connect failed
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other transport-level failure reported by the HTTP client
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-success status code
    #[error("non-success response: {0}")]
    Status(u16),

    /// The response started but reading the body failed
    #[error("failed reading response body: {0}")]
    Body(#[source] reqwest::Error),
}

impl FetchError {
    // Sorts a reqwest error into timeout / connect / other.
    // `deadline` is what gets reported for a timeout.
    pub fn from_transport(error: reqwest::Error, deadline: Duration) -> Self {
        if error.is_timeout() {
            FetchError::Timeout(deadline)
        } else if error.is_connect() {
            FetchError::Connect(error.to_string())
        } else {
            FetchError::Transport(error)
        }
    }

    // Same split for errors raised while streaming the body: the client's
    // deadline can expire after the headers arrived.
    pub fn from_body(error: reqwest::Error, deadline: Duration) -> Self {
        if error.is_timeout() {
            FetchError::Timeout(deadline)
        } else {
            FetchError::Body(error)
        }
    }
}

// A delta arrived that the outstanding-job counter cannot accept.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TerminationError {
    #[error("outstanding job counter would go negative")]
    CounterUnderflow,

    #[error("delta received after completion was declared")]
    AfterCompletion,

    #[error("delta channel closed with {0} jobs still outstanding")]
    Abandoned(usize),
}

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("invalid crawl options: {0}")]
    InvalidOptions(String),

    #[error("termination detector failed: {0}")]
    Termination(#[from] TerminationError),

    #[error("crawl worker panicked: {0}")]
    WorkerPanicked(String),
}

// The strategy name given to `crawl_named` matched nothing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown traversal strategy '{0}'")]
pub struct UnknownStrategy(pub String);

pub type Result<T> = std::result::Result<T, CrawlError>;
