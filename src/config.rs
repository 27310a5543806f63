// src/config.rs
// =============================================================================
// Options for a single traversal.
//
// One CrawlOptions value is built (usually from the command line) and handed
// to the engine. The sequential strategies only look at max_depth, debug,
// fetch_timeout and max_body_bytes; the concurrent strategy also uses the
// worker count and the frontier capacity.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::crawl::Strategy;
use crate::error::{CrawlError, Result};

pub const DEFAULT_WORKERS: usize = 10;
pub const DEFAULT_FRONTIER_CAPACITY: usize = 1000;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024; // 10MB

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlOptions {
    /// Number of link levels fetched: the seed is level 0, so a job is
    /// fetched only while its hop count is below this value
    pub max_depth: usize,
    /// Emit one debug line per traversal state transition
    pub debug: bool,
    /// Size of the worker pool (concurrent strategy only)
    pub workers: usize,
    /// Capacity of the bounded frontier channel (concurrent strategy only)
    pub frontier_capacity: usize,
    /// Deadline applied to every single fetch
    pub fetch_timeout: Duration,
    /// How much of each response body is inspected for a title and links.
    /// None reads the whole body.
    pub max_body_bytes: Option<usize>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_depth: 3,
            debug: false,
            workers: DEFAULT_WORKERS,
            frontier_capacity: DEFAULT_FRONTIER_CAPACITY,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            max_body_bytes: Some(DEFAULT_MAX_BODY_BYTES),
        }
    }
}

impl CrawlOptions {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Default::default()
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_frontier_capacity(mut self, capacity: usize) -> Self {
        self.frontier_capacity = capacity;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_max_body_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_body_bytes = limit;
        self
    }

    // Rejects values that would make the engine panic or never make progress.
    // tokio's bounded channel panics on capacity 0, and a zero deadline would
    // fail every fetch. Pool size and capacity only exist for the concurrent
    // strategy, so the sequential ones ignore them.
    pub fn validate(&self, strategy: Strategy) -> Result<()> {
        if strategy == Strategy::BreadthFirstConcurrent {
            if self.workers == 0 {
                return Err(CrawlError::InvalidOptions(
                    "worker pool needs at least one worker".to_string(),
                ));
            }
            if self.frontier_capacity == 0 {
                return Err(CrawlError::InvalidOptions(
                    "frontier capacity must be at least 1".to_string(),
                ));
            }
        }
        if self.fetch_timeout.is_zero() {
            return Err(CrawlError::InvalidOptions(
                "fetch timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
