// src/crawl/progress.rs
// =============================================================================
// Outcome counters plus the optional per-transition debug trace.
//
// Every job ends in exactly one of: fetched, re-expanded, depth exhausted,
// duplicate or failed. Children additionally end up enqueued or dropped. The counters
// make a "clean" crawl distinguishable from one that silently lost pages,
// without having to read the trace.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

use super::Job;
use crate::error::FetchError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    /// Pages fetched successfully
    pub visited: usize,
    /// Jobs skipped because the URL was already claimed
    pub duplicates: usize,
    /// Already-fetched pages reached again by a shorter path; their stored
    /// links were followed again without a second fetch
    pub reexpanded: usize,
    /// Jobs skipped because they were at or past the depth bound
    pub depth_exhausted: usize,
    /// Fetch attempts that failed (transport, status or timeout)
    pub failed: usize,
    /// Discovered links lost to a full frontier
    pub dropped: usize,
    /// Jobs put on the frontier after the seed
    pub enqueued: usize,
}

#[derive(Debug, Default)]
pub struct Progress {
    debug: bool,
    visited: AtomicUsize,
    duplicates: AtomicUsize,
    reexpanded: AtomicUsize,
    depth_exhausted: AtomicUsize,
    failed: AtomicUsize,
    dropped: AtomicUsize,
    enqueued: AtomicUsize,
}

impl Progress {
    pub fn new(debug: bool) -> Self {
        Self {
            debug,
            ..Default::default()
        }
    }

    pub fn visiting(&self, job: &Job) {
        if self.debug {
            debug!("CRAWLING: '{}' (depth {})", job.url, job.depth);
        }
    }

    pub fn depth_exhausted(&self, job: &Job) {
        self.depth_exhausted.fetch_add(1, Ordering::Relaxed);
        if self.debug {
            debug!("DEPTH REACHED: '{}' at depth {}", job.url, job.depth);
        }
    }

    pub fn duplicate(&self, job: &Job) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
        if self.debug {
            debug!("DUPLICATE: '{}' already visited", job.url);
        }
    }

    pub fn reexpanded(&self, job: &Job, links: usize) {
        self.reexpanded.fetch_add(1, Ordering::Relaxed);
        if self.debug {
            debug!(
                "REEXPANDING: '{}' now at depth {} ({} links)",
                job.url, job.depth, links
            );
        }
    }

    pub fn failed(&self, job: &Job, error: &FetchError) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        if self.debug {
            debug!("ERROR: '{}': {}", job.url, error);
        }
    }

    pub fn fetched(&self, job: &Job, links: usize) {
        self.visited.fetch_add(1, Ordering::Relaxed);
        if self.debug {
            debug!("FETCHED: '{}' ({} links)", job.url, links);
        }
    }

    pub fn enqueued(&self, job: &Job) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
        if self.debug {
            debug!("ENQUEUING: '{}'", job.url);
        }
    }

    pub fn dropped(&self, job: &Job) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        if self.debug {
            debug!("QUEUE FULL: dropping '{}'", job.url);
        }
    }

    pub fn snapshot(&self) -> CrawlStats {
        CrawlStats {
            visited: self.visited.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            reexpanded: self.reexpanded.load(Ordering::Relaxed),
            depth_exhausted: self.depth_exhausted.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            enqueued: self.enqueued.load(Ordering::Relaxed),
        }
    }
}
