// src/crawl/visit.rs
// =============================================================================
// What happens to one job, whichever strategy pulled it.
//
//   depth bound reached?  -> done (not an error)
//   URL already claimed?  -> done (duplicate)
//   fetched further away? -> no fetch, hand back the stored links one hop
//                            below this (shallower) depth
//   fetch (with deadline) -> failed: done, URL stays claimed
//                         -> ok: store the page, hand back the children
//
// Scheduling the children is left to the caller: the sequential frontiers
// take all of them, the bounded frontier may drop some.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use super::progress::Progress;
use super::registry::{Claim, VisitedRegistry};
use super::Job;
use crate::config::CrawlOptions;
use crate::error::FetchError;
use crate::fetch::{PageFetcher, PageResult};

#[derive(Clone)]
pub struct JobProcessor {
    registry: Arc<VisitedRegistry>,
    progress: Arc<Progress>,
    fetcher: Arc<dyn PageFetcher>,
    max_depth: usize,
    fetch_timeout: Duration,
}

impl JobProcessor {
    pub fn new(fetcher: Arc<dyn PageFetcher>, options: &CrawlOptions) -> Self {
        Self {
            registry: Arc::new(VisitedRegistry::new()),
            progress: Arc::new(Progress::new(options.debug)),
            fetcher,
            max_depth: options.max_depth,
            fetch_timeout: options.fetch_timeout,
        }
    }

    // Runs one job to its terminal state and returns the jobs it discovered.
    // The list is empty unless the page was fetched now or reached again by
    // a shorter path.
    pub async fn process(&self, job: &Job) -> Vec<Job> {
        self.progress.visiting(job);

        if job.depth >= self.max_depth {
            self.progress.depth_exhausted(job);
            return Vec::new();
        }

        match self.registry.try_claim(&job.url, job.depth) {
            Claim::Newly => {}
            Claim::Already => {
                self.progress.duplicate(job);
                return Vec::new();
            }
            Claim::Shallower(links) => {
                self.progress.reexpanded(job, links.len());
                return links.iter().map(|link| job.child(link)).collect();
            }
        }

        // No lock is held here; other workers keep claiming meanwhile
        let page = match self.fetch(&job.url).await {
            Ok(page) => page,
            Err(e) => {
                self.registry.mark_failed(&job.url);
                self.progress.failed(job, &e);
                return Vec::new();
            }
        };

        let links = page.found_links.clone();
        self.progress.fetched(job, links.len());
        // A shorter path may have reached the URL while it was being fetched
        let depth = match self.registry.insert(&job.url, job.depth, page) {
            Some(depth) => depth,
            None => return Vec::new(),
        };

        links
            .iter()
            .map(|link| Job::new(link.clone(), depth + 1))
            .collect()
    }

    async fn fetch(&self, url: &str) -> Result<PageResult, FetchError> {
        match tokio::time::timeout(self.fetch_timeout, self.fetcher.fetch(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.fetch_timeout)),
        }
    }

    pub fn registry(&self) -> &VisitedRegistry {
        &self.registry
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }
}
