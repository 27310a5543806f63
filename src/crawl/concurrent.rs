// src/crawl/concurrent.rs
// =============================================================================
// Concurrent breadth-first crawling with a fixed worker pool.
//
// How it works:
// 1. The seed goes on a bounded frontier; the outstanding count starts at 1
// 2. N workers pull jobs and run them through the shared JobProcessor
// 3. Each discovered link is offered to the frontier without blocking:
//    accepted links count +1, rejected ones are dropped (and traced)
// 4. After a job's children are offered, the worker reports -1 for the job
// 5. When the observer sees the count hit 0 it closes the frontier and every
//    worker's pull returns None
//
// Workers only share the frontier channel, the delta channel and the
// registry. There is no ordering between workers beyond causality: a child
// is pushed only after its parent's fetch finished.
// =============================================================================

use futures::future::join_all;
use tracing::{debug, warn};

use super::frontier::{BoundedFrontier, Push};
use super::termination::{spawn_observer, Outstanding};
use super::visit::JobProcessor;
use super::Job;
use crate::config::CrawlOptions;
use crate::error::{CrawlError, Result};

struct Worker {
    id: usize,
    frontier: BoundedFrontier,
    outstanding: Outstanding,
    processor: JobProcessor,
}

impl Worker {
    async fn run(self) {
        let _guard = CloseOnPanic(&self.frontier);

        while let Some(job) = self.frontier.pull().await {
            for child in self.processor.process(&job).await {
                self.offer(child);
            }
            self.outstanding.resolved();
        }

        debug!(worker = self.id, "frontier closed, worker exiting");
    }

    fn offer(&self, child: Job) {
        let progress = self.processor.progress();
        match self.frontier.try_push(child.clone(), &self.outstanding) {
            Push::Enqueued => progress.enqueued(&child),
            Push::Dropped => progress.dropped(&child),
        }
    }
}

// A panicking worker never reports -1 for its job, so the count would never
// reach zero. Closing the frontier lets the remaining workers exit.
struct CloseOnPanic<'a>(&'a BoundedFrontier);

impl Drop for CloseOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.close();
        }
    }
}

pub async fn run(seed: &str, processor: &JobProcessor, options: &CrawlOptions) -> Result<()> {
    let frontier = BoundedFrontier::new(options.frontier_capacity);
    let (outstanding, observer) = spawn_observer(frontier.close_signal());

    // Capacity is at least 1 and the channel is empty, so this cannot drop
    if frontier.seed(Job::seed(seed)) == Push::Dropped {
        return Err(CrawlError::InvalidOptions(
            "frontier could not accept the seed job".to_string(),
        ));
    }

    let workers: Vec<_> = (0..options.workers)
        .map(|id| {
            let worker = Worker {
                id,
                frontier: frontier.clone(),
                outstanding: outstanding.clone(),
                processor: processor.clone(),
            };
            tokio::spawn(worker.run())
        })
        .collect();

    // Only workers may hold delta senders from here on
    drop(outstanding);

    let mut panicked = None;
    for result in join_all(workers).await {
        if let Err(e) = result {
            warn!(error = %e, "crawl worker failed");
            panicked.get_or_insert_with(|| e.to_string());
        }
    }

    let counted = observer
        .await
        .map_err(|e| CrawlError::WorkerPanicked(e.to_string()))?;

    if let Some(message) = panicked {
        return Err(CrawlError::WorkerPanicked(message));
    }
    counted?;

    Ok(())
}
