// src/crawl/sequential.rs
// =============================================================================
// Single-task crawling: depth-first (StackFrontier) and breadth-first
// (QueueFrontier) share this one loop. Only the container differs.
//
// Every fetch is awaited before the next job is pulled, so there is never
// more than one request in flight and the frontier needs no locking.
// =============================================================================

use super::frontier::Frontier;
use super::visit::JobProcessor;
use super::Job;

pub async fn run<F: Frontier>(mut frontier: F, seed: &str, processor: &JobProcessor) {
    frontier.seed(Job::seed(seed));

    while let Some(job) = frontier.pull() {
        let children = processor.process(&job).await;
        for child in &children {
            processor.progress().enqueued(child);
        }
        frontier.push_children(children);
    }

    debug_assert!(frontier.is_drained());
}
