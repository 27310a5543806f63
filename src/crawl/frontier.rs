// src/crawl/frontier.rs
// =============================================================================
// The frontier: jobs that have been discovered but not yet processed.
//
// Sequential crawls use the `Frontier` trait with two containers:
// - StackFrontier (LIFO): depth-first. Children go on in reverse so the first
//   link is popped first, which visits pages in exactly the order a
//   recursive descent would, without growing the call stack.
// - QueueFrontier (FIFO): breadth-first, unbounded.
//
// The concurrent crawl uses BoundedFrontier, a fixed-capacity channel shared
// by all workers. Pushing never blocks: when the channel is full the job is
// dropped. A blocking push could deadlock the pool (every worker waiting to
// push while nobody pulls), so coverage is traded for liveness.
// =============================================================================

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use super::termination::Outstanding;
use super::Job;

pub trait Frontier {
    fn seed(&mut self, job: Job);
    fn pull(&mut self) -> Option<Job>;
    fn push_children(&mut self, children: Vec<Job>);
    fn is_drained(&self) -> bool;
}

#[derive(Debug, Default)]
pub struct StackFrontier {
    jobs: Vec<Job>,
}

impl Frontier for StackFrontier {
    fn seed(&mut self, job: Job) {
        self.jobs.push(job);
    }

    fn pull(&mut self) -> Option<Job> {
        self.jobs.pop()
    }

    fn push_children(&mut self, children: Vec<Job>) {
        self.jobs.extend(children.into_iter().rev());
    }

    fn is_drained(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct QueueFrontier {
    jobs: VecDeque<Job>,
}

impl Frontier for QueueFrontier {
    fn seed(&mut self, job: Job) {
        self.jobs.push_back(job);
    }

    fn pull(&mut self) -> Option<Job> {
        self.jobs.pop_front()
    }

    fn push_children(&mut self, children: Vec<Job>) {
        self.jobs.extend(children);
    }

    fn is_drained(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Push {
    Enqueued,
    Dropped,
}

// Cloned into every worker. All clones share one channel and one close
// signal.
#[derive(Debug, Clone)]
pub struct BoundedFrontier {
    sender: mpsc::Sender<Job>,
    receiver: Arc<Mutex<mpsc::Receiver<Job>>>,
    closed: CancellationToken,
}

impl BoundedFrontier {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity);
        Self {
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
            closed: CancellationToken::new(),
        }
    }

    // The seed is already counted by the termination detector, so it is
    // pushed without a delta.
    pub fn seed(&self, job: Job) -> Push {
        match self.sender.try_send(job) {
            Ok(()) => Push::Enqueued,
            Err(_) => Push::Dropped,
        }
    }

    // Reserves a slot first and reports +1 before the job becomes visible to
    // other workers. Otherwise a fast worker could pull and resolve the child
    // before its +1 reached the counter, and the count would hit zero early.
    pub fn try_push(&self, job: Job, outstanding: &Outstanding) -> Push {
        match self.sender.try_reserve() {
            Ok(permit) => {
                outstanding.pushed();
                permit.send(job);
                Push::Enqueued
            }
            Err(_) => Push::Dropped,
        }
    }

    // Waits for the next job. Returns None once the frontier is closed,
    // even if a worker is already parked here.
    pub async fn pull(&self) -> Option<Job> {
        let mut receiver = self.receiver.lock().await;
        tokio::select! {
            biased;
            _ = self.closed.cancelled() => None,
            job = receiver.recv() => job,
        }
    }

    pub fn close(&self) {
        self.closed.cancel();
    }

    pub fn is_drained(&self) -> bool {
        self.closed.is_cancelled()
    }

    // Token the termination observer cancels to close the frontier
    pub fn close_signal(&self) -> CancellationToken {
        self.closed.clone()
    }
}
