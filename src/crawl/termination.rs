// src/crawl/termination.rs
// =============================================================================
// Termination detection for the concurrent crawl.
//
// Checking "is the queue empty?" is not enough: a worker can be in the middle
// of a fetch and about to enqueue children. So we count outstanding jobs
// instead. The count starts at 1 for the seed, goes +1 for every job that is
// put on the frontier and -1 for every job a worker finishes with. When it
// hits 0 nothing is queued and nothing is being processed, so nothing can
// ever be queued again.
//
// All deltas go through one channel to one observer task. That task is the
// only writer of the counter, and it declares completion exactly once.
// =============================================================================

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::error::TerminationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delta {
    /// A job was put on the frontier
    Pushed,
    /// A worker finished with a job it pulled
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running(usize),
    Complete,
}

#[derive(Debug)]
pub struct TerminationDetector {
    outstanding: usize,
    complete: bool,
}

impl Default for TerminationDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminationDetector {
    // Starts with the seed job in flight
    pub fn new() -> Self {
        Self {
            outstanding: 1,
            complete: false,
        }
    }

    pub fn apply(&mut self, delta: Delta) -> Result<Status, TerminationError> {
        if self.complete {
            return Err(TerminationError::AfterCompletion);
        }

        match delta {
            Delta::Pushed => self.outstanding += 1,
            Delta::Resolved => {
                self.outstanding = self
                    .outstanding
                    .checked_sub(1)
                    .ok_or(TerminationError::CounterUnderflow)?;
            }
        }

        if self.outstanding == 0 {
            self.complete = true;
            Ok(Status::Complete)
        } else {
            Ok(Status::Running(self.outstanding))
        }
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

// Cheap handle the workers use to report deltas to the observer
#[derive(Debug, Clone)]
pub struct Outstanding {
    deltas: mpsc::UnboundedSender<Delta>,
}

impl Outstanding {
    pub fn pushed(&self) {
        self.send(Delta::Pushed);
    }

    pub fn resolved(&self) {
        self.send(Delta::Resolved);
    }

    fn send(&self, delta: Delta) {
        // The observer only stops after completion (no more deltas are
        // legitimate then) or after reporting a counting error.
        if self.deltas.send(delta).is_err() {
            debug!(?delta, "termination observer already stopped");
        }
    }
}

// Spawns the single observer. `done` is cancelled when the count reaches
// zero, and also if the counter detects a bug, so workers never hang.
pub fn spawn_observer(
    done: CancellationToken,
) -> (Outstanding, JoinHandle<Result<(), TerminationError>>) {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        let mut detector = TerminationDetector::new();

        while let Some(delta) = rx.recv().await {
            match detector.apply(delta) {
                Ok(Status::Complete) => {
                    debug!("no outstanding jobs left, closing frontier");
                    done.cancel();
                    return Ok(());
                }
                Ok(Status::Running(_)) => {}
                Err(e) => {
                    error!(error = %e, "termination counter is inconsistent");
                    done.cancel();
                    return Err(e);
                }
            }
        }

        // Every sender is gone but jobs are still counted: the workers died
        done.cancel();
        Err(TerminationError::Abandoned(detector.outstanding()))
    });

    (Outstanding { deltas: tx }, handle)
}
