// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-lane serialized dispatch queue.
//!
//! All transport sends are funneled through one background worker task that
//! exclusively owns the lane. The worker receives jobs over an unbounded
//! mpsc channel and runs them strictly one at a time, so "at most one
//! in-flight send" is enforced by structure rather than convention.
//!
//! A task that fails resolves its own caller's future with the error and
//! the worker simply moves on to the next job; one failure can never wedge
//! the lane.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use ndira_core::NdiraError;

/// A unit of work for the dispatch worker. The job resolves its caller's
/// oneshot itself; the worker only drives it to completion.
type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Handle to the serialized dispatch lane.
///
/// Cheap to clone; all clones feed the same worker. Enqueueing never blocks
/// the caller — the returned [`PendingSend`] resolves once the task has had
/// its turn on the lane and settled.
#[derive(Clone)]
pub struct DispatchQueue {
    tx: mpsc::UnboundedSender<Job>,
    task_timeout: Option<Duration>,
}

impl DispatchQueue {
    /// Spawn the worker task and return the queue handle.
    ///
    /// `pacing` is awaited before every task to respect transport rate
    /// limits. `task_timeout`, when set, bounds each task's execution; an
    /// expired task resolves as [`NdiraError::Timeout`] and the lane
    /// proceeds to the next job.
    pub fn new(pacing: Duration, task_timeout: Option<Duration>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                tokio::time::sleep(pacing).await;
                job.await;
            }
            debug!("dispatch queue closed, worker exiting");
        });

        Self { tx, task_timeout }
    }

    /// Append a task to the lane.
    ///
    /// The task does not begin executing until every previously enqueued
    /// task has settled. Tasks run in enqueue order; there is no priority
    /// and no cancellation.
    pub fn enqueue<T, F, Fut>(&self, task: F) -> PendingSend<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, NdiraError>> + Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();
        let deadline = self.task_timeout;

        let job: Job = Box::pin(async move {
            let fut = task();
            let result = match deadline {
                Some(duration) => match tokio::time::timeout(duration, fut).await {
                    Ok(result) => result,
                    Err(_) => Err(NdiraError::Timeout { duration }),
                },
                None => fut.await,
            };
            // The caller may have stopped waiting; a dropped receiver is fine.
            let _ = done_tx.send(result);
        });

        if self.tx.send(job).is_err() {
            // Dropping the job closes done_tx, so the caller sees the
            // worker-gone error below.
            warn!("dispatch worker is gone, task rejected");
        }

        PendingSend { rx: done_rx }
    }
}

/// Future for an enqueued task's outcome.
pub struct PendingSend<T> {
    rx: oneshot::Receiver<Result<T, NdiraError>>,
}

impl<T> Future for PendingSend<T> {
    type Output = Result<T, NdiraError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(NdiraError::Internal(
                "dispatch worker stopped before the task completed".into(),
            ))),
            Poll::Pending => Poll::Pending,
        }
    }
}
