//! Throttled task runner
//!
//! Requests to the station sites are paced through a single FIFO queue:
//! - Tasks run one at a time, in submission order
//! - After each task finishes the queue pauses for a fixed delay
//! - A failing task only fails its own caller; the queue keeps going
//! - A panicking task is reported to its caller as `TaskPanicked`

use crate::{CollectorError, Result};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Pause used when no delay is configured
pub const DEFAULT_TASK_DELAY: Duration = Duration::from_micros(2_358_130);

type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Serializes asynchronous tasks with a fixed pause between them
///
/// The queue is drained by a worker spawned on the current Tokio runtime, so
/// the runner must be created from within a runtime. Dropping the runner lets
/// the worker finish the tasks already queued and then stop.
pub struct ThrottledTaskRunner {
    sender: mpsc::UnboundedSender<Job>,
    running: Arc<AtomicBool>,
    delay: Duration,
}

impl ThrottledTaskRunner {
    /// Creates a runner pausing `delay` after every task
    pub fn new(delay: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let running = Arc::new(AtomicBool::new(false));

        tokio::spawn(drain_queue(receiver, Arc::clone(&running), delay));

        Self {
            sender,
            running,
            delay,
        }
    }

    /// The pause applied after each task
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a task is in flight or the runner is pausing after one
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Queues a task and returns a future resolving to its result
    ///
    /// The task is queued immediately, before the returned future is polled,
    /// so the order of `add_task` calls is the order of execution.
    pub fn add_task<T, F, Fut>(&self, task: F) -> impl Future<Output = Result<T>> + Send
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (result_tx, result_rx) = oneshot::channel();

        let job: Job = Box::pin(async move {
            let result = task().await;
            if let Err(e) = &result {
                tracing::warn!("Task in throttled runner failed: {}", e);
            }
            // the caller may have stopped waiting
            let _ = result_tx.send(result);
        });

        let queued = self.sender.send(job).is_ok();

        async move {
            if !queued {
                return Err(CollectorError::RunnerClosed);
            }
            // the sender is only dropped without a value when the task panicked
            result_rx.await.map_err(|_| CollectorError::TaskPanicked)?
        }
    }
}

impl Default for ThrottledTaskRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TASK_DELAY)
    }
}

async fn drain_queue(
    mut receiver: mpsc::UnboundedReceiver<Job>,
    running: Arc<AtomicBool>,
    delay: Duration,
) {
    while let Some(job) = receiver.recv().await {
        running.store(true, Ordering::SeqCst);

        if let Err(e) = tokio::spawn(job).await {
            tracing::error!("Task in throttled runner did not finish: {}", e);
        }
        tokio::time::sleep(delay).await;

        running.store(false, Ordering::SeqCst);
    }

    tracing::trace!("Throttled runner queue closed");
}
