// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-size worker pool for CPU-bound task batches
//!
//! Workers pull from a FIFO admission queue and run each task body on the
//! blocking thread pool, so heavy computation never stalls the runtime.
//! Every submitted task produces exactly one result, keyed by task id; a
//! failing task is reported as data and never aborts its siblings.
//! Results arrive in completion order — a bounded pool gives no positional
//! guarantee, so callers pair results to tasks by id.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tokio::task;
use tokio::time::{timeout_at, Instant};
use tracing::debug;

use crate::counter::Counter;

/// Identifier pairing each task with its result
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One unit of work: an opaque input plus its identifier
#[derive(Clone, Debug)]
pub struct Task<T> {
    pub id: TaskId,
    pub input: T,
}

impl<T> Task<T> {
    pub fn new(id: u64, input: T) -> Self {
        Self {
            id: TaskId(id),
            input,
        }
    }
}

/// What became of one task
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskOutcome<R> {
    Completed(R),
    /// The task body returned an error or panicked
    Failed { reason: String },
}

/// The result of one task, keyed by the submitted id
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskResult<R> {
    pub id: TaskId,
    pub outcome: TaskOutcome<R>,
}

/// The result of a whole batch run under a deadline
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOutcome<R> {
    /// Every task produced a result
    Complete(Vec<TaskResult<R>>),
    /// The deadline expired; results produced in time are preserved
    TimedOut { completed: Vec<TaskResult<R>> },
}

/// Errors from pool construction
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("worker count must be at least 1")]
    InvalidWorkerCount,
}

/// A bounded set of workers executing independent CPU-bound tasks
pub struct WorkerPool {
    workers: usize,
    completed: Counter,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<Self, PoolError> {
        if workers == 0 {
            return Err(PoolError::InvalidWorkerCount);
        }
        Ok(Self {
            workers,
            completed: Counter::new(),
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Tasks finished (successfully or not) across all runs
    pub fn completed(&self) -> u64 {
        self.completed.read()
    }

    /// Execute every task and return one result per task
    ///
    /// Returns only after every submitted task has a result. The order
    /// follows completion; pair results to tasks by id.
    pub async fn run<T, R, F>(&self, tasks: Vec<Task<T>>, op: F) -> Vec<TaskResult<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Result<R, String> + Send + Sync + 'static,
    {
        match self.run_batch(tasks, op, None).await {
            BatchOutcome::Complete(results) => results,
            // Only reachable with a deadline set.
            BatchOutcome::TimedOut { completed } => completed,
        }
    }

    /// Like [`run`](Self::run) with a whole-batch deadline
    ///
    /// On expiry the results produced so far are returned; tasks still
    /// executing are abandoned and their results discarded.
    pub async fn run_within<T, R, F>(
        &self,
        tasks: Vec<Task<T>>,
        op: F,
        wait: Duration,
    ) -> BatchOutcome<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Result<R, String> + Send + Sync + 'static,
    {
        self.run_batch(tasks, op, Some(wait)).await
    }

    async fn run_batch<T, R, F>(
        &self,
        tasks: Vec<Task<T>>,
        op: F,
        wait: Option<Duration>,
    ) -> BatchOutcome<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Result<R, String> + Send + Sync + 'static,
    {
        let total = tasks.len();
        let deadline = wait.map(|wait| Instant::now() + wait);
        if total == 0 {
            return BatchOutcome::Complete(Vec::new());
        }

        // Admission: capacity equals the batch size, so loading the queue
        // never waits and the queue drains in FIFO order.
        let (task_tx, task_rx) = mpsc::channel(total);
        for task in tasks {
            let _ = task_tx.send(task).await;
        }
        drop(task_tx);

        let task_rx = Arc::new(AsyncMutex::new(task_rx));
        let (result_tx, mut result_rx) = mpsc::channel(total);
        let op = Arc::new(op);

        for worker in 0..self.workers {
            let task_rx = Arc::clone(&task_rx);
            let result_tx = result_tx.clone();
            let op = Arc::clone(&op);
            let completed = self.completed.clone();
            task::spawn(async move {
                loop {
                    let next = { task_rx.lock().await.recv().await };
                    let Some(task) = next else { break };
                    let id = task.id;
                    let op = Arc::clone(&op);
                    let outcome = match task::spawn_blocking(move || op(task.input)).await {
                        Ok(Ok(value)) => TaskOutcome::Completed(value),
                        Ok(Err(reason)) => TaskOutcome::Failed { reason },
                        Err(join_error) => TaskOutcome::Failed {
                            reason: join_error.to_string(),
                        },
                    };
                    completed.increment();
                    debug!(worker, task = %id, "task finished");
                    if result_tx.send(TaskResult { id, outcome }).await.is_err() {
                        // The collector gave up on the batch; stop pulling.
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        let mut results = Vec::with_capacity(total);
        loop {
            let next = match deadline {
                Some(deadline) => match timeout_at(deadline, result_rx.recv()).await {
                    Ok(next) => next,
                    Err(_) => {
                        debug!(collected = results.len(), total, "batch deadline expired");
                        return BatchOutcome::TimedOut { completed: results };
                    }
                },
                None => result_rx.recv().await,
            };
            match next {
                Some(result) => {
                    results.push(result);
                    if results.len() == total {
                        return BatchOutcome::Complete(results);
                    }
                }
                None => return BatchOutcome::Complete(results),
            }
        }
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
