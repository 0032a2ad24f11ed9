//! Bulk orchestrator
//!
//! Runs many independent remote calls concurrently. Every call becomes its
//! own task with its own result slot; a [`BatchHandle`] collects the slots
//! once all tasks are done. Dropping the handle instead leaves the tasks
//! running to completion on their own.

use crate::directory::SharedDirectory;
use crate::error::{DirectoryError, DirectoryResult};
use crate::permissions::MutationCall;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Dispatches remote calls with a cap on how many are in flight
#[derive(Debug, Clone)]
pub struct BulkOrchestrator {
    limit: Arc<Semaphore>,
}

impl BulkOrchestrator {
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            limit: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    /// Spawn one task per item; `target` labels the item in the report
    pub fn dispatch<T, F, I>(&self, items: I) -> BatchHandle<T>
    where
        I: IntoIterator<Item = (String, F)>,
        F: Future<Output = DirectoryResult<T>> + Send + 'static,
        T: Send + 'static,
    {
        let tasks = items
            .into_iter()
            .map(|(target, call)| {
                let limit = self.limit.clone();
                let handle = tokio::spawn(async move {
                    let _permit = limit.acquire_owned().await.map_err(|_| {
                        DirectoryError::Unavailable("dispatch limiter closed".to_string())
                    })?;
                    call.await
                });
                (target, handle)
            })
            .collect::<Vec<_>>();

        debug!(tasks = tasks.len(), "Dispatched batch");
        BatchHandle { tasks }
    }

    /// Dispatch one overlay write per call
    pub fn apply_all(&self, directory: &SharedDirectory, calls: Vec<MutationCall>) -> BatchHandle<()> {
        self.dispatch(calls.into_iter().map(|call| {
            let directory = directory.clone();
            let target = call.to_string();
            (target, async move {
                directory
                    .set_overwrite(call.channel, call.role, call.overwrite)
                    .await
            })
        }))
    }
}

/// Handles to a dispatched batch
#[must_use = "dropping a batch handle detaches its tasks; call `join` to wait for them"]
pub struct BatchHandle<T> {
    tasks: Vec<(String, JoinHandle<DirectoryResult<T>>)>,
}

impl<T> BatchHandle<T> {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Let the tasks finish without waiting for them
    pub fn detach(self) {
        debug!(tasks = self.tasks.len(), "Detached batch");
    }

    /// Wait for every task and tally the outcomes
    pub async fn join(self) -> OutcomeReport {
        self.join_values().await.1
    }

    /// Wait for every task, keeping the values of those that succeeded
    pub async fn join_values(self) -> (Vec<(String, T)>, OutcomeReport) {
        let (targets, handles): (Vec<_>, Vec<_>) = self.tasks.into_iter().unzip();
        let results = futures::future::join_all(handles).await;

        let mut values = Vec::new();
        let mut report = OutcomeReport::default();

        for (target, result) in targets.into_iter().zip(results) {
            match result {
                Ok(Ok(value)) => {
                    report.succeeded += 1;
                    values.push((target, value));
                }
                Ok(Err(e)) => {
                    warn!(target = %target, error = %e, "Remote call failed");
                    report.failures.push(Failure::new(target, e.to_string()));
                }
                Err(e) => {
                    warn!(target = %target, error = %e, "Remote call task aborted");
                    report.failures.push(Failure::new(target, e.to_string()));
                }
            }
        }

        (values, report)
    }
}

/// A call that did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub target: String,
    pub error: String,
}

impl Failure {
    pub fn new(target: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            error: error.into(),
        }
    }
}

/// Tally of a finished batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeReport {
    pub succeeded: usize,
    pub failures: Vec<Failure>,
}

impl OutcomeReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Fold another batch's outcomes into this one
    pub fn absorb(&mut self, other: OutcomeReport) {
        self.succeeded += other.succeeded;
        self.failures.extend(other.failures);
    }
}
