//! Bounded-concurrency resource fetching
//!
//! [`ParallelResourceReader`] runs independent fetch tasks on the tokio
//! runtime, never more than `parallelism` at once, and deserializes their
//! results into resources.
//!
//! The first failure wins: [`ParallelResourceReader::wait`] returns it
//! immediately, tasks that have not started yet never start, and tasks
//! already running finish in the background with their results discarded.

use crate::error::{RemoteError, Result};
use crate::reader::Deserializer;
use driftflow_core::Resource;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Default number of concurrent fetches
pub const DEFAULT_PARALLELISM: usize = 10;

pub struct ParallelResourceReader<D: Deserializer + ?Sized> {
    deserializer: Arc<D>,
    /// Closed after the first failure so that waiting tasks give up
    semaphore: Arc<Semaphore>,
    tasks: JoinSet<Result<Option<serde_json::Value>>>,
}

impl<D: Deserializer + ?Sized> ParallelResourceReader<D> {
    /// Create a reader running at most `parallelism` tasks at once (minimum 1)
    pub fn new(parallelism: usize, deserializer: Arc<D>) -> Self {
        Self {
            deserializer,
            semaphore: Arc::new(Semaphore::new(parallelism.max(1))),
            tasks: JoinSet::new(),
        }
    }

    /// Queue a fetch task
    ///
    /// Never blocks. Must be called from within a tokio runtime.
    pub fn run<F, Fut>(&mut self, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<serde_json::Value>> + Send + 'static,
    {
        let semaphore = Arc::clone(&self.semaphore);
        self.tasks.spawn(async move {
            let Ok(_permit) = Arc::clone(&semaphore).acquire_owned().await else {
                return Ok(None);
            };
            if semaphore.is_closed() {
                return Ok(None);
            }
            match task().await {
                Ok(raw) => Ok(Some(raw)),
                Err(e) => {
                    semaphore.close();
                    Err(e)
                }
            }
        });
    }

    /// Number of queued or running tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every task and deserialize the results
    ///
    /// Results come back in completion order, not submission order.
    pub async fn wait(mut self) -> Result<Vec<Resource>> {
        let mut resources = Vec::with_capacity(self.tasks.len());

        while let Some(joined) = self.tasks.join_next().await {
            let outcome = match joined {
                Ok(Ok(Some(raw))) => self.deserializer.deserialize(raw),
                // Skipped after a failure that will surface on its own
                Ok(Ok(None)) => continue,
                Ok(Err(e)) => Err(e),
                Err(e) => Err(RemoteError::TaskPanicked(e.to_string())),
            };

            match outcome {
                Ok(resource) => resources.push(resource),
                Err(e) => {
                    self.abandon();
                    return Err(e);
                }
            }
        }

        Ok(resources)
    }

    /// Stop launching tasks and let running ones finish unobserved
    fn abandon(&mut self) {
        self.semaphore.close();
        self.tasks.detach_all();
    }
}
