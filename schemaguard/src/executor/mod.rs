//! Bounded-concurrency task execution.
//!
//! Every item is handed to the task exactly once. At most
//! `max_concurrency` tasks run at a time. A failing task never cancels its
//! siblings; the first failure (in completion order) is kept and returned
//! once every task has finished.

use futures::future::join_all;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::errors::SchemaguardError;

/// Default number of in-flight tasks.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Runs tasks over a set of items with a cap on parallelism.
#[derive(Debug, Clone, Copy)]
pub struct BoundedExecutor {
    max_concurrency: usize,
}

impl BoundedExecutor {
    /// Creates an executor. Limits below one are raised to one.
    #[must_use]
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Returns the effective concurrency limit.
    #[must_use]
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Spawns one task per item and returns a handle to the running batch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch<T, F, Fut, E>(&self, items: Vec<T>, task: F) -> Batch
    where
        T: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<SchemaguardError> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let first_error = Arc::new(Mutex::new(None));
        let task = Arc::new(task);

        let handles = items
            .into_iter()
            .map(|item| {
                let semaphore = semaphore.clone();
                let first_error = first_error.clone();
                let task = task.clone();
                tokio::spawn(async move {
                    // The semaphore is never closed, so acquiring cannot fail.
                    let Ok(_permit) = semaphore.acquire_owned().await else {
                        return;
                    };
                    if let Err(err) = task(item).await {
                        record_first(&first_error, err.into());
                    }
                })
            })
            .collect::<Vec<_>>();

        debug!(
            tasks = handles.len(),
            max_concurrency = self.max_concurrency,
            "Dispatched batch"
        );

        Batch {
            handles,
            first_error,
        }
    }

    /// Dispatches every item and waits for all of them.
    pub async fn run_all<T, F, Fut, E>(&self, items: Vec<T>, task: F) -> Result<(), SchemaguardError>
    where
        T: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<SchemaguardError> + Send + 'static,
    {
        self.dispatch(items, task).join().await
    }
}

impl Default for BoundedExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

fn record_first(slot: &Mutex<Option<SchemaguardError>>, err: SchemaguardError) {
    let mut first = slot.lock();
    if first.is_none() {
        *first = Some(err);
    } else {
        debug!(error = %err, "Dropping subsequent task error");
    }
}

/// A dispatched set of tasks.
#[derive(Debug)]
pub struct Batch {
    handles: Vec<JoinHandle<()>>,
    first_error: Arc<Mutex<Option<SchemaguardError>>>,
}

impl Batch {
    /// Returns the number of tasks in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns true if the batch holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for every task and returns the first captured failure.
    pub async fn join(self) -> Result<(), SchemaguardError> {
        for result in join_all(self.handles).await {
            if let Err(join_error) = result {
                warn!(error = %join_error, "Validation task did not complete");
                record_first(&self.first_error, join_error.into());
            }
        }

        match self.first_error.lock().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LookupError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_runs_every_item_once() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();

        let result = BoundedExecutor::new(3)
            .run_all((0..20).collect(), move |i: usize| {
                let recorder = recorder.clone();
                async move {
                    recorder.lock().push(i);
                    Ok::<(), SchemaguardError>(())
                }
            })
            .await;

        assert!(result.is_ok());
        let mut seen = seen.lock().clone();
        seen.sort_unstable();
        assert_eq!(seen, (0..20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_respects_concurrency_limit() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (in_flight_task, peak_task) = (in_flight.clone(), peak.clone());

        BoundedExecutor::new(2)
            .run_all((0..10).collect(), move |_: usize| {
                let in_flight = in_flight_task.clone();
                let peak = peak_task.clone();
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok::<(), SchemaguardError>(())
                }
            })
            .await
            .unwrap();

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_error_does_not_cancel_siblings() {
        let completed = Arc::new(AtomicUsize::new(0));
        let counter = completed.clone();

        let result = BoundedExecutor::new(4)
            .run_all((0..8).collect(), move |i: usize| {
                let counter = counter.clone();
                async move {
                    if i == 0 {
                        return Err(LookupError::fetch("v1, Kind=Pod", "refused"));
                    }
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .await;

        assert!(matches!(result, Err(SchemaguardError::Lookup(_))));
        assert_eq!(completed.load(Ordering::SeqCst), 7);
    }

    #[tokio::test]
    async fn test_first_error_in_completion_order_wins() {
        let result = BoundedExecutor::new(2)
            .run_all(vec![30_u64, 1], |delay| async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Err(LookupError::fetch(format!("slow-{delay}"), "failed"))
            })
            .await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("slow-1"));
    }

    #[tokio::test]
    async fn test_panicking_task_is_captured() {
        let result = BoundedExecutor::new(1)
            .run_all(vec![1, 2], |i: u32| async move {
                assert!(i != 2, "task {i} panicked");
                Ok::<(), SchemaguardError>(())
            })
            .await;

        assert!(matches!(result, Err(SchemaguardError::TaskJoin(_))));
    }

    #[tokio::test]
    async fn test_zero_limit_is_raised_to_one() {
        let executor = BoundedExecutor::new(0);
        assert_eq!(executor.max_concurrency(), 1);

        let batch = executor.dispatch(vec![(); 3], |()| async { Ok::<(), SchemaguardError>(()) });
        assert_eq!(batch.len(), 3);
        assert!(batch.join().await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let result = BoundedExecutor::default()
            .run_all(Vec::<u8>::new(), |_| async { Ok::<(), SchemaguardError>(()) })
            .await;
        assert!(result.is_ok());
    }
}
