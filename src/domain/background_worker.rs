//! Consumer side of the background queue.

use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, mpsc, watch};
use tracing::{debug, info, warn};

use crate::domain::background_task::{BackgroundTask, CacheGenerations};
use crate::domain::error::RepositoryResult;
use crate::domain::repositories::StatsRepository;
use crate::infrastructure::cache::CacheService;

/// Executes background tasks against the cache and the access log.
pub struct BackgroundWorker {
    pub cache: Arc<dyn CacheService>,
    pub stats: Arc<dyn StatsRepository>,
    /// Shared with the queue the tasks come from.
    pub generations: CacheGenerations,
    pub concurrency: usize,
    pub task_timeout: Duration,
}

impl BackgroundWorker {
    /// Runs one task to completion or timeout. Failures are logged and
    /// counted, never retried.
    pub async fn execute(&self, task: BackgroundTask) {
        let kind = task.kind();
        let short_path = task.short_path().to_string();

        match tokio::time::timeout(self.task_timeout, self.run(task)).await {
            Ok(Ok(())) => debug!(task = kind, short_path = %short_path, "Background task done"),
            Ok(Err(e)) => {
                warn!(task = kind, short_path = %short_path, error = %e, "Background task failed");
                counter!("background_tasks_failed_total", "task" => kind, "reason" => "error")
                    .increment(1);
            }
            Err(_) => {
                warn!(
                    task = kind,
                    short_path = %short_path,
                    timeout_ms = self.task_timeout.as_millis() as u64,
                    "Background task timed out"
                );
                counter!("background_tasks_failed_total", "task" => kind, "reason" => "timeout")
                    .increment(1);
            }
        }
    }

    async fn run(&self, task: BackgroundTask) -> RepositoryResult<()> {
        match task {
            BackgroundTask::WarmCache {
                record,
                ttl,
                generation,
            } => {
                let short_path = record.short_path.as_str();
                if !self.generations.is_fresh(short_path, generation) {
                    debug!(short_path = %short_path, "Skipping warm-up of a changed record");
                    return Ok(());
                }

                self.cache.set(&record, Some(ttl)).await?;

                // An update may have invalidated between the check and the write.
                if !self.generations.is_fresh(short_path, generation) {
                    debug!(short_path = %short_path, "Record changed during warm-up, removing");
                    self.cache.invalidate(short_path).await?;
                }
                Ok(())
            }
            BackgroundTask::RecordAccess(entry) => self.stats.insert_access_log(&entry).await,
        }
    }
}

/// Consumes the background queue until it is closed and empty.
///
/// At most `worker.concurrency` tasks run at once; the receive loop waits
/// for a free slot before taking the next task, so the bounded channel
/// absorbs bursts. When `shutdown` fires (or its sender is dropped) the
/// channel is closed to new submissions, already queued tasks still run, and
/// the function returns once every in-flight task has finished.
pub async fn run_background_worker(
    mut rx: mpsc::Receiver<BackgroundTask>,
    worker: BackgroundWorker,
    mut shutdown: watch::Receiver<bool>,
) {
    let concurrency = worker.concurrency.max(1);
    let worker = Arc::new(worker);
    let permits = Arc::new(Semaphore::new(concurrency));
    let mut closing = false;

    info!(concurrency, "Background worker started");

    loop {
        let task = tokio::select! {
            _ = shutdown.changed(), if !closing => {
                closing = true;
                rx.close();
                debug!("Background queue closed, draining");
                continue;
            }
            task = rx.recv() => task,
        };

        let Some(task) = task else {
            break;
        };

        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let worker = worker.clone();
        tokio::spawn(async move {
            let _permit = permit;
            worker.execute(task).await;
        });
    }

    let _ = permits.acquire_many(concurrency as u32).await;
    info!("Background worker stopped");
}
