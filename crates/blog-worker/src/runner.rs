//! Worker runner: the main loop that polls the queue and executes jobs.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Semaphore};
use tokio::time;

use blog_core::config::worker::WorkerConfig;

use crate::executor::{JobExecutionError, JobExecutor};
use crate::queue::{JobQueue, DEFAULT_QUEUE};

/// Grace period for in-flight jobs during shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Main worker runner that polls queues and executes jobs.
pub struct WorkerRunner {
    /// Job queue for claiming work.
    queue: Arc<JobQueue>,
    /// Job executor for dispatching.
    executor: Arc<JobExecutor>,
    /// Worker configuration.
    config: WorkerConfig,
    /// Worker identifier.
    worker_id: String,
    /// Queues to poll, in priority order.
    queues: Vec<String>,
}

impl WorkerRunner {
    /// Create a new worker runner polling the default queue.
    pub fn new(
        queue: Arc<JobQueue>,
        executor: Arc<JobExecutor>,
        config: WorkerConfig,
        worker_id: String,
    ) -> Self {
        Self {
            queue,
            executor,
            config,
            worker_id,
            queues: vec![DEFAULT_QUEUE.to_string()],
        }
    }

    /// Set the queues to poll.
    pub fn with_queues(mut self, queues: Vec<String>) -> Self {
        self.queues = queues;
        self
    }

    /// Run until the cancel signal is received, then drain in-flight jobs.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(
            worker_id = %self.worker_id,
            concurrency = self.config.concurrency,
            poll_interval = self.config.poll_interval_seconds,
            queues = ?self.queues,
            "Worker started"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let poll_interval = Duration::from_secs(self.config.poll_interval_seconds);

        loop {
            if *cancel.borrow() {
                break;
            }

            let claimed = self.poll_and_execute(&semaphore).await;

            // Poll again immediately while work is flowing; sleep only on
            // an empty queue or when all slots are busy.
            if !claimed {
                tokio::select! {
                    _ = cancel.changed() => {
                        if *cancel.borrow() {
                            break;
                        }
                    }
                    _ = time::sleep(poll_interval) => {}
                }
            }
        }

        tracing::info!(
            worker_id = %self.worker_id,
            "Waiting for in-flight jobs to complete..."
        );

        let max_permits = self.config.concurrency as u32;
        let _ = time::timeout(SHUTDOWN_GRACE, semaphore.acquire_many(max_permits)).await;

        tracing::info!(worker_id = %self.worker_id, "Worker shut down");
    }

    /// Claim one job and spawn its execution. Returns whether a job was
    /// claimed.
    async fn poll_and_execute(&self, semaphore: &Arc<Semaphore>) -> bool {
        let permit = match Arc::clone(semaphore).try_acquire_owned() {
            Ok(p) => p,
            Err(_) => {
                tracing::trace!("All worker slots occupied");
                return false;
            }
        };

        let queue_refs: Vec<&str> = self.queues.iter().map(|s| s.as_str()).collect();

        match self.queue.claim(&queue_refs).await {
            Ok(Some(job)) => {
                let queue = Arc::clone(&self.queue);
                let executor = Arc::clone(&self.executor);
                let job_id = job.id;
                let job_type = job.job_type.clone();
                let exhausted = job.is_exhausted();
                let attempt = job.attempts;
                let max_attempts = job.max_attempts;

                tokio::spawn(async move {
                    let _permit = permit;

                    tracing::info!(
                        %job_id,
                        job_type,
                        attempt,
                        max_attempts,
                        "Processing job"
                    );

                    match executor.execute(&job).await {
                        Ok(result) => {
                            if let Err(e) = queue.complete(job_id, result).await {
                                tracing::error!(%job_id, error = %e, "Failed to mark job completed");
                            }
                        }
                        Err(err @ JobExecutionError::Permanent(_)) => {
                            tracing::error!(%job_id, error = %err, "Job failed permanently");
                            if let Err(e) = queue.bury(job_id, &err.to_string()).await {
                                tracing::error!(%job_id, error = %e, "Failed to bury job");
                            }
                        }
                        Err(err) => {
                            // Transient or internal: redeliver while the
                            // attempt budget lasts.
                            if exhausted {
                                tracing::error!(%job_id, error = %err, "Job failed on final attempt");
                                if let Err(e) = queue.bury(job_id, &err.to_string()).await {
                                    tracing::error!(%job_id, error = %e, "Failed to bury job");
                                }
                            } else {
                                tracing::warn!(%job_id, error = %err, "Job failed, will retry");
                                if let Err(e) = queue.release(job_id, &err.to_string()).await {
                                    tracing::error!(%job_id, error = %e, "Failed to release job");
                                }
                            }
                        }
                    }
                });
                true
            }
            Ok(None) => {
                drop(permit);
                tracing::trace!("No jobs available");
                false
            }
            Err(e) => {
                drop(permit);
                tracing::error!(error = %e, "Failed to claim job");
                false
            }
        }
    }
}
