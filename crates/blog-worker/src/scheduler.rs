//! Cron scheduler for periodic queue maintenance.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use blog_core::error::AppError;
use blog_entity::job::payload::JobPayload;

use crate::queue::JobQueue;

/// Cron-based scheduler enqueuing periodic background tasks.
pub struct CronScheduler {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
    /// Job queue for enqueuing scheduled work.
    queue: Arc<JobQueue>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler.
    pub async fn new(queue: Arc<JobQueue>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler, queue })
    }

    /// Register all default scheduled tasks.
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_queue_maintenance().await?;
        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shut down the scheduler.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        // JobScheduler::shutdown wants a mutable handle; the scheduler is
        // a cheap clone over shared state.
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Queue maintenance, every 5 minutes: sweeps exhausted jobs into
    /// the dead-letter state and purges old completed rows.
    async fn register_queue_maintenance(&self) -> Result<(), AppError> {
        let queue = Arc::clone(&self.queue);
        let job = CronJob::new_async("0 */5 * * * *", move |_uuid, _lock| {
            let queue = Arc::clone(&queue);
            Box::pin(async move {
                tracing::debug!("Scheduling queue maintenance job");
                if let Err(e) = queue.enqueue(&JobPayload::QueueMaintenance).await {
                    tracing::error!(error = %e, "Failed to enqueue queue_maintenance");
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create queue_maintenance schedule: {e}"))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add queue_maintenance schedule: {e}"))
        })?;

        tracing::info!("Registered: queue_maintenance (every 5min)");
        Ok(())
    }
}
