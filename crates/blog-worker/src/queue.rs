//! Job queue for enqueuing and claiming background work.
//!
//! Delivery contract: at-least-once. A claimed job that is not
//! acknowledged before the visibility timeout becomes claimable again,
//! so handlers must be idempotent.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blog_core::config::worker::WorkerConfig;
use blog_core::result::AppResult;
use blog_database::repositories::job::JobRepository;
use blog_entity::job::model::{CreateJob, Job};
use blog_entity::job::payload::JobPayload;
use blog_entity::job::status::JobStatus;

/// Queue jobs are enqueued to unless stated otherwise.
pub const DEFAULT_QUEUE: &str = "default";

/// Job queue over the jobs table.
#[derive(Debug, Clone)]
pub struct JobQueue {
    /// Job repository for persistence.
    repo: Arc<JobRepository>,
    /// Worker identifier used when claiming jobs.
    worker_id: String,
    /// Seconds before an unacknowledged claim is redelivered.
    visibility_timeout_seconds: u64,
    /// Delivery attempt budget for newly enqueued jobs.
    max_attempts: i32,
}

impl JobQueue {
    /// Create a new job queue.
    pub fn new(repo: Arc<JobRepository>, worker_id: String, config: &WorkerConfig) -> Self {
        Self {
            repo,
            worker_id,
            visibility_timeout_seconds: config.visibility_timeout_seconds,
            max_attempts: config.max_attempts,
        }
    }

    /// Enqueue a job on the default queue. Returns as soon as the row is
    /// persisted; processing happens later on a worker.
    pub async fn enqueue(&self, payload: &JobPayload) -> AppResult<Job> {
        let job = self
            .repo
            .create(&CreateJob {
                job_type: payload.job_type().to_string(),
                queue: DEFAULT_QUEUE.to_string(),
                payload: serde_json::to_value(payload)?,
                max_attempts: self.max_attempts,
            })
            .await?;

        tracing::debug!(
            job_id = %job.id,
            job_type = %job.job_type,
            "Enqueued job"
        );
        Ok(job)
    }

    /// Claim the next deliverable job from the given queues, trying each
    /// queue in order. Returns `None` when all queues are empty.
    pub async fn claim(&self, queues: &[&str]) -> AppResult<Option<Job>> {
        for queue in queues {
            let job = self
                .repo
                .claim_next(queue, &self.worker_id, self.visibility_timeout_seconds)
                .await?;

            if let Some(job) = job {
                tracing::debug!(
                    job_id = %job.id,
                    job_type = %job.job_type,
                    attempt = job.attempts,
                    "Claimed job"
                );
                return Ok(Some(job));
            }
        }
        Ok(None)
    }

    /// Acknowledge a job as successfully processed.
    pub async fn complete(&self, job_id: Uuid, result: Option<serde_json::Value>) -> AppResult<()> {
        self.repo.complete(job_id, result.as_ref()).await?;
        tracing::debug!(%job_id, "Job completed");
        Ok(())
    }

    /// Return a job to the queue for a later redelivery attempt.
    pub async fn release(&self, job_id: Uuid, error: &str) -> AppResult<()> {
        self.repo.release(job_id, error).await?;
        tracing::debug!(%job_id, error, "Job released for retry");
        Ok(())
    }

    /// Dead-letter a job. It stays visible to operators and is never
    /// retried automatically.
    pub async fn bury(&self, job_id: Uuid, error: &str) -> AppResult<()> {
        self.repo.bury(job_id, error).await?;
        tracing::error!(%job_id, error, "Job dead-lettered");
        Ok(())
    }

    /// Snapshot of queue depth by status.
    pub async fn stats(&self) -> AppResult<QueueStats> {
        let pending = self.repo.count_by_status(JobStatus::Pending).await?;
        let running = self.repo.count_by_status(JobStatus::Running).await?;
        let dead = self.repo.count_by_status(JobStatus::Dead).await?;

        Ok(QueueStats {
            pending,
            running,
            dead,
            worker_id: self.worker_id.clone(),
        })
    }
}

/// Queue statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueStats {
    /// Number of pending jobs.
    pub pending: i64,
    /// Number of running jobs.
    pub running: i64,
    /// Number of dead-lettered jobs.
    pub dead: i64,
    /// Current worker identifier.
    pub worker_id: String,
}
