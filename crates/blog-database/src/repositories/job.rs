//! Job repository implementation.
//!
//! The jobs table doubles as the durable work queue. Claiming uses
//! `FOR UPDATE SKIP LOCKED` so concurrent workers never receive the same
//! row at the same time; redelivery after a worker crash comes from
//! re-claiming running jobs whose visibility timeout has lapsed.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use blog_core::error::{AppError, ErrorKind};
use blog_core::result::AppResult;
use blog_entity::job::model::{CreateJob, Job};
use blog_entity::job::status::JobStatus;

/// Repository for job persistence and queue operations.
#[derive(Debug, Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    /// Create a new job repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a job by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job>> {
        sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find job", e))
    }

    /// Insert a pending job.
    pub async fn create(&self, data: &CreateJob) -> AppResult<Job> {
        sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (job_type, queue, payload, max_attempts) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&data.job_type)
        .bind(&data.queue)
        .bind(&data.payload)
        .bind(data.max_attempts)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create job", e))
    }

    /// Claim the next deliverable job from a queue, oldest first.
    ///
    /// Deliverable means pending, or running with a lapsed visibility
    /// timeout (a crashed or stalled worker), in both cases with attempts
    /// remaining. The claim flips the row to running, stamps the claim,
    /// and counts the delivery attempt, all in one statement.
    pub async fn claim_next(
        &self,
        queue: &str,
        worker_id: &str,
        visibility_timeout_seconds: u64,
    ) -> AppResult<Option<Job>> {
        sqlx::query_as::<_, Job>(
            "UPDATE jobs SET status = 'running', claimed_at = NOW(), claimed_by = $2, \
                attempts = attempts + 1 \
             WHERE id = ( \
                SELECT id FROM jobs \
                WHERE queue = $1 \
                  AND (status = 'pending' \
                       OR (status = 'running' \
                           AND claimed_at < NOW() - make_interval(secs => $3))) \
                  AND attempts < max_attempts \
                ORDER BY enqueued_at ASC \
                FOR UPDATE SKIP LOCKED \
                LIMIT 1 \
             ) RETURNING *",
        )
        .bind(queue)
        .bind(worker_id)
        .bind(visibility_timeout_seconds as f64)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to claim job", e))
    }

    /// Acknowledge a job as completed.
    pub async fn complete(&self, job_id: Uuid, result: Option<&serde_json::Value>) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'completed', result = $2, completed_at = NOW() WHERE id = $1",
        )
        .bind(job_id)
        .bind(result)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to complete job", e))?;
        Ok(())
    }

    /// Return a job to the queue after a transient failure so a later
    /// claim can redeliver it.
    pub async fn release(&self, job_id: Uuid, error_message: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'pending', error_message = $2, \
                claimed_at = NULL, claimed_by = NULL \
             WHERE id = $1",
        )
        .bind(job_id)
        .bind(error_message)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to release job", e))?;
        Ok(())
    }

    /// Move a job to the dead-letter state.
    pub async fn bury(&self, job_id: Uuid, error_message: &str) -> AppResult<()> {
        sqlx::query("UPDATE jobs SET status = 'dead', error_message = $2 WHERE id = $1")
            .bind(job_id)
            .bind(error_message)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to bury job", e))?;
        Ok(())
    }

    /// Dead-letter running jobs whose visibility timeout lapsed after
    /// their final attempt (a worker crashed on the last try, so no claim
    /// will ever pick them up again). Returns the swept jobs.
    pub async fn sweep_exhausted(&self, visibility_timeout_seconds: u64) -> AppResult<Vec<Job>> {
        sqlx::query_as::<_, Job>(
            "UPDATE jobs SET status = 'dead', \
                error_message = COALESCE(error_message, 'visibility timeout after final attempt') \
             WHERE status = 'running' \
               AND claimed_at < NOW() - make_interval(secs => $1) \
               AND attempts >= max_attempts \
             RETURNING *",
        )
        .bind(visibility_timeout_seconds as f64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to sweep jobs", e))
    }

    /// Delete completed jobs finished before the cutoff.
    pub async fn purge_completed_before(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM jobs WHERE status = 'completed' AND completed_at < $1")
                .bind(before)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to purge jobs", e))?;
        Ok(result.rows_affected())
    }

    /// Count jobs in a given status.
    pub async fn count_by_status(&self, status: JobStatus) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count jobs", e))
    }

    /// The most recently dead-lettered jobs, for operator inspection.
    pub async fn find_dead(&self, limit: i64) -> AppResult<Vec<Job>> {
        sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs WHERE status = 'dead' ORDER BY enqueued_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list dead jobs", e))
    }
}
